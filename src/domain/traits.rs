// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two capabilities the pipeline consumes but does not own:
//
//   CorpusSource  → where raw records come from
//                   (JsonCorpusLoader reads them from disk;
//                    tests use in-memory sources)
//   TextTokenizer → text to token ids
//                   (HfTokenizer wraps a HuggingFace tokenizer)
//
// The data and application layers only see these traits, so the
// cache can be exercised against a loader that fails on purpose
// and the tokenizer can be swapped without touching the pipeline.

use crate::domain::error::Result;
use crate::domain::example::{DatasetName, RawRecord, Splits};

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Anything that can produce the raw train/dev/test records of a
/// dataset instance.
pub trait CorpusSource {
    /// Load every split of `name`.
    ///
    /// Unknown families fail with `DataError::InvalidDataset`.
    /// A split the corpus does not provide is `None`, not an error.
    fn load(&self, name: &DatasetName) -> Result<Splits<Vec<RawRecord>>>;
}

// ─── TextTokenizer ────────────────────────────────────────────────────────────
/// Deterministic text → token id conversion.
pub trait TextTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>>;
}

impl<T: CorpusSource + ?Sized> CorpusSource for Box<T> {
    fn load(&self, name: &DatasetName) -> Result<Splits<Vec<RawRecord>>> {
        (**self).load(name)
    }
}

impl<T: TextTokenizer + ?Sized> TextTokenizer for Box<T> {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        (**self).encode(text)
    }
}
