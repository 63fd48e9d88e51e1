// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads a HuggingFace tokenizer.json and exposes it through the
// TextTokenizer trait.
//
// `path` may point at the JSON file itself or at a directory that
// contains a tokenizer.json (the usual layout of a downloaded model).
//
// Special tokens are added on encode, matching what a pretrained
// seq2seq tokenizer returns as `input_ids` (e.g. the trailing </s>
// of T5).

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use crate::domain::error::{self, DataError};
use crate::domain::traits::TextTokenizer;

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The tokenizer.json this store reads.
    pub fn file(&self) -> PathBuf {
        if self.path.is_dir() {
            self.path.join("tokenizer.json")
        } else {
            self.path.clone()
        }
    }

    /// Load the tokenizer from disk.
    pub fn load(&self) -> Result<HfTokenizer> {
        let path = self.file();
        let tokenizer = Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))?;

        tracing::info!(
            "Loaded tokenizer from '{}' (vocab size {})",
            path.display(),
            tokenizer.get_vocab_size(true)
        );
        Ok(HfTokenizer::new(tokenizer))
    }
}

/// A `tokenizers::Tokenizer` behind the TextTokenizer trait.
pub struct HfTokenizer {
    inner:              Tokenizer,
    add_special_tokens: bool,
}

impl HfTokenizer {
    pub fn new(inner: Tokenizer) -> Self {
        Self { inner, add_special_tokens: true }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        TokenizerStore::new(path).load()
    }

    /// Encode without the model's special tokens.
    pub fn without_special_tokens(mut self) -> Self {
        self.add_special_tokens = false;
        self
    }
}

impl TextTokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> error::Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, self.add_special_tokens)
            .map_err(|e| DataError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }
}
