//! In-memory fakes shared by the unit tests.

use serde_json::json;
use std::cell::Cell;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::rc::Rc;

use crate::domain::error::{DataError, Result};
use crate::domain::example::{DatasetName, Example, RawRecord, Splits};
use crate::domain::traits::{CorpusSource, TextTokenizer};

/// Cache capacity for tests.
pub fn capacity(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

/// A SOAP-shaped raw record without an `ex_id`.
pub fn soap_record(i: u64) -> RawRecord {
    json!({
        "assessment": format!("assessment-{i}"),
        "subjective": format!("subjective-{i}"),
        "objective":  format!("objective-{i}"),
        "label_text": format!("summary of note {i}"),
    })
    .as_object()
    .cloned()
    .unwrap()
}

/// The Example `soap_record(i)` normalises to at position `i`.
pub fn soap_example(i: u64) -> Example {
    Example::new(i, format!("summary of note {i}"))
        .with_field("assessment", format!("assessment-{i}"))
        .with_field("subjective", format!("subjective-{i}"))
        .with_field("objective", format!("objective-{i}"))
}

// ─── WhitespaceTokenizer ──────────────────────────────────────────────────────
/// Splits on whitespace and hashes each word (FNV-1a) into an id.
/// Clones share one call counter.
#[derive(Clone, Default)]
pub struct WhitespaceTokenizer {
    calls: Rc<Cell<usize>>,
}

impl WhitespaceTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl TextTokenizer for WhitespaceTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        self.calls.set(self.calls.get() + 1);
        Ok(text
            .split_whitespace()
            .map(|word| {
                let mut h: u32 = 0x811c_9dc5;
                for b in word.bytes() {
                    h ^= b as u32;
                    h = h.wrapping_mul(0x0100_0193);
                }
                h % 50_000
            })
            .collect())
    }
}

// ─── MemoryCorpus ─────────────────────────────────────────────────────────────
/// Serves canned splits per dataset name and counts loads.
/// Clones share the data and the counter.
#[derive(Clone, Default)]
pub struct MemoryCorpus {
    instances: Rc<HashMap<DatasetName, Splits<Vec<RawRecord>>>>,
    loads:     Rc<Cell<usize>>,
}

impl MemoryCorpus {
    /// `bionlp` with `size` train records, no dev split and
    /// `size / 2` test records; folds 0..5 share the same layout.
    pub fn bionlp(size: u64) -> Self {
        let mut instances = HashMap::new();
        let folds = std::iter::once(None).chain((0..5).map(Some));
        for fold in folds {
            let train = (0..size).map(soap_record).collect();
            let test  = (0..size / 2).map(soap_record).collect();
            instances.insert(
                DatasetName::new("bionlp", fold),
                Splits::new(Some(train), None, Some(test)),
            );
        }
        Self { instances: Rc::new(instances), loads: Rc::default() }
    }

    pub fn loads(&self) -> usize {
        self.loads.get()
    }
}

impl CorpusSource for MemoryCorpus {
    fn load(&self, name: &DatasetName) -> Result<Splits<Vec<RawRecord>>> {
        self.loads.set(self.loads.get() + 1);
        self.instances
            .get(name)
            .cloned()
            .ok_or_else(|| DataError::InvalidDataset(name.to_string()))
    }
}

// ─── FailingAfterFirst ────────────────────────────────────────────────────────
/// Delegates the first load, then fails every later one.
pub struct FailingAfterFirst<S> {
    inner: S,
    used:  Cell<bool>,
}

impl<S> FailingAfterFirst<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, used: Cell::new(false) }
    }
}

impl<S: CorpusSource> CorpusSource for FailingAfterFirst<S> {
    fn load(&self, name: &DatasetName) -> Result<Splits<Vec<RawRecord>>> {
        if self.used.replace(true) {
            return Err(DataError::Io(std::io::Error::other("corpus loaded twice")));
        }
        self.inner.load(name)
    }
}
