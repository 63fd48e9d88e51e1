// ============================================================
// Layer 2 — DatasetHandler
// ============================================================
// The single entry point a training/evaluation driver talks to.
//
// A handler owns ONE template and ONE tokenizer for its whole
// life. To change either, build a new handler: prepared results
// are cached per handler and would otherwise be stale.
//
// Caches:
//
//   shared (LoadCache, one per corpus, handed to every handler)
//     (name, limit)        → normalised + subsampled splits
//     (name, mode, limit)  → one of those splits
//
//   private (one set per handler)
//     (name, mode, limit)  → PreparedSplit
//     (name, limit)        → PreparedDataset
//
// prepare_dataset is built out of prepare_split, so a split that
// was tokenized by either call is never tokenized again while it
// stays in the cache.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{num::NonZeroUsize, sync::Arc};

use crate::data::{
    cache::{DatasetKey, DatasetSplits, LoadCache, SharedLoadCache, SplitKey, DEFAULT_CACHE_CAPACITY},
    dataset::{PreparedDataset, PreparedSplit},
    formatter::TemplateFormatter,
    loader::JsonCorpusLoader,
    pipeline,
};
use crate::domain::error::Result;
use crate::domain::example::{DatasetName, SplitMode, SplitRef, Splits};
use crate::domain::traits::TextTokenizer;
use crate::infra::lru::{CacheStats, LruCache};
use crate::infra::tokenizer_store::TokenizerStore;

// ─── Handler Configuration ───────────────────────────────────────────────────
// Everything needed to build a handler from disk.
// Serialisable so a run can record exactly how its data was prepared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Root of the JSONL corpus layout
    pub corpus_dir: String,

    /// Corpus families the loader accepts
    pub families: Vec<String>,

    /// tokenizer.json, or a directory containing one
    pub tokenizer_path: String,

    /// Input template, e.g. "{A} {S} {O}"
    pub formatting: String,

    /// Entries per cache; zero is rejected on deserialization
    pub cache_capacity: NonZeroUsize,

    /// Draw a progress bar while tokenizing
    pub show_progress: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            corpus_dir:     "data".to_string(),
            families:       vec!["bionlp".to_string()],
            tokenizer_path: "tokenizer".to_string(),
            formatting:     "{A}".to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            show_progress:  true,
        }
    }
}

impl HandlerConfig {
    /// A load cache over this config's corpus, to share between handlers.
    pub fn load_cache(&self) -> SharedLoadCache {
        let loader = JsonCorpusLoader::new(&self.corpus_dir, self.families.clone());
        LoadCache::shared(Box::new(loader), self.cache_capacity)
    }
}

/// Hit/miss counters of every cache a handler touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerStats {
    pub loaded_datasets:   CacheStats,
    pub loaded_splits:     CacheStats,
    pub prepared_splits:   CacheStats,
    pub prepared_datasets: CacheStats,
}

// ─── DatasetHandler ──────────────────────────────────────────────────────────
pub struct DatasetHandler {
    formatter:     TemplateFormatter,
    tokenizer:     Box<dyn TextTokenizer>,
    loads:         SharedLoadCache,
    splits:        LruCache<SplitKey, Option<Arc<PreparedSplit>>>,
    datasets:      LruCache<DatasetKey, Arc<PreparedDataset>>,
    show_progress: bool,
}

impl DatasetHandler {
    pub fn new(
        formatter: TemplateFormatter,
        tokenizer: Box<dyn TextTokenizer>,
        loads:     SharedLoadCache,
    ) -> Self {
        Self::with_capacity(formatter, tokenizer, loads, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(
        formatter: TemplateFormatter,
        tokenizer: Box<dyn TextTokenizer>,
        loads:     SharedLoadCache,
        capacity:  NonZeroUsize,
    ) -> Self {
        Self {
            formatter,
            tokenizer,
            loads,
            splits:        LruCache::new(capacity),
            datasets:      LruCache::new(capacity),
            show_progress: false,
        }
    }

    /// Build a handler from config, loading the tokenizer from disk.
    pub fn from_config(config: &HandlerConfig, loads: SharedLoadCache) -> anyhow::Result<Self> {
        let tokenizer = TokenizerStore::new(&config.tokenizer_path)
            .load()
            .with_context(|| format!("Cannot build handler for '{}'", config.formatting))?;

        let handler = Self::with_capacity(
            TemplateFormatter::new(config.formatting.clone()),
            Box::new(tokenizer),
            loads,
            config.cache_capacity,
        )
        .with_progress(config.show_progress);
        Ok(handler)
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The template this handler renders inputs with.
    pub fn formatting(&self) -> &str {
        self.formatter.template()
    }

    /// The load cache this handler draws from (clone it to share).
    pub fn load_cache(&self) -> &SharedLoadCache {
        &self.loads
    }

    pub fn cache_stats(&self) -> HandlerStats {
        let loads = self.loads.borrow();
        HandlerStats {
            loaded_datasets:   loads.dataset_stats(),
            loaded_splits:     loads.split_stats(),
            prepared_splits:   self.splits.stats(),
            prepared_datasets: self.datasets.stats(),
        }
    }

    // ── Loading (shared cache) ───────────────────────────────────────────────

    /// Normalised splits of `dataset_name`, truncated to `limit`.
    pub fn load_dataset(&self, dataset_name: &str, limit: Option<usize>) -> Result<Arc<DatasetSplits>> {
        let name: DatasetName = dataset_name.parse()?;
        self.loads.borrow_mut().load_dataset(&name, limit)
    }

    /// One normalised split; None if the corpus has no such split.
    pub fn load_split(
        &self,
        dataset_name: &str,
        mode:         SplitMode,
        limit:        Option<usize>,
    ) -> Result<Option<SplitRef>> {
        let name: DatasetName = dataset_name.parse()?;
        self.loads.borrow_mut().load_split(&name, mode, limit)
    }

    // ── Preparation (private caches) ────────────────────────────────────────

    /// Rendered and tokenized split; None if the corpus has no such split.
    pub fn prepare_split(
        &mut self,
        dataset_name: &str,
        mode:         SplitMode,
        limit:        Option<usize>,
    ) -> Result<Option<Arc<PreparedSplit>>> {
        let name: DatasetName = dataset_name.parse()?;
        self.prepare_named_split(&name, mode, limit)
    }

    /// All three splits of `dataset_name`, rendered and tokenized.
    pub fn prepare_dataset(&mut self, dataset_name: &str, limit: Option<usize>) -> Result<Arc<PreparedDataset>> {
        let name: DatasetName = dataset_name.parse()?;
        let key = (name.clone(), limit);

        if let Some(prepared) = self.datasets.get(&key) {
            tracing::debug!("Prepared dataset cache hit for '{}' (limit={:?})", name, limit);
            return Ok(prepared.clone());
        }

        let prepared = Arc::new(Splits::new(
            self.prepare_named_split(&name, SplitMode::Train, limit)?,
            self.prepare_named_split(&name, SplitMode::Dev, limit)?,
            self.prepare_named_split(&name, SplitMode::Test, limit)?,
        ));
        self.datasets.insert(key, prepared.clone());
        Ok(prepared)
    }

    fn prepare_named_split(
        &mut self,
        name:  &DatasetName,
        mode:  SplitMode,
        limit: Option<usize>,
    ) -> Result<Option<Arc<PreparedSplit>>> {
        let key = (name.clone(), mode, limit);
        if let Some(prepared) = self.splits.get(&key) {
            tracing::debug!("Prepared split cache hit for '{}' {} (limit={:?})", name, mode, limit);
            return Ok(prepared.clone());
        }

        let split = self.loads.borrow_mut().load_split(name, mode, limit)?;
        let prepared = match split {
            Some(examples) => {
                tracing::info!(
                    "Tokenizing '{}' {} ({} examples, template {:?})",
                    name,
                    mode,
                    examples.len(),
                    self.formatter.template(),
                );
                let split = pipeline::prepare_split(
                    &self.formatter,
                    self.tokenizer.as_ref(),
                    &examples,
                    self.show_progress,
                )?;
                Some(Arc::new(split))
            }
            None => None,
        };

        if let Some((evicted, _)) = self.splits.insert(key, prepared.clone()) {
            tracing::debug!("Evicted prepared split '{}' {} (limit={:?})", evicted.0, evicted.1, evicted.2);
        }
        Ok(prepared)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DataError;
    use crate::testing::{capacity, FailingAfterFirst, MemoryCorpus, WhitespaceTokenizer};

    fn handler(template: &str, corpus: &MemoryCorpus, tok: &WhitespaceTokenizer) -> DatasetHandler {
        let loads = LoadCache::shared(Box::new(corpus.clone()), DEFAULT_CACHE_CAPACITY);
        DatasetHandler::new(TemplateFormatter::new(template), Box::new(tok.clone()), loads)
    }

    #[test]
    fn test_prepare_split_renders_and_tokenizes() {
        let corpus = MemoryCorpus::bionlp(4);
        let tok    = WhitespaceTokenizer::new();
        let mut h  = handler("{A} {S} {O}", &corpus, &tok);

        let split = h.prepare_split("bionlp-0", SplitMode::Train, None).unwrap().unwrap();
        assert_eq!(split.example_count(), 4);
        let ex = &split.examples()[1];
        assert_eq!(ex.input_text, "assessment-1 subjective-1 objective-1");
        assert_eq!(ex.input_ids, tok.encode(&ex.input_text).unwrap());
        assert_eq!(ex.label_ids, tok.encode("summary of note 1").unwrap());
    }

    #[test]
    fn test_repeated_calls_hit_the_cache() {
        let corpus = MemoryCorpus::bionlp(4);
        let tok    = WhitespaceTokenizer::new();
        let mut h  = handler("{A}", &corpus, &tok);

        let a     = h.prepare_split("bionlp-1", SplitMode::Test, Some(2)).unwrap().unwrap();
        let calls = tok.calls();
        let b     = h.prepare_split("bionlp-1", SplitMode::Test, Some(2)).unwrap().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(tok.calls(), calls);
        assert_eq!(corpus.loads(), 1);
    }

    #[test]
    fn test_prepare_dataset_reuses_prepared_splits() {
        let corpus = MemoryCorpus::bionlp(6);
        let tok    = WhitespaceTokenizer::new();
        let mut h  = handler("{O}", &corpus, &tok);

        let test  = h.prepare_split("bionlp-2", SplitMode::Test, None).unwrap().unwrap();
        let after_split = tok.calls();

        let data = h.prepare_dataset("bionlp-2", None).unwrap();
        // only train was new: 6 examples × (input + label)
        assert_eq!(tok.calls(), after_split + 12);
        assert!(Arc::ptr_eq(data.test.as_ref().unwrap(), &test));
        assert!(data.dev.is_none());

        // and the whole dataset is now cached too
        let again = h.prepare_dataset("bionlp-2", None).unwrap();
        assert!(Arc::ptr_eq(&data, &again));
        assert_eq!(tok.calls(), after_split + 12);
    }

    #[test]
    fn test_five_fold_loop_tokenizes_each_split_once() {
        let corpus = MemoryCorpus::bionlp(4);
        let tok    = WhitespaceTokenizer::new();
        let loads  = LoadCache::shared(Box::new(corpus.clone()), capacity(16));
        // 5 folds × 3 splits must all stay resident
        let mut h  = DatasetHandler::with_capacity(
            TemplateFormatter::new("{A} {S}"),
            Box::new(tok.clone()),
            loads,
            capacity(16),
        );

        for _round in 0..2 {
            for fold in 0..5 {
                let name = format!("bionlp-{fold}");
                h.load_dataset(&name, None).unwrap();
                h.prepare_split(&name, SplitMode::Train, None).unwrap();
                h.prepare_dataset(&name, None).unwrap();
                h.prepare_split(&name, SplitMode::Test, None).unwrap();
            }
        }

        // per fold: 4 train + 2 test examples, two encodes each
        assert_eq!(tok.calls(), 5 * (4 + 2) * 2);
        assert_eq!(corpus.loads(), 5);
    }

    #[test]
    fn test_cache_survives_failing_loader() {
        let source = FailingAfterFirst::new(MemoryCorpus::bionlp(5));
        let loads  = LoadCache::shared(Box::new(source), DEFAULT_CACHE_CAPACITY);
        let mut h  = DatasetHandler::new(
            TemplateFormatter::new("{A}"),
            Box::new(WhitespaceTokenizer::new()),
            loads,
        );

        let first = h.prepare_dataset("bionlp-4", Some(3)).unwrap();
        for _ in 0..3 {
            assert_eq!(h.prepare_dataset("bionlp-4", Some(3)).unwrap(), first);
            assert!(h.prepare_split("bionlp-4", SplitMode::Train, Some(3)).unwrap().is_some());
            assert!(h.load_split("bionlp-4", SplitMode::Test, Some(3)).unwrap().is_some());
        }
        assert!(h.prepare_split("bionlp-4", SplitMode::Train, None).is_err());
    }

    #[test]
    fn test_handlers_share_loads_but_not_prepared_results() {
        let corpus = MemoryCorpus::bionlp(3);
        let loads  = LoadCache::shared(Box::new(corpus.clone()), DEFAULT_CACHE_CAPACITY);
        let tok    = WhitespaceTokenizer::new();

        let mut assess = DatasetHandler::new(TemplateFormatter::new("{A}"), Box::new(tok.clone()), loads.clone());
        let mut object = DatasetHandler::new(TemplateFormatter::new("{O}"), Box::new(tok.clone()), loads);

        let a = assess.prepare_split("bionlp-0", SplitMode::Train, None).unwrap().unwrap();
        let calls = tok.calls();
        let o = object.prepare_split("bionlp-0", SplitMode::Train, None).unwrap().unwrap();

        // raw data came from the shared cache...
        assert_eq!(corpus.loads(), 1);
        let raw_a = assess.load_split("bionlp-0", SplitMode::Train, None).unwrap().unwrap();
        let raw_o = object.load_split("bionlp-0", SplitMode::Train, None).unwrap().unwrap();
        assert!(Arc::ptr_eq(&raw_a, &raw_o));

        // ...but the second handler rendered and tokenized on its own
        assert_eq!(tok.calls(), calls + 6);
        assert_eq!(a.examples()[0].input_text, "assessment-0");
        assert_eq!(o.examples()[0].input_text, "objective-0");
        assert_eq!(assess.formatting(), "{A}");
        assert_eq!(object.formatting(), "{O}");
    }

    #[test]
    fn test_unprepared_split_is_not_mutated() {
        let corpus = MemoryCorpus::bionlp(2);
        let mut h  = handler("{S}", &corpus, &WhitespaceTokenizer::new());

        let before = h.load_split("bionlp-3", SplitMode::Train, None).unwrap().unwrap();
        let copy   = (*before).clone();
        h.prepare_split("bionlp-3", SplitMode::Train, None).unwrap();
        let after  = h.load_split("bionlp-3", SplitMode::Train, None).unwrap().unwrap();

        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(*after, copy);
    }

    #[test]
    fn test_eleventh_prepared_split_evicts_least_recent() {
        let corpus = MemoryCorpus::bionlp(8);
        let tok    = WhitespaceTokenizer::new();
        let mut h  = handler("{A}", &corpus, &tok);

        // 11 distinct (dataset, mode, limit) keys against 10 slots
        let keys: Vec<(String, Option<usize>)> = (0..5)
            .flat_map(|fold| [(format!("bionlp-{fold}"), Some(1)), (format!("bionlp-{fold}"), Some(2))])
            .chain(std::iter::once(("bionlp".to_string(), Some(1))))
            .collect();
        assert_eq!(keys.len(), 11);

        for (name, limit) in &keys[..10] {
            h.prepare_split(name, SplitMode::Train, *limit).unwrap();
        }
        // touch the oldest so the second-oldest becomes the victim
        h.prepare_split(&keys[0].0, SplitMode::Train, keys[0].1).unwrap();
        h.prepare_split(&keys[10].0, SplitMode::Train, keys[10].1).unwrap();

        let resident: Vec<SplitKey> = h.splits.keys().cloned().collect();
        let victim: SplitKey = (keys[1].0.parse().unwrap(), SplitMode::Train, keys[1].1);
        assert_eq!(resident.len(), 10);
        assert!(!resident.contains(&victim));
        for (name, limit) in keys.iter().filter(|k| **k != keys[1]) {
            let key: SplitKey = (name.parse().unwrap(), SplitMode::Train, *limit);
            assert!(resident.contains(&key), "{key:?} should still be cached");
        }
        assert_eq!(h.cache_stats().prepared_splits.evictions, 1);

        // the victim is recomputed on demand
        let calls = tok.calls();
        h.prepare_split(&keys[1].0, SplitMode::Train, keys[1].1).unwrap();
        assert!(tok.calls() > calls);
    }

    #[test]
    fn test_invalid_dataset_names() {
        let corpus = MemoryCorpus::bionlp(2);
        let mut h  = handler("{A}", &corpus, &WhitespaceTokenizer::new());

        assert!(matches!(
            h.prepare_dataset("mimic-0", None),
            Err(DataError::InvalidDataset(_))
        ));
        assert!(matches!(
            h.prepare_split("bionlp-one", SplitMode::Test, None),
            Err(DataError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_separate_handlers_produce_identical_ids() {
        let run = || {
            let corpus = MemoryCorpus::bionlp(9);
            let mut h  = handler("{A} {S} {O}", &corpus, &WhitespaceTokenizer::new());
            h.prepare_dataset("bionlp-1", Some(4)).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_config_defaults() {
        let cfg = HandlerConfig::default();
        assert_eq!(cfg.cache_capacity.get(), 10);
        assert_eq!(cfg.families, vec!["bionlp".to_string()]);
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(serde_json::from_str::<HandlerConfig>(&json).unwrap(), cfg);
    }

    #[test]
    fn test_zero_capacity_config_rejected() {
        let mut json = serde_json::to_value(HandlerConfig::default()).unwrap();
        json["cache_capacity"] = serde_json::Value::from(0);
        assert!(serde_json::from_value::<HandlerConfig>(json).is_err());
    }
}
