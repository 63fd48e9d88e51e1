// ============================================================
// Layer 4 — Load Cache
// ============================================================
// Memoizes the two tokenizer-independent steps:
//
//   load_dataset(name, limit)       raw load → normalize → subsample
//                                   keyed by (name, limit)
//   load_split(name, mode, limit)   one split of the above
//                                   keyed by (name, mode, limit)
//
// Neither result depends on a template or a tokenizer, so one
// LoadCache is shared by every DatasetHandler built on the same
// corpus (SharedLoadCache). Prepared, tokenized results live in
// each handler's own caches instead.
//
// A hit never calls the corpus source again. Once a (name, limit)
// entry exists, every later call sees the same examples in the
// same order, including the subsample selection.

use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::sync::Arc;

use crate::data::{normalizer::normalize, subsample::subsample};
use crate::domain::error::Result;
use crate::domain::example::{DatasetName, SplitMode, SplitRef, Splits};
use crate::domain::traits::CorpusSource;
use crate::infra::lru::{CacheStats, LruCache};

/// Entries kept per cache unless configured otherwise.
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None    => panic!("default cache capacity is zero"),
};

/// Normalised (and possibly subsampled) splits of one instance.
pub type DatasetSplits = Splits<SplitRef>;

pub type DatasetKey = (DatasetName, Option<usize>);
pub type SplitKey   = (DatasetName, SplitMode, Option<usize>);

/// A LoadCache shared between handlers.
pub type SharedLoadCache = Rc<RefCell<LoadCache>>;

pub struct LoadCache {
    source:   Box<dyn CorpusSource>,
    datasets: LruCache<DatasetKey, Arc<DatasetSplits>>,
    splits:   LruCache<SplitKey, Option<SplitRef>>,
}

impl LoadCache {
    pub fn new(source: Box<dyn CorpusSource>, capacity: NonZeroUsize) -> Self {
        Self {
            source,
            datasets: LruCache::new(capacity),
            splits:   LruCache::new(capacity),
        }
    }

    /// Wrap a new cache for sharing between handlers.
    pub fn shared(source: Box<dyn CorpusSource>, capacity: NonZeroUsize) -> SharedLoadCache {
        Rc::new(RefCell::new(Self::new(source, capacity)))
    }

    /// All splits of `name`, normalised and truncated to `limit`.
    pub fn load_dataset(&mut self, name: &DatasetName, limit: Option<usize>) -> Result<Arc<DatasetSplits>> {
        let key = (name.clone(), limit);
        let source = &self.source;

        self.datasets.get_or_try_insert_with(key, || -> Result<Arc<DatasetSplits>> {
            tracing::debug!("Load cache miss for '{}' (limit={:?})", name, limit);

            let raw      = source.load(name)?;
            let examples = raw.try_map(|records| normalize(&records))?;
            let splits   = examples.map(|split| Arc::new(subsample(&split, limit)));
            Ok(Arc::new(splits))
        })
    }

    /// One split of `name`; None when the corpus has no such split.
    pub fn load_split(
        &mut self,
        name:  &DatasetName,
        mode:  SplitMode,
        limit: Option<usize>,
    ) -> Result<Option<SplitRef>> {
        let key = (name.clone(), mode, limit);
        if let Some(split) = self.splits.get(&key) {
            return Ok(split.clone());
        }

        let dataset = self.load_dataset(name, limit)?;
        let split   = dataset.get(mode).cloned();
        self.splits.insert(key, split.clone());
        Ok(split)
    }

    pub fn dataset_stats(&self) -> CacheStats { self.datasets.stats() }

    pub fn split_stats(&self) -> CacheStats { self.splits.stats() }
}
