// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting pieces that the data and application layers use
// but that do not belong to either:
//
//   lru.rs             — Bounded least-recently-used cache
//                        Every memoized step (raw loads, split
//                        loads, prepared splits) is one LruCache
//                        keyed by its full parameter tuple.
//
//   tokenizer_store.rs — Tokenizer loading
//                        Reads a HuggingFace tokenizer.json and
//                        adapts it to the TextTokenizer trait.
//
//   predictions.rs     — Cross-validation output maps
//                        id → text maps merged over folds and
//                        saved as gzipped MessagePack for scoring.

/// Bounded LRU map with hit/miss/eviction counters
pub mod lru;

/// HuggingFace tokenizer loading
pub mod tokenizer_store;

/// Persisted id → text maps
pub mod predictions;
