// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a JSONL corpus on disk and a tokenized split.
//
// The pipeline flows in this order:
//
//   <corpus>/<family>/fold-k/*.jsonl
//       │
//       ▼
//   JsonCorpusLoader  → raw records per split (absent splits = None)
//       │
//       ▼
//   normalize         → Examples with stable ids
//       │
//       ▼
//   subsample         → optional seeded truncation
//       │
//       ▼
//   LoadCache         → memoized by (name, limit) / (name, mode, limit)
//       │
//       ▼
//   TemplateFormatter → input text from {A} {S} {O} templates
//       │
//       ▼
//   pipeline          → input_ids / label_ids via the tokenizer
//       │
//       ▼
//   PreparedSplit     → burn Dataset of PreparedExamples
//
// folds.rs builds the fold directories the loader reads.

/// Reads and writes the JSONL corpus layout
pub mod loader;

/// Raw record → Example
pub mod normalizer;

/// Seeded, order-independent truncation of splits
pub mod subsample;

/// Template rendering
pub mod formatter;

/// Rendering + tokenization of whole splits
pub mod pipeline;

/// Prepared splits (burn Dataset)
pub mod dataset;

/// Memoized raw and per-split loads shared across handlers
pub mod cache;

/// k-fold partitioning of a flat corpus
pub mod folds;
