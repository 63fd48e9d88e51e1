// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the system works
// with: examples, splits, dataset names and the two external
// capabilities the pipeline consumes (a corpus source and a
// tokenizer).
//
// Rules for this layer:
//   - NO burn, tokenizers or clap types here
//   - NO file I/O
//   - Only structs, enums, traits and the error type
//
// Everything above this layer (data, infra, application) speaks
// in these types.

/// Examples, splits and dataset names
pub mod example;

/// The library error type
pub mod error;

/// Corpus source and tokenizer abstractions
pub mod traits;
