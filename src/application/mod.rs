// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for a specific goal.
//
// Rules for this layer:
//   - No tokenization or cache internals here
//   - No printing (that's Layer 1)
//   - Only workflow coordination and configuration
//
// dataset_handler is the facade a training driver holds on to;
// the use cases are the workflows the CLI exposes.

// The cached preparation facade
pub mod dataset_handler;

// Prepare one dataset instance, optionally writing JSONL
pub mod prepare_use_case;

// Build the k-fold corpus layout from a flat corpus
pub mod make_folds_use_case;

// Walk every fold and save the id → label map for scoring
pub mod cross_validate_use_case;
