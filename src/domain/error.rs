// ============================================================
// Layer 3 — Data Errors
// ============================================================
// One error enum for every failure the preparation pipeline can
// surface. None of these are retried: they are either caller
// mistakes (bad dataset name, bad split mode), corrupt corpus
// records, or I/O failures that propagate unchanged.

use std::path::PathBuf;

use crate::domain::example::ExampleId;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The dataset family is unknown or the fold suffix is malformed.
    #[error("invalid dataset name given: '{0}'")]
    InvalidDataset(String),

    #[error("invalid split mode '{0}' (expected train, dev or test)")]
    InvalidSplitMode(String),

    /// A raw record lacks a field the normalizer requires.
    #[error("record {position} is missing required field '{field}'")]
    MissingField { position: usize, field: &'static str },

    #[error("record {position} has an 'ex_id' that is neither an integer nor a string: {found}")]
    InvalidId { position: usize, found: String },

    #[error("duplicate example id {id} at record {position}")]
    DuplicateId { position: usize, id: ExampleId },

    #[error("placeholder '{{{placeholder}}}' refers to field '{field}' which example {id} does not have")]
    MissingTemplateField {
        placeholder: String,
        field: String,
        id: ExampleId,
    },

    #[error("cannot parse {} line {line}: {source}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
