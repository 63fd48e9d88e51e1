// ============================================================
// Layer 4 — Record Normalizer
// ============================================================
// Turns raw JSON records into Examples.
//
// Per record:
//   ex_id       → reused verbatim when present (integer or string),
//                 otherwise the record's zero-based position
//   label_text  → required
//   everything else → kept in Example::fields
//
// Pure: the same records always give the same examples, so ids
// assigned by position are stable across repeated loads.

use serde_json::Value;
use std::collections::HashSet;

use crate::domain::error::{DataError, Result};
use crate::domain::example::{Example, ExampleId, RawRecord};

/// Record key holding a corpus-provided identifier.
pub const ID_FIELD: &str = "ex_id";

/// Record key holding the target text.
pub const LABEL_FIELD: &str = "label_text";

/// Normalise a whole split. Ids must end up unique.
pub fn normalize(records: &[RawRecord]) -> Result<Vec<Example>> {
    let mut seen     = HashSet::with_capacity(records.len());
    let mut examples = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let example = normalize_record(position, record)?;

        if !seen.insert(example.id.clone()) {
            return Err(DataError::DuplicateId { position, id: example.id });
        }
        examples.push(example);
    }

    Ok(examples)
}

/// Normalise one record found at `position` in its split.
pub fn normalize_record(position: usize, record: &RawRecord) -> Result<Example> {
    let id = match record.get(ID_FIELD) {
        None => ExampleId::Index(position as u64),
        Some(Value::String(s)) => ExampleId::Name(s.clone()),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(i) => ExampleId::Index(i),
            None => {
                return Err(DataError::InvalidId { position, found: n.to_string() });
            }
        },
        Some(other) => {
            return Err(DataError::InvalidId { position, found: other.to_string() });
        }
    };

    let label_text = match record.get(LABEL_FIELD) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => {
            return Err(DataError::MissingField { position, field: LABEL_FIELD });
        }
        Some(other) => other.to_string(),
    };

    let fields = record
        .iter()
        .filter(|(k, _)| k.as_str() != ID_FIELD && k.as_str() != LABEL_FIELD)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(Example { id, fields, label_text })
}
