// ============================================================
// Layer 4 — Text Formatter
// ============================================================
// Renders the model input string of an example from a template.
//
// A template is free text with placeholders like {A}. Each known
// placeholder maps to one example field:
//
//   {A} → assessment
//   {S} → subjective
//   {O} → objective
//
// Example:
//   template: "{A} {S} {O}"
//   example:  assessment="x", subjective="y", objective="z"
//   output:   "x y z"
//
// Unknown placeholders ("{Z}") are copied through literally.
// Rendering is one left-to-right pass, so text that was already
// substituted is never scanned again and the order placeholders
// are listed in cannot change the output.

use std::collections::BTreeMap;

use crate::domain::error::{DataError, Result};
use crate::domain::example::Example;

/// Placeholder keys of the reference corpus and the fields they read.
pub const SOAP_PLACEHOLDERS: [(&str, &str); 3] = [
    ("A", "assessment"),
    ("S", "subjective"),
    ("O", "objective"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFormatter {
    template: String,
    /// placeholder key (without braces) → field name
    placeholders: BTreeMap<String, String>,
}

impl TemplateFormatter {
    /// A formatter recognising the {A}/{S}/{O} placeholders.
    pub fn new(template: impl Into<String>) -> Self {
        let placeholders = SOAP_PLACEHOLDERS
            .iter()
            .map(|(k, f)| (k.to_string(), f.to_string()))
            .collect();
        Self { template: template.into(), placeholders }
    }

    /// Register (or re-map) `{key}` to read `field`.
    pub fn with_placeholder(mut self, key: impl Into<String>, field: impl Into<String>) -> Self {
        self.placeholders.insert(key.into(), field.into());
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the template for one example.
    pub fn render(&self, example: &Example) -> Result<String> {
        let mut out  = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let known = after
                .find('}')
                .map(|close| &after[..close])
                .and_then(|key| self.placeholders.get_key_value(key));

            match known {
                Some((key, field)) => {
                    let value = example.field_text(field).ok_or_else(|| {
                        DataError::MissingTemplateField {
                            placeholder: key.clone(),
                            field:       field.clone(),
                            id:          example.id.clone(),
                        }
                    })?;
                    out.push_str(&value);
                    rest = &after[key.len() + 1..];
                }
                // Not a placeholder we know: keep the brace and move on
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}
