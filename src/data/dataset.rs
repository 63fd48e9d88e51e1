use burn::data::dataset::Dataset;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::example::{ExampleId, PreparedExample, Splits};

/// A split whose examples carry rendered input text and token ids.
///
/// Implements burn's `Dataset` so a training loop can wrap it in a
/// `DataLoader` directly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreparedSplit {
    examples: Vec<PreparedExample>,
}

/// All three prepared splits of one dataset instance.
pub type PreparedDataset = Splits<Arc<PreparedSplit>>;

impl PreparedSplit {
    pub fn new(examples: Vec<PreparedExample>) -> Self { Self { examples } }

    pub fn examples(&self) -> &[PreparedExample] { &self.examples }

    pub fn iter(&self) -> impl Iterator<Item = &PreparedExample> {
        self.examples.iter()
    }

    pub fn example_count(&self) -> usize { self.examples.len() }

    /// The `id → label_text` association of every example, as needed
    /// by the reference side of the persisted evaluation maps.
    pub fn label_map(&self) -> BTreeMap<ExampleId, String> {
        self.examples
            .iter()
            .map(|ex| (ex.id().clone(), ex.label_text().to_string()))
            .collect()
    }

    /// Mean (input, label) token counts; zeros for an empty split.
    pub fn mean_lengths(&self) -> (f64, f64) {
        if self.examples.is_empty() {
            return (0.0, 0.0);
        }
        let n      = self.examples.len() as f64;
        let inputs = self.examples.iter().map(|e| e.input_ids.len()).sum::<usize>() as f64;
        let labels = self.examples.iter().map(|e| e.label_ids.len()).sum::<usize>() as f64;
        (inputs / n, labels / n)
    }
}

impl Dataset<PreparedExample> for PreparedSplit {
    fn get(&self, index: usize) -> Option<PreparedExample> {
        self.examples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.examples.len()
    }
}
