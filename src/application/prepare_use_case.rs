// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Prepares one dataset instance (or one split of it) and, when
// asked, writes the prepared examples out as JSON Lines for a
// training driver in another process.
//
//   Step 1: Build the load cache over the corpus      (Layer 4)
//   Step 2: Load the tokenizer and build a handler    (Layer 6)
//   Step 3: Prepare the requested split(s)            (Layer 4)
//   Step 4: Optionally write JSONL                    (Layer 2)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
    sync::Arc,
};

use crate::application::dataset_handler::{DatasetHandler, HandlerConfig};
use crate::data::dataset::PreparedSplit;
use crate::domain::example::SplitMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub handler: HandlerConfig,

    /// e.g. "bionlp-0" or "bionlp"
    pub dataset: String,

    /// One split, or all three when None
    pub mode: Option<SplitMode>,

    /// Subsample every split to at most this many examples
    pub limit: Option<usize>,

    /// JSONL destination for the prepared examples
    pub output: Option<String>,
}

/// What one prepared split looked like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub mode:             SplitMode,
    pub examples:         usize,
    pub mean_input_len:   f64,
    pub mean_label_len:   f64,
}

impl SplitSummary {
    pub fn of(mode: SplitMode, split: &PreparedSplit) -> Self {
        let (mean_input_len, mean_label_len) = split.mean_lengths();
        Self { mode, examples: split.example_count(), mean_input_len, mean_label_len }
    }
}

pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Run with a tokenizer loaded from the configured path.
    pub fn execute(&self) -> Result<Vec<SplitSummary>> {
        let cfg     = &self.config;
        let loads   = cfg.handler.load_cache();
        let handler = DatasetHandler::from_config(&cfg.handler, loads)?;
        self.execute_with(handler)
    }

    /// Run against an already-built handler.
    pub fn execute_with(&self, mut handler: DatasetHandler) -> Result<Vec<SplitSummary>> {
        let cfg = &self.config;

        let prepared: Vec<(SplitMode, Arc<PreparedSplit>)> = match cfg.mode {
            Some(mode) => handler
                .prepare_split(&cfg.dataset, mode, cfg.limit)
                .with_context(|| format!("Cannot prepare '{}' {}", cfg.dataset, mode))?
                .map(|split| vec![(mode, split)])
                .unwrap_or_default(),
            None => {
                let data = handler
                    .prepare_dataset(&cfg.dataset, cfg.limit)
                    .with_context(|| format!("Cannot prepare '{}'", cfg.dataset))?;
                SplitMode::ALL
                    .into_iter()
                    .filter_map(|mode| data.get(mode).map(|s| (mode, s.clone())))
                    .collect()
            }
        };

        if prepared.is_empty() {
            tracing::warn!("'{}' has no {:?} split", cfg.dataset, cfg.mode);
        }

        let summaries: Vec<SplitSummary> = prepared
            .iter()
            .map(|(mode, split)| SplitSummary::of(*mode, split))
            .collect();
        for s in &summaries {
            tracing::info!(
                "{} {}: {} examples, mean input {:.1} tokens, mean label {:.1} tokens",
                cfg.dataset, s.mode, s.examples, s.mean_input_len, s.mean_label_len
            );
        }

        if let Some(output) = &cfg.output {
            write_prepared(Path::new(output), &prepared)?;
        }

        Ok(summaries)
    }
}

/// One JSON object per prepared example, tagged with its split.
fn write_prepared(path: &Path, prepared: &[(SplitMode, Arc<PreparedSplit>)]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create '{}'", parent.display()))?;
    }
    let file = fs::File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    let mut count = 0usize;
    for (mode, split) in prepared {
        for ex in split.iter() {
            let mut value = serde_json::to_value(ex)?;
            if let Some(obj) = value.as_object_mut() {
                obj.insert("split".to_string(), serde_json::Value::from(mode.as_str()));
            }
            serde_json::to_writer(&mut writer, &value)?;
            writer.write_all(b"\n")?;
            count += 1;
        }
    }
    writer.flush()?;

    tracing::info!("Wrote {} prepared examples to '{}'", count, path.display());
    Ok(())
}
