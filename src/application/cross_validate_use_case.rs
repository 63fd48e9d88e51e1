// ============================================================
// Layer 2 — CrossValidateUseCase
// ============================================================
// Walks every fold of a k-fold corpus the way the training driver
// does, through ONE handler, and produces the reference side of
// the evaluation artifacts:
//
//   for fold in 0..k:
//       prepare "<family>-<fold>" test split
//       merge its id → label_text map into the run-wide map
//   save <output_dir>/eval/<family>_test.mpk.gz
//   save <output_dir>/eval/cv_config.json
//
// Model training and scoring are done elsewhere; they consume the
// prepared splits and the saved map.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::application::dataset_handler::{DatasetHandler, HandlerConfig};
use crate::domain::example::{DatasetName, SplitMode};
use crate::infra::predictions::PredictionMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValConfig {
    pub handler:    HandlerConfig,
    pub family:     String,
    pub num_folds:  usize,
    pub limit:      Option<usize>,
    pub output_dir: String,
}

impl Default for CrossValConfig {
    fn default() -> Self {
        Self {
            handler:    HandlerConfig::default(),
            family:     "bionlp".to_string(),
            num_folds:  5,
            limit:      None,
            output_dir: "models/cv".to_string(),
        }
    }
}

/// Where a finished run put its files.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValOutput {
    pub labels_path: PathBuf,
    pub config_path: PathBuf,
    pub labels:      PredictionMap,
}

pub struct CrossValidateUseCase {
    config: CrossValConfig,
}

impl CrossValidateUseCase {
    pub fn new(config: CrossValConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<CrossValOutput> {
        let loads   = self.config.handler.load_cache();
        let handler = DatasetHandler::from_config(&self.config.handler, loads)?;
        self.execute_with(handler)
    }

    pub fn execute_with(&self, mut handler: DatasetHandler) -> Result<CrossValOutput> {
        let cfg        = &self.config;
        let mut labels = PredictionMap::new();

        for fold in 0..cfg.num_folds {
            let name = DatasetName::fold(&cfg.family, fold).to_string();

            let Some(test) = handler
                .prepare_split(&name, SplitMode::Test, cfg.limit)
                .with_context(|| format!("Cannot prepare test split of '{name}'"))?
            else {
                tracing::warn!("'{}' has no test split, skipping", name);
                continue;
            };

            let clashes = labels.merge(test.label_map());
            tracing::info!(
                "Fold {}: {} test examples ({} total so far, {} id clashes)",
                fold,
                test.example_count(),
                labels.len(),
                clashes,
            );
        }

        let eval_dir = PathBuf::from(&cfg.output_dir).join("eval");
        fs::create_dir_all(&eval_dir)
            .with_context(|| format!("Cannot create '{}'", eval_dir.display()))?;

        let labels_path = eval_dir.join(format!("{}_test.mpk.gz", cfg.family));
        labels.save(&labels_path)?;

        // Record exactly how the data was prepared
        let config_path = eval_dir.join("cv_config.json");
        fs::write(&config_path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write '{}'", config_path.display()))?;

        let stats = handler.cache_stats();
        tracing::info!(
            "Cross-validation labels ready: {} examples, prepared-split cache {} hits / {} misses",
            labels.len(),
            stats.prepared_splits.hits,
            stats.prepared_splits.misses,
        );

        Ok(CrossValOutput { labels_path, config_path, labels })
    }
}
