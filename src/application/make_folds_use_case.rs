// ============================================================
// Layer 2 — MakeFoldsUseCase
// ============================================================
// Turns one flat JSONL corpus into the fold layout the loader
// reads:
//
//   Step 1: Read every record of the input file       (Layer 4)
//   Step 2: Stamp ids, shuffle, deal into k folds     (Layer 4)
//   Step 3: Write <corpus_dir>/<family>/{full,fold-k} (Layer 4)

use anyhow::{ensure, Context, Result};
use std::path::PathBuf;

use crate::data::{folds::write_folds, loader::read_jsonl};

#[derive(Debug, Clone)]
pub struct MakeFoldsConfig {
    pub input:      PathBuf,
    pub corpus_dir: PathBuf,
    pub family:     String,
    pub num_folds:  usize,
}

pub struct MakeFoldsUseCase {
    config: MakeFoldsConfig,
}

impl MakeFoldsUseCase {
    pub fn new(config: MakeFoldsConfig) -> Self {
        Self { config }
    }

    /// Returns the number of records distributed over the folds.
    pub fn execute(&self) -> Result<usize> {
        let cfg = &self.config;
        ensure!(cfg.num_folds > 0, "--num-folds must be at least 1");
        ensure!(!cfg.family.contains('-'), "family name '{}' must not contain '-'", cfg.family);

        let records = read_jsonl(&cfg.input)
            .with_context(|| format!("Cannot read corpus '{}'", cfg.input.display()))?;
        tracing::info!("Read {} records from '{}'", records.len(), cfg.input.display());

        let written = write_folds(&cfg.corpus_dir, &cfg.family, &records, cfg.num_folds)
            .with_context(|| format!("Cannot write folds under '{}'", cfg.corpus_dir.display()))?;
        Ok(written)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::write_jsonl;
    use crate::testing::soap_record;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path, family: &str, num_folds: usize) -> MakeFoldsConfig {
        MakeFoldsConfig {
            input:      dir.join("all.jsonl"),
            corpus_dir: dir.join("corpus"),
            family:     family.to_string(),
            num_folds,
        }
    }

    #[test]
    fn test_writes_fold_directories() {
        let dir = tempdir().unwrap();
        let records: Vec<_> = (0..10).map(soap_record).collect();
        write_jsonl(&dir.path().join("all.jsonl"), &records).unwrap();

        let n = MakeFoldsUseCase::new(config(dir.path(), "bionlp", 5)).execute().unwrap();
        assert_eq!(n, 10);
        for k in 0..5 {
            let fold = dir.path().join("corpus").join("bionlp").join(format!("fold-{k}"));
            assert!(fold.join("train.jsonl").exists());
            assert!(fold.join("test.jsonl").exists());
            assert!(!fold.join("dev.jsonl").exists());
        }
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let dir = tempdir().unwrap();
        assert!(MakeFoldsUseCase::new(config(dir.path(), "bionlp", 0)).execute().is_err());
        assert!(MakeFoldsUseCase::new(config(dir.path(), "bio-nlp", 5)).execute().is_err());
    }
}
