// ============================================================
// Layer 6 — Prediction Maps
// ============================================================
// The artifact handed to scoring: example id → text, merged over
// every fold of a cross-validation run.
//
// Stored as named MessagePack compressed with gzip (.mpk.gz), the
// same encoding burn's NamedMpkGzFileRecorder uses for records.
//
// Ids are unique across folds (the fold builder stamps corpus-wide
// ids), so merging fold maps never overwrites an entry; if it
// would, the clash is logged and the later fold wins.

use anyhow::{Context, Result};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::Path,
};

use crate::domain::example::ExampleId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionMap {
    entries: BTreeMap<ExampleId, String>,
}

impl PredictionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, id: &ExampleId) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ExampleId, &String)> {
        self.entries.iter()
    }

    /// Add the entries of one fold. Returns how many ids were already present.
    pub fn merge(&mut self, fold: impl IntoIterator<Item = (ExampleId, String)>) -> usize {
        let mut clashes = 0;
        for (id, text) in fold {
            if let Some(old) = self.entries.insert(id.clone(), text) {
                clashes += 1;
                tracing::warn!("Example {} appears in more than one fold (replacing '{}')", id, old);
            }
        }
        clashes
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        let mut writer = GzEncoder::new(BufWriter::new(file), Compression::default());
        rmp_serde::encode::write_named(&mut writer, self)
            .with_context(|| format!("Cannot encode predictions to '{}'", path.display()))?;
        writer.finish()?;

        tracing::info!("Saved {} entries to '{}'", self.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Cannot open '{}'", path.display()))?;
        let reader = GzDecoder::new(BufReader::new(file));
        rmp_serde::decode::from_read(reader)
            .with_context(|| format!("Cannot decode predictions from '{}'", path.display()))
    }
}

impl FromIterator<(ExampleId, String)> for PredictionMap {
    fn from_iter<I: IntoIterator<Item = (ExampleId, String)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
