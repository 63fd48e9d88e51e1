// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads raw records from a JSON Lines corpus on disk.
//
// Directory layout:
//
//   <root>/
//     bionlp/
//       full/                ← the unfolded instance ("bionlp")
//         train.jsonl
//         dev.jsonl          ← optional
//         test.jsonl
//       fold-0/              ← "bionlp-0"
//         train.jsonl
//         test.jsonl
//       fold-1/ ...
//
// Each line holds one JSON object; blank lines are skipped.
// A split file that does not exist is an absent split (None).
// An instance directory that does not exist is an I/O error.
//
// Only families listed at construction are served; any other name
// is an InvalidDataset error.

use std::{
    fs,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::error::{DataError, Result};
use crate::domain::example::{DatasetName, RawRecord, SplitMode, Splits};
use crate::domain::traits::CorpusSource;

/// Directory name of the unfolded instance.
pub const FULL_DIR: &str = "full";

/// Reads `<root>/<family>/{full,fold-k}/<split>.jsonl`.
pub struct JsonCorpusLoader {
    root:     PathBuf,
    families: Vec<String>,
}

impl JsonCorpusLoader {
    pub fn new(root: impl Into<PathBuf>, families: Vec<String>) -> Self {
        Self { root: root.into(), families }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the split files of `name`.
    pub fn instance_dir(&self, name: &DatasetName) -> PathBuf {
        instance_dir(&self.root, name)
    }
}

/// `<root>/<family>/full` or `<root>/<family>/fold-<k>`.
pub fn instance_dir(root: &Path, name: &DatasetName) -> PathBuf {
    let family_dir = root.join(&name.family);
    match name.fold {
        Some(k) => family_dir.join(format!("fold-{k}")),
        None    => family_dir.join(FULL_DIR),
    }
}

impl CorpusSource for JsonCorpusLoader {
    fn load(&self, name: &DatasetName) -> Result<Splits<Vec<RawRecord>>> {
        if !self.families.iter().any(|f| f == &name.family) {
            return Err(DataError::InvalidDataset(name.to_string()));
        }

        let dir = self.instance_dir(name);
        if !dir.is_dir() {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("dataset directory '{}' does not exist", dir.display()),
            )));
        }

        let splits = Splits::new(
            read_split(&dir, SplitMode::Train)?,
            read_split(&dir, SplitMode::Dev)?,
            read_split(&dir, SplitMode::Test)?,
        );

        tracing::info!(
            "Loaded '{}' from '{}' (train={:?}, dev={:?}, test={:?})",
            name,
            dir.display(),
            splits.train.as_ref().map(Vec::len),
            splits.dev.as_ref().map(Vec::len),
            splits.test.as_ref().map(Vec::len),
        );
        Ok(splits)
    }
}

/// Read `<dir>/<mode>.jsonl`, or None if the file is not there.
fn read_split(dir: &Path, mode: SplitMode) -> Result<Option<Vec<RawRecord>>> {
    let path = dir.join(format!("{mode}.jsonl"));
    if !path.exists() {
        tracing::debug!("No {} split at '{}'", mode, path.display());
        return Ok(None);
    }
    read_jsonl(&path).map(Some)
}

/// Read every JSON object of a JSON Lines file.
pub fn read_jsonl(path: &Path) -> Result<Vec<RawRecord>> {
    let reader  = BufReader::new(fs::File::open(path)?);
    let mut out = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: RawRecord = serde_json::from_str(&line).map_err(|source| DataError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        out.push(record);
    }

    Ok(out)
}

/// Write records as JSON Lines, creating parent directories.
pub fn write_jsonl(path: &Path, records: &[RawRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(fs::File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(std::io::Error::from)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the present splits of one instance into its directory.
/// Absent splits produce no file.
pub fn write_instance(root: &Path, name: &DatasetName, splits: &Splits<Vec<RawRecord>>) -> Result<()> {
    let dir = instance_dir(root, name);
    fs::create_dir_all(&dir)?;

    for mode in SplitMode::ALL {
        if let Some(records) = splits.get(mode) {
            write_jsonl(&dir.join(format!("{mode}.jsonl")), records)?;
        }
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::soap_record;
    use tempfile::tempdir;

    fn loader(root: &Path) -> JsonCorpusLoader {
        JsonCorpusLoader::new(root, vec!["bionlp".to_string()])
    }

    #[test]
    fn test_reads_written_instance_with_absent_dev() {
        let dir  = tempdir().unwrap();
        let name = DatasetName::fold("bionlp", 2);
        let splits = Splits::new(
            Some((0..4).map(soap_record).collect()),
            None,
            Some((4..6).map(soap_record).collect()),
        );
        write_instance(dir.path(), &name, &splits).unwrap();

        let loaded = loader(dir.path()).load(&name).unwrap();
        assert_eq!(loaded, splits);
        assert!(loaded.dev.is_none());
    }

    #[test]
    fn test_unknown_family_is_invalid_dataset() {
        let dir = tempdir().unwrap();
        let err = loader(dir.path()).load(&DatasetName::new("mimic", None)).unwrap_err();
        assert!(matches!(err, DataError::InvalidDataset(name) if name == "mimic"));
    }

    #[test]
    fn test_missing_instance_is_io_error() {
        let dir = tempdir().unwrap();
        let err = loader(dir.path()).load(&DatasetName::fold("bionlp", 9)).unwrap_err();
        match err {
            DataError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_reports_line() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"label_text\": \"ok\"}\n\nnot json\n").unwrap();

        match read_jsonl(&path) {
            Err(DataError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_lines_skipped() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("ok.jsonl");
        fs::write(&path, "\n{\"label_text\": \"a\"}\n   \n{\"label_text\": \"b\"}\n").unwrap();
        assert_eq!(read_jsonl(&path).unwrap().len(), 2);
    }
}
