// ============================================================
// Layer 3 — Examples, Splits and Dataset Names
// ============================================================
// The vocabulary of the pipeline:
//
//   RawRecord        one JSON object as read from the corpus
//   Example          a normalised record with a stable id
//   PreparedExample  an Example plus rendered input text and
//                    token id sequences
//   Splits<T>        the train/dev/test triple; any split may be
//                    absent (None) without that being an error
//   DatasetName      "bionlp" or "bionlp-3" — family plus fold
//   SplitMode        which of the three splits to pick

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};

use crate::domain::error::DataError;

/// A raw corpus record: field name → JSON value.
pub type RawRecord = serde_json::Map<String, Value>;

/// A normalised split, shared between cache entries without copying.
pub type SplitRef = Arc<Vec<Example>>;

// ─── ExampleId ────────────────────────────────────────────────────────────────
/// Identifier of an example, unique within its split.
///
/// Either carried over from the record's `ex_id` field or assigned
/// from the record's position when the corpus has none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExampleId {
    Index(u64),
    Name(String),
}

impl fmt::Display for ExampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExampleId::Index(i) => write!(f, "{i}"),
            ExampleId::Name(s)  => write!(f, "{s}"),
        }
    }
}

impl From<u64> for ExampleId {
    fn from(i: u64) -> Self {
        ExampleId::Index(i)
    }
}

impl From<&str> for ExampleId {
    fn from(s: &str) -> Self {
        ExampleId::Name(s.to_string())
    }
}

// ─── Example ──────────────────────────────────────────────────────────────────
/// One normalised record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub id: ExampleId,

    /// Every raw field except `ex_id` and `label_text`
    /// (e.g. assessment / subjective / objective)
    pub fields: BTreeMap<String, Value>,

    /// The target text the model learns to produce
    pub label_text: String,
}

impl Example {
    pub fn new(id: impl Into<ExampleId>, label_text: impl Into<String>) -> Self {
        Self {
            id:         id.into(),
            fields:     BTreeMap::new(),
            label_text: label_text.into(),
        }
    }

    /// Builder-style helper, mostly used to assemble examples in code.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The named field as text, or None if the example lacks it.
    ///
    /// Strings are returned as-is, `null` becomes the empty string
    /// and every other value uses its JSON form.
    pub fn field_text(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(|v| match v {
            Value::String(s) => s.clone(),
            Value::Null      => String::new(),
            other            => other.to_string(),
        })
    }
}

// ─── PreparedExample ──────────────────────────────────────────────────────────
/// An Example annotated with its model input.
///
/// Always built as a new value; the Example it came from is left
/// untouched so the unprepared split can be re-rendered with a
/// different template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedExample {
    #[serde(flatten)]
    pub example: Example,

    pub input_text: String,
    pub input_ids:  Vec<u32>,
    pub label_ids:  Vec<u32>,
}

impl PreparedExample {
    pub fn id(&self) -> &ExampleId {
        &self.example.id
    }

    pub fn label_text(&self) -> &str {
        &self.example.label_text
    }
}

// ─── SplitMode ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    Train,
    Dev,
    Test,
}

impl SplitMode {
    pub const ALL: [SplitMode; 3] = [SplitMode::Train, SplitMode::Dev, SplitMode::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMode::Train => "train",
            SplitMode::Dev   => "dev",
            SplitMode::Test  => "test",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(SplitMode::Train),
            "dev"   => Ok(SplitMode::Dev),
            "test"  => Ok(SplitMode::Test),
            other   => Err(DataError::InvalidSplitMode(other.to_string())),
        }
    }
}

// ─── DatasetName ──────────────────────────────────────────────────────────────
/// A corpus family plus an optional cross-validation fold.
///
/// `"bionlp"` names the unfolded instance, `"bionlp-3"` fold 3.
/// Parsing only checks the shape of the name; whether the family
/// exists is up to the corpus source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetName {
    pub family: String,
    pub fold:   Option<usize>,
}

impl DatasetName {
    pub fn new(family: impl Into<String>, fold: Option<usize>) -> Self {
        Self { family: family.into(), fold }
    }

    pub fn fold(family: impl Into<String>, fold: usize) -> Self {
        Self::new(family, Some(fold))
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fold {
            Some(k) => write!(f, "{}-{}", self.family, k),
            None    => f.write_str(&self.family),
        }
    }
}

impl FromStr for DatasetName {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DataError::InvalidDataset(s.to_string());

        let (family, fold) = match s.split_once('-') {
            Some((family, fold)) => {
                let fold = fold.parse::<usize>().map_err(|_| invalid())?;
                (family, Some(fold))
            }
            None => (s, None),
        };

        if family.is_empty() {
            return Err(invalid());
        }
        Ok(DatasetName::new(family, fold))
    }
}

// ─── Splits ───────────────────────────────────────────────────────────────────
/// The train/dev/test triple of one dataset instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Splits<T> {
    pub train: Option<T>,
    pub dev:   Option<T>,
    pub test:  Option<T>,
}

impl<T> Splits<T> {
    pub fn new(train: Option<T>, dev: Option<T>, test: Option<T>) -> Self {
        Self { train, dev, test }
    }

    pub fn get(&self, mode: SplitMode) -> Option<&T> {
        match mode {
            SplitMode::Train => self.train.as_ref(),
            SplitMode::Dev   => self.dev.as_ref(),
            SplitMode::Test  => self.test.as_ref(),
        }
    }

    /// Apply `f` to every present split; absent splits stay absent.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Splits<U> {
        Splits {
            train: self.train.map(&mut f),
            dev:   self.dev.map(&mut f),
            test:  self.test.map(&mut f),
        }
    }

    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<Splits<U>, E> {
        Ok(Splits {
            train: self.train.map(&mut f).transpose()?,
            dev:   self.dev.map(&mut f).transpose()?,
            test:  self.test.map(&mut f).transpose()?,
        })
    }
}
