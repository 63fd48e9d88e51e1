//! Cached, deterministic preparation of cross-validation text datasets.
//!
//! Raw JSONL records are normalised, optionally subsampled with a fixed
//! seed, rendered through an input template and tokenized. Every step is
//! memoized in bounded LRU caches: raw and per-split loads are shared by
//! all [`DatasetHandler`]s over the same corpus, prepared splits are kept
//! per handler.
//!
//! ```no_run
//! use cv_dataprep::{DatasetHandler, HandlerConfig, SplitMode};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config  = HandlerConfig { formatting: "{A} {S} {O}".into(), ..Default::default() };
//!     let loads   = config.load_cache();
//!     let mut handler = DatasetHandler::from_config(&config, loads)?;
//!
//!     for fold in 0..5 {
//!         let test = handler.prepare_split(&format!("bionlp-{fold}"), SplitMode::Test, None)?;
//!         println!("fold {fold}: {:?} test examples", test.map(|s| s.example_count()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;

#[cfg(test)]
pub(crate) mod testing;

pub use application::dataset_handler::{DatasetHandler, HandlerConfig};
pub use data::cache::{LoadCache, SharedLoadCache};
pub use data::dataset::{PreparedDataset, PreparedSplit};
pub use data::formatter::TemplateFormatter;
pub use domain::error::DataError;
pub use domain::example::{DatasetName, Example, ExampleId, PreparedExample, SplitMode, Splits};
pub use domain::traits::{CorpusSource, TextTokenizer};
