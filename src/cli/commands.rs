// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands and their flags:
//
//   prepare         render + tokenize one dataset instance
//   make-folds      build the k-fold corpus layout
//   cross-validate  walk every fold, save the id → label map
//
// Every args struct converts into an application-layer config via
// From, so the application layer never sees clap types.

use clap::{Args, Subcommand};
use std::{num::NonZeroUsize, path::PathBuf};

use crate::application::{
    cross_validate_use_case::CrossValConfig,
    dataset_handler::HandlerConfig,
    make_folds_use_case::MakeFoldsConfig,
    prepare_use_case::PrepareConfig,
};
use crate::data::cache::DEFAULT_CACHE_CAPACITY;
use crate::domain::example::SplitMode;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prepare (format + tokenize) one dataset instance
    Prepare(PrepareArgs),

    /// Partition a flat JSONL corpus into cross-validation folds
    MakeFolds(MakeFoldsArgs),

    /// Prepare every fold's test split and save the reference label map
    CrossValidate(CrossValidateArgs),
}

/// Flags shared by every command that builds a DatasetHandler.
#[derive(Args, Debug, Clone)]
pub struct HandlerArgs {
    /// Root of the corpus layout (<dir>/<family>/fold-k/*.jsonl)
    #[arg(long, default_value = "data")]
    pub corpus_dir: String,

    /// Corpus families to accept (repeatable)
    #[arg(long = "family-name", default_values_t = vec!["bionlp".to_string()])]
    pub families: Vec<String>,

    /// tokenizer.json or a directory containing one
    #[arg(long, default_value = "tokenizer")]
    pub tokenizer: String,

    /// Input template; {A} assessment, {S} subjective, {O} objective
    #[arg(long, default_value = "{A}")]
    pub formatting: String,

    /// Entries kept per cache (at least 1)
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: NonZeroUsize,

    /// Hide the tokenization progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl From<HandlerArgs> for HandlerConfig {
    fn from(a: HandlerArgs) -> Self {
        HandlerConfig {
            corpus_dir:     a.corpus_dir,
            families:       a.families,
            tokenizer_path: a.tokenizer,
            formatting:     a.formatting,
            cache_capacity: a.cache_capacity,
            show_progress:  !a.no_progress,
        }
    }
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub handler: HandlerArgs,

    /// Dataset to prepare, e.g. bionlp-0 (fold 0) or bionlp (unfolded)
    #[arg(long)]
    pub dataset: String,

    /// Only this split (train, dev or test); all three when omitted
    #[arg(long)]
    pub mode: Option<SplitMode>,

    /// Subsample each split to at most this many examples
    #[arg(long)]
    pub limit: Option<usize>,

    /// Write prepared examples to this JSONL file
    #[arg(long)]
    pub output: Option<String>,
}

impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            handler: a.handler.into(),
            dataset: a.dataset,
            mode:    a.mode,
            limit:   a.limit,
            output:  a.output,
        }
    }
}

#[derive(Args, Debug)]
pub struct MakeFoldsArgs {
    /// Flat JSONL corpus, one record per line
    #[arg(long)]
    pub input: PathBuf,

    /// Root of the corpus layout to write
    #[arg(long, default_value = "data")]
    pub corpus_dir: PathBuf,

    /// Family name of the new corpus
    #[arg(long, default_value = "bionlp")]
    pub family: String,

    #[arg(long, default_value_t = 5)]
    pub num_folds: usize,
}

impl From<MakeFoldsArgs> for MakeFoldsConfig {
    fn from(a: MakeFoldsArgs) -> Self {
        MakeFoldsConfig {
            input:      a.input,
            corpus_dir: a.corpus_dir,
            family:     a.family,
            num_folds:  a.num_folds,
        }
    }
}

#[derive(Args, Debug)]
pub struct CrossValidateArgs {
    #[command(flatten)]
    pub handler: HandlerArgs,

    /// Family to walk (folds <family>-0 .. <family>-<k-1>)
    #[arg(long, default_value = "bionlp")]
    pub family: String,

    #[arg(long, default_value_t = 5)]
    pub num_folds: usize,

    /// Subsample each test split to at most this many examples
    #[arg(long)]
    pub limit: Option<usize>,

    /// Run directory; outputs go to <dir>/eval/
    #[arg(long, default_value = "models/cv")]
    pub output_dir: String,
}

impl From<CrossValidateArgs> for CrossValConfig {
    fn from(a: CrossValidateArgs) -> Self {
        CrossValConfig {
            handler:    a.handler.into(),
            family:     a.family,
            num_folds:  a.num_folds,
            limit:      a.limit,
            output_dir: a.output_dir,
        }
    }
}
