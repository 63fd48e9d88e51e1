// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
// This layer only routes and prints; it never computes.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Commands;

use crate::application::{
    cross_validate_use_case::CrossValidateUseCase,
    make_folds_use_case::MakeFoldsUseCase,
    prepare_use_case::PrepareUseCase,
};

#[derive(Parser, Debug)]
#[command(
    name = "cv-dataprep",
    version,
    about = "Prepare and cache tokenized cross-validation datasets."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => {
                let dataset   = args.dataset.clone();
                let summaries = PrepareUseCase::new(args.into()).execute()?;
                for s in summaries {
                    println!(
                        "{dataset} {:<5} {:>6} examples  input {:>7.1}  label {:>7.1}",
                        s.mode.as_str(), s.examples, s.mean_input_len, s.mean_label_len
                    );
                }
            }
            Commands::MakeFolds(args) => {
                let num_folds = args.num_folds;
                let written   = MakeFoldsUseCase::new(args.into()).execute()?;
                println!("Distributed {written} records over {num_folds} folds.");
            }
            Commands::CrossValidate(args) => {
                let out = CrossValidateUseCase::new(args.into()).execute()?;
                println!(
                    "Saved {} labels to {}",
                    out.labels.len(),
                    out.labels_path.display()
                );
            }
        }
        Ok(())
    }
}
