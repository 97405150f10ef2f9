// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`     — trains the translator on a labelled corpus
//   2. `translate` — loads a checkpoint and translates a query

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs, TranslateArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive.
#[derive(Parser, Debug)]
#[command(
    name = "nl2sql",
    version = "0.1.0",
    about = "Train a seq2seq NL→SQL translator, then translate queries."
)]
pub struct Cli {
    /// The subcommand to run (train or translate)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use
    /// case. This keeps the CLI layer thin — it only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Translate(args) => Self::run_translate(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on corpus: {}", args.dataset);

        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    fn run_translate(args: TranslateArgs) -> Result<()> {
        use crate::application::translate_use_case::TranslateUseCase;

        let use_case = TranslateUseCase::new(&args.checkpoint)?;
        let sql = use_case.translate(&args.query)?;
        println!("\nSQL: {}", sql);
        Ok(())
    }
}
