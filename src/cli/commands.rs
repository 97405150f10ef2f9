// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `translate`, and all
// their configurable flags.
//
// clap's derive macros generate the help text, the error
// messages for missing args, and the string → usize/f64
// conversions.

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the NL→SQL translator on a labelled corpus
    Train(TrainArgs),

    /// Translate a natural language query using a trained checkpoint
    Translate(TranslateArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// JSON corpus of {"nl", "sql"} records to train on
    #[arg(long, default_value = "training_data/queries.json")]
    pub dataset: String,

    /// Base path for the checkpoint artifacts
    #[arg(long, default_value = "models/nl_to_sql")]
    pub checkpoint: String,

    /// Number of full passes through the training corpus
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Learning rate for the Adam optimizer — too high causes
    /// instability, too low causes slow convergence
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Size of the token embedding vectors
    #[arg(long, default_value_t = 256)]
    pub embedding_dim: usize,

    /// Size of the LSTM hidden state — the fixed-size summary
    /// carried between sequence steps
    #[arg(long, default_value_t = 512)]
    pub hidden_dim: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset_path: a.dataset,
            checkpoint_path: a.checkpoint,
            epochs: a.epochs,
            lr: a.lr,
            embedding_dim: a.embedding_dim,
            hidden_dim: a.hidden_dim,
        }
    }
}

/// All arguments for the `translate` command
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// The natural language query to translate
    #[arg(long)]
    pub query: String,

    /// Base path where the checkpoint was saved during training
    #[arg(long, default_value = "models/nl_to_sql")]
    pub checkpoint: String,
}
