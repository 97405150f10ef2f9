// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Runs the full training pipeline in order:
//
//   Step 1: Load the labelled corpus     (Layer 4 - data)
//   Step 2: Build vocabularies + model   (Layer 5 - ml)
//   Step 3: Run the optimization loop    (Layer 5 - ml)
//   Step 4: Save config + checkpoint     (Layer 6 - infra)
//
// Steps 1 and 2 are one Trainer call — the dataset and the
// vocabularies it implies are rebuilt together, never apart.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::infra::checkpoint::CheckpointPaths;
use crate::ml::trainer::{DefaultBackend, Trainer};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialisable so the
// run can be saved next to the checkpoint and reloaded for
// inference, which must rebuild the same architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_path: String,
    pub checkpoint_path: String,
    pub epochs: usize,
    pub lr: f64,
    pub embedding_dim: usize,
    pub hidden_dim: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path: "training_data/queries.json".to_string(),
            checkpoint_path: "models/nl_to_sql".to_string(),
            epochs: 100,
            lr: 1e-3,
            embedding_dim: 256,
            hidden_dim: 512,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        let mut trainer: Trainer<DefaultBackend> =
            Trainer::new(Default::default(), cfg.embedding_dim, cfg.hidden_dim);

        // ── Step 1+2: corpus → vocabularies → sized translator ───────────────
        tracing::info!("Loading corpus from '{}'", cfg.dataset_path);
        trainer.load_dataset(&cfg.dataset_path)?;
        tracing::info!(
            "Model ready: {} examples, embedding_dim={}, hidden_dim={}",
            trainer.example_count(),
            cfg.embedding_dim,
            cfg.hidden_dim
        );

        // ── Step 3: optimization loop ─────────────────────────────────────────
        let losses = trainer.train(cfg.epochs, cfg.lr)?;
        if let Some(final_loss) = losses.last() {
            tracing::info!("Final epoch mean loss: {:.4}", final_loss);
        }

        // ── Step 4: persist config + checkpoint ───────────────────────────────
        // The config must be saved too — inference rebuilds the
        // model architecture from it before restoring weights.
        let paths = CheckpointPaths::new(&cfg.checkpoint_path);
        paths.save_config(cfg)?;
        trainer.save(&cfg.checkpoint_path)?;

        Ok(())
    }
}
