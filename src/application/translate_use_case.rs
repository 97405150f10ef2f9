// ============================================================
// Layer 2 — TranslateUseCase
// ============================================================
// Loads a trained checkpoint once, then serves predictions.
//
// The predicted SQL string is handed back to the caller as-is.
// Validating or executing it is an external collaborator's job —
// this core never touches a database.

use anyhow::Result;

use crate::infra::checkpoint::CheckpointPaths;
use crate::ml::trainer::{DefaultBackend, Trainer};

pub struct TranslateUseCase {
    trainer: Trainer<DefaultBackend>,
}

impl TranslateUseCase {
    /// Rebuild the trained model from a checkpoint base path.
    ///
    /// The saved run config supplies the architecture dimensions;
    /// if it is missing (a checkpoint copied without its config),
    /// the defaults are assumed with a warning.
    pub fn new(checkpoint_path: &str) -> Result<Self> {
        let paths = CheckpointPaths::new(checkpoint_path);
        let cfg = match paths.load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("No run config at '{}' ({e}); assuming defaults", paths.config());
                crate::application::train_use_case::TrainConfig::default()
            }
        };

        let mut trainer: Trainer<DefaultBackend> =
            Trainer::new(Default::default(), cfg.embedding_dim, cfg.hidden_dim);
        trainer.load(checkpoint_path)?;
        tracing::info!("Model loaded from checkpoint '{checkpoint_path}'");

        Ok(Self { trainer })
    }

    /// Translate one natural language query to a SQL string.
    pub fn translate(&self, query: &str) -> Result<String> {
        let sql = self.trainer.predict(query)?;
        tracing::debug!("'{query}' → '{sql}'");
        Ok(sql)
    }
}
