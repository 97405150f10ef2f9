// ============================================================
// Layer 6 — Checkpoint Layout
// ============================================================
// One checkpoint = four mutually consistent artifacts under a
// shared base path, plus a run-config JSON.
//
// Why save the config separately?
//   Loading needs to rebuild the exact model architecture
//   (embedding_dim, hidden_dim) before the weights can be
//   restored into it. The vocabulary files carry the vocabulary
//   sizes; the config carries the rest.
//
// At most one writer per base path at a time — concurrent
// writers are undefined behavior by design, so there is no
// locking here.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::application::train_use_case::TrainConfig;

/// Derives every artifact path from one checkpoint base path.
pub struct CheckpointPaths {
    base: String,
}

impl CheckpointPaths {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Source-side (natural language) vocabulary file.
    pub fn nl_vocab(&self) -> String {
        format!("{}_nl_vocab.txt", self.base)
    }

    /// Target-side (SQL) vocabulary file.
    pub fn sql_vocab(&self) -> String {
        format!("{}_sql_vocab.txt", self.base)
    }

    /// Run configuration JSON.
    pub fn config(&self) -> String {
        format!("{}_config.json", self.base)
    }

    /// Create the directory the base path lives in, so a save
    /// into `models/nl_to_sql` works on a fresh workspace.
    pub fn ensure_parent_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = Path::new(&self.base).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Save the training configuration next to the checkpoint.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.ensure_parent_dir()?;
        let path = self.config();
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json).with_context(|| format!("Cannot write config to '{path}'"))?;
        tracing::debug!("Saved run config to '{path}'");
        Ok(())
    }

    /// Load the training configuration saved by `save_config`.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.config();
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read config from '{path}'. Have you run 'train' first?")
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
