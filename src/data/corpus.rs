// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads the labelled training corpus from a JSON file.
//
// File format (one top-level collection of records):
//
//   {
//     "examples": [
//       { "nl": "show all users", "sql": "SELECT * FROM users;" },
//       ...
//     ]
//   }
//
// Validation policy: the load is all-or-nothing. If the file is
// unreadable, is not valid JSON, or any record is missing `nl`
// or `sql`, the whole load fails and the caller's previous
// dataset stays untouched. serde rejects missing fields for us,
// so a half-valid file can never leak partial data into training.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::domain::error::ModelError;
use crate::domain::training_example::TrainingExample;

/// The top-level shape of the corpus file.
#[derive(Debug, Deserialize)]
struct CorpusFile {
    examples: Vec<TrainingExample>,
}

/// Loads NL→SQL training pairs from a JSON corpus file.
pub struct CorpusLoader;

impl CorpusLoader {
    /// Parse the corpus at `path` into an ordered dataset.
    ///
    /// Record order in the file is preserved — the training loop
    /// visits examples in corpus order, so this order is part of
    /// the deterministic-training contract.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<TrainingExample>, ModelError> {
        let path = path.as_ref();

        let raw = fs::read_to_string(path).map_err(|e| {
            tracing::error!("Cannot read corpus '{}': {}", path.display(), e);
            ModelError::Io(e)
        })?;

        let parsed: CorpusFile = serde_json::from_str(&raw).map_err(|e| {
            ModelError::Format(format!("'{}': {}", path.display(), e))
        })?;

        tracing::info!(
            "Loaded {} examples from '{}'",
            parsed.examples.len(),
            path.display()
        );

        Ok(parsed.examples)
    }
}
