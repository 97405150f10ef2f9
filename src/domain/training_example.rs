// ============================================================
// Layer 3 — TrainingExample Domain Type
// ============================================================
// One labelled example from the corpus: a natural language
// request and the SQL statement it should translate to.
//
// Example:
//   nl:  "show all users"
//   sql: "SELECT * FROM users;"
//
// The model never sees these strings directly — each side is
// tokenised and encoded with its own Vocabulary before training.

use serde::{Deserialize, Serialize};

/// A labelled NL→SQL pair.
///
/// Field names match the corpus file format exactly
/// (`{"nl": ..., "sql": ...}`), so serde can read records
/// without any renaming attributes. Both fields are required;
/// a record missing either one fails the whole corpus load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    /// The natural language request
    pub nl: String,

    /// The target SQL statement
    pub sql: String,
}

impl TrainingExample {
    pub fn new(nl: impl Into<String>, sql: impl Into<String>) -> Self {
        Self { nl: nl.into(), sql: sql.into() }
    }
}
