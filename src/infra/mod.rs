// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns:
//
//   checkpoint.rs — the on-disk layout of one checkpoint.
//                   Four artifacts share a base path P:
//                     P_encoder.mpk      encoder weights
//                     P_decoder.mpk      decoder weights
//                     P_nl_vocab.txt     source vocabulary
//                     P_sql_vocab.txt    target vocabulary
//                   plus P_config.json, the run configuration,
//                   so inference can rebuild the model with the
//                   dimensions it was trained with.
//
// The weight recording itself lives with the Translator (it owns
// the modules); this layer only owns naming and the run config.

/// Checkpoint path layout and run-config persistence
pub mod checkpoint;
