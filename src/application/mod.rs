// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
// training a model, or translating a query with a trained one.
//
// Rules for this layer:
//   - No ML math or tensor code here
//   - No argument parsing or printing here (that's Layer 1)
//   - Only workflow coordination

// The training workflow: corpus → trained checkpoint
pub mod train_use_case;

// The inference workflow: checkpoint + query → SQL string
pub mod translate_use_case;
