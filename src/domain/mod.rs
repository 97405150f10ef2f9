// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust types that define the core concepts of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs and enums
//
// Why keep this layer pure?
//   - Easy to unit test (no tensor backend needed)
//   - Easy to understand (no framework noise)

// A single labelled (natural language, SQL) pair
pub mod training_example;

// The error taxonomy shared by the core
pub mod error;
