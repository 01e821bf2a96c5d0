// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
// training a model, serving predictions, or answering a health
// probe.
//
// Rules for this layer:
//   - No model math here (Layer 5)
//   - No printing or argument parsing here (Layer 1)
//   - No direct file formats here (Layers 4 and 6)
//   - Only workflow coordination and the serving cache
//
// Reference: Clean Architecture pattern

// Read-only configuration consumed by the core
pub mod config;

// The serving cache state machine and boundary operations
pub mod context;

// The training workflow
pub mod train_use_case;

// The inference workflow
pub mod predict_use_case;
