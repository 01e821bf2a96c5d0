// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns that don't belong in any
// one business layer:
//
//   model_store.rs   — Saving and loading the fitted forest.
//                      JSON artifact, written to a temp file and
//                      renamed into place so readers never see a
//                      torn model.
//
//   encoder_store.rs — Sex-encoder persistence with the same
//                      atomic-replace discipline. Model and
//                      encoder artifacts are produced together
//                      and live side by side.
//
//   run_log.rs       — Best-effort experiment tracking: appends
//                      run/prediction events to a JSONL file and
//                      downgrades its own failures to warnings.
//
// Reference: Rust Book §7 (Modules), §9 (Error Handling)

/// Model artifact saving and loading
pub mod model_store;

/// Categorical-encoder artifact saving and loading
pub mod encoder_store;

/// Fire-and-forget experiment tracking sink
pub mod run_log;
