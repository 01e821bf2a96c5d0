// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All of the regressor lives here. No other layer implements
// model math; the layers above treat the fitted forest as an
// opaque value that maps encoded feature vectors to ring counts.
//
// What's in this layer:
//
//   tree.rs    — A single CART regression tree: greedy
//                variance-reduction splits, mean-valued leaves,
//                flat node storage for cheap traversal
//
//   forest.rs  — The bootstrap ensemble over those trees, with
//                per-tree seeded RNGs so a fit is reproducible
//
//   metrics.rs — MSE and R² used to evaluate the holdout split
//
// Reference: Breiman (2001) Random Forests

/// Single regression tree (used only through the forest)
pub mod tree;

/// Random-forest regressor, the persisted model artifact
pub mod forest;

/// Regression evaluation metrics
pub mod metrics;
