// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw CSV on disk to a numeric feature
// matrix ready for the regressor.
//
// The pipeline flows in this order:
//
//   abalone.csv
//       │
//       ▼
//   CsvCorpusLoader   → reads and type-checks the rows
//       │
//       ▼
//   FeatureCodec      → fits the sex encoder, produces encoded
//       │               vectors in canonical column order
//       ▼
//   split_train_holdout → seeded 80/20 index partition
//
// Each module is responsible for exactly one step, so each step
// is independently testable and replaceable.
//
// The FeatureCodec is the correctness-critical piece: the same
// transform is applied at training time and at prediction time,
// governed by the persisted encoder.

/// Loads the labelled corpus from a CSV file
pub mod loader;

/// Raw sample ↔ encoded feature vector mapping, encoder lifecycle
pub mod codec;

/// Seeded deterministic train/holdout split
pub mod splitter;
