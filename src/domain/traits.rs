// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the core and its collaborators.
//
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them:
//   - CsvCorpusLoader implements CorpusSource
//   - RunLog          implements TrackingSink
//   - tests substitute in-memory fakes for both
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use serde::{Deserialize, Serialize};

use crate::domain::prediction::TrainingMetrics;
use crate::domain::sample::{AbaloneSample, TrainingRow};
use crate::error::Result;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can load the labelled training corpus.
///
/// Implementations:
///   - CsvCorpusLoader → loads from a CSV file on disk
pub trait CorpusSource {
    /// Load every labelled row from this source.
    /// Fails with `Error::DataSource` if the source is unreadable
    /// or yields zero rows.
    fn load_all(&self) -> Result<Vec<TrainingRow>>;
}

// ─── TrackingSink ─────────────────────────────────────────────────────────────
/// A fire-and-forget experiment-tracking collaborator.
///
/// Contract: the core calls these methods and moves on. An
/// implementation must swallow its own failures (downgrading them
/// to warnings); nothing here may ever fail or block a training
/// or inference call. That is why the methods return `()`.
pub trait TrackingSink {
    /// Record the parameters, metrics and sample count of one
    /// completed training run.
    fn record_run(&self, event: &RunEvent);

    /// Record a single served prediction.
    fn record_prediction(&self, event: &PredictionEvent);
}

/// One completed training run, as sent to the tracking sink.
/// Hyperparameters travel as a JSON value so the sink stays
/// independent of the model layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub timestamp: String,
    pub params: serde_json::Value,
    pub metrics: TrainingMetrics,
    pub training_samples: usize,
}

/// One served prediction, as sent to the tracking sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionEvent {
    pub timestamp: String,
    pub input: AbaloneSample,
    pub predicted_rings: f64,
}
