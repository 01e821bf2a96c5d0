// ============================================================
// Layer 6 — Run Log (Experiment Tracking Sink)
// ============================================================
// Appends training-run and prediction events to a JSONL file,
// one JSON object per line:
//
//   {"kind":"training_run","timestamp":"...","params":{...},...}
//   {"kind":"prediction","timestamp":"...","input":{...},...}
//
// This is the fire-and-forget TrackingSink implementation: every
// failure in here is caught and downgraded to a tracing warning.
// Tracking is best-effort by contract; it must never fail or
// block a training or inference call, and correctness never
// depends on it succeeding.
//
// When tracking is disabled in the configuration the sink simply
// drops every event.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use crate::domain::traits::{PredictionEvent, RunEvent, TrackingSink};

/// One line of the run log, tagging each event with its kind.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum LogLine<'a> {
    TrainingRun(&'a RunEvent),
    Prediction(&'a PredictionEvent),
}

/// Append-only JSONL tracking sink.
pub struct RunLog {
    path: PathBuf,
    enabled: bool,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self { path: path.into(), enabled }
    }

    /// An RFC 3339 timestamp for event construction, so callers
    /// stamp events consistently.
    pub fn now() -> String {
        Utc::now().to_rfc3339()
    }

    /// Append one event line. All errors are swallowed here; the
    /// caller has already moved on.
    fn append(&self, line: &LogLine<'_>) {
        if !self.enabled {
            return;
        }
        if let Err(e) = self.try_append(line) {
            tracing::warn!("Failed to write tracking event to '{}': {e}", self.path.display());
        }
    }

    fn try_append(&self, line: &LogLine<'_>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(line)?)?;
        Ok(())
    }
}

impl TrackingSink for RunLog {
    fn record_run(&self, event: &RunEvent) {
        self.append(&LogLine::TrainingRun(event));
        tracing::debug!("Recorded training run ({} samples)", event.training_samples);
    }

    fn record_prediction(&self, event: &PredictionEvent) {
        self.append(&LogLine::Prediction(event));
    }
}
