// ============================================================
// Layer 2 — Application Configuration
// ============================================================
// Read-only inputs the core consumes: where the corpus and the
// artifacts live, the default hyperparameters, and the tracking
// toggle.
//
// There is intentionally no global singleton here. A config
// value is constructed explicitly (from CLI flags or test code)
// and passed into the ServiceContext, so multiple independent
// instances can coexist in one process and tests never share
// hidden state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::train_use_case::ForestHyperparams;

/// All configuration the core consumes. The core reads it; it
/// never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Raw corpus CSV
    pub data_path: PathBuf,

    /// Serialized-forest artifact
    pub model_path: PathBuf,

    /// Serialized-encoder artifact, co-located with the model
    pub encoder_path: PathBuf,

    /// Append-only tracking log (JSONL)
    pub runs_path: PathBuf,

    /// When false, tracking events are dropped
    pub tracking_enabled: bool,

    /// Hyperparameters used when a `train` call supplies none
    pub default_hyperparams: ForestHyperparams,
}

impl AppConfig {
    /// A config with every artifact rooted under one directory.
    /// This is what the CLI builds from --artifacts-dir.
    pub fn with_artifacts_dir(data_path: impl Into<PathBuf>, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            data_path: data_path.into(),
            model_path: dir.join("model.json"),
            encoder_path: dir.join("sex_encoder.json"),
            runs_path: dir.join("runs.jsonl"),
            ..Self::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/abalone.csv"),
            model_path: PathBuf::from("local_objects/model.json"),
            encoder_path: PathBuf::from("local_objects/sex_encoder.json"),
            runs_path: PathBuf::from("local_objects/runs.jsonl"),
            tracking_enabled: true,
            default_hyperparams: ForestHyperparams::default(),
        }
    }
}
