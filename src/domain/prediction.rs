// ============================================================
// Layer 3 — Prediction and Training Result Types
// ============================================================
// The response shapes the core hands back to its callers.
// Derived values only: nothing here is ever persisted.
//
// Age derivation: abalone age is estimated from shell ring
// count as rings + 1.5 years, so the response carries both the
// raw model output and the derived age.
//
// Note: there is deliberately no confidence score here. A
// point-estimate regressor has no native confidence to report.

use serde::{Deserialize, Serialize};

use crate::domain::sample::AbaloneSample;

/// Years added to the predicted ring count to estimate age.
pub const AGE_OFFSET_YEARS: f64 = 1.5;

/// The result of one prediction: predicted rings, the derived
/// age, and the input echoed back for traceability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_rings: f64,
    pub predicted_age: f64,
    pub input: AbaloneSample,
}

impl PredictionResult {
    /// Build a result from a raw model output. Rings are rounded
    /// to two decimals for presentation; the age offset is applied
    /// after rounding so `predicted_age - predicted_rings` is
    /// always exactly the offset.
    pub fn new(predicted_rings: f64, input: AbaloneSample) -> Self {
        let rings = (predicted_rings * 100.0).round() / 100.0;
        Self {
            predicted_rings: rings,
            predicted_age: rings + AGE_OFFSET_YEARS,
            input,
        }
    }
}

/// Evaluation metrics from one training run, computed on both
/// partitions. Reported to the caller and the tracking sink;
/// never used to auto-reject a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Mean squared error on the training partition
    pub train_mse: f64,

    /// Mean squared error on the holdout partition
    pub holdout_mse: f64,

    /// Coefficient of determination on the training partition
    pub train_r2: f64,

    /// Coefficient of determination on the holdout partition
    pub holdout_r2: f64,
}

/// What a successful `train` call reports back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Rows used to fit the regressor
    pub training_samples: usize,

    /// Rows held out for evaluation only
    pub holdout_samples: usize,

    pub metrics: TrainingMetrics,
}

/// Answer to the `health` boundary operation. Reflects whether
/// the serving cache could reach a loaded model, without forcing
/// a load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub model_available: bool,
}
