// ============================================================
// Layer 2 — PredictUseCase (Inference Engine)
// ============================================================
// Turns raw samples into PredictionResults:
//
//   1. Obtain the model + encoder pair from the serving cache
//   2. Encode the sample with the codec in inference mode
//   3. Run the forest
//   4. Derive age = predicted rings + 1.5
//
// Batch semantics: the model is resolved once, then EVERY sample
// is validated and encoded before any prediction is produced.
// One malformed sample fails the whole batch with that sample's
// error and zero partial results; output order matches input
// order.

use crate::application::context::ServiceContext;
use crate::domain::prediction::PredictionResult;
use crate::domain::sample::AbaloneSample;
use crate::domain::traits::{PredictionEvent, TrackingSink};
use crate::error::Result;
use crate::infra::run_log::RunLog;

pub struct PredictUseCase<'a> {
    context: &'a ServiceContext,
}

impl<'a> PredictUseCase<'a> {
    pub fn new(context: &'a ServiceContext) -> Self {
        Self { context }
    }

    /// Predict rings and age for a single sample.
    pub fn predict_one(&self, sample: AbaloneSample) -> Result<PredictionResult> {
        let model = self.context.get_model()?;

        let features = self.context.codec().transform_one(&sample, &model.encoder)?;
        let rings = model.forest.predict_row(&features);
        let result = PredictionResult::new(rings, sample);

        // Best-effort tracking; never affects the result
        self.context.tracking().record_prediction(&PredictionEvent {
            timestamp: RunLog::now(),
            input: result.input.clone(),
            predicted_rings: result.predicted_rings,
        });

        tracing::debug!(
            "Predicted {:.2} rings ({:.2} years)",
            result.predicted_rings,
            result.predicted_age,
        );
        Ok(result)
    }

    /// Predict for many samples with all-or-nothing semantics.
    pub fn predict_batch(&self, samples: Vec<AbaloneSample>) -> Result<Vec<PredictionResult>> {
        let model = self.context.get_model()?;

        // Encode everything up front so a bad sample rejects the
        // batch before any result exists
        let mut encoded = Vec::with_capacity(samples.len());
        for sample in &samples {
            encoded.push(self.context.codec().transform_one(sample, &model.encoder)?);
        }

        let results = samples
            .into_iter()
            .zip(encoded)
            .map(|(sample, features)| {
                PredictionResult::new(model.forest.predict_row(&features), sample)
            })
            .collect::<Vec<_>>();

        tracing::debug!("Predicted batch of {}", results.len());
        Ok(results)
    }
}
