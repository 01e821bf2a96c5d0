// ============================================================
// Layer 2 — ServiceContext (Serving Cache + Boundary Ops)
// ============================================================
// The explicitly constructed object a serving layer holds on to.
// It owns the configuration and the single-slot model cache and
// exposes the four boundary operations:
//
//   train(params?)          → run the pipeline, invalidate cache
//   predict(sample)         → one PredictionResult
//   predict_batch(samples)  → all-or-nothing batch
//   health()                → can we reach LOADED without error?
//
// The cache is a state machine with two states:
//
//   EMPTY  --get_model-->  LOADED     (loads both artifacts)
//   LOADED --get_model-->  LOADED     (cloned Arc, no I/O)
//   *      --invalidate--> EMPTY      (only after a successful
//                                      train persisted its pair)
//
// No TTL and no background refresh: explicit invalidation by a
// successful train is the only way back to EMPTY.
//
// The slot holds the model TOGETHER with its encoder, loaded in
// the same critical section, so a model is never served against
// a mismatched encoder.

use std::sync::{Arc, Mutex, PoisonError};

use crate::application::config::AppConfig;
use crate::application::predict_use_case::PredictUseCase;
use crate::application::train_use_case::{ForestHyperparams, TrainUseCase};
use crate::data::codec::{FeatureCodec, SexEncoder};
use crate::domain::prediction::{HealthStatus, PredictionResult, TrainingReport};
use crate::domain::sample::AbaloneSample;
use crate::error::{Error, Result};
use crate::infra::encoder_store::EncoderStore;
use crate::infra::model_store::ModelStore;
use crate::infra::run_log::RunLog;
use crate::ml::forest::RandomForestRegressor;

/// The artifact pair the cache serves as one immutable unit.
pub struct ServingModel {
    pub forest: RandomForestRegressor,
    pub encoder: SexEncoder,
}

/// Holds the serving cache and the collaborators built from one
/// AppConfig. Construct one per deployment (or per test).
pub struct ServiceContext {
    config: AppConfig,
    model_store: ModelStore,
    codec: FeatureCodec,
    tracking: RunLog,
    /// EMPTY = None, LOADED = Some. Guarded so the cold-load
    /// transition is a mutually exclusive critical section.
    cache: Mutex<Option<Arc<ServingModel>>>,
}

impl ServiceContext {
    pub fn new(config: AppConfig) -> Self {
        let model_store = ModelStore::new(&config.model_path);
        let codec = FeatureCodec::new(EncoderStore::new(&config.encoder_path));
        let tracking = RunLog::new(&config.runs_path, config.tracking_enabled);
        Self {
            config,
            model_store,
            codec,
            tracking,
            cache: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub(crate) fn codec(&self) -> &FeatureCodec {
        &self.codec
    }

    pub(crate) fn tracking(&self) -> &RunLog {
        &self.tracking
    }

    // ─── Serving cache state machine ─────────────────────────────────────────

    /// Return the cached model pair, cold-loading it on first use.
    ///
    /// Missing artifacts surface as `Error::ServiceUnavailable`
    /// (the cache stays EMPTY and the caller can retry after
    /// training); any other I/O or parse failure propagates as
    /// itself. Concurrent callers during the cold load serialise
    /// on the slot's lock, so the artifacts are read once.
    pub fn get_model(&self) -> Result<Arc<ServingModel>> {
        let mut slot = self.lock_cache();

        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let forest = match self.model_store.load() {
            Err(Error::ModelNotFound(path)) => {
                return Err(Error::ServiceUnavailable(format!(
                    "no trained model at '{}'; run `train` first",
                    path.display()
                )))
            }
            other => other?,
        };
        let encoder = match self.codec.load_encoder() {
            Err(Error::EncoderNotFound(path)) => {
                return Err(Error::ServiceUnavailable(format!(
                    "no encoder at '{}'; run `train` first",
                    path.display()
                )))
            }
            other => other?,
        };

        let model = Arc::new(ServingModel { forest, encoder });
        *slot = Some(Arc::clone(&model));
        tracing::info!("Serving cache loaded ({} trees)", model.forest.n_trees());
        Ok(model)
    }

    /// Drop the cached model so the next `get_model` reloads from
    /// disk. Called exactly once per successful train, strictly
    /// after the new artifact pair is durably persisted.
    pub fn invalidate(&self) {
        *self.lock_cache() = None;
        tracing::debug!("Serving cache invalidated");
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<Arc<ServingModel>>> {
        // A poisoned lock only means another thread panicked while
        // holding it; the Option slot itself is still coherent
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── Boundary operations ─────────────────────────────────────────────────

    /// Run the training pipeline and, on success, invalidate the
    /// cache so the next prediction serves the new model.
    pub fn train(&self, params: Option<ForestHyperparams>) -> Result<TrainingReport> {
        let params = params.unwrap_or(self.config.default_hyperparams);
        let report = TrainUseCase::new(self.config.clone()).execute(&params)?;
        self.invalidate();
        Ok(report)
    }

    /// Predict the ring count and derived age for one sample.
    pub fn predict(&self, sample: AbaloneSample) -> Result<PredictionResult> {
        PredictUseCase::new(self).predict_one(sample)
    }

    /// Predict for many samples; a single malformed sample fails
    /// the whole batch with that sample's error.
    pub fn predict_batch(&self, samples: Vec<AbaloneSample>) -> Result<Vec<PredictionResult>> {
        PredictUseCase::new(self).predict_batch(samples)
    }

    /// Whether the cache could reach LOADED, without forcing a
    /// load: true when already LOADED, or when both artifacts are
    /// present on disk.
    pub fn health(&self) -> HealthStatus {
        let loaded = self.lock_cache().is_some();
        HealthStatus {
            model_available: loaded
                || (self.model_store.exists() && self.codec.encoder_exists()),
        }
    }
}

// ─── Integration Tests ────────────────────────────────────────────────────────
// End-to-end over the real pipeline: a synthetic corpus on disk,
// real artifacts in a temp directory, no mocked collaborators.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::tests::{small_params, test_config, write_corpus};
    use crate::domain::prediction::AGE_OFFSET_YEARS;
    use tempfile::TempDir;

    fn canonical_sample() -> AbaloneSample {
        AbaloneSample {
            sex: "M".to_string(),
            length: 0.455,
            diameter: 0.365,
            height: 0.095,
            whole_weight: 0.514,
            shucked_weight: 0.2245,
            viscera_weight: 0.101,
            shell_weight: 0.15,
        }
    }

    fn trained_context(dir: &TempDir) -> ServiceContext {
        let cfg = test_config(dir);
        write_corpus(&cfg.data_path, 60);
        let context = ServiceContext::new(cfg);
        context.train(Some(small_params())).unwrap();
        context
    }

    #[test]
    fn test_predict_returns_rings_plus_offset() {
        let dir = TempDir::new().unwrap();
        let context = trained_context(&dir);

        let result = context.predict(canonical_sample()).unwrap();
        assert!(result.predicted_rings >= 0.0);
        assert_eq!(result.predicted_age, result.predicted_rings + AGE_OFFSET_YEARS);
        assert_eq!(result.input, canonical_sample());
    }

    #[test]
    fn test_predict_before_any_train_is_service_unavailable() {
        let dir = TempDir::new().unwrap();
        let context = ServiceContext::new(test_config(&dir));

        let err = context.predict(canonical_sample()).unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
        // The cache must stay EMPTY and the context stays usable
        assert!(!context.health().model_available);
    }

    #[test]
    fn test_batch_with_unknown_sex_fails_wholesale() {
        let dir = TempDir::new().unwrap();
        let context = trained_context(&dir);

        let mut stranger = canonical_sample();
        stranger.sex = "X".to_string();
        let err = context
            .predict_batch(vec![canonical_sample(), stranger])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(v) if v == "X"));
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let dir = TempDir::new().unwrap();
        let context = trained_context(&dir);

        let mut second = canonical_sample();
        second.sex = "I".to_string();
        second.length = 0.3;
        let results = context
            .predict_batch(vec![canonical_sample(), second.clone()])
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].input, canonical_sample());
        assert_eq!(results[1].input, second);
    }

    #[test]
    fn test_retrain_invalidates_the_cache() {
        let dir = TempDir::new().unwrap();
        let context = trained_context(&dir);

        // Prime the cache with the first model
        let before = context.predict(canonical_sample()).unwrap();

        // Retrain with distinguishably different hyperparameters:
        // a single depth-1 stump cannot reproduce the deep forest
        let mut stump = small_params();
        stump.n_trees = 1;
        stump.max_depth = 1;
        stump.seed = 7;
        context.train(Some(stump)).unwrap();

        let after = context.predict(canonical_sample()).unwrap();
        assert_ne!(before.predicted_rings, after.predicted_rings);

        // And the served model matches what a fresh context loads
        // from the same artifacts
        let fresh = ServiceContext::new(context.config().clone());
        let reloaded = fresh.predict(canonical_sample()).unwrap();
        assert_eq!(after.predicted_rings, reloaded.predicted_rings);
    }

    #[test]
    fn test_train_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let cfg = test_config(&dir);
        write_corpus(&cfg.data_path, 60);
        let context = ServiceContext::new(cfg);

        let first = context.train(Some(small_params())).unwrap();
        let second = context.train(Some(small_params())).unwrap();
        assert_eq!(first.metrics, second.metrics);
        assert_eq!(first.training_samples, second.training_samples);
    }

    #[test]
    fn test_health_tracks_artifact_availability() {
        let dir = TempDir::new().unwrap();
        let cfg = test_config(&dir);
        write_corpus(&cfg.data_path, 60);
        let context = ServiceContext::new(cfg);

        assert!(!context.health().model_available);
        context.train(Some(small_params())).unwrap();
        assert!(context.health().model_available);
    }

    #[test]
    fn test_zero_measurement_is_rejected_at_predict() {
        let dir = TempDir::new().unwrap();
        let context = trained_context(&dir);

        let mut bad = canonical_sample();
        bad.whole_weight = 0.0;
        assert!(matches!(context.predict(bad), Err(Error::Schema(_))));
    }

    #[test]
    fn test_corpus_rows_round_trip_through_prediction() {
        // Every sex present in the training corpus must be
        // in-vocabulary for the deployed encoder
        let dir = TempDir::new().unwrap();
        let context = trained_context(&dir);

        for sex in ["M", "F", "I"] {
            let mut sample = canonical_sample();
            sample.sex = sex.to_string();
            assert!(context.predict(sample).is_ok());
        }
    }
}
