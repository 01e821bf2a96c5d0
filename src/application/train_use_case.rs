// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the labelled corpus      (Layer 4 - data)
//   Step 2: Fit codec, encode features    (Layer 4 - data)
//   Step 3: Split train/holdout 80/20     (Layer 4 - data)
//   Step 4: Fit the forest                (Layer 5 - ml)
//   Step 5: Evaluate both partitions      (Layer 5 - ml)
//   Step 6: Persist model + encoder       (Layer 6 - infra)
//   Step 7: Record the run (best effort)  (Layer 6 - infra)
//
// Each step is a hard dependency on the prior step's success:
// any failure aborts the pipeline before step 6, so the
// previously persisted model/encoder pair stays authoritative.
// Cache invalidation is NOT done here; the ServiceContext
// invalidates exactly once after this use case returns Ok.

use ndarray::Axis;
use serde::{Deserialize, Serialize};

use crate::application::config::AppConfig;
use crate::data::codec::FeatureCodec;
use crate::data::loader::CsvCorpusLoader;
use crate::data::splitter::split_train_holdout;
use crate::domain::prediction::{TrainingMetrics, TrainingReport};
use crate::domain::traits::{CorpusSource, RunEvent, TrackingSink};
use crate::error::Result;
use crate::infra::encoder_store::EncoderStore;
use crate::infra::model_store::ModelStore;
use crate::infra::run_log::RunLog;
use crate::ml::forest::RandomForestRegressor;
use crate::ml::metrics::{mse, r2_score};

/// Fraction of the corpus used to fit the regressor; the rest is
/// held out for evaluation only.
pub const TRAIN_FRACTION: f64 = 0.8;

// ─── Forest Hyperparameters ──────────────────────────────────────────────────
// Everything a training run can be tuned with. Serialisable so a
// run's parameters can be recorded alongside its metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestHyperparams {
    /// Number of trees in the ensemble
    pub n_trees: usize,

    /// Maximum tree depth
    pub max_depth: usize,

    /// Minimum rows a node needs to be considered for splitting
    pub min_samples_split: usize,

    /// Minimum rows each child of a split must keep
    pub min_samples_leaf: usize,

    /// Seed for the train/holdout split and the per-tree
    /// bootstrap draws; fixing it makes a run reproducible
    pub seed: u64,
}

impl Default for ForestHyperparams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 20,
            min_samples_split: 5,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: AppConfig,
}

impl TrainUseCase {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self, params: &ForestHyperparams) -> Result<TrainingReport> {
        let cfg = &self.config;

        // ── Step 1: Load the labelled corpus ─────────────────────────────────
        tracing::info!("Loading corpus from '{}'", cfg.data_path.display());
        let loader = CsvCorpusLoader::new(&cfg.data_path);
        let corpus = loader.load_all()?;

        // ── Step 2: Fit the codec, encode every row ──────────────────────────
        // A fresh encoder per run; it is persisted only in step 6
        let codec = FeatureCodec::new(EncoderStore::new(&cfg.encoder_path));
        let (features, targets, encoder) = codec.fit_transform(&corpus)?;

        // ── Step 3: Deterministic train/holdout split ────────────────────────
        // Same data + same seed always yields the same partitions
        let (train_rows, holdout_rows) =
            split_train_holdout(features.nrows(), TRAIN_FRACTION, params.seed);
        tracing::info!(
            "Split: {} train, {} holdout",
            train_rows.len(),
            holdout_rows.len()
        );

        let x_train = features.select(Axis(0), &train_rows);
        let y_train = targets.select(Axis(0), &train_rows);
        let x_holdout = features.select(Axis(0), &holdout_rows);
        let y_holdout = targets.select(Axis(0), &holdout_rows);

        // ── Step 4: Fit the regressor ────────────────────────────────────────
        tracing::info!(
            "Fitting forest: {} trees, max depth {}",
            params.n_trees,
            params.max_depth
        );
        let forest = RandomForestRegressor::fit(x_train.view(), y_train.view(), params)?;

        // ── Step 5: Evaluate on both partitions ──────────────────────────────
        // Reported to the caller and the run log; never used to
        // auto-reject the model
        let train_preds = forest.predict(x_train.view());
        let holdout_preds = forest.predict(x_holdout.view());
        let metrics = TrainingMetrics {
            train_mse: mse(train_preds.view(), y_train.view()),
            holdout_mse: mse(holdout_preds.view(), y_holdout.view()),
            train_r2: r2_score(train_preds.view(), y_train.view()),
            holdout_r2: r2_score(holdout_preds.view(), y_holdout.view()),
        };
        tracing::info!(
            "Holdout: mse={:.4}, r2={:.4}",
            metrics.holdout_mse,
            metrics.holdout_r2
        );

        // ── Step 6: Persist the artifact pair ────────────────────────────────
        // Model first, then encoder, both atomic replaces. Only
        // after both succeed does the pipeline report success and
        // allow the serving cache to be invalidated.
        ModelStore::new(&cfg.model_path).save(&forest)?;
        codec.persist_encoder(&encoder)?;

        let report = TrainingReport {
            training_samples: train_rows.len(),
            holdout_samples: holdout_rows.len(),
            metrics,
        };

        // ── Step 7: Record the run (fire and forget) ─────────────────────────
        let tracking = RunLog::new(&cfg.runs_path, cfg.tracking_enabled);
        tracking.record_run(&RunEvent {
            timestamp: RunLog::now(),
            params: serde_json::to_value(params).unwrap_or(serde_json::Value::Null),
            metrics,
            training_samples: report.training_samples,
        });

        Ok(report)
    }
}
