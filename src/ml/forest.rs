// ============================================================
// Layer 5 — Random Forest Regressor
// ============================================================
// An ensemble of regression trees, each fit on a bootstrap
// resample of the training rows; the prediction is the mean of
// the per-tree predictions.
//
// Determinism: every tree draws its bootstrap from its own
// StdRng seeded with `seed + tree_index`, so an identical
// (data, hyperparameters, seed) triple always produces the
// identical forest. There is no other source of randomness.
//
// The fitted forest is an opaque artifact to the rest of the
// system: it serialises to a single file, is loaded wholesale,
// and is never updated incrementally.
//
// Reference: Breiman (2001) Random Forests

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::ForestHyperparams;
use crate::error::{Error, Result};
use crate::ml::tree::RegressionTree;

/// A fitted random-forest regressor mapping encoded feature
/// vectors to predicted ring counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Fit a forest on the given feature matrix and targets.
    ///
    /// Fails with `Error::Training` on degenerate input (no rows,
    /// no trees requested, or mismatched matrix/target lengths);
    /// a failed fit never produces a partial forest.
    pub fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        params: &ForestHyperparams,
    ) -> Result<Self> {
        let n_rows = x.nrows();
        if n_rows == 0 {
            return Err(Error::Training("cannot fit on zero training rows".to_string()));
        }
        if x.nrows() != y.len() {
            return Err(Error::Training(format!(
                "feature matrix has {} rows but target vector has {}",
                x.nrows(),
                y.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(Error::Training("n_trees must be at least 1".to_string()));
        }

        let mut trees = Vec::with_capacity(params.n_trees);
        for tree_index in 0..params.n_trees {
            let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(tree_index as u64));
            let bootstrap: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
            trees.push(RegressionTree::fit(x, y, bootstrap, params));
        }

        tracing::debug!(
            "Fit forest: {} trees on {} rows x {} features",
            trees.len(),
            n_rows,
            x.ncols(),
        );

        Ok(Self { trees, n_features: x.ncols() })
    }

    /// Predict the ring count for one encoded feature vector.
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        debug_assert_eq!(features.len(), self.n_features);
        let sum: f64 = self.trees.iter().map(|t| t.predict_row(features)).sum();
        sum / self.trees.len() as f64
    }

    /// Predict ring counts for every row of a feature matrix,
    /// preserving row order.
    pub fn predict(&self, x: ArrayView2<f64>) -> Array1<f64> {
        Array1::from_iter(x.rows().into_iter().map(|row| {
            let features = row.to_vec();
            self.predict_row(&features)
        }))
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use rand::Rng;

    fn params(n_trees: usize, max_depth: usize) -> ForestHyperparams {
        ForestHyperparams {
            n_trees,
            max_depth,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }

    /// y = 3*x0 + noise-free offset by x1 bucket, 80 rows
    fn synthetic_data() -> (Array2<f64>, Array1<f64>) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let n = 80;
        let mut flat = Vec::with_capacity(n * 2);
        let mut targets = Vec::with_capacity(n);
        for _ in 0..n {
            let x0: f64 = rng.gen_range(0.0..1.0);
            let x1: f64 = rng.gen_range(0.0..1.0);
            flat.push(x0);
            flat.push(x1);
            targets.push(3.0 * x0 + if x1 > 0.5 { 2.0 } else { 0.0 });
        }
        (
            Array2::from_shape_vec((n, 2), flat).unwrap(),
            Array1::from_vec(targets),
        )
    }

    #[test]
    fn test_fit_is_deterministic_for_a_seed() {
        let (x, y) = synthetic_data();
        let a = RandomForestRegressor::fit(x.view(), y.view(), &params(10, 5)).unwrap();
        let b = RandomForestRegressor::fit(x.view(), y.view(), &params(10, 5)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.predict_row(&[0.5, 0.5]), b.predict_row(&[0.5, 0.5]));
    }

    #[test]
    fn test_different_hyperparameters_change_predictions() {
        let (x, y) = synthetic_data();
        let deep = RandomForestRegressor::fit(x.view(), y.view(), &params(20, 8)).unwrap();
        let stump = RandomForestRegressor::fit(x.view(), y.view(), &params(1, 1)).unwrap();
        assert_ne!(deep.predict_row(&[0.9, 0.9]), stump.predict_row(&[0.9, 0.9]));
    }

    #[test]
    fn test_predictions_stay_in_target_range() {
        let (x, y) = synthetic_data();
        let forest = RandomForestRegressor::fit(x.view(), y.view(), &params(15, 6)).unwrap();
        // Mean-of-leaf-means can never leave the observed range,
        // so non-negative targets give non-negative predictions
        let lo = y.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for row in x.rows() {
            let p = forest.predict_row(row.as_slice().unwrap());
            assert!(p >= lo && p <= hi);
        }
    }

    #[test]
    fn test_predict_preserves_row_order() {
        let (x, y) = synthetic_data();
        let forest = RandomForestRegressor::fit(x.view(), y.view(), &params(5, 4)).unwrap();
        let batch = forest.predict(x.view());
        assert_eq!(batch.len(), x.nrows());
        for (i, row) in x.rows().into_iter().enumerate() {
            assert_eq!(batch[i], forest.predict_row(row.as_slice().unwrap()));
        }
    }

    #[test]
    fn test_zero_rows_is_a_training_error() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(
            RandomForestRegressor::fit(x.view(), y.view(), &params(5, 4)),
            Err(Error::Training(_))
        ));
    }

    #[test]
    fn test_zero_trees_is_a_training_error() {
        let (x, y) = synthetic_data();
        assert!(matches!(
            RandomForestRegressor::fit(x.view(), y.view(), &params(0, 4)),
            Err(Error::Training(_))
        ));
    }

    #[test]
    fn test_serialises_and_round_trips() {
        let (x, y) = synthetic_data();
        let forest = RandomForestRegressor::fit(x.view(), y.view(), &params(3, 3)).unwrap();
        let json = serde_json::to_string(&forest).unwrap();
        let restored: RandomForestRegressor = serde_json::from_str(&json).unwrap();
        assert_eq!(forest, restored);
    }
}
