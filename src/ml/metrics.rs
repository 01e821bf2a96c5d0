// ============================================================
// Layer 5 — Regression Metrics
// ============================================================
// The two evaluation metrics the training pipeline reports:
//
//   mse : mean((pred - target)²), lower is better
//   r2  : 1 - SS_res / SS_tot, the fraction of target variance
//         the model explains; 1.0 is perfect, 0.0 is no better
//         than predicting the mean
//
// Metrics are reported to the caller and the tracking sink.
// They never gate model acceptance.

use ndarray::ArrayView1;

/// Mean squared error. Returns 0.0 for empty input.
pub fn mse(predictions: ArrayView1<f64>, targets: ArrayView1<f64>) -> f64 {
    debug_assert_eq!(predictions.len(), targets.len());
    let n = predictions.len();
    if n == 0 {
        return 0.0;
    }

    predictions
        .iter()
        .zip(targets.iter())
        .map(|(&p, &t)| (p - t) * (p - t))
        .sum::<f64>()
        / n as f64
}

/// Coefficient of determination (R²).
///
/// For constant targets SS_tot is zero: a perfect prediction
/// scores 1.0 and anything else scores 0.0.
pub fn r2_score(predictions: ArrayView1<f64>, targets: ArrayView1<f64>) -> f64 {
    debug_assert_eq!(predictions.len(), targets.len());
    let n = predictions.len();
    if n == 0 {
        return 0.0;
    }

    let mean = targets.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = targets.iter().map(|&t| (t - mean) * (t - mean)).sum();
    let ss_res: f64 = predictions
        .iter()
        .zip(targets.iter())
        .map(|(&p, &t)| (p - t) * (p - t))
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}
