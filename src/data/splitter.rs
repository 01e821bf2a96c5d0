// ============================================================
// Layer 4 — Train/Holdout Splitter
// ============================================================
// Shuffles row indices and splits them into two sets:
//   - Training set: used to fit the regressor
//   - Holdout set:  used only to measure generalisation
//
// The shuffle is seeded (StdRng, not thread_rng): re-running
// training on identical data with the same seed must produce
// identical partitions, and therefore identical holdout metrics.
//
// Split ratio: 80% training, 20% holdout (caller-supplied).
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Deterministically shuffle the indices `0..n_rows` and split
/// them into (train, holdout).
///
/// # Arguments
/// * `n_rows`         - Number of rows being partitioned
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `seed`           - RNG seed; same data + same seed gives the
///                      same partitions
pub fn split_train_holdout(
    n_rows: usize,
    train_fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n_rows).collect();

    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    // e.g. 100 rows * 0.8 = 80 → first 80 indices are training
    let split_at = ((n_rows as f64) * train_fraction).round() as usize;
    let split_at = split_at.min(n_rows);

    let holdout = indices.split_off(split_at);

    tracing::debug!(
        "Split: {} training, {} holdout (seed {})",
        indices.len(),
        holdout.len(),
        seed,
    );

    (indices, holdout)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_split_sizes() {
        let (train, holdout) = split_train_holdout(100, 0.8, 42);
        assert_eq!(train.len(), 80);
        assert_eq!(holdout.len(), 20);
    }

    #[test]
    fn test_all_indices_preserved() {
        let (train, holdout) = split_train_holdout(50, 0.7, 42);
        let mut all: Vec<usize> = train.into_iter().chain(holdout).collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_partitions() {
        let a = split_train_holdout(200, 0.8, 42);
        let b = split_train_holdout(200, 0.8, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_shuffle() {
        let (train_a, _) = split_train_holdout(200, 0.8, 42);
        let (train_b, _) = split_train_holdout(200, 0.8, 43);
        assert_ne!(train_a, train_b);
    }

    #[test]
    fn test_empty_input() {
        let (train, holdout) = split_train_holdout(0, 0.8, 42);
        assert!(train.is_empty());
        assert!(holdout.is_empty());
    }

    #[test]
    fn test_full_training_split() {
        let (train, holdout) = split_train_holdout(10, 1.0, 42);
        assert_eq!(train.len(), 10);
        assert!(holdout.is_empty());
    }
}
