// ============================================================
// Layer 4 — Feature Codec
// ============================================================
// The single place where raw samples become model-ready numeric
// feature vectors. Training and inference BOTH go through
// `transform_one`, so the two can never apply different
// transformations: this is the wire contract between the
// training pipeline and the serving path.
//
// Two pieces make up that contract:
//
//   1. The categorical encoder (SexEncoder): fit exactly once
//      per training run on the corpus's observed sex values,
//      persisted next to the model artifact, then applied
//      read-only for the lifetime of that model version.
//
//   2. The canonical column order (FEATURE_COLUMNS): a named
//      constant, never derived from map iteration order. A
//      vector in the wrong order has the same shape but wrong
//      semantics, and the regressor cannot tell.
//
// Missing-column detection happens in the CSV loader (rows that
// reach the codec are already fully typed); the codec enforces
// the value invariants and the vocabulary.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::domain::sample::{AbaloneSample, TrainingRow};
use crate::error::{Error, Result};
use crate::infra::encoder_store::EncoderStore;

/// Canonical feature column order. Part of the persisted-model
/// contract: encoded vectors at training time and at inference
/// time must both follow exactly this order.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "Sex_encoded",
    "Length",
    "Diameter",
    "Height",
    "Whole weight",
    "Shucked weight",
    "Viscera weight",
    "Shell weight",
];

/// Number of model input features.
pub const NUM_FEATURES: usize = FEATURE_COLUMNS.len();

// ─── SexEncoder ───────────────────────────────────────────────────────────────
/// A persisted bijection from sex labels to integer codes.
///
/// Fit once on the training corpus: the distinct observed values
/// (not a fixed vocabulary) become the encoding domain, sorted by
/// label so the code assignment is stable across runs. On the
/// canonical dataset that yields F=0, I=1, M=2. Never mutated
/// after fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexEncoder {
    /// Sorted distinct class labels; a label's code is its index
    classes: Vec<String>,
}

impl SexEncoder {
    /// Fit an encoder on the sex labels observed in the corpus.
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut classes: Vec<String> = values.into_iter().map(str::to_string).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Map a label to its integer code.
    /// Fails with `Error::UnknownCategory` for labels outside the
    /// fit vocabulary; never silently defaults.
    pub fn encode(&self, value: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map_err(|_| Error::UnknownCategory(value.to_string()))
    }

    /// The fitted class labels, sorted.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

// ─── FeatureCodec ─────────────────────────────────────────────────────────────
/// Deterministic mapping between raw samples and encoded feature
/// vectors. Owns the encoder artifact lifecycle through its
/// `EncoderStore`.
pub struct FeatureCodec {
    encoder_store: EncoderStore,
}

impl FeatureCodec {
    pub fn new(encoder_store: EncoderStore) -> Self {
        Self { encoder_store }
    }

    /// Training-mode transform: fit a fresh encoder on the corpus,
    /// then encode every row in canonical column order.
    ///
    /// Returns the feature matrix, the target vector (ring counts)
    /// and the fitted encoder. The encoder is NOT persisted here;
    /// the training pipeline calls `persist_encoder` once the fit
    /// and evaluation have succeeded, so a failed run leaves the
    /// prior artifact authoritative.
    pub fn fit_transform(
        &self,
        corpus: &[TrainingRow],
    ) -> Result<(Array2<f64>, Array1<f64>, SexEncoder)> {
        if corpus.is_empty() {
            return Err(Error::DataSource("training corpus is empty".to_string()));
        }

        // Targets must be present and non-negative for every row
        for row in corpus {
            if !row.rings.is_finite() || row.rings < 0.0 {
                return Err(Error::Schema(format!(
                    "rings must be a non-negative number, got {}",
                    row.rings
                )));
            }
        }

        let encoder = SexEncoder::fit(corpus.iter().map(|r| r.sample.sex.as_str()));

        // Encode through the same single-sample path inference uses.
        // Cannot raise UnknownCategory: the vocabulary was just fit
        // on these exact rows.
        let mut flat = Vec::with_capacity(corpus.len() * NUM_FEATURES);
        for row in corpus {
            let vector = self.transform_one(&row.sample, &encoder)?;
            flat.extend_from_slice(&vector);
        }

        let features = Array2::from_shape_vec((corpus.len(), NUM_FEATURES), flat)
            .map_err(|e| Error::Schema(format!("feature matrix shape mismatch: {e}")))?;
        let targets = Array1::from_iter(corpus.iter().map(|r| r.rings));

        tracing::debug!(
            "Encoded {} rows, {} features, vocabulary {:?}",
            features.nrows(),
            NUM_FEATURES,
            encoder.classes(),
        );

        Ok((features, targets, encoder))
    }

    /// Inference-mode transform: apply a previously fit encoder to
    /// one sample. Same input + same encoder always yields the
    /// identical vector.
    pub fn transform_one(
        &self,
        sample: &AbaloneSample,
        encoder: &SexEncoder,
    ) -> Result<[f64; NUM_FEATURES]> {
        sample.validate()?;
        let sex_code = encoder.encode(&sample.sex)?;

        // Positions written out explicitly to mirror FEATURE_COLUMNS
        Ok([
            sex_code as f64,
            sample.length,
            sample.diameter,
            sample.height,
            sample.whole_weight,
            sample.shucked_weight,
            sample.viscera_weight,
            sample.shell_weight,
        ])
    }

    /// Load the persisted encoder for inference.
    /// Fails with `Error::EncoderNotFound` if no artifact exists.
    pub fn load_encoder(&self) -> Result<SexEncoder> {
        self.encoder_store.load()
    }

    /// Persist a fitted encoder (atomic write). Called by the
    /// training pipeline together with the model save.
    pub fn persist_encoder(&self, encoder: &SexEncoder) -> Result<()> {
        self.encoder_store.save(encoder)
    }

    /// Whether an encoder artifact exists on disk.
    pub fn encoder_exists(&self) -> bool {
        self.encoder_store.exists()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(sex: &str) -> AbaloneSample {
        AbaloneSample {
            sex: sex.to_string(),
            length: 0.455,
            diameter: 0.365,
            height: 0.095,
            whole_weight: 0.514,
            shucked_weight: 0.2245,
            viscera_weight: 0.101,
            shell_weight: 0.15,
        }
    }

    fn corpus() -> Vec<TrainingRow> {
        vec![
            TrainingRow { sample: sample("M"), rings: 15.0 },
            TrainingRow { sample: sample("F"), rings: 9.0 },
            TrainingRow { sample: sample("I"), rings: 4.0 },
            TrainingRow { sample: sample("M"), rings: 10.0 },
        ]
    }

    fn codec(dir: &TempDir) -> FeatureCodec {
        FeatureCodec::new(EncoderStore::new(dir.path().join("sex_encoder.json")))
    }

    #[test]
    fn test_encoder_codes_are_sorted_by_label() {
        let encoder = SexEncoder::fit(["M", "F", "I", "M"]);
        assert_eq!(encoder.classes(), ["F", "I", "M"]);
        assert_eq!(encoder.encode("F").unwrap(), 0);
        assert_eq!(encoder.encode("I").unwrap(), 1);
        assert_eq!(encoder.encode("M").unwrap(), 2);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let encoder = SexEncoder::fit(["M", "F"]);
        let err = encoder.encode("I").unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(v) if v == "I"));
    }

    #[test]
    fn test_transform_one_follows_canonical_order() {
        let dir = TempDir::new().unwrap();
        let encoder = SexEncoder::fit(["M", "F", "I"]);
        let vector = codec(&dir).transform_one(&sample("M"), &encoder).unwrap();
        assert_eq!(vector.len(), NUM_FEATURES);
        // [sex_code, length, diameter, height, whole, shucked, viscera, shell]
        assert_eq!(
            vector,
            [2.0, 0.455, 0.365, 0.095, 0.514, 0.2245, 0.101, 0.15]
        );
    }

    #[test]
    fn test_transform_one_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let codec = codec(&dir);
        let encoder = SexEncoder::fit(["M", "F", "I"]);
        let a = codec.transform_one(&sample("F"), &encoder).unwrap();
        let b = codec.transform_one(&sample("F"), &encoder).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_transform_round_trips_own_corpus() {
        let dir = TempDir::new().unwrap();
        let codec = codec(&dir);
        let rows = corpus();
        let (features, targets, encoder) = codec.fit_transform(&rows).unwrap();
        assert_eq!(features.nrows(), rows.len());
        assert_eq!(features.ncols(), NUM_FEATURES);
        assert_eq!(targets.len(), rows.len());

        // Every sex in the corpus is in-vocabulary for its own encoder
        for row in &rows {
            assert!(codec.transform_one(&row.sample, &encoder).is_ok());
        }
    }

    #[test]
    fn test_fit_transform_rejects_negative_rings() {
        let dir = TempDir::new().unwrap();
        let mut rows = corpus();
        rows[1].rings = -3.0;
        assert!(matches!(
            codec(&dir).fit_transform(&rows),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_fit_transform_rejects_invalid_measurement() {
        let dir = TempDir::new().unwrap();
        let mut rows = corpus();
        rows[0].sample.diameter = 0.0;
        assert!(matches!(
            codec(&dir).fit_transform(&rows),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_empty_corpus_is_a_data_source_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            codec(&dir).fit_transform(&[]),
            Err(Error::DataSource(_))
        ));
    }

    #[test]
    fn test_load_before_persist_is_encoder_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            codec(&dir).load_encoder(),
            Err(Error::EncoderNotFound(_))
        ));
    }

    #[test]
    fn test_persisted_encoder_round_trips() {
        let dir = TempDir::new().unwrap();
        let codec = codec(&dir);
        let encoder = SexEncoder::fit(["M", "F", "I"]);
        codec.persist_encoder(&encoder).unwrap();
        assert!(codec.encoder_exists());
        assert_eq!(codec.load_encoder().unwrap(), encoder);
    }
}
