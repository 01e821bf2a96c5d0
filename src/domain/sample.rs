// ============================================================
// Layer 3 — Abalone Sample Domain Types
// ============================================================
// Represents one abalone as measured in the field: a sex label
// and seven physical measurements. This is a plain data struct
// with no behaviour beyond validation.
//
// The sex label stays a free string here rather than an enum:
// the encoding vocabulary is whatever values appeared in the
// training corpus, so "is this a known sex?" is answered by the
// fitted encoder at encode time, not by the parser.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One raw abalone sample as submitted for prediction or read
/// from the corpus. Measurements are in the units of the UCI
/// abalone dataset (mm and grams).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbaloneSample {
    /// Sex label: "M" (male), "F" (female) or "I" (infant)
    pub sex: String,

    /// Longest shell measurement
    pub length: f64,

    /// Measurement perpendicular to length
    pub diameter: f64,

    /// Height with meat in shell
    pub height: f64,

    /// Weight of the whole abalone
    pub whole_weight: f64,

    /// Weight of the meat
    pub shucked_weight: f64,

    /// Gut weight after bleeding
    pub viscera_weight: f64,

    /// Shell weight after drying
    pub shell_weight: f64,
}

impl AbaloneSample {
    /// Check the value invariants: a non-empty sex label and seven
    /// strictly positive, finite measurements. A measurement of
    /// exactly 0 (or below) is a schema defect, never accepted.
    pub fn validate(&self) -> Result<()> {
        if self.sex.trim().is_empty() {
            return Err(Error::Schema("sex must not be empty".to_string()));
        }

        for (name, value) in self.measurements() {
            if !value.is_finite() {
                return Err(Error::Schema(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
            if value <= 0.0 {
                return Err(Error::Schema(format!(
                    "{name} must be strictly positive, got {value}"
                )));
            }
        }

        Ok(())
    }

    /// The seven measurements paired with their names, in canonical
    /// order. Used by validation and by the feature codec so the
    /// two can never disagree about what a "measurement" is.
    pub fn measurements(&self) -> [(&'static str, f64); 7] {
        [
            ("length", self.length),
            ("diameter", self.diameter),
            ("height", self.height),
            ("whole_weight", self.whole_weight),
            ("shucked_weight", self.shucked_weight),
            ("viscera_weight", self.viscera_weight),
            ("shell_weight", self.shell_weight),
        ]
    }
}

/// One labelled corpus row: a sample plus the ring count that the
/// regressor is trained to predict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub sample: AbaloneSample,

    /// Growth rings counted in the shell cross-section.
    /// Age is derived as rings + 1.5 years.
    pub rings: f64,
}
