// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads the labelled abalone corpus from a CSV file using the
// csv crate's serde support.
//
// The file format (part of the external contract, multi-word
// headers included):
//
//   Sex,Length,Diameter,Height,Whole weight,Shucked weight,Viscera weight,Shell weight,Rings
//   M,0.455,0.365,0.095,0.514,0.2245,0.101,0.15,15
//   ...
//
// Error mapping:
//   - file unreadable or zero data rows  → Error::DataSource
//   - missing required column            → Error::Schema
//   - unparseable / invalid row          → Error::Schema, with
//     the 1-based line number so the row can be found and fixed
//
// Reference: Rust Book §9 (Error Handling)

use std::fs::File;
use std::path::PathBuf;

use csv::ReaderBuilder;
use serde::Deserialize;

use crate::domain::sample::{AbaloneSample, TrainingRow};
use crate::domain::traits::CorpusSource;
use crate::error::{Error, Result};

/// The CSV header names, exactly as they appear in the file.
const REQUIRED_COLUMNS: [&str; 9] = [
    "Sex",
    "Length",
    "Diameter",
    "Height",
    "Whole weight",
    "Shucked weight",
    "Viscera weight",
    "Shell weight",
    "Rings",
];

/// One CSV record as it appears on disk, before validation.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "Length")]
    length: f64,
    #[serde(rename = "Diameter")]
    diameter: f64,
    #[serde(rename = "Height")]
    height: f64,
    #[serde(rename = "Whole weight")]
    whole_weight: f64,
    #[serde(rename = "Shucked weight")]
    shucked_weight: f64,
    #[serde(rename = "Viscera weight")]
    viscera_weight: f64,
    #[serde(rename = "Shell weight")]
    shell_weight: f64,
    #[serde(rename = "Rings")]
    rings: f64,
}

impl From<RawRecord> for TrainingRow {
    fn from(r: RawRecord) -> Self {
        TrainingRow {
            sample: AbaloneSample {
                sex: r.sex,
                length: r.length,
                diameter: r.diameter,
                height: r.height,
                whole_weight: r.whole_weight,
                shucked_weight: r.shucked_weight,
                viscera_weight: r.viscera_weight,
                shell_weight: r.shell_weight,
            },
            rings: r.rings,
        }
    }
}

/// Loads the labelled corpus from a CSV file.
/// Implements the CorpusSource trait from Layer 3.
pub struct CsvCorpusLoader {
    path: PathBuf,
}

impl CsvCorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for CsvCorpusLoader {
    fn load_all(&self) -> Result<Vec<TrainingRow>> {
        let file = File::open(&self.path).map_err(|e| {
            Error::DataSource(format!("cannot open '{}': {e}", self.path.display()))
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        // Check the header row up front so a renamed or dropped
        // column surfaces as one clear schema error instead of a
        // per-row deserialization failure.
        let headers = reader
            .headers()
            .map_err(|e| Error::DataSource(format!("cannot read CSV headers: {e}")))?
            .clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::Schema(format!(
                    "required column '{column}' is missing from '{}'",
                    self.path.display()
                )));
            }
        }

        let mut rows = Vec::new();
        // Line 1 is the header, so data starts on line 2
        for (index, record) in reader.deserialize::<RawRecord>().enumerate() {
            let line = index + 2;
            let record = record
                .map_err(|e| Error::Schema(format!("line {line}: unparseable row: {e}")))?;
            rows.push(TrainingRow::from(record));
        }

        if rows.is_empty() {
            return Err(Error::DataSource(format!(
                "'{}' contains no data rows",
                self.path.display()
            )));
        }

        tracing::info!("Loaded {} corpus rows from '{}'", rows.len(), self.path.display());
        Ok(rows)
    }
}
