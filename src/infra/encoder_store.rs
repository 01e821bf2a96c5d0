// ============================================================
// Layer 6 — Encoder Store
// ============================================================
// Persists the fitted sex encoder as a JSON artifact, co-located
// with the model artifact. The encoder and the model are always
// produced by the same training run and must be swapped together;
// the serving cache loads them as one unit.
//
// Same write-to-temp-then-rename discipline as the model store:
// a reader never observes a partially written encoder.

use std::fs;
use std::path::PathBuf;

use crate::data::codec::SexEncoder;
use crate::error::{Error, Result};

/// Saves and restores the categorical-encoder artifact.
pub struct EncoderStore {
    /// Full path of the encoder artifact file
    path: PathBuf,
}

impl EncoderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Serialize and atomically persist a fitted encoder,
    /// replacing any prior artifact.
    pub fn save(&self, encoder: &SexEncoder) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        fs::write(&tmp, serde_json::to_string(encoder)?)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!("Saved encoder artifact to '{}'", self.path.display());
        Ok(())
    }

    /// Load the current encoder artifact.
    /// Fails with `Error::EncoderNotFound` when no artifact exists.
    pub fn load(&self) -> Result<SexEncoder> {
        if !self.path.exists() {
            return Err(Error::EncoderNotFound(self.path.clone()));
        }

        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Whether an artifact exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
