// ============================================================
// Layer 6 — Model Store
// ============================================================
// Persists the fitted forest as a single JSON artifact at a
// configured path. One current version per deployment: saving
// overwrites the previous artifact.
//
// Atomicity: the artifact is written to a sibling `.tmp` file
// and renamed into place. A rename within one directory is
// atomic on the filesystems we target, so a concurrent reader
// sees either the old-complete or new-complete artifact and
// never a partial write.
//
// Reference: Rust Book §9 (Error Handling)

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ml::forest::RandomForestRegressor;

/// Saves and restores the model artifact.
pub struct ModelStore {
    /// Full path of the model artifact file
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Serialize and atomically persist a fitted forest,
    /// replacing any prior artifact.
    pub fn save(&self, model: &RandomForestRegressor) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = tmp_path(&self.path);
        fs::write(&tmp, serde_json::to_string(model)?)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!("Saved model artifact to '{}'", self.path.display());
        Ok(())
    }

    /// Load the current model artifact.
    /// Fails with `Error::ModelNotFound` when no artifact exists;
    /// read and parse failures surface as their own error kinds.
    pub fn load(&self) -> Result<RandomForestRegressor> {
        if !self.path.exists() {
            return Err(Error::ModelNotFound(self.path.clone()));
        }

        let json = fs::read_to_string(&self.path)?;
        let model = serde_json::from_str(&json)?;
        tracing::info!("Loaded model artifact from '{}'", self.path.display());
        Ok(model)
    }

    /// Whether an artifact exists on disk (used by `health`,
    /// which must not force a load).
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Sibling temp path used for the write-then-rename dance.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::ForestHyperparams;
    use ndarray::array;
    use tempfile::TempDir;

    fn small_forest() -> RandomForestRegressor {
        let x = array![[0.1, 1.0], [0.2, 2.0], [0.8, 3.0], [0.9, 4.0]];
        let y = array![1.0, 1.0, 5.0, 5.0];
        let params = ForestHyperparams {
            n_trees: 3,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        };
        RandomForestRegressor::fit(x.view(), y.view(), &params).unwrap()
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("objects").join("model.json"));
        let forest = small_forest();

        store.save(&forest).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), forest);
    }

    #[test]
    fn test_load_without_artifact_is_model_not_found() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));
        assert!(!store.exists());
        assert!(matches!(store.load(), Err(Error::ModelNotFound(_))));
    }

    #[test]
    fn test_save_overwrites_previous_artifact() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));

        store.save(&small_forest()).unwrap();
        let x = array![[0.1], [0.9]];
        let y = array![2.0, 8.0];
        let params = ForestHyperparams {
            n_trees: 1,
            max_depth: 1,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 7,
        };
        let second = RandomForestRegressor::fit(x.view(), y.view(), &params).unwrap();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), second);
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));
        store.save(&small_forest()).unwrap();
        assert!(!dir.path().join("model.json.tmp").exists());
    }
}
