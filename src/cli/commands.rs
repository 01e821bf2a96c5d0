// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands: `train`, `predict`,
// `predict-batch` and `health`, and all their configurable
// flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::config::AppConfig;
use crate::application::train_use_case::ForestHyperparams;
use crate::domain::sample::AbaloneSample;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a random forest on the abalone corpus
    Train(TrainArgs),

    /// Predict rings and age for one abalone
    Predict(PredictArgs),

    /// Predict for a JSON file of samples (all or nothing)
    PredictBatch(PredictBatchArgs),

    /// Report whether a trained model is available
    Health(HealthArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with the labelled abalone corpus
    #[arg(long, default_value = "data/abalone.csv")]
    pub data_path: PathBuf,

    /// Directory for the model, encoder and run-log artifacts
    #[arg(long, default_value = "local_objects")]
    pub artifacts_dir: PathBuf,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    pub n_trees: usize,

    /// Maximum depth of each tree
    #[arg(long, default_value_t = 20)]
    pub max_depth: usize,

    /// Minimum rows a node needs before it may be split
    #[arg(long, default_value_t = 5)]
    pub min_samples_split: usize,

    /// Minimum rows each side of a split must keep
    #[arg(long, default_value_t = 2)]
    pub min_samples_leaf: usize,

    /// Seed for the train/holdout split and bootstrap draws
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Disable the experiment-tracking run log
    #[arg(long)]
    pub no_tracking: bool,
}

impl TrainArgs {
    /// Convert CLI args into the application-layer config.
    /// This is the boundary between Layer 1 and Layer 2; the
    /// application layer never sees clap types.
    pub fn to_config(&self) -> AppConfig {
        let mut config = AppConfig::with_artifacts_dir(&self.data_path, &self.artifacts_dir);
        config.tracking_enabled = !self.no_tracking;
        config
    }

    pub fn to_hyperparams(&self) -> ForestHyperparams {
        ForestHyperparams {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            seed: self.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Sex label: M, F or I
    #[arg(long)]
    pub sex: String,

    /// Longest shell measurement (mm)
    #[arg(long)]
    pub length: f64,

    /// Measurement perpendicular to length (mm)
    #[arg(long)]
    pub diameter: f64,

    /// Height with meat in shell (mm)
    #[arg(long)]
    pub height: f64,

    /// Whole abalone weight (grams)
    #[arg(long)]
    pub whole_weight: f64,

    /// Weight of the meat (grams)
    #[arg(long)]
    pub shucked_weight: f64,

    /// Gut weight after bleeding (grams)
    #[arg(long)]
    pub viscera_weight: f64,

    /// Shell weight after drying (grams)
    #[arg(long)]
    pub shell_weight: f64,

    /// Directory holding the trained artifacts
    #[arg(long, default_value = "local_objects")]
    pub artifacts_dir: PathBuf,
}

impl PredictArgs {
    pub fn to_sample(&self) -> AbaloneSample {
        AbaloneSample {
            sex: self.sex.clone(),
            length: self.length,
            diameter: self.diameter,
            height: self.height,
            whole_weight: self.whole_weight,
            shucked_weight: self.shucked_weight,
            viscera_weight: self.viscera_weight,
            shell_weight: self.shell_weight,
        }
    }
}

/// All arguments for the `predict-batch` command
#[derive(Args, Debug)]
pub struct PredictBatchArgs {
    /// JSON file containing an array of samples
    #[arg(long)]
    pub input: PathBuf,

    /// Directory holding the trained artifacts
    #[arg(long, default_value = "local_objects")]
    pub artifacts_dir: PathBuf,
}

/// All arguments for the `health` command
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Directory holding the trained artifacts
    #[arg(long, default_value = "local_objects")]
    pub artifacts_dir: PathBuf,
}
