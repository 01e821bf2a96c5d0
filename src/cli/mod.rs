// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. Uses the `clap`
// crate to parse arguments; all business logic is delegated to
// Layer 2 (application).
//
// Four commands are supported:
//   1. `train`         — fit and persist a model + encoder pair
//   2. `predict`       — one prediction from flag values
//   3. `predict-batch` — predictions for a JSON file of samples
//   4. `health`        — report model availability
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;

use crate::application::config::AppConfig;
use crate::application::context::ServiceContext;
use crate::domain::sample::AbaloneSample;
use commands::{Commands, HealthArgs, PredictArgs, PredictBatchArgs, TrainArgs};

/// The main CLI struct. clap reads the fields and generates the
/// argument parsing code via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "abalone-age",
    version = "0.1.0",
    about = "Train a random forest on abalone measurements, then predict age from shell measurements."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use
    /// case. This keeps the CLI layer thin: it only routes and
    /// prints, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => run_train(args),
            Commands::Predict(args) => run_predict(args),
            Commands::PredictBatch(args) => run_predict_batch(args),
            Commands::Health(args) => run_health(args),
        }
    }
}

/// Handles the `train` subcommand.
fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Starting training on corpus: {}", args.data_path.display());

    let context = ServiceContext::new(args.to_config());
    let report = context.train(Some(args.to_hyperparams()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("Model trained successfully.");
    Ok(())
}

/// Handles the `predict` subcommand.
fn run_predict(args: PredictArgs) -> Result<()> {
    let context = serving_context(&args.artifacts_dir);
    let result = context.predict(args.to_sample())?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Handles the `predict-batch` subcommand.
/// The input file holds a JSON array of samples; the batch
/// either fully succeeds or fails with the first bad sample.
fn run_predict_batch(args: PredictBatchArgs) -> Result<()> {
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read batch input '{}'", args.input.display()))?;
    let samples: Vec<AbaloneSample> = serde_json::from_str(&json)
        .with_context(|| "batch input must be a JSON array of samples")?;

    let context = serving_context(&args.artifacts_dir);
    let predictions = context.predict_batch(samples)?;

    let output = serde_json::json!({
        "count": predictions.len(),
        "predictions": predictions,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Handles the `health` subcommand.
fn run_health(args: HealthArgs) -> Result<()> {
    let context = serving_context(&args.artifacts_dir);
    let status = context.health();

    let label = if status.model_available { "healthy" } else { "degraded" };
    println!("{label}");
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

/// A context for the serving-side commands, which only need the
/// artifact paths (the corpus path keeps its default).
fn serving_context(artifacts_dir: &std::path::Path) -> ServiceContext {
    let defaults = AppConfig::default();
    ServiceContext::new(AppConfig::with_artifacts_dir(defaults.data_path, artifacts_dir))
}
