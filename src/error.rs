// ============================================================
// Error Taxonomy
// ============================================================
// One typed error enum for the whole core, so callers can tell
// apart the three situations that need different handling:
//
//   - "no model yet"       → EncoderNotFound / ModelNotFound /
//                            ServiceUnavailable (recoverable by
//                            running `train`)
//   - "malformed input"    → Schema / UnknownCategory (not
//                            retryable without fixing the input)
//   - "transient failure"  → Io / Json (environment problems)
//
// The CLI layer wraps these in anyhow for display; everything
// below the CLI returns this enum.
//
// Reference: Rust Book §9 (Error Handling)

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Raw input is missing required columns/fields or violates a
    /// value invariant (e.g. a non-positive measurement).
    #[error("schema error: {0}")]
    Schema(String),

    /// A categorical value was not seen when the encoder was fit.
    /// The sample is rejected; it is never silently defaulted.
    #[error("unknown category '{0}': value was not present when the encoder was fit")]
    UnknownCategory(String),

    /// No encoder artifact has been persisted yet.
    #[error("no encoder artifact at '{}': run `train` first", .0.display())]
    EncoderNotFound(PathBuf),

    /// No model artifact has been persisted yet.
    #[error("no model artifact at '{}': run `train` first", .0.display())]
    ModelNotFound(PathBuf),

    /// The raw corpus could not be read, or was empty.
    #[error("data source error: {0}")]
    DataSource(String),

    /// The serving layer cannot reach a loaded model.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The regressor fit itself failed (e.g. degenerate data).
    #[error("training failed: {0}")]
    Training(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
