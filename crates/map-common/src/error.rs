//! Error types for the map annotation toolchain.

use thiserror::Error;

/// Result type alias using AnnotateError.
pub type AnnotateResult<T> = Result<T, AnnotateError>;

/// Primary error type for annotation runs.
///
/// Every variant is fatal for the run: the tool writes no partial output
/// and exits non-zero. Recoverable conditions (malformed color specs,
/// borders with fewer than two vertices) are handled in place and never
/// surface here.
#[derive(Debug, Error)]
pub enum AnnotateError {
    // === Asset Errors ===
    #[error("Failed to read asset '{path}': {message}")]
    AssetRead { path: String, message: String },

    #[error("Failed to decode image '{path}': {message}")]
    ImageDecode { path: String, message: String },

    #[error("Failed to load font '{0}'")]
    FontLoad(String),

    // === Dataset Errors ===
    #[error("Malformed dataset: {0}")]
    DatasetParse(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    // === Output Errors ===
    #[error("Failed to encode output: {0}")]
    Encode(String),

    #[error("Failed to write output '{path}': {message}")]
    OutputWrite { path: String, message: String },

    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for AnnotateError {
    fn from(err: serde_json::Error) -> Self {
        AnnotateError::DatasetParse(err.to_string())
    }
}
