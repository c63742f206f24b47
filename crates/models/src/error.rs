//! Error types for model building, encoding and persistence.

use thiserror::Error;

/// Errors raised by the encoders, the clusterer and the artifact store
#[derive(Error, Debug)]
pub enum ModelError {
    /// A categorical value that was never seen when the encoder was fitted.
    ///
    /// Signals schema drift between build time and request time, so it is
    /// never replaced by a default code.
    #[error("Unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    /// A feature row does not have the width the scaler was fitted on
    #[error("Expected {expected} features but found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Saved artifacts do not line up with the loaded tables
    #[error("Artifact mismatch: {0}")]
    ArtifactMismatch(String),

    /// Artifact (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error while reading or writing artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ModelError>;
