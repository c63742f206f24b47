//! Errors surfaced at the request boundary.
//!
//! A failed request never touches shared engine state; the error only
//! describes what went wrong for that one call.

use models::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendationError {
    /// The request carries a categorical value the encoders never saw
    #[error("Unknown category '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    /// Encoding or model lookup failed for another reason
    #[error("Model error: {0}")]
    Model(ModelError),

    /// A pipeline stage failed
    #[error(transparent)]
    Pipeline(#[from] anyhow::Error),
}

impl RecommendationError {
    /// Short machine-readable category for the response body
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownCategory { .. } => "unknown_category",
            Self::Model(_) => "model",
            Self::Pipeline(_) => "pipeline",
        }
    }
}

impl From<ModelError> for RecommendationError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownCategory { field, value } => Self::UnknownCategory { field, value },
            other => Self::Model(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendationError>;
