//! Server crate for the fitness recommendation engine.
//!
//! This crate contains the `RecommendationEngine`, the explicit object that
//! owns the fitted models and answers every recommendation request, plus the
//! response rows and the request-boundary error type.

pub mod engine;
pub mod error;
pub mod recommendation;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use engine::RecommendationEngine;
pub use error::RecommendationError;
pub use recommendation::{
    ExerciseRecommendation, MealRecommendation, SimilarUser, WorkoutPlanEntry,
};
