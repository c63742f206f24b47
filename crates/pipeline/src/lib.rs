//! Filter -> fallback -> score -> sample planning for meals and exercises.
//!
//! This crate provides:
//! - Filter and Scorer traits, and a FilterPipeline with per-stage fallback
//! - The concrete meal and exercise filters and scorers
//! - Shortlist-then-sample selection over an injected random source
//! - Workout schemes and workout-history aggregation
//!
//! ## Architecture
//! A recommendation request is processed in stages:
//! 1. Filters narrow the catalog; a stage that empties it falls back to the
//!    set that stage names (stage input, full catalog, or a catalog subset)
//! 2. A scorer assigns request-local scores to the survivors
//! 3. Selection shortlists by score and samples the requested count
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{RequestContext, UserProfile, meal_pipeline, MealScorer};
//!
//! let context = RequestContext::new(UserProfile::new().with_goal("cut"))
//!     .with_meal_type(Some("lunch".into()));
//! let mut eligible = meal_pipeline().apply(index.meals(), &context)?;
//! score_all(&mut eligible, &MealScorer, &context);
//! let picked = shortlist_then_sample(eligible, 5, 2, &mut rng);
//! ```

pub mod candidate;
pub mod context;
pub mod filter_pipeline;
pub mod filters;
pub mod plan;
pub mod progress;
pub mod scoring;
pub mod selection;
pub mod traits;

// Re-export main types
pub use candidate::Candidate;
pub use context::{RequestContext, UserProfile};
pub use filter_pipeline::FilterPipeline;
pub use plan::WorkoutScheme;
pub use progress::{ExerciseProgress, aggregate_progress, top_progress};
pub use scoring::{ExerciseScorer, MealScorer, score_all};
pub use selection::shortlist_then_sample;
pub use traits::{Filter, Scorer};

use data_loader::{ExerciseRecord, MealRecord};
use filters::*;

/// Meal stages: meal type, diet, calorie band
pub fn meal_pipeline() -> FilterPipeline<MealRecord> {
    FilterPipeline::new()
        .add_filter(MealTypeFilter)
        .add_filter(DietaryFilter)
        .add_filter(CalorieBandFilter)
}

/// Exercise stages: body part, equipment, difficulty
pub fn exercise_pipeline() -> FilterPipeline<ExerciseRecord> {
    FilterPipeline::new()
        .add_filter(BodyPartFilter)
        .add_filter(EquipmentFilter)
        .add_filter(DifficultyFilter)
}
