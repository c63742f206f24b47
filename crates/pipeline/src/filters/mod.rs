//! Filter implementations for the meal and exercise pipelines.
//!
//! Meal stages: [`MealTypeFilter`] -> [`DietaryFilter`] -> [`CalorieBandFilter`].
//! Exercise stages: [`BodyPartFilter`] -> [`EquipmentFilter`] -> [`DifficultyFilter`].

pub mod body_part;
pub mod calorie_band;
pub mod dietary;
pub mod difficulty;
pub mod equipment;
pub mod meal_type;

// Re-export for convenience
pub use body_part::BodyPartFilter;
pub use calorie_band::{CalorieBandFilter, calorie_band};
pub use dietary::DietaryFilter;
pub use difficulty::{DifficultyFilter, allowed_difficulties};
pub use equipment::{EquipmentFilter, allowed_equipment};
pub use meal_type::MealTypeFilter;
