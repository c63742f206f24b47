//! # Data Loader Crate
//!
//! The tabular store behind the recommendation engine: loads and indexes the
//! meal and exercise catalogs, user profiles, and workout/progress logs.
//!
//! ## Main Components
//!
//! - **types**: Row types (MealRecord, ExerciseRecord, UserProfileRecord, logs) and DataIndex
//! - **parser**: CSV parsing with numeric coercion (bad numbers become 0)
//! - **index**: Directory loading and index construction
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data"))?;
//!
//! let meal = index.get_meal(12).unwrap();
//! println!("{} -> {}", meal.meal_name, meal.combined_features());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    ExerciseId,
    MealId,
    UserId,
    // Rows
    ExerciseRecord,
    MealRecord,
    ProgressLogEntry,
    UserProfileRecord,
    WorkoutLogEntry,
    // Store
    DataIndex,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn squat() -> ExerciseRecord {
        ExerciseRecord {
            exercise_id: 1,
            exercise_name: "Back Squat".to_string(),
            body_part: "Legs".to_string(),
            equipment: "Barbell".to_string(),
            difficulty: "Intermediate".to_string(),
        }
    }

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        assert_eq!(index.counts(), (0, 0, 0, 0, 0));
    }

    #[test]
    fn test_insert_meal() {
        let mut index = DataIndex::new();

        index.insert_meal(MealRecord {
            meal_id: 3,
            meal_name: "Greek Yogurt Parfait".to_string(),
            meal_type: "breakfast".to_string(),
            calories: 420.0,
            protein_g: 28.0,
            carbs_g: 45.0,
            fat_g: 12.0,
            dietary_tags: "vegetarian high-protein".to_string(),
        });

        let meal = index.get_meal(3).unwrap();
        assert_eq!(meal.calories, 420.0);
        assert_eq!(
            meal.combined_features(),
            "Greek Yogurt Parfait breakfast vegetarian high-protein"
        );
        assert_eq!(index.meal_position(3), Some(0));
    }

    #[test]
    fn test_exercise_combined_features() {
        assert_eq!(
            squat().combined_features(),
            "Back Squat Legs Barbell Intermediate"
        );
    }

    #[test]
    fn test_insert_workout_log() {
        let mut index = DataIndex::new();
        index.insert_exercise(squat());

        index.insert_workout_log(WorkoutLogEntry {
            user_id: 9,
            exercise_id: 1,
            log_date: "2024-05-01".to_string(),
            weight_kg: 100.0,
            reps_completed: 5.0,
        });

        assert_eq!(index.get_user_workout_logs(9).len(), 1);
        assert_eq!(index.workout_logs().len(), 1);
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        assert!(index.get_meal(999).is_none());
        assert!(index.get_exercise(999).is_none());
        assert!(index.get_profile_by_username("nobody").is_none());
        assert!(index.get_user_workout_logs(999).is_empty());
        assert!(index.get_user_progress_logs(999).is_empty());
    }
}
