//! Core domain types for the fitness tables.
//!
//! Five normalized tables live here: two catalogs (meals, exercises), the
//! user profiles, and two append-only histories (workout and progress logs).
//! Rows are immutable once loaded; anything derived from them (encodings,
//! similarity, clusters) lives in the `models` crate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a meal in `meals.csv`
pub type MealId = u32;

/// Identifier of an exercise in `exercises.csv`
pub type ExerciseId = u32;

/// Identifier of a user, shared by profiles and both log tables
pub type UserId = u32;

// =============================================================================
// Catalog Types
// =============================================================================

/// One row of the meal catalog.
///
/// Macro columns are already coerced: a cell that did not parse is `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub meal_id: MealId,
    pub meal_name: String,
    /// breakfast / lunch / dinner / snack, as written in the source data
    pub meal_type: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    /// Free-text tag string, may hold several tags ("vegan, gluten-free")
    pub dietary_tags: String,
}

impl MealRecord {
    /// Text used for vectorization: name, type and tags joined by single spaces.
    ///
    /// Computed on demand so it can never drift from the fields it is built from.
    pub fn combined_features(&self) -> String {
        format!("{} {} {}", self.meal_name, self.meal_type, self.dietary_tags)
    }
}

/// One row of the exercise catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    /// Legs / Back / Chest / Core / Full Body / ...
    pub body_part: String,
    /// Barbell / Dumbbell / Machine / Cable / Kettlebell / Bodyweight / Other
    pub equipment: String,
    /// Beginner / Intermediate / Advanced
    pub difficulty: String,
}

impl ExerciseRecord {
    /// Text used for vectorization: name, body part, equipment and difficulty.
    pub fn combined_features(&self) -> String {
        format!(
            "{} {} {} {}",
            self.exercise_name, self.body_part, self.equipment, self.difficulty
        )
    }
}

// =============================================================================
// User Types
// =============================================================================

/// A stored user profile.
///
/// Categorical fields are kept as raw strings; their integer codes are only
/// meaningful relative to one fit of the label encoders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfileRecord {
    pub user_id: UserId,
    pub username: String,
    /// bulk / cut / maintain
    pub goal: String,
    /// beginner / intermediate / advanced
    pub experience_level: String,
    /// full_gym / home_gym / bodyweight
    pub equipment_access: String,
    pub gender: String,
    pub age: f64,
    pub height_cm: f64,
    pub initial_weight_kg: f64,
    pub goal_weight_kg: f64,
}

/// A single set logged by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLogEntry {
    pub user_id: UserId,
    pub exercise_id: ExerciseId,
    pub log_date: String,
    pub weight_kg: f64,
    pub reps_completed: f64,
}

/// A body-measurement snapshot. Read-only input, never aggregated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressLogEntry {
    pub user_id: UserId,
    pub log_date: String,
    pub weight_kg: f64,
    pub body_fat_percent: f64,
}

// =============================================================================
// DataIndex - The Tabular Store
// =============================================================================

/// Holds the five tables plus lookup indices.
///
/// Catalog rows keep their load order: that order is the row position used by
/// the similarity matrices, so the catalogs are `Vec`s rather than maps.
#[derive(Debug, Clone)]
pub struct DataIndex {
    pub(crate) meals: Vec<MealRecord>,
    pub(crate) exercises: Vec<ExerciseRecord>,
    pub(crate) profiles: Vec<UserProfileRecord>,
    pub(crate) workout_logs: Vec<WorkoutLogEntry>,
    pub(crate) progress_logs: Vec<ProgressLogEntry>,

    /// meal_id -> first row position holding that id
    pub(crate) meal_positions: HashMap<MealId, usize>,
    /// exercise_id -> first row position holding that id
    pub(crate) exercise_positions: HashMap<ExerciseId, usize>,

    /// All workout log entries of each user, in load order
    pub(crate) user_workout_logs: HashMap<UserId, Vec<WorkoutLogEntry>>,
    /// All progress snapshots of each user, in load order
    pub(crate) user_progress_logs: HashMap<UserId, Vec<ProgressLogEntry>>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self {
            meals: Vec::new(),
            exercises: Vec::new(),
            profiles: Vec::new(),
            workout_logs: Vec::new(),
            progress_logs: Vec::new(),
            meal_positions: HashMap::new(),
            exercise_positions: HashMap::new(),
            user_workout_logs: HashMap::new(),
            user_progress_logs: HashMap::new(),
        }
    }

    // Getters

    /// The meal catalog in row order
    pub fn meals(&self) -> &[MealRecord] {
        &self.meals
    }

    /// The exercise catalog in row order
    pub fn exercises(&self) -> &[ExerciseRecord] {
        &self.exercises
    }

    /// All stored user profiles in row order
    pub fn profiles(&self) -> &[UserProfileRecord] {
        &self.profiles
    }

    /// Every workout log entry in load order
    pub fn workout_logs(&self) -> &[WorkoutLogEntry] {
        &self.workout_logs
    }

    /// Every progress snapshot in load order
    pub fn progress_logs(&self) -> &[ProgressLogEntry] {
        &self.progress_logs
    }

    /// Row position of a meal id in the catalog
    pub fn meal_position(&self, id: MealId) -> Option<usize> {
        self.meal_positions.get(&id).copied()
    }

    /// Row position of an exercise id in the catalog
    pub fn exercise_position(&self, id: ExerciseId) -> Option<usize> {
        self.exercise_positions.get(&id).copied()
    }

    /// Get a meal by id
    pub fn get_meal(&self, id: MealId) -> Option<&MealRecord> {
        self.meal_position(id).map(|pos| &self.meals[pos])
    }

    /// Get an exercise by id
    pub fn get_exercise(&self, id: ExerciseId) -> Option<&ExerciseRecord> {
        self.exercise_position(id).map(|pos| &self.exercises[pos])
    }

    /// Get a profile by username (first match)
    pub fn get_profile_by_username(&self, username: &str) -> Option<&UserProfileRecord> {
        self.profiles.iter().find(|p| p.username == username)
    }

    /// Workout history of a user; empty slice for users without logs
    pub fn get_user_workout_logs(&self, user_id: UserId) -> &[WorkoutLogEntry] {
        self.user_workout_logs
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Progress snapshots of a user; empty slice for users without logs
    pub fn get_user_progress_logs(&self, user_id: UserId) -> &[ProgressLogEntry] {
        self.user_progress_logs
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    // Mutators, used while loading

    /// Append a meal to the catalog
    pub fn insert_meal(&mut self, meal: MealRecord) {
        self.meal_positions
            .entry(meal.meal_id)
            .or_insert(self.meals.len());
        self.meals.push(meal);
    }

    /// Append an exercise to the catalog
    pub fn insert_exercise(&mut self, exercise: ExerciseRecord) {
        self.exercise_positions
            .entry(exercise.exercise_id)
            .or_insert(self.exercises.len());
        self.exercises.push(exercise);
    }

    /// Append a user profile
    pub fn insert_profile(&mut self, profile: UserProfileRecord) {
        self.profiles.push(profile);
    }

    /// Append a workout log entry and update the per-user index
    pub fn insert_workout_log(&mut self, entry: WorkoutLogEntry) {
        self.user_workout_logs
            .entry(entry.user_id)
            .or_default()
            .push(entry.clone());
        self.workout_logs.push(entry);
    }

    /// Append a progress snapshot and update the per-user index
    pub fn insert_progress_log(&mut self, entry: ProgressLogEntry) {
        self.user_progress_logs
            .entry(entry.user_id)
            .or_default()
            .push(entry.clone());
        self.progress_logs.push(entry);
    }

    /// Row counts (meals, exercises, profiles, workout logs, progress logs)
    pub fn counts(&self) -> (usize, usize, usize, usize, usize) {
        (
            self.meals.len(),
            self.exercises.len(),
            self.profiles.len(),
            self.workout_logs.len(),
            self.progress_logs.len(),
        )
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}
