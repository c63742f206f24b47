//! DataIndex building logic.
//!
//! Loads the five CSV tables from a directory (in parallel) and builds the
//! id -> row position and per-user log indices.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::{info, warn};

impl DataIndex {
    /// Load the full dataset from a directory.
    ///
    /// Expects `meals.csv`, `exercises.csv` and `profiles.csv`. The two log
    /// tables are optional: a missing file loads as an empty table.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading fitness dataset from {:?}", data_dir);

        let meals_path = data_dir.join("meals.csv");
        let exercises_path = data_dir.join("exercises.csv");
        let profiles_path = data_dir.join("profiles.csv");
        let workout_logs_path = data_dir.join("workout_logs.csv");
        let progress_logs_path = data_dir.join("progress_logs.csv");

        // Catalogs and profiles on one side, logs on the other
        let ((meals, exercises), (profiles, (workout_logs, progress_logs))) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_meals(&meals_path),
                    || parser::parse_exercises(&exercises_path),
                )
            },
            || {
                rayon::join(
                    || parser::parse_profiles(&profiles_path),
                    || {
                        (
                            load_optional(&workout_logs_path, parser::parse_workout_logs),
                            load_optional(&progress_logs_path, parser::parse_progress_logs),
                        )
                    },
                )
            },
        );

        let meals = meals?;
        let exercises = exercises?;
        let profiles = profiles?;
        let workout_logs = workout_logs?;
        let progress_logs = progress_logs?;

        info!(
            "Loaded {} meals, {} exercises, {} profiles, {} workout logs, {} progress logs",
            meals.len(),
            exercises.len(),
            profiles.len(),
            workout_logs.len(),
            progress_logs.len()
        );

        Ok(Self::from_tables(
            meals,
            exercises,
            profiles,
            workout_logs,
            progress_logs,
        ))
    }

    /// Build an index from already-parsed tables, preserving row order
    pub fn from_tables(
        meals: Vec<MealRecord>,
        exercises: Vec<ExerciseRecord>,
        profiles: Vec<UserProfileRecord>,
        workout_logs: Vec<WorkoutLogEntry>,
        progress_logs: Vec<ProgressLogEntry>,
    ) -> Self {
        let mut index = DataIndex::new();
        for meal in meals {
            index.insert_meal(meal);
        }
        for exercise in exercises {
            index.insert_exercise(exercise);
        }
        for profile in profiles {
            index.insert_profile(profile);
        }
        for entry in workout_logs {
            index.insert_workout_log(entry);
        }
        for entry in progress_logs {
            index.insert_progress_log(entry);
        }

        let duplicates = index.meals.len() - index.meal_positions.len()
            + index.exercises.len()
            - index.exercise_positions.len();
        if duplicates > 0 {
            warn!(
                "{} catalog rows reuse an existing id; lookups resolve to the first row",
                duplicates
            );
        }
        index
    }
}

fn load_optional<T>(
    path: &Path,
    parse: fn(&Path) -> Result<Vec<T>>,
) -> Result<Vec<T>> {
    if path.exists() {
        parse(path)
    } else {
        warn!("{:?} not found, treating as empty", path);
        Ok(Vec::new())
    }
}
