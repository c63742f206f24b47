//! CSV parsing for the five fitness tables.
//!
//! Columns are looked up by header name, so column order in the files does
//! not matter. Coercion rules:
//! - missing or empty text cells become `""`
//! - numeric cells that are missing or fail to parse become `0`
//!
//! Only structural problems are errors: an unreadable file, a malformed CSV
//! record, or a missing identifier column.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::StringRecord;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Header name -> column position for one CSV file
struct Columns {
    file: String,
    positions: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(file: &str, headers: &StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_string(), idx))
            .collect();
        Self {
            file: file.to_string(),
            positions,
        }
    }

    /// Fail early when a column the table is keyed on is absent
    fn require(&self, column: &str) -> Result<()> {
        if self.positions.contains_key(column) {
            Ok(())
        } else {
            Err(DataLoadError::MissingColumn {
                file: self.file.clone(),
                column: column.to_string(),
            })
        }
    }

    fn text(&self, record: &StringRecord, column: &str) -> String {
        self.positions
            .get(column)
            .and_then(|&idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    fn number(&self, record: &StringRecord, column: &str) -> f64 {
        coerce_f64(&self.text(record, column))
    }

    fn id(&self, record: &StringRecord, column: &str) -> u32 {
        coerce_id(&self.text(record, column))
    }
}

/// Parse a numeric cell, falling back to 0 for anything unparseable
pub fn coerce_f64(cell: &str) -> f64 {
    match cell.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse an identifier cell. Accepts "12" and "12.0"; anything else is 0.
pub fn coerce_id(cell: &str) -> u32 {
    let cell = cell.trim();
    if let Ok(id) = cell.parse::<u32>() {
        return id;
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => {
            value.min(u32::MAX as f64) as u32
        }
        _ => 0,
    }
}

fn open(path: &Path) -> Result<std::fs::File> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(std::fs::File::open(path)?)
}

/// Read every record of a CSV source together with its header map
fn read_table<R: Read>(reader: R, file: &str) -> Result<(Columns, Vec<StringRecord>)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| DataLoadError::CsvError {
            file: file.to_string(),
            source,
        })?
        .clone();
    let columns = Columns::from_headers(file, &headers);

    let mut records = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|source| DataLoadError::CsvError {
            file: file.to_string(),
            source,
        })?;
        // A row of nothing but empty cells is a trailing blank line
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok((columns, records))
}

/// Parse meals from any CSV reader
pub fn read_meals<R: Read>(reader: R) -> Result<Vec<MealRecord>> {
    let (cols, records) = read_table(reader, "meals.csv")?;
    cols.require("meal_id")?;

    Ok(records
        .iter()
        .map(|r| MealRecord {
            meal_id: cols.id(r, "meal_id"),
            meal_name: cols.text(r, "meal_name"),
            meal_type: cols.text(r, "meal_type"),
            calories: cols.number(r, "calories"),
            protein_g: cols.number(r, "protein_g"),
            carbs_g: cols.number(r, "carbs_g"),
            fat_g: cols.number(r, "fat_g"),
            dietary_tags: cols.text(r, "dietary_tags"),
        })
        .collect())
}

/// Parse exercises from any CSV reader
pub fn read_exercises<R: Read>(reader: R) -> Result<Vec<ExerciseRecord>> {
    let (cols, records) = read_table(reader, "exercises.csv")?;
    cols.require("exercise_id")?;

    Ok(records
        .iter()
        .map(|r| ExerciseRecord {
            exercise_id: cols.id(r, "exercise_id"),
            exercise_name: cols.text(r, "exercise_name"),
            body_part: cols.text(r, "body_part"),
            equipment: cols.text(r, "equipment"),
            difficulty: cols.text(r, "difficulty"),
        })
        .collect())
}

/// Parse user profiles from any CSV reader
pub fn read_profiles<R: Read>(reader: R) -> Result<Vec<UserProfileRecord>> {
    let (cols, records) = read_table(reader, "profiles.csv")?;
    cols.require("username")?;

    Ok(records
        .iter()
        .map(|r| UserProfileRecord {
            user_id: cols.id(r, "user_id"),
            username: cols.text(r, "username"),
            goal: cols.text(r, "goal"),
            experience_level: cols.text(r, "experience_level"),
            equipment_access: cols.text(r, "equipment_access"),
            gender: cols.text(r, "gender"),
            age: cols.number(r, "age"),
            height_cm: cols.number(r, "height_cm"),
            initial_weight_kg: cols.number(r, "initial_weight_kg"),
            goal_weight_kg: cols.number(r, "goal_weight_kg"),
        })
        .collect())
}

/// Parse workout logs from any CSV reader
pub fn read_workout_logs<R: Read>(reader: R) -> Result<Vec<WorkoutLogEntry>> {
    let (cols, records) = read_table(reader, "workout_logs.csv")?;
    cols.require("user_id")?;
    cols.require("exercise_id")?;

    Ok(records
        .iter()
        .map(|r| WorkoutLogEntry {
            user_id: cols.id(r, "user_id"),
            exercise_id: cols.id(r, "exercise_id"),
            log_date: cols.text(r, "log_date"),
            weight_kg: cols.number(r, "weight_kg"),
            reps_completed: cols.number(r, "reps_completed"),
        })
        .collect())
}

/// Parse progress logs from any CSV reader
pub fn read_progress_logs<R: Read>(reader: R) -> Result<Vec<ProgressLogEntry>> {
    let (cols, records) = read_table(reader, "progress_logs.csv")?;
    cols.require("user_id")?;

    Ok(records
        .iter()
        .map(|r| {
            // Older exports name the date column "date"
            let mut log_date = cols.text(r, "log_date");
            if log_date.is_empty() {
                log_date = cols.text(r, "date");
            }
            ProgressLogEntry {
                user_id: cols.id(r, "user_id"),
                log_date,
                weight_kg: cols.number(r, "weight_kg"),
                body_fat_percent: cols.number(r, "body_fat_percent"),
            }
        })
        .collect())
}

/// Parse the meals.csv file
pub fn parse_meals(path: &Path) -> Result<Vec<MealRecord>> {
    read_meals(open(path)?)
}

/// Parse the exercises.csv file
pub fn parse_exercises(path: &Path) -> Result<Vec<ExerciseRecord>> {
    read_exercises(open(path)?)
}

/// Parse the profiles.csv file
pub fn parse_profiles(path: &Path) -> Result<Vec<UserProfileRecord>> {
    read_profiles(open(path)?)
}

/// Parse the workout_logs.csv file
pub fn parse_workout_logs(path: &Path) -> Result<Vec<WorkoutLogEntry>> {
    read_workout_logs(open(path)?)
}

/// Parse the progress_logs.csv file
pub fn parse_progress_logs(path: &Path) -> Result<Vec<ProgressLogEntry>> {
    read_progress_logs(open(path)?)
}
