//! Response rows returned by the engine.
//!
//! Each row copies the catalog fields it reports; nothing here borrows from
//! the engine, so responses can outlive the request that produced them.

use data_loader::{ExerciseId, ExerciseRecord, MealId, MealRecord, UserProfileRecord};
use pipeline::WorkoutScheme;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealRecommendation {
    pub meal_id: MealId,
    pub meal_name: String,
    pub meal_type: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub dietary_tags: String,
    /// Set only by similar-meal lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
}

impl From<&MealRecord> for MealRecommendation {
    fn from(meal: &MealRecord) -> Self {
        Self {
            meal_id: meal.meal_id,
            meal_name: meal.meal_name.clone(),
            meal_type: meal.meal_type.clone(),
            calories: meal.calories,
            protein_g: meal.protein_g,
            carbs_g: meal.carbs_g,
            fat_g: meal.fat_g,
            dietary_tags: meal.dietary_tags.clone(),
            similarity_score: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseRecommendation {
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    pub body_part: String,
    pub equipment: String,
    pub difficulty: String,
    /// Set only by similar-exercise lookups and the progress recommender
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
}

impl From<&ExerciseRecord> for ExerciseRecommendation {
    fn from(exercise: &ExerciseRecord) -> Self {
        Self {
            exercise_id: exercise.exercise_id,
            exercise_name: exercise.exercise_name.clone(),
            body_part: exercise.body_part.clone(),
            equipment: exercise.equipment.clone(),
            difficulty: exercise.difficulty.clone(),
            similarity_score: None,
        }
    }
}

/// One exercise of a generated plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutPlanEntry {
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    pub body_part: String,
    pub equipment: String,
    pub difficulty: String,
    pub sets: u32,
    pub reps: String,
    pub rest_seconds: u32,
    /// Left for the user to fill in
    pub weight: String,
    pub notes: String,
}

impl WorkoutPlanEntry {
    pub fn new(exercise: ExerciseRecommendation, scheme: WorkoutScheme) -> Self {
        Self {
            exercise_id: exercise.exercise_id,
            exercise_name: exercise.exercise_name,
            body_part: exercise.body_part,
            equipment: exercise.equipment,
            difficulty: exercise.difficulty,
            sets: scheme.sets,
            reps: scheme.reps.to_string(),
            rest_seconds: scheme.rest_seconds,
            weight: String::new(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarUser {
    pub username: String,
    pub goal: String,
    pub experience_level: String,
    pub equipment_access: String,
}

impl From<&UserProfileRecord> for SimilarUser {
    fn from(profile: &UserProfileRecord) -> Self {
        Self {
            username: profile.username.clone(),
            goal: profile.goal.clone(),
            experience_level: profile.experience_level.clone(),
            equipment_access: profile.equipment_access.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn squat() -> ExerciseRecommendation {
        ExerciseRecommendation::from(&ExerciseRecord {
            exercise_id: 10,
            exercise_name: "Back Squat".to_string(),
            body_part: "Legs".to_string(),
            equipment: "Barbell".to_string(),
            difficulty: "Intermediate".to_string(),
        })
    }

    #[test]
    fn test_meal_row_omits_unset_similarity() {
        let meal = MealRecommendation::from(&MealRecord {
            meal_id: 4,
            meal_name: "Lentil Curry".to_string(),
            meal_type: "dinner".to_string(),
            calories: 520.0,
            protein_g: 24.0,
            carbs_g: 70.0,
            fat_g: 12.0,
            dietary_tags: "vegan".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&meal).unwrap(),
            json!({
                "meal_id": 4,
                "meal_name": "Lentil Curry",
                "meal_type": "dinner",
                "calories": 520.0,
                "protein_g": 24.0,
                "carbs_g": 70.0,
                "fat_g": 12.0,
                "dietary_tags": "vegan"
            })
        );
    }

    #[test]
    fn test_similarity_score_is_serialized_when_set() {
        let mut exercise = squat();
        exercise.similarity_score = Some(0.5);

        let value = serde_json::to_value(&exercise).unwrap();
        assert_eq!(value["similarity_score"], json!(0.5));
    }

    #[test]
    fn test_plan_entry_shape() {
        let scheme = WorkoutScheme::for_goal("bulk");
        let entry = WorkoutPlanEntry::new(squat(), scheme);

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "exercise_id": 10,
                "exercise_name": "Back Squat",
                "body_part": "Legs",
                "equipment": "Barbell",
                "difficulty": "Intermediate",
                "sets": 4,
                "reps": "6-8",
                "rest_seconds": 180,
                "weight": "",
                "notes": ""
            })
        );
    }
}
