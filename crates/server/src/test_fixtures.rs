//! Small in-memory dataset shared by the unit tests.

use data_loader::{
    DataIndex, ExerciseRecord, MealRecord, ProgressLogEntry, UserProfileRecord, WorkoutLogEntry,
};

fn meal(
    meal_id: u32,
    meal_name: &str,
    meal_type: &str,
    macros: (f64, f64, f64, f64),
    dietary_tags: &str,
) -> MealRecord {
    let (calories, protein_g, carbs_g, fat_g) = macros;
    MealRecord {
        meal_id,
        meal_name: meal_name.to_string(),
        meal_type: meal_type.to_string(),
        calories,
        protein_g,
        carbs_g,
        fat_g,
        dietary_tags: dietary_tags.to_string(),
    }
}

fn exercise(
    exercise_id: u32,
    exercise_name: &str,
    body_part: &str,
    equipment: &str,
    difficulty: &str,
) -> ExerciseRecord {
    ExerciseRecord {
        exercise_id,
        exercise_name: exercise_name.to_string(),
        body_part: body_part.to_string(),
        equipment: equipment.to_string(),
        difficulty: difficulty.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    user_id: u32,
    username: &str,
    goal: &str,
    experience_level: &str,
    equipment_access: &str,
    gender: &str,
    body: (f64, f64, f64, f64),
) -> UserProfileRecord {
    let (age, height_cm, initial_weight_kg, goal_weight_kg) = body;
    UserProfileRecord {
        user_id,
        username: username.to_string(),
        goal: goal.to_string(),
        experience_level: experience_level.to_string(),
        equipment_access: equipment_access.to_string(),
        gender: gender.to_string(),
        age,
        height_cm,
        initial_weight_kg,
        goal_weight_kg,
    }
}

fn workout(user_id: u32, exercise_id: u32, weight_kg: f64, reps_completed: f64) -> WorkoutLogEntry {
    WorkoutLogEntry {
        user_id,
        exercise_id,
        log_date: "2024-04-02".to_string(),
        weight_kg,
        reps_completed,
    }
}

pub fn sample_index() -> DataIndex {
    let meals = vec![
        meal(1, "Greek Yogurt Parfait", "breakfast", (420.0, 25.0, 50.0, 10.0), "vegetarian"),
        meal(2, "Tofu Scramble", "breakfast", (380.0, 22.0, 15.0, 18.0), "vegan, gluten-free"),
        meal(3, "Chicken Rice Bowl", "lunch", (650.0, 45.0, 70.0, 15.0), "high-protein"),
        meal(4, "Lentil Curry", "dinner", (520.0, 24.0, 70.0, 12.0), "vegan"),
        meal(5, "Salmon Quinoa", "dinner", (580.0, 40.0, 45.0, 20.0), "gluten-free, high-protein"),
        meal(6, "Protein Shake", "snack", (300.0, 35.0, 20.0, 5.0), "vegetarian"),
        meal(7, "Steak and Potatoes", "dinner", (780.0, 55.0, 60.0, 30.0), "high-protein"),
        meal(8, "Oatmeal Bowl", "Breakfast", (450.0, 12.0, 70.0, 9.0), "vegan"),
    ];
    let exercises = vec![
        exercise(10, "Barbell Back Squat", "Legs", "Barbell", "Intermediate"),
        exercise(11, "Goblet Squat", "Legs", "Dumbbell", "Beginner"),
        exercise(12, "Push Up", "Chest", "Bodyweight", "Beginner"),
        exercise(13, "Bench Press", "Chest", "Barbell", "Intermediate"),
        exercise(14, "Plank", "Core", "Bodyweight", "Beginner"),
        exercise(15, "Kettlebell Swing", "Full Body", "Kettlebell", "Intermediate"),
        exercise(16, "Deadlift", "Back", "Barbell", "Advanced"),
        exercise(17, "Lat Pulldown", "Back", "Machine", "Beginner"),
        exercise(18, "Cable Row", "Back", "Cable", "Beginner"),
    ];
    let profiles = vec![
        profile(1, "alice", "cut", "beginner", "home_gym", "female", (29.0, 165.0, 70.0, 62.0)),
        profile(2, "bob", "bulk", "intermediate", "full_gym", "male", (24.0, 182.0, 75.0, 85.0)),
        profile(3, "carol", "maintain", "advanced", "full_gym", "female", (35.0, 170.0, 63.0, 63.0)),
        profile(4, "dan", "bulk", "beginner", "bodyweight", "male", (19.0, 176.0, 68.0, 78.0)),
        profile(5, "erin", "cut", "intermediate", "home_gym", "female", (41.0, 160.0, 80.0, 68.0)),
        profile(6, "frank", "maintain", "beginner", "full_gym", "male", (52.0, 178.0, 90.0, 85.0)),
    ];
    let workout_logs = vec![
        workout(1, 11, 20.0, 12.0),
        workout(1, 11, 22.5, 10.0),
        workout(1, 14, 0.0, 60.0),
        workout(2, 10, 100.0, 5.0),
    ];
    let progress_logs = vec![ProgressLogEntry {
        user_id: 1,
        log_date: "2024-04-02".to_string(),
        weight_kg: 69.2,
        body_fat_percent: 27.5,
    }];

    DataIndex::from_tables(meals, exercises, profiles, workout_logs, progress_logs)
}
