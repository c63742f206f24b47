//! End-to-end tests: CSV directory -> engine -> requests -> saved artifacts.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use data_loader::DataIndex;
use models::{EngineConfig, ModelArtifacts, SelfExclusion};
use pipeline::UserProfile;
use rand::SeedableRng;
use rand::rngs::StdRng;
use server::RecommendationEngine;

const MEALS: &str = "\
meal_id,meal_name,meal_type,calories,protein_g,carbs_g,fat_g,dietary_tags
1,Veggie Omelette,breakfast,410,28,8,26,vegetarian
2,Overnight Oats,breakfast,460,14,72,11,vegan
3,Turkey Wrap,lunch,530,38,45,18,high-protein
4,Chickpea Salad,lunch,390,16,48,14,vegan
5,Beef Stir Fry,dinner,690,48,52,28,high-protein
6,Baked Cod,dinner,450,42,30,12,gluten-free
7,Trail Mix,snack,n/a,9,25,19,vegan
";

const EXERCISES: &str = "\
exercise_id,exercise_name,body_part,equipment,difficulty
20,Front Squat,Legs,Barbell,Advanced
21,Walking Lunge,Legs,Bodyweight,Beginner
22,Dumbbell Row,Back,Dumbbell,Beginner
23,Pull Up,Back,Bodyweight,Intermediate
24,Incline Press,Chest,Dumbbell,Intermediate
25,Dead Bug,Core,Bodyweight,Beginner
26,Burpee,Full Body,Bodyweight,Intermediate
";

const PROFILES: &str = "\
user_id,username,goal,experience_level,equipment_access,gender,age,height_cm,initial_weight_kg,goal_weight_kg
1,maya,cut,beginner,bodyweight,female,31,163,72,64
2,omar,bulk,advanced,full_gym,male,27,185,80,90
3,lena,maintain,intermediate,home_gym,female,45,168,61,61
4,raj,bulk,beginner,full_gym,male,22,174,66,75
";

const WORKOUT_LOGS: &str = "\
user_id,exercise_id,log_date,weight_kg,reps_completed
2,20,2024-02-01,120,5
2,20,2024-02-04,125,4
2,24,2024-02-02,30,10
2,99,2024-02-03,500,1
";

fn write_dataset(dir: &Path) {
    fs::write(dir.join("meals.csv"), MEALS).unwrap();
    fs::write(dir.join("exercises.csv"), EXERCISES).unwrap();
    fs::write(dir.join("profiles.csv"), PROFILES).unwrap();
    fs::write(dir.join("workout_logs.csv"), WORKOUT_LOGS).unwrap();
}

fn build_engine(dir: &Path) -> RecommendationEngine {
    let index = Arc::new(DataIndex::load_from_files(dir).unwrap());
    RecommendationEngine::build(index, EngineConfig::default()).unwrap()
}

#[test]
fn test_unparseable_calories_become_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let engine = build_engine(dir.path());

    let trail_mix = engine.data_index().get_meal(7).unwrap();
    assert_eq!(trail_mix.calories, 0.0);
    assert_eq!(trail_mix.combined_features(), "Trail Mix snack vegan");
}

#[test]
fn test_bodyweight_user_gets_bodyweight_work() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let engine = build_engine(dir.path());
    let profile = UserProfile::new()
        .with_equipment("bodyweight")
        .with_experience("intermediate");

    for seed in 0..5 {
        let mut rng = StdRng::seed_from_u64(seed);
        let picked = engine.recommend_exercises(&profile, 3, None, &mut rng).unwrap();
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|e| e.equipment == "Bodyweight" || e.equipment == "Other"));
    }
}

#[test]
fn test_progress_ignores_unknown_exercises() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let engine = build_engine(dir.path());
    let mut rng = StdRng::seed_from_u64(0);

    let suggestions = engine.progress_recommendations(2, 10, &mut rng).unwrap();
    // exercise 99 is not in the catalog: two groups, two suggestions each
    assert_eq!(suggestions.len(), 4);
    assert!(suggestions.iter().all(|s| s.exercise_id != 99));
}

#[test]
fn test_persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let engine = build_engine(dir.path());
    let path = dir.path().join("models").join("engine.json");

    engine.save_artifacts(&path).unwrap();
    let loaded = ModelArtifacts::load_from_path(&path).unwrap().unwrap();
    assert_eq!(loaded, engine.artifacts());

    let restored = RecommendationEngine::from_artifacts(
        engine.data_index().clone(),
        EngineConfig::default(),
        loaded,
    )
    .unwrap();
    assert_eq!(restored.meal_index().matrix, engine.meal_index().matrix);
    assert_eq!(restored.exercise_index().matrix, engine.exercise_index().matrix);
    assert_eq!(restored.users().assignments(), engine.users().assignments());
    assert_eq!(restored.similar_meals(2, 3), engine.similar_meals(2, 3));
}

#[test]
fn test_load_or_build_creates_then_reuses_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let index = Arc::new(DataIndex::load_from_files(dir.path()).unwrap());
    let path = dir.path().join("engine.json");

    assert!(ModelArtifacts::load_from_path(&path).unwrap().is_none());
    let built =
        RecommendationEngine::load_or_build(index.clone(), EngineConfig::default(), &path).unwrap();
    assert!(path.exists());

    let reused = RecommendationEngine::load_or_build(index, EngineConfig::default(), &path).unwrap();
    assert_eq!(reused.artifacts(), built.artifacts());
}

#[test]
fn test_artifacts_for_other_catalog_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let engine = build_engine(dir.path());
    let artifacts = engine.artifacts();

    fs::write(
        dir.path().join("exercises.csv"),
        "exercise_id,exercise_name,body_part,equipment,difficulty\n30,Row,Back,Cable,Beginner\n",
    )
    .unwrap();
    let smaller = Arc::new(DataIndex::load_from_files(dir.path()).unwrap());

    assert!(RecommendationEngine::from_artifacts(smaller, EngineConfig::default(), artifacts).is_err());
}

#[test]
fn test_concurrent_requests_share_engine() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path());
    let engine = Arc::new(build_engine(dir.path()));

    let handles: Vec<_> = (0..4)
        .map(|seed| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                let profile = UserProfile::new().with_goal("bulk");
                let meals = engine.recommend_meals(&profile, 2, None, None, &mut rng).unwrap();
                let users = engine
                    .similar_users(&profile, 2, &SelfExclusion::FirstResult)
                    .unwrap();
                (meals.len(), users.len())
            })
        })
        .collect();

    for handle in handles {
        let (meals, users) = handle.join().unwrap();
        assert!(meals >= 1 && meals <= 2);
        assert_eq!(users, 2);
    }
}
