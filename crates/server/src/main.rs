//! Simple test harness for the recommendation engine.
//!
//! Loads a data directory (first argument, default `data`), builds the
//! engine and prints one answer of every operation for a sample profile.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use data_loader::DataIndex;
use models::{EngineConfig, SelfExclusion};
use pipeline::UserProfile;
use server::RecommendationEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug,pipeline=debug")),
        )
        .init();

    info!("Starting fitness engine test harness");

    let data_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "data".to_string()));
    info!("Loading data index from {:?}...", data_dir);

    // Loading and fitting are CPU-bound
    let engine = tokio::task::spawn_blocking(move || -> Result<RecommendationEngine> {
        let data_index = Arc::new(DataIndex::load_from_files(&data_dir)?);
        RecommendationEngine::build(data_index, EngineConfig::default())
    })
    .await
    .context("Engine build task panicked")??;
    let engine = Arc::new(engine);
    info!("Engine ready");

    let profile = UserProfile::new()
        .with_goal("bulk")
        .with_experience("intermediate")
        .with_equipment("home_gym");
    let mut rng = RecommendationEngine::clock_rng();

    let meals = engine.recommend_meals(&profile, 5, None, None, &mut rng)?;
    info!("Received {} meal recommendations:", meals.len());
    for (i, meal) in meals.iter().enumerate() {
        info!(
            "{}. {} [{}] - {:.0} kcal, {:.0} g protein",
            i + 1,
            meal.meal_name,
            meal.meal_type,
            meal.calories,
            meal.protein_g
        );
    }

    let plan = engine.workout_plan(&profile, &mut rng)?;
    info!("Workout plan with {} exercises:", plan.len());
    for (i, entry) in plan.iter().enumerate() {
        info!(
            "{}. {} ({}, {}) {}x{} rest {}s",
            i + 1,
            entry.exercise_name,
            entry.body_part,
            entry.equipment,
            entry.sets,
            entry.reps,
            entry.rest_seconds
        );
    }

    match engine.similar_users(&profile, 5, &SelfExclusion::FirstResult) {
        Ok(users) => {
            for user in users {
                info!("   similar user: {} ({}, {})", user.username, user.goal, user.experience_level);
            }
        }
        Err(err) => info!("Similar users unavailable [{}]: {}", err.kind(), err),
    }

    if let Some(first) = engine.data_index().profiles().first() {
        let suggestions = engine.progress_recommendations(first.user_id, 5, &mut rng)?;
        info!(
            "{} progress-based suggestions for user {}",
            suggestions.len(),
            first.user_id
        );
    }

    info!("Test harness done");
    Ok(())
}
