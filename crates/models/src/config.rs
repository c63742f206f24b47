//! Engine configuration.
//!
//! Every knob has the default the recommendation contracts are written
//! against; the `with_*` setters exist for tests and experiments.

use serde::{Deserialize, Serialize};

/// Build-time and request-time settings for the recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Vocabulary cap for the meal TF-IDF space
    pub meal_max_features: usize,
    /// Vocabulary cap for the exercise TF-IDF space
    pub exercise_max_features: usize,
    /// Upper bound on k; the actual k is `min(max_clusters, profiles)`
    pub max_clusters: usize,
    /// Seed for k-means initialization
    pub cluster_seed: u64,
    /// Independent k-means initializations; the lowest-inertia run wins
    pub cluster_restarts: usize,
    /// Lloyd iteration cap per initialization
    pub cluster_max_iter: usize,
    /// Shortlist size is `shortlist_factor * n` before sampling
    pub shortlist_factor: usize,

    pub default_meal_count: usize,
    pub default_exercise_count: usize,
    pub workout_plan_size: usize,
    pub default_similar_users: usize,
    pub default_progress_count: usize,
    /// Best logged exercises the progress recommender expands from
    pub progress_top_exercises: usize,
    /// Similar exercises fetched per top logged exercise
    pub progress_similar_per_exercise: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            meal_max_features: 1000,
            exercise_max_features: 500,
            max_clusters: 5,
            cluster_seed: 42,
            cluster_restarts: 10,
            cluster_max_iter: 300,
            shortlist_factor: 2,
            default_meal_count: 5,
            default_exercise_count: 8,
            workout_plan_size: 12,
            default_similar_users: 5,
            default_progress_count: 5,
            progress_top_exercises: 3,
            progress_similar_per_exercise: 2,
        }
    }
}

impl EngineConfig {
    /// Configure the meal vocabulary cap (default: 1000)
    pub fn with_meal_max_features(mut self, max: usize) -> Self {
        self.meal_max_features = max;
        self
    }

    /// Configure the exercise vocabulary cap (default: 500)
    pub fn with_exercise_max_features(mut self, max: usize) -> Self {
        self.exercise_max_features = max;
        self
    }

    /// Configure the cluster cap (default: 5)
    pub fn with_max_clusters(mut self, max: usize) -> Self {
        self.max_clusters = max;
        self
    }

    /// Configure the k-means seed (default: 42)
    pub fn with_cluster_seed(mut self, seed: u64) -> Self {
        self.cluster_seed = seed;
        self
    }

    /// Configure the shortlist factor (default: 2)
    pub fn with_shortlist_factor(mut self, factor: usize) -> Self {
        self.shortlist_factor = factor.max(1);
        self
    }
}
