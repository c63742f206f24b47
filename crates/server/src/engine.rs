//! # Recommendation Engine
//!
//! Owns every structure fitted at startup and answers requests against them:
//! 1. Meal and exercise recommendations (filter -> fallback -> score -> sample)
//! 2. Workout plans built on the exercise recommendations
//! 3. Similar meals, similar exercises and similar users
//! 4. Progress-based exercise suggestions from workout history
//!
//! The engine is built once and shared as `Arc<RecommendationEngine>`.
//! Requests only read it; the one mutable piece, the random source, is
//! passed in per call.

use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

use data_loader::{DataIndex, ExerciseId, ExerciseRecord, MealId, MealRecord, UserId};
use models::{
    EngineConfig, ModelArtifacts, ModelError, ProfileValues, SelfExclusion, SimilarityIndex,
    UserClusterer,
};
use pipeline::{
    Candidate, ExerciseScorer, FilterPipeline, MealScorer, RequestContext, UserProfile,
    WorkoutScheme, aggregate_progress, exercise_pipeline, meal_pipeline, score_all,
    shortlist_then_sample, top_progress,
};

use crate::error::RecommendationError;
use crate::recommendation::{
    ExerciseRecommendation, MealRecommendation, SimilarUser, WorkoutPlanEntry,
};

type RequestResult<T> = std::result::Result<T, RecommendationError>;

/// Shared, read-only recommendation state
pub struct RecommendationEngine {
    data_index: Arc<DataIndex>,
    config: EngineConfig,
    meals: SimilarityIndex,
    exercises: SimilarityIndex,
    users: UserClusterer,
    meal_pipeline: FilterPipeline<MealRecord>,
    exercise_pipeline: FilterPipeline<ExerciseRecord>,
}

impl RecommendationEngine {
    /// Fit every model from the tables.
    ///
    /// The two similarity indices and the user clusterer are independent and
    /// are built in parallel.
    pub fn build(data_index: Arc<DataIndex>, config: EngineConfig) -> Result<Self> {
        let start = Instant::now();
        let (meal_count, exercise_count, profile_count, _, _) = data_index.counts();
        info!(
            "Building engine over {} meals, {} exercises, {} profiles",
            meal_count, exercise_count, profile_count
        );

        let meal_texts: Vec<String> = data_index
            .meals()
            .iter()
            .map(MealRecord::combined_features)
            .collect();
        let exercise_texts: Vec<String> = data_index
            .exercises()
            .iter()
            .map(ExerciseRecord::combined_features)
            .collect();

        let ((meals, exercises), users) = rayon::join(
            || {
                rayon::join(
                    || SimilarityIndex::build(&meal_texts, config.meal_max_features),
                    || SimilarityIndex::build(&exercise_texts, config.exercise_max_features),
                )
            },
            || UserClusterer::build(data_index.profiles(), &config),
        );
        let users = users.context("Failed to cluster user profiles")?;

        info!("Engine built in {:.2?}", start.elapsed());
        Ok(Self::assemble(data_index, config, meals, exercises, users))
    }

    /// Restore an engine from saved artifacts without refitting.
    ///
    /// The artifacts must have been saved from the same tables.
    pub fn from_artifacts(
        data_index: Arc<DataIndex>,
        config: EngineConfig,
        artifacts: ModelArtifacts,
    ) -> Result<Self> {
        let meals = artifacts.meal_index();
        let exercises = artifacts.exercise_index();
        check_size("meal", meals.matrix.len(), data_index.meals().len())?;
        check_size(
            "exercise",
            exercises.matrix.len(),
            data_index.exercises().len(),
        )?;

        let users = UserClusterer::from_parts(
            artifacts.label_encoders,
            artifacts.scaler,
            artifacts.user_clusters,
            data_index.profiles(),
        )
        .context("Saved user clusters do not match the profile table")?;

        info!("Engine restored from artifacts");
        Ok(Self::assemble(data_index, config, meals, exercises, users))
    }

    /// Load artifacts from `path` if present, otherwise build and save them
    pub fn load_or_build(
        data_index: Arc<DataIndex>,
        config: EngineConfig,
        path: &Path,
    ) -> Result<Self> {
        let saved = ModelArtifacts::load_from_path(path)
            .with_context(|| format!("Failed to read model artifacts from {}", path.display()))?;
        match saved {
            Some(artifacts) => Self::from_artifacts(data_index, config, artifacts),
            None => {
                info!("No artifacts at {:?}, building from scratch", path);
                let engine = Self::build(data_index, config)?;
                engine.save_artifacts(path)?;
                Ok(engine)
            }
        }
    }

    fn assemble(
        data_index: Arc<DataIndex>,
        config: EngineConfig,
        meals: SimilarityIndex,
        exercises: SimilarityIndex,
        users: UserClusterer,
    ) -> Self {
        Self {
            data_index,
            config,
            meals,
            exercises,
            users,
            meal_pipeline: meal_pipeline(),
            exercise_pipeline: exercise_pipeline(),
        }
    }

    /// Snapshot of every fitted structure
    pub fn artifacts(&self) -> ModelArtifacts {
        ModelArtifacts::from_models(&self.meals, &self.exercises, &self.users)
    }

    pub fn save_artifacts(&self, path: &Path) -> Result<()> {
        self.artifacts()
            .save_to_path(path)
            .with_context(|| format!("Failed to save model artifacts to {}", path.display()))
    }

    /// Fresh random source for one request, seeded from the wall clock
    /// (milliseconds mod 1,000,000). Two calls in the same millisecond draw
    /// the same numbers.
    pub fn clock_rng() -> StdRng {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        StdRng::seed_from_u64(seed_from_millis(millis))
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn meal_index(&self) -> &SimilarityIndex {
        &self.meals
    }

    pub fn exercise_index(&self) -> &SimilarityIndex {
        &self.exercises
    }

    pub fn users(&self) -> &UserClusterer {
        &self.users
    }

    // =========================================================================
    // Meals
    // =========================================================================

    /// Up to `n` meals for the profile.
    ///
    /// `meal_type` and `dietary_preference` narrow the catalog when given;
    /// the calorie band always applies. See the meal filters for the
    /// fallback taken by each stage.
    #[instrument(skip(self, profile, rng), fields(goal = profile.goal()))]
    pub fn recommend_meals<R: Rng + ?Sized>(
        &self,
        profile: &UserProfile,
        n: usize,
        meal_type: Option<&str>,
        dietary_preference: Option<&str>,
        rng: &mut R,
    ) -> RequestResult<Vec<MealRecommendation>> {
        let start = Instant::now();
        let context = RequestContext::new(profile.clone())
            .with_meal_type(meal_type.map(str::to_string))
            .with_dietary_preference(dietary_preference.map(str::to_string));

        let mut eligible = self
            .meal_pipeline
            .apply(self.data_index.meals(), &context)
            .context("Failed to filter meals")?;
        score_all(&mut eligible, &MealScorer, &context);

        let picked = shortlist_then_sample(eligible, n, self.config.shortlist_factor, rng);
        debug!("Recommended {} meals in {:.2?}", picked.len(), start.elapsed());
        Ok(picked.iter().map(|c| MealRecommendation::from(c.item)).collect())
    }

    /// Meals most similar to `meal_id`, most similar first; empty for an
    /// unknown id
    pub fn similar_meals(&self, meal_id: MealId, n: usize) -> Vec<MealRecommendation> {
        let Some(position) = self.data_index.meal_position(meal_id) else {
            return Vec::new();
        };
        let meals = self.data_index.meals();
        self.meals
            .most_similar(position, n)
            .into_iter()
            .map(|(row, score)| MealRecommendation {
                similarity_score: Some(score),
                ..MealRecommendation::from(&meals[row])
            })
            .collect()
    }

    /// One random meal whose tags contain the preference (any case).
    ///
    /// "all" draws from the whole catalog, as does a preference nothing
    /// matches. `None` only for an empty catalog.
    pub fn quick_meal<R: Rng + ?Sized>(
        &self,
        diet_preference: &str,
        rng: &mut R,
    ) -> Option<MealRecommendation> {
        let meals = self.data_index.meals();
        let wanted = diet_preference.to_lowercase();
        let matching: Vec<&MealRecord> = if wanted == "all" {
            Vec::new()
        } else {
            meals
                .iter()
                .filter(|m| m.dietary_tags.to_lowercase().contains(&wanted))
                .collect()
        };

        let picked = if matching.is_empty() {
            meals.choose(rng)
        } else {
            matching.choose(rng).copied()
        };
        picked.map(MealRecommendation::from)
    }

    // =========================================================================
    // Exercises
    // =========================================================================

    /// Up to `n` exercises for the profile, optionally for one body part
    #[instrument(skip(self, profile, rng), fields(goal = profile.goal()))]
    pub fn recommend_exercises<R: Rng + ?Sized>(
        &self,
        profile: &UserProfile,
        n: usize,
        body_part: Option<&str>,
        rng: &mut R,
    ) -> RequestResult<Vec<ExerciseRecommendation>> {
        let start = Instant::now();
        let context = RequestContext::new(profile.clone())
            .with_body_part(body_part.map(str::to_string));

        let mut eligible = self
            .exercise_pipeline
            .apply(self.data_index.exercises(), &context)
            .context("Failed to filter exercises")?;
        score_all(&mut eligible, &ExerciseScorer, &context);

        let picked = shortlist_then_sample(eligible, n, self.config.shortlist_factor, rng);
        debug!(
            "Recommended {} exercises in {:.2?}",
            picked.len(),
            start.elapsed()
        );
        Ok(to_exercises(&picked))
    }

    /// A plan of `workout_plan_size` exercises sharing the goal's scheme
    pub fn workout_plan<R: Rng + ?Sized>(
        &self,
        profile: &UserProfile,
        rng: &mut R,
    ) -> RequestResult<Vec<WorkoutPlanEntry>> {
        let scheme = WorkoutScheme::for_goal(profile.goal());
        let exercises =
            self.recommend_exercises(profile, self.config.workout_plan_size, None, rng)?;
        Ok(exercises
            .into_iter()
            .map(|e| WorkoutPlanEntry::new(e, scheme))
            .collect())
    }

    /// Exercises most similar to `exercise_id`, most similar first; empty
    /// for an unknown id
    pub fn similar_exercises(&self, exercise_id: ExerciseId, n: usize) -> Vec<ExerciseRecommendation> {
        let Some(position) = self.data_index.exercise_position(exercise_id) else {
            return Vec::new();
        };
        let exercises = self.data_index.exercises();
        self.exercises
            .most_similar(position, n)
            .into_iter()
            .map(|(row, score)| ExerciseRecommendation {
                similarity_score: Some(score),
                ..ExerciseRecommendation::from(&exercises[row])
            })
            .collect()
    }

    /// Suggestions grown from the user's strongest logged exercises.
    ///
    /// Logs are grouped per exercise and ranked by progress score; the top
    /// groups each contribute their most similar exercises, and the
    /// concatenation is cut to `n`. A user with no logs gets plain exercise
    /// recommendations for an empty profile instead. Logged exercises missing
    /// from the catalog are ignored.
    #[instrument(skip(self, rng))]
    pub fn progress_recommendations<R: Rng + ?Sized>(
        &self,
        user_id: UserId,
        n: usize,
        rng: &mut R,
    ) -> RequestResult<Vec<ExerciseRecommendation>> {
        let logs = self.data_index.get_user_workout_logs(user_id);
        if logs.is_empty() {
            debug!("User {} has no workout history, using defaults", user_id);
            return self.recommend_exercises(&UserProfile::default(), n, None, rng);
        }

        let progress = aggregate_progress(logs, |id| {
            self.data_index.exercise_position(id).is_some()
        });
        let best = top_progress(progress, self.config.progress_top_exercises);

        let mut suggestions: Vec<ExerciseRecommendation> = best
            .iter()
            .flat_map(|p| {
                self.similar_exercises(p.exercise_id, self.config.progress_similar_per_exercise)
            })
            .collect();
        suggestions.truncate(n);
        Ok(suggestions)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Stored users closest to the profile in the standardized feature space.
    ///
    /// The profile is encoded with the fit-time encoders and scaler; a
    /// categorical value they never saw is an `UnknownCategory` error.
    #[instrument(skip(self, profile))]
    pub fn similar_users(
        &self,
        profile: &UserProfile,
        n: usize,
        exclusion: &SelfExclusion,
    ) -> RequestResult<Vec<SimilarUser>> {
        let values = ProfileValues {
            goal: profile.goal(),
            experience_level: profile.experience_level(),
            equipment_access: profile.equipment_access(),
            gender: profile.gender(),
            age: profile.age(),
            height_cm: profile.height_cm(),
            weight_kg: profile.weight(),
        };
        let neighbors = self
            .users
            .nearest(values, n, exclusion)
            .map_err(RecommendationError::from)?;

        let profiles = self.data_index.profiles();
        Ok(neighbors
            .into_iter()
            .map(|(row, _)| SimilarUser::from(&profiles[row]))
            .collect())
    }

    /// Cluster of a stored user, from the fit-time assignment
    pub fn cluster_of(&self, username: &str) -> Option<usize> {
        self.users.cluster_of(username)
    }

    /// Stored users sharing a cluster, in profile order
    pub fn cluster_members(&self, cluster: usize) -> Vec<SimilarUser> {
        let members = self.users.cluster_members(cluster);
        self.data_index
            .profiles()
            .iter()
            .filter(|p| members.contains(&p.username.as_str()))
            .map(SimilarUser::from)
            .collect()
    }
}

fn to_exercises(candidates: &[Candidate<'_, ExerciseRecord>]) -> Vec<ExerciseRecommendation> {
    candidates
        .iter()
        .map(|c| ExerciseRecommendation::from(c.item))
        .collect()
}

fn check_size(catalog: &str, saved: usize, loaded: usize) -> Result<()> {
    if saved == loaded {
        Ok(())
    } else {
        Err(ModelError::ArtifactMismatch(format!(
            "saved {catalog} similarity covers {saved} rows, catalog has {loaded}"
        ))
        .into())
    }
}

/// Seed for a wall-clock time in milliseconds since the epoch
fn seed_from_millis(millis: u128) -> u64 {
    (millis % 1_000_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sample_index;
    use std::collections::HashSet;

    fn engine() -> RecommendationEngine {
        RecommendationEngine::build(Arc::new(sample_index()), EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_seed_wraps_at_a_million_millis() {
        assert_eq!(seed_from_millis(0), 0);
        assert_eq!(seed_from_millis(999_999), 999_999);
        assert_eq!(seed_from_millis(1_000_000), 0);
        assert_eq!(seed_from_millis(1_700_000_123_456), 123_456);
    }

    #[test]
    fn test_same_millisecond_draws_the_same() {
        let mut a = StdRng::seed_from_u64(seed_from_millis(1_700_000_123_456));
        let mut b = StdRng::seed_from_u64(seed_from_millis(1_700_000_123_456));
        let engine = engine();
        let profile = UserProfile::new().with_goal("bulk").with_experience("advanced");

        let first = engine.recommend_exercises(&profile, 3, None, &mut a).unwrap();
        let second = engine.recommend_exercises(&profile, 3, None, &mut b).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RecommendationEngine>();
    }

    #[test]
    fn test_breakfast_meals_stay_breakfast() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(1);
        let meals = engine
            .recommend_meals(&UserProfile::new(), 5, Some("breakfast"), Some("all"), &mut rng)
            .unwrap();

        assert!(!meals.is_empty());
        assert!(meals.iter().all(|m| m.meal_type.eq_ignore_ascii_case("breakfast")));
    }

    #[test]
    fn test_profile_diet_steers_meal_scores() {
        let engine = engine();
        let profile = UserProfile::new().with_diet("vegan");
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let meals = engine.recommend_meals(&profile, 1, None, None, &mut rng).unwrap();

            // four maintain-band meals; the two vegan ones make the shortlist
            assert_eq!(meals.len(), 1);
            assert!([4, 8].contains(&meals[0].meal_id));
        }
    }

    #[test]
    fn test_large_pool_gives_exactly_n_distinct() {
        let engine = engine();
        let profile = UserProfile::new().with_goal("bulk").with_experience("advanced");
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let exercises = engine.recommend_exercises(&profile, 3, None, &mut rng).unwrap();
            let ids: HashSet<u32> = exercises.iter().map(|e| e.exercise_id).collect();
            assert_eq!(exercises.len(), 3);
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn test_workout_plan_uses_goal_scheme() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(5);
        let plan = engine
            .workout_plan(&UserProfile::new().with_goal("cut"), &mut rng)
            .unwrap();

        assert!(!plan.is_empty() && plan.len() <= 12);
        for entry in &plan {
            assert_eq!((entry.sets, entry.reps.as_str(), entry.rest_seconds), (3, "12-15", 90));
            assert!(entry.weight.is_empty() && entry.notes.is_empty());
        }
    }

    #[test]
    fn test_similar_exercises_exclude_self() {
        let engine = engine();
        let similar = engine.similar_exercises(10, 4);

        assert_eq!(similar.len(), 4);
        assert!(similar.iter().all(|e| e.exercise_id != 10));
        let scores: Vec<f64> = similar.iter().filter_map(|e| e.similarity_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(engine.similar_exercises(9999, 4).is_empty());
    }

    #[test]
    fn test_similar_meals_unknown_id_is_empty() {
        let engine = engine();
        assert!(engine.similar_meals(424242, 3).is_empty());
        assert_eq!(engine.similar_meals(1, 3).len(), 3);
    }

    #[test]
    fn test_progress_from_history() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(9);
        let suggestions = engine.progress_recommendations(1, 5, &mut rng).unwrap();

        // two logged exercises, two similar each
        assert_eq!(suggestions.len(), 4);
        assert!(suggestions.iter().all(|s| s.similarity_score.is_some()));
    }

    #[test]
    fn test_progress_without_history_falls_back() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(9);
        let suggestions = engine.progress_recommendations(777, 5, &mut rng).unwrap();

        assert!(!suggestions.is_empty());
        assert!(suggestions.iter().all(|s| s.similarity_score.is_none()));
        // default profile: full gym, beginner
        assert!(suggestions.iter().all(|s| s.difficulty == "Beginner"));
    }

    #[test]
    fn test_similar_users_positional_and_by_name() {
        let engine = engine();
        let profile = UserProfile {
            username: Some("alice".to_string()),
            goal: Some("cut".to_string()),
            experience_level: Some("beginner".to_string()),
            equipment_access: Some("home_gym".to_string()),
            gender: Some("female".to_string()),
            age: Some(29.0),
            height_cm: Some(165.0),
            weight: Some(70.0),
            diet_preference: None,
        };

        let positional = engine
            .similar_users(&profile, 2, &SelfExclusion::FirstResult)
            .unwrap();
        assert_eq!(positional.len(), 2);
        assert!(positional.iter().all(|u| u.username != "alice"));

        let by_name = engine
            .similar_users(&profile, 2, &SelfExclusion::ByUsername("alice".to_string()))
            .unwrap();
        assert_eq!(by_name, positional);
    }

    #[test]
    fn test_similar_users_unknown_category() {
        let engine = engine();
        let profile = UserProfile::new().with_goal("recomp");
        let err = engine
            .similar_users(&profile, 3, &SelfExclusion::FirstResult)
            .unwrap_err();

        assert_eq!(err.kind(), "unknown_category");
        assert!(err.to_string().contains("recomp"));
    }

    #[test]
    fn test_quick_meal_matches_diet() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..10 {
            let meal = engine.quick_meal("VEGAN", &mut rng).unwrap();
            assert!(meal.dietary_tags.to_lowercase().contains("vegan"));
        }
        assert!(engine.quick_meal("carnivore", &mut rng).is_some());
    }

    #[test]
    fn test_cluster_lookup() {
        let engine = engine();
        let cluster = engine.cluster_of("bob").unwrap();
        let members = engine.cluster_members(cluster);
        assert!(members.iter().any(|m| m.username == "bob"));
        assert!(engine.cluster_of("nobody").is_none());
    }
}
