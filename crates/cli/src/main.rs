use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, ExerciseId, MealId, UserId};
use models::{EngineConfig, SelfExclusion};
use pipeline::UserProfile;
use rand::seq::IndexedRandom;
use server::{ExerciseRecommendation, MealRecommendation, RecommendationEngine, SimilarUser};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// FitRec - Meal and Workout Recommendation Engine
#[derive(Parser)]
#[command(name = "fitrec")]
#[command(about = "Content-based meal and exercise recommendations with user clustering", long_about = None)]
struct Cli {
    /// Directory holding meals.csv, exercises.csv, profiles.csv and the log tables
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Model artifact file; loaded when present, written after a fresh build
    #[arg(short, long)]
    models: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Request profile flags shared by the profile-driven commands
#[derive(Args, Clone)]
struct ProfileArgs {
    /// Start from a stored user's profile
    #[arg(long)]
    username: Option<String>,

    /// bulk, cut or maintain
    #[arg(long)]
    goal: Option<String>,

    /// beginner, intermediate or advanced
    #[arg(long)]
    experience: Option<String>,

    /// bodyweight, home_gym or full_gym
    #[arg(long)]
    equipment: Option<String>,

    #[arg(long)]
    gender: Option<String>,

    #[arg(long)]
    age: Option<f64>,

    #[arg(long)]
    height_cm: Option<f64>,

    #[arg(long)]
    weight: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend meals for a profile
    Meals {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Breakfast, lunch, dinner or snack
        #[arg(long)]
        meal_type: Option<String>,

        /// Dietary tag to require, or "all"
        #[arg(long)]
        diet: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Recommend exercises for a profile
    Exercises {
        #[command(flatten)]
        profile: ProfileArgs,

        #[arg(long)]
        body_part: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Generate a workout plan with sets, reps and rest
    Plan {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Find stored users with similar profiles
    SimilarUsers {
        #[command(flatten)]
        profile: ProfileArgs,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Suggest exercises based on a user's workout history
    Progress {
        #[arg(long)]
        user_id: UserId,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the meals most similar to a meal
    SimilarMeals {
        #[arg(long)]
        meal_id: MealId,

        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Show the exercises most similar to an exercise
    SimilarExercises {
        #[arg(long)]
        exercise_id: ExerciseId,

        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Pick one random meal for a diet
    QuickMeal {
        #[arg(long, default_value = "all")]
        diet: String,
    },

    /// Show a user's cluster and its members
    Cluster {
        #[arg(long)]
        username: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading fitness dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_dir = cli.data_dir.clone();
    let models_path = cli.models.clone();
    // CSV parsing and model fitting are CPU-bound
    let engine = tokio::task::spawn_blocking(move || -> Result<RecommendationEngine> {
        let data_index = Arc::new(
            DataIndex::load_from_files(&data_dir).context("Failed to load fitness dataset")?,
        );
        let config = EngineConfig::default();
        match models_path {
            Some(path) => {
                info!("Using model artifacts at {:?}", path);
                RecommendationEngine::load_or_build(data_index, config, &path)
            }
            None => {
                info!("No artifact path given, fitting models in memory");
                RecommendationEngine::build(data_index, config)
            }
        }
    })
    .await
    .context("Engine build task panicked")??;
    let engine = Arc::new(engine);
    println!("{} Engine ready in {:?}", "✓".green(), start.elapsed());

    let config = engine.config().clone();
    let mut rng = RecommendationEngine::clock_rng();

    match cli.command {
        Commands::Meals {
            profile,
            meal_type,
            diet,
            limit,
        } => {
            let profile = meal_profile(&engine, &profile, diet.as_deref())?;
            let meals = engine.recommend_meals(
                &profile,
                limit.unwrap_or(config.default_meal_count),
                meal_type.as_deref(),
                diet.as_deref(),
                &mut rng,
            )?;
            print_meals("Meal Recommendations:", &meals);
        }
        Commands::Exercises {
            profile,
            body_part,
            limit,
        } => {
            let profile = resolve_profile(&engine, &profile)?;
            let exercises = engine.recommend_exercises(
                &profile,
                limit.unwrap_or(config.default_exercise_count),
                body_part.as_deref(),
                &mut rng,
            )?;
            print_exercises("Exercise Recommendations:", &exercises);
        }
        Commands::Plan { profile } => {
            let profile = resolve_profile(&engine, &profile)?;
            let plan = engine.workout_plan(&profile, &mut rng)?;
            println!("{}", format!("Workout Plan ({}):", profile.goal()).bold().blue());
            for (i, entry) in plan.iter().enumerate() {
                println!(
                    "{}. {} [{}, {}] {} x {} - rest {}s",
                    (i + 1).to_string().green(),
                    entry.exercise_name,
                    entry.body_part,
                    entry.equipment,
                    entry.sets,
                    entry.reps,
                    entry.rest_seconds
                );
            }
        }
        Commands::SimilarUsers { profile, limit } => {
            let exclusion = match &profile.username {
                Some(name) => SelfExclusion::ByUsername(name.clone()),
                None => SelfExclusion::FirstResult,
            };
            let profile = resolve_profile(&engine, &profile)?;
            let users = engine.similar_users(
                &profile,
                limit.unwrap_or(config.default_similar_users),
                &exclusion,
            )?;
            print_users("Similar Users:", &users);
        }
        Commands::Progress { user_id, limit } => {
            let exercises = engine.progress_recommendations(
                user_id,
                limit.unwrap_or(config.default_progress_count),
                &mut rng,
            )?;
            print_exercises(&format!("Next Steps for User {}:", user_id), &exercises);
        }
        Commands::SimilarMeals { meal_id, limit } => {
            let meal = engine
                .data_index()
                .get_meal(meal_id)
                .ok_or_else(|| anyhow!("Meal {} not found", meal_id))?;
            let similar = engine.similar_meals(meal_id, limit);
            print_meals(&format!("Meals similar to {}:", meal.meal_name), &similar);
        }
        Commands::SimilarExercises { exercise_id, limit } => {
            let exercise = engine
                .data_index()
                .get_exercise(exercise_id)
                .ok_or_else(|| anyhow!("Exercise {} not found", exercise_id))?;
            let similar = engine.similar_exercises(exercise_id, limit);
            print_exercises(
                &format!("Exercises similar to {}:", exercise.exercise_name),
                &similar,
            );
        }
        Commands::QuickMeal { diet } => match engine.quick_meal(&diet, &mut rng) {
            Some(meal) => print_meals("Quick Meal:", std::slice::from_ref(&meal)),
            None => println!("{}", "The meal catalog is empty".yellow()),
        },
        Commands::Cluster { username } => {
            let cluster = engine
                .cluster_of(&username)
                .ok_or_else(|| anyhow!("User {} not found", username))?;
            let members = engine.cluster_members(cluster);
            print_users(&format!("Cluster {} ({}):", cluster, username), &members);
        }
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(engine, requests, concurrent).await?,
    }

    Ok(())
}

/// Build the request profile: stored user first, then flags on top
fn resolve_profile(engine: &RecommendationEngine, args: &ProfileArgs) -> Result<UserProfile> {
    let mut profile = match &args.username {
        Some(name) => {
            let stored = engine
                .data_index()
                .get_profile_by_username(name)
                .ok_or_else(|| anyhow!("User {} not found", name))?;
            UserProfile {
                username: Some(stored.username.clone()),
                goal: Some(stored.goal.clone()),
                experience_level: Some(stored.experience_level.clone()),
                equipment_access: Some(stored.equipment_access.clone()),
                gender: Some(stored.gender.clone()),
                age: Some(stored.age),
                height_cm: Some(stored.height_cm),
                weight: Some(stored.initial_weight_kg),
                diet_preference: None,
            }
        }
        None => UserProfile::new(),
    };

    if args.goal.is_some() {
        profile.goal = args.goal.clone();
    }
    if args.experience.is_some() {
        profile.experience_level = args.experience.clone();
    }
    if args.equipment.is_some() {
        profile.equipment_access = args.equipment.clone();
    }
    if args.gender.is_some() {
        profile.gender = args.gender.clone();
    }
    profile.age = args.age.or(profile.age);
    profile.height_cm = args.height_cm.or(profile.height_cm);
    profile.weight = args.weight.or(profile.weight);
    Ok(profile)
}

/// Meal requests use the diet both as the filter and for scoring
fn meal_profile(
    engine: &RecommendationEngine,
    args: &ProfileArgs,
    diet: Option<&str>,
) -> Result<UserProfile> {
    let mut profile = resolve_profile(engine, args)?;
    if let Some(diet) = diet {
        profile.diet_preference = Some(diet.to_string());
    }
    Ok(profile)
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    engine: Arc<RecommendationEngine>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }
    let stored = engine.data_index().profiles();
    if stored.is_empty() {
        bail!("Benchmark needs at least one stored profile");
    }

    // Requests replay stored users' profiles in random order
    let mut rng = RecommendationEngine::clock_rng();
    let profiles: Vec<UserProfile> = (0..requests)
        .filter_map(|_| stored.choose(&mut rng))
        .map(|p| {
            UserProfile::new()
                .with_goal(p.goal.clone())
                .with_experience(p.experience_level.clone())
                .with_equipment(p.equipment_access.clone())
        })
        .collect();

    let limit = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall = Instant::now();
    let mut handles = vec![];
    for profile in profiles {
        let engine = engine.clone();
        let permit = limit.clone().acquire_owned().await?;
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            let mut rng = RecommendationEngine::clock_rng();
            let meals = engine.config().default_meal_count;
            engine.recommend_meals(&profile, meals, None, None, &mut rng)?;
            engine.workout_plan(&profile, &mut rng)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let total_time = wall.elapsed();

    let busy: Duration = timings.iter().sum();
    let avg_latency = busy / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_meals(header: &str, meals: &[MealRecommendation]) {
    println!("{}", header.bold().blue());
    if meals.is_empty() {
        println!("{}", "No meals found".yellow());
    }
    for (i, meal) in meals.iter().enumerate() {
        print!(
            "{}. {} ({}) - {:.0} kcal, P {:.0}g / C {:.0}g / F {:.0}g [{}]",
            (i + 1).to_string().green(),
            meal.meal_name,
            meal.meal_type,
            meal.calories,
            meal.protein_g,
            meal.carbs_g,
            meal.fat_g,
            meal.dietary_tags
        );
        match meal.similarity_score {
            Some(score) => println!(" - Similarity: {:.2}", score),
            None => println!(),
        }
    }
}

fn print_exercises(header: &str, exercises: &[ExerciseRecommendation]) {
    println!("{}", header.bold().blue());
    if exercises.is_empty() {
        println!("{}", "No exercises found".yellow());
    }
    for (i, exercise) in exercises.iter().enumerate() {
        print!(
            "{}. {} [{}, {}, {}]",
            (i + 1).to_string().green(),
            exercise.exercise_name,
            exercise.body_part,
            exercise.equipment,
            exercise.difficulty
        );
        match exercise.similarity_score {
            Some(score) => println!(" - Similarity: {:.2}", score),
            None => println!(),
        }
    }
}

fn print_users(header: &str, users: &[SimilarUser]) {
    println!("{}", header.bold().blue());
    for user in users {
        println!(
            "{}{} - {}, {}, {}",
            "• ".cyan(),
            user.username,
            user.goal,
            user.experience_level,
            user.equipment_access
        );
    }
}
