//! Benchmarks for model building
//!
//! Run with: cargo bench --package models
//!
//! Uses a generated catalog so it runs without a data directory.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::UserProfileRecord;
use models::{EngineConfig, SimilarityIndex, UserClusterer};

const NAMES: &[&str] = &["Squat", "Deadlift", "Press", "Row", "Curl", "Lunge", "Plank", "Swing"];
const PARTS: &[&str] = &["Legs", "Back", "Chest", "Core", "Full Body", "Arms"];
const EQUIPMENT: &[&str] = &["Barbell", "Dumbbell", "Machine", "Cable", "Kettlebell", "Bodyweight"];
const LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced"];

fn catalog(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| {
            format!(
                "{} Variation{} {} {} {}",
                NAMES[i % NAMES.len()],
                i % 37,
                PARTS[i % PARTS.len()],
                EQUIPMENT[(i / 3) % EQUIPMENT.len()],
                LEVELS[i % LEVELS.len()]
            )
        })
        .collect()
}

fn profiles(size: usize) -> Vec<UserProfileRecord> {
    (0..size)
        .map(|i| UserProfileRecord {
            user_id: i as u32,
            username: format!("user{i}"),
            goal: ["bulk", "cut", "maintain"][i % 3].to_string(),
            experience_level: ["beginner", "intermediate", "advanced"][(i / 3) % 3].to_string(),
            equipment_access: ["full_gym", "home_gym", "bodyweight"][(i / 7) % 3].to_string(),
            gender: ["male", "female"][i % 2].to_string(),
            age: 18.0 + (i % 40) as f64,
            height_cm: 155.0 + (i % 35) as f64,
            initial_weight_kg: 55.0 + (i % 50) as f64,
            goal_weight_kg: 60.0,
        })
        .collect()
}

fn bench_similarity_build(c: &mut Criterion) {
    let texts = catalog(1000);

    c.bench_function("similarity_build_1000", |b| {
        b.iter(|| {
            let index = SimilarityIndex::build(black_box(&texts), 500);
            black_box(index)
        })
    });
}

fn bench_most_similar(c: &mut Criterion) {
    let index = SimilarityIndex::build(&catalog(1000), 500);

    c.bench_function("most_similar_top10", |b| {
        b.iter(|| black_box(index.most_similar(black_box(42), 10)))
    });
}

fn bench_user_clustering(c: &mut Criterion) {
    let stored = profiles(500);
    let config = EngineConfig::default();

    c.bench_function("user_clustering_500", |b| {
        b.iter(|| {
            let clusterer = UserClusterer::build(black_box(&stored), &config).unwrap();
            black_box(clusterer)
        })
    });
}

criterion_group!(
    benches,
    bench_similarity_build,
    bench_most_similar,
    bench_user_clustering
);
criterion_main!(benches);
