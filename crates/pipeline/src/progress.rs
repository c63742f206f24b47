//! Aggregation of a user's workout history.

use data_loader::{ExerciseId, WorkoutLogEntry};
use std::collections::BTreeMap;

/// Logged performance on one exercise
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseProgress {
    pub exercise_id: ExerciseId,
    pub mean_weight_kg: f64,
    pub mean_reps: f64,
    pub sessions: usize,
    /// `0.4 * mean weight + 0.3 * mean reps + 0.3 * sessions`, units mixed
    pub progress_score: f64,
}

/// Group logs by exercise and score each group.
///
/// Groups come out in ascending exercise id. Exercises for which `is_known`
/// is false (not in the catalog) are dropped.
pub fn aggregate_progress(
    logs: &[WorkoutLogEntry],
    is_known: impl Fn(ExerciseId) -> bool,
) -> Vec<ExerciseProgress> {
    let mut groups: BTreeMap<ExerciseId, (f64, f64, usize)> = BTreeMap::new();
    for entry in logs {
        let group = groups.entry(entry.exercise_id).or_insert((0.0, 0.0, 0));
        group.0 += entry.weight_kg;
        group.1 += entry.reps_completed;
        group.2 += 1;
    }

    groups
        .into_iter()
        .filter(|(id, _)| is_known(*id))
        .map(|(exercise_id, (weight, reps, sessions))| {
            let mean_weight_kg = weight / sessions as f64;
            let mean_reps = reps / sessions as f64;
            ExerciseProgress {
                exercise_id,
                mean_weight_kg,
                mean_reps,
                sessions,
                progress_score: 0.4 * mean_weight_kg + 0.3 * mean_reps + 0.3 * sessions as f64,
            }
        })
        .collect()
}

/// The `n` best groups by progress score; equal scores keep id order
pub fn top_progress(mut progress: Vec<ExerciseProgress>, n: usize) -> Vec<ExerciseProgress> {
    progress.sort_by(|a, b| b.progress_score.total_cmp(&a.progress_score));
    progress.truncate(n);
    progress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(exercise_id: ExerciseId, weight_kg: f64, reps: f64) -> WorkoutLogEntry {
        WorkoutLogEntry {
            user_id: 1,
            exercise_id,
            log_date: "2024-05-01".to_string(),
            weight_kg,
            reps_completed: reps,
        }
    }

    #[test]
    fn test_aggregate_means_and_score() {
        let logs = vec![log(4, 100.0, 5.0), log(4, 110.0, 3.0), log(2, 20.0, 12.0)];
        let progress = aggregate_progress(&logs, |_| true);

        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].exercise_id, 2);
        let squat = &progress[1];
        assert_eq!(squat.sessions, 2);
        assert_eq!(squat.mean_weight_kg, 105.0);
        assert_eq!(squat.mean_reps, 4.0);
        assert!((squat.progress_score - (42.0 + 1.2 + 0.6)).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_exercises_are_dropped() {
        let logs = vec![log(4, 100.0, 5.0), log(99, 500.0, 5.0)];
        let progress = aggregate_progress(&logs, |id| id != 99);
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].exercise_id, 4);
    }

    #[test]
    fn test_top_progress_is_stable() {
        let logs = vec![log(1, 10.0, 10.0), log(2, 10.0, 10.0), log(3, 50.0, 1.0)];
        let top = top_progress(aggregate_progress(&logs, |_| true), 2);
        let ids: Vec<ExerciseId> = top.iter().map(|p| p.exercise_id).collect();
        assert_eq!(ids, [3, 1]);
    }
}
