//! Training schemes attached to a generated workout plan.

use serde::Serialize;

/// Sets, rep range and rest applied to every exercise of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkoutScheme {
    pub sets: u32,
    pub reps: &'static str,
    pub rest_seconds: u32,
}

impl WorkoutScheme {
    /// Scheme for a goal; unknown goals train like "maintain"
    pub fn for_goal(goal: &str) -> Self {
        match goal {
            "bulk" => Self {
                sets: 4,
                reps: "6-8",
                rest_seconds: 180,
            },
            "cut" => Self {
                sets: 3,
                reps: "12-15",
                rest_seconds: 90,
            },
            _ => Self {
                sets: 3,
                reps: "8-12",
                rest_seconds: 120,
            },
        }
    }
}
