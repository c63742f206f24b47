//! Keeps exercises suited to the user's experience.

use crate::candidate::Candidate;
use crate::context::RequestContext;
use crate::traits::Filter;
use data_loader::ExerciseRecord;

/// Difficulty values allowed for an experience level; unknown levels get
/// beginner work only.
pub fn allowed_difficulties(experience: &str) -> &'static [&'static str] {
    match experience {
        "intermediate" => &["Beginner", "Intermediate"],
        "advanced" => &["Beginner", "Intermediate", "Advanced"],
        _ => &["Beginner"],
    }
}

/// Exact match of `difficulty` against the allow-list. An empty result falls
/// back to the beginner rows of the whole catalog.
pub struct DifficultyFilter;

impl Filter<ExerciseRecord> for DifficultyFilter {
    fn name(&self) -> &str {
        "DifficultyFilter"
    }

    fn keep(&self, exercise: &ExerciseRecord, context: &RequestContext) -> bool {
        allowed_difficulties(context.profile.experience_level())
            .contains(&exercise.difficulty.as_str())
    }

    fn fallback<'a>(
        &self,
        _stage_input: &[Candidate<'a, ExerciseRecord>],
        catalog: &'a [ExerciseRecord],
        _context: &RequestContext,
    ) -> Option<Vec<Candidate<'a, ExerciseRecord>>> {
        Some(Candidate::matching(catalog, |e| e.difficulty == "Beginner"))
    }
}
