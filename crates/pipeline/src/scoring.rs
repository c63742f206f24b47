//! Per-request scores used to shortlist candidates.

use crate::candidate::Candidate;
use crate::context::RequestContext;
use crate::traits::Scorer;
use data_loader::{ExerciseRecord, MealRecord};
use std::sync::Once;
use tracing::warn;

/// Goal fit plus a diet bonus.
///
/// +2 for a bulking user and a meal over 30 g protein, otherwise +2 for a
/// cutting user and a meal under 500 kcal; +3 when the profile's diet
/// preference is a substring of the tags (case-sensitive, so the default
/// "all" rarely matches).
pub struct MealScorer;

impl Scorer<MealRecord> for MealScorer {
    fn score(&self, meal: &MealRecord, context: &RequestContext) -> f64 {
        let profile = &context.profile;
        let mut score = 0.0;
        match profile.goal() {
            "bulk" if meal.protein_g > 30.0 => score += 2.0,
            "cut" if meal.calories < 500.0 => score += 2.0,
            _ => {}
        }
        if meal.dietary_tags.contains(profile.diet_preference()) {
            score += 3.0;
        }
        score
    }
}

const BULK_PARTS: &[&str] = &["Legs", "Back", "Chest"];
const CUT_PARTS: &[&str] = &["Core", "Full Body"];

static DIFFICULTY_BONUS_NOTICE: Once = Once::new();

/// Goal fit plus an experience bonus.
///
/// +2 for bulking on Legs/Back/Chest, +2 for cutting on Core/Full Body, +1
/// when `difficulty` equals the experience string exactly. Catalog
/// difficulties are capitalized and experience levels are not, so that last
/// bonus almost never applies; it is kept literal.
pub struct ExerciseScorer;

impl Scorer<ExerciseRecord> for ExerciseScorer {
    fn score(&self, exercise: &ExerciseRecord, context: &RequestContext) -> f64 {
        let profile = &context.profile;
        let mut score = 0.0;
        match profile.goal() {
            "bulk" if BULK_PARTS.contains(&exercise.body_part.as_str()) => score += 2.0,
            "cut" if CUT_PARTS.contains(&exercise.body_part.as_str()) => score += 2.0,
            _ => {}
        }

        let experience = profile.experience_level();
        if exercise.difficulty == experience {
            score += 1.0;
        } else if exercise.difficulty.eq_ignore_ascii_case(experience) {
            DIFFICULTY_BONUS_NOTICE.call_once(|| {
                warn!(
                    "difficulty bonus compares '{}' with '{}' case-sensitively and does not apply",
                    exercise.difficulty, experience
                );
            });
        }
        score
    }
}

/// Score every candidate in place
pub fn score_all<T>(
    candidates: &mut [Candidate<'_, T>],
    scorer: &dyn Scorer<T>,
    context: &RequestContext,
) {
    for candidate in candidates.iter_mut() {
        candidate.score = scorer.score(candidate.item, context);
    }
}
