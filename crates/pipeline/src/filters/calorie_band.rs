//! Keeps meals inside the calorie window of the user's goal.

use crate::candidate::Candidate;
use crate::context::RequestContext;
use crate::traits::Filter;
use data_loader::MealRecord;

/// Inclusive calorie window for a goal
pub fn calorie_band(goal: &str) -> (f64, f64) {
    match goal {
        "bulk" => (500.0, 800.0),
        "cut" => (300.0, 500.0),
        "maintain" => (400.0, 600.0),
        _ => (300.0, 600.0),
    }
}

/// Always active. An empty result falls back to the full catalog, dropping
/// the meal-type and diet restrictions as well.
pub struct CalorieBandFilter;

impl Filter<MealRecord> for CalorieBandFilter {
    fn name(&self) -> &str {
        "CalorieBandFilter"
    }

    fn keep(&self, meal: &MealRecord, context: &RequestContext) -> bool {
        let (min, max) = calorie_band(context.profile.goal());
        meal.calories >= min && meal.calories <= max
    }

    fn fallback<'a>(
        &self,
        _stage_input: &[Candidate<'a, MealRecord>],
        catalog: &'a [MealRecord],
        _context: &RequestContext,
    ) -> Option<Vec<Candidate<'a, MealRecord>>> {
        Some(Candidate::all(catalog))
    }
}
