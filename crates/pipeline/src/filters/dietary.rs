//! Keeps meals tagged with the requested diet.

use crate::candidate::Candidate;
use crate::context::{ALL_DIETS, RequestContext};
use crate::traits::Filter;
use data_loader::MealRecord;

/// Case-insensitive substring match of the dietary preference in
/// `dietary_tags`.
///
/// Skipped for the "all" preference. An empty result falls back to this
/// stage's input, i.e. the meal-type result rather than the full catalog.
pub struct DietaryFilter;

impl Filter<MealRecord> for DietaryFilter {
    fn name(&self) -> &str {
        "DietaryFilter"
    }

    fn is_active(&self, context: &RequestContext) -> bool {
        context.dietary_preference() != ALL_DIETS
    }

    fn keep(&self, meal: &MealRecord, context: &RequestContext) -> bool {
        meal.dietary_tags
            .to_lowercase()
            .contains(&context.dietary_preference().to_lowercase())
    }

    fn fallback<'a>(
        &self,
        stage_input: &[Candidate<'a, MealRecord>],
        _catalog: &'a [MealRecord],
        _context: &RequestContext,
    ) -> Option<Vec<Candidate<'a, MealRecord>>> {
        Some(stage_input.to_vec())
    }
}
