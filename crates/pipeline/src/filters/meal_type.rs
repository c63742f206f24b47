//! Keeps meals of the requested type.

use crate::candidate::Candidate;
use crate::context::RequestContext;
use crate::traits::Filter;
use data_loader::MealRecord;

/// Case-insensitive exact match on `meal_type`.
///
/// Active only when the request names a meal type. An empty result falls
/// back to the full catalog.
pub struct MealTypeFilter;

impl Filter<MealRecord> for MealTypeFilter {
    fn name(&self) -> &str {
        "MealTypeFilter"
    }

    fn is_active(&self, context: &RequestContext) -> bool {
        context.meal_type.is_some()
    }

    fn keep(&self, meal: &MealRecord, context: &RequestContext) -> bool {
        context
            .meal_type
            .as_deref()
            .is_none_or(|wanted| meal.meal_type.to_lowercase() == wanted.to_lowercase())
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
