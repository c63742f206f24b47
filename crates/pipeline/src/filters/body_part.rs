//! Keeps exercises for the requested body part.

use crate::context::RequestContext;
use crate::traits::Filter;
use data_loader::ExerciseRecord;

/// Case-insensitive exact match on `body_part`. No fallback of its own; the
/// equipment stage recovers an empty set.
pub struct BodyPartFilter;

impl Filter<ExerciseRecord> for BodyPartFilter {
    fn name(&self) -> &str {
        "BodyPartFilter"
    }

    fn is_active(&self, context: &RequestContext) -> bool {
        context.body_part.is_some()
    }

    fn keep(&self, exercise: &ExerciseRecord, context: &RequestContext) -> bool {
        context
            .body_part
            .as_deref()
            .is_none_or(|wanted| exercise.body_part.to_lowercase() == wanted.to_lowercase())
    }
}
