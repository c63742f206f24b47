//! The FilterPipeline orchestrates multiple filters.
//!
//! Stages run in the order they were added. When a stage empties the
//! candidate set, that stage's own fallback decides what the next stage sees,
//! so fallback targets can differ from stage to stage.

use crate::candidate::Candidate;
use crate::context::RequestContext;
use crate::traits::Filter;
use anyhow::Result;
use tracing;

/// Chains filters over a catalog of `T`.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(MealTypeFilter)
///     .add_filter(DietaryFilter)
///     .add_filter(CalorieBandFilter);
///
/// let eligible = pipeline.apply(index.meals(), &context)?;
/// ```
pub struct FilterPipeline<T> {
    filters: Vec<Box<dyn Filter<T>>>,
}

impl<T> FilterPipeline<T> {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter<T> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the stages, in order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run every stage over the full catalog.
    ///
    /// ## Algorithm
    /// 1. Start with every catalog row, in row order
    /// 2. For each active filter:
    ///    a. Apply it to the current set
    ///    b. If nothing survives, replace the set with the filter's fallback
    ///       (computed from this stage's input and the full catalog)
    /// 3. Return the final set, still in row order
    pub fn apply<'a>(
        &self,
        catalog: &'a [T],
        context: &RequestContext,
    ) -> Result<Vec<Candidate<'a, T>>> {
        let mut current = Candidate::all(catalog);
        for filter in &self.filters {
            if !filter.is_active(context) {
                tracing::debug!("Skipping filter: {} (not requested)", filter.name());
                continue;
            }

            let stage_input = current.clone();
            current = filter.apply(current, context)?;
            tracing::debug!(
                "Filter applied: {} ({} -> {})",
                filter.name(),
                stage_input.len(),
                current.len()
            );

            if current.is_empty() {
                if let Some(fallback) = filter.fallback(&stage_input, catalog, context) {
                    tracing::debug!(
                        "Filter {} emptied the set, falling back to {} candidates",
                        filter.name(),
                        fallback.len()
                    );
                    current = fallback;
                }
            }
        }
        Ok(current)
    }
}

impl<T> Default for FilterPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
