//! Core traits for the filtering pipeline.
//!
//! A `Filter` narrows the candidate set for one stage and may name a broader
//! set to fall back to when it removes everything. A `Scorer` ranks what
//! survives.

use crate::candidate::Candidate;
use crate::context::RequestContext;
use anyhow::Result;

/// One stage of a filter pipeline over catalog rows of type `T`.
///
/// `Send + Sync` so a pipeline can be shared by concurrent requests.
pub trait Filter<T>: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether the request asks for this stage at all. Inactive stages pass
    /// candidates through untouched and never fall back.
    fn is_active(&self, _context: &RequestContext) -> bool {
        true
    }

    /// Whether a row passes this stage
    fn keep(&self, item: &T, context: &RequestContext) -> bool;

    /// Apply this filter to a set of candidates, preserving their order
    fn apply<'a>(
        &self,
        candidates: Vec<Candidate<'a, T>>,
        context: &RequestContext,
    ) -> Result<Vec<Candidate<'a, T>>> {
        Ok(candidates
            .into_iter()
            .filter(|c| self.keep(c.item, context))
            .collect())
    }

    /// Replacement set used when `apply` leaves nothing.
    ///
    /// `stage_input` is what this stage received; `catalog` is the full,
    /// unfiltered catalog. `None` means the empty result stands.
    fn fallback<'a>(
        &self,
        _stage_input: &[Candidate<'a, T>],
        _catalog: &'a [T],
        _context: &RequestContext,
    ) -> Option<Vec<Candidate<'a, T>>> {
        None
    }
}

/// Assigns the per-request score used for shortlisting
pub trait Scorer<T>: Send + Sync {
    fn score(&self, item: &T, context: &RequestContext) -> f64;
}
