//! Candidates flowing through a pipeline.

/// A catalog row under consideration for one request.
///
/// Borrows the row instead of copying it; the score is request-local scratch
/// and never written back to the catalog.
#[derive(Debug)]
pub struct Candidate<'a, T> {
    /// Row position in the catalog
    pub position: usize,
    pub item: &'a T,
    pub score: f64,
}

// Derives would require `T: Clone`
impl<T> Clone for Candidate<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Candidate<'_, T> {}

impl<'a, T> Candidate<'a, T> {
    pub fn new(position: usize, item: &'a T) -> Self {
        Self {
            position,
            item,
            score: 0.0,
        }
    }

    /// Every row of a catalog, in row order
    pub fn all(catalog: &'a [T]) -> Vec<Self> {
        catalog
            .iter()
            .enumerate()
            .map(|(position, item)| Self::new(position, item))
            .collect()
    }

    /// Rows of a catalog matching a predicate, in row order
    pub fn matching(catalog: &'a [T], predicate: impl Fn(&T) -> bool) -> Vec<Self> {
        catalog
            .iter()
            .enumerate()
            .filter(|(_, item)| predicate(item))
            .map(|(position, item)| Self::new(position, item))
            .collect()
    }
}
