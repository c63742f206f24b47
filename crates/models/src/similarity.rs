//! Dense pairwise cosine similarity over one catalog.
//!
//! The matrix is indexed by catalog row position, not by entity id; callers
//! map ids to positions through `DataIndex` first.

use crate::tfidf::{SparseVector, TfidfVectorizer, sparse_dot};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// N x N cosine similarity matrix, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute every pairwise cosine between unit-length sparse vectors.
    ///
    /// Rows are built in parallel. The diagonal is 1.0 and entries are
    /// clamped into [0, 1]; since `sparse_dot` walks both vectors in column
    /// order, sim[i][j] and sim[j][i] are computed identically.
    pub fn from_vectors(vectors: &[SparseVector]) -> Self {
        let size = vectors.len();
        let rows: Vec<Vec<f64>> = (0..size)
            .into_par_iter()
            .map(|i| {
                (0..size)
                    .map(|j| {
                        if i == j {
                            1.0
                        } else {
                            sparse_dot(&vectors[i], &vectors[j]).clamp(0.0, 1.0)
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            size,
            values: rows.into_iter().flatten().collect(),
        }
    }

    /// Number of rows (and columns)
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.size && j < self.size {
            Some(self.values[i * self.size + j])
        } else {
            None
        }
    }

    /// One full row, or `None` for an out-of-range position
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.size {
            Some(&self.values[i * self.size..(i + 1) * self.size])
        } else {
            None
        }
    }

    /// The `n` positions most similar to `position`, most similar first.
    ///
    /// The item itself is never returned; equal scores keep row order.
    /// An out-of-range position yields an empty list.
    pub fn most_similar(&self, position: usize, n: usize) -> Vec<(usize, f64)> {
        let Some(row) = self.row(position) else {
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f64)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(j, _)| j != position)
            .collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// Vectorizer plus the similarity matrix it produced for one catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityIndex {
    pub vectorizer: TfidfVectorizer,
    pub matrix: SimilarityMatrix,
}

impl SimilarityIndex {
    /// Fit TF-IDF over the catalog texts and compute the similarity matrix
    #[instrument(skip(texts), fields(documents = texts.len()))]
    pub fn build<S: AsRef<str> + Sync>(texts: &[S], max_features: usize) -> Self {
        let start = Instant::now();
        let (vectorizer, vectors) = TfidfVectorizer::fit_transform(texts, max_features);
        debug!("Vectorized {} documents into {} terms", vectors.len(), vectorizer.dims());

        let matrix = SimilarityMatrix::from_vectors(&vectors);
        info!(
            "Built {}x{} similarity matrix in {:?}",
            matrix.len(),
            matrix.len(),
            start.elapsed()
        );

        Self { vectorizer, matrix }
    }

    /// See [`SimilarityMatrix::most_similar`]
    pub fn most_similar(&self, position: usize, n: usize) -> Vec<(usize, f64)> {
        self.matrix.most_similar(position, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<&'static str> {
        vec![
            "Back Squat Legs Barbell Intermediate",
            "Goblet Squat Legs Dumbbell Beginner",
            "Plank Core Bodyweight Beginner",
            "Bench Press Chest Barbell Intermediate",
            "",
        ]
    }

    #[test]
    fn test_matrix_shape_symmetry_and_range() {
        let index = SimilarityIndex::build(&catalog(), 500);
        let m = &index.matrix;
        assert_eq!(m.len(), 5);

        for i in 0..m.len() {
            assert_eq!(m.get(i, i), Some(1.0));
            for j in 0..m.len() {
                let v = m.get(i, j).unwrap();
                assert!((0.0..=1.0).contains(&v));
                assert!((v - m.get(j, i).unwrap()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_empty_document_still_has_unit_diagonal() {
        let index = SimilarityIndex::build(&catalog(), 500);
        assert_eq!(index.matrix.get(4, 4), Some(1.0));
        assert_eq!(index.matrix.get(4, 0), Some(0.0));
    }

    #[test]
    fn test_most_similar_excludes_self_and_is_sorted() {
        let index = SimilarityIndex::build(&catalog(), 500);
        let similar = index.most_similar(0, 4);

        assert_eq!(similar.len(), 4);
        assert!(similar.iter().all(|&(j, _)| j != 0));
        assert!(similar.windows(2).all(|w| w[0].1 >= w[1].1));
        // goblet squat shares two terms and has the lighter remainder
        assert_eq!(similar[0].0, 1);
    }

    #[test]
    fn test_ties_keep_row_order() {
        let m = SimilarityMatrix::from_vectors(&[vec![(0, 1.0)], vec![], vec![], vec![]]);
        let similar = m.most_similar(0, 3);
        let positions: Vec<usize> = similar.iter().map(|&(j, _)| j).collect();
        assert_eq!(positions, [1, 2, 3]);
    }

    #[test]
    fn test_out_of_range_position_is_empty() {
        let index = SimilarityIndex::build(&catalog(), 500);
        assert!(index.most_similar(99, 3).is_empty());
        assert!(index.matrix.row(99).is_none());
    }
}
