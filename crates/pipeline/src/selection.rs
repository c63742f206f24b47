//! Shortlist-then-sample selection.

use crate::candidate::Candidate;
use rand::Rng;
use rand::seq::index;

/// Pick `n` candidates.
///
/// A pool of at most `n` is returned as is, in its current order. A larger
/// pool is cut to its `min(shortlist_factor * n, pool)` best scores (equal
/// scores keep pool order), and `n` distinct candidates are drawn uniformly
/// from that shortlist with `rng`.
pub fn shortlist_then_sample<'a, T, R: Rng + ?Sized>(
    mut pool: Vec<Candidate<'a, T>>,
    n: usize,
    shortlist_factor: usize,
    rng: &mut R,
) -> Vec<Candidate<'a, T>> {
    if pool.len() <= n {
        return pool;
    }

    // stable: ties stay in row order
    pool.sort_by(|a, b| b.score.total_cmp(&a.score));
    let shortlist = shortlist_factor.max(1).saturating_mul(n).min(pool.len());
    pool.truncate(shortlist);

    index::sample(rng, pool.len(), n)
        .iter()
        .map(|i| pool[i])
        .collect()
}
