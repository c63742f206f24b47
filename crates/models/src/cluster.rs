//! User clustering and nearest-neighbor search over encoded profiles.
//!
//! Profiles are encoded with [`ProfileEncoder`], standardized with a
//! [`StandardScaler`] fitted on the same rows, then partitioned with seeded
//! k-means. Cluster labels only describe the rows they were fitted on; a new
//! profile goes through [`UserClusterer::nearest`] instead.

use crate::config::EngineConfig;
use crate::encoder::{ProfileEncoder, ProfileValues, StandardScaler};
use crate::error::{ModelError, Result};
use data_loader::UserProfileRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

// =============================================================================
// K-Means
// =============================================================================

/// Seeded k-means with k-means++ initialization and several restarts
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    seed: u64,
    restarts: usize,
    max_iter: usize,
    tolerance: f64,
}

/// Result of one k-means fit
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster of each input point, in input order
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the assigned centroids
    pub inertia: f64,
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            restarts: 10,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }

    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts.max(1);
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    /// Partition the points; the run with the lowest inertia wins.
    ///
    /// `k` is capped at the number of points. No points gives an empty fit.
    pub fn fit(&self, points: &[Vec<f64>]) -> KMeansFit {
        let k = self.k.min(points.len());
        if k == 0 {
            return KMeansFit {
                labels: Vec::new(),
                centroids: Vec::new(),
                inertia: 0.0,
            };
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;
        for run in 0..self.restarts {
            let centroids = self.init_centroids(points, k, &mut rng);
            let fit = self.lloyd(points, centroids);
            debug!("k-means run {} finished with inertia {:.4}", run, fit.inertia);
            // strict comparison keeps the earliest run on ties
            if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }
        best.unwrap_or_else(|| self.lloyd(points, points[..k].to_vec()))
    }

    /// k-means++: each new centroid is drawn with probability proportional
    /// to its squared distance from the nearest chosen one.
    fn init_centroids(&self, points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
        let mut centroids = Vec::with_capacity(k);
        centroids.push(points[rng.random_range(0..points.len())].clone());

        let mut nearest: Vec<f64> = points
            .iter()
            .map(|p| squared_distance(p, &centroids[0]))
            .collect();

        while centroids.len() < k {
            let total: f64 = nearest.iter().sum();
            let chosen = if total > 0.0 {
                let mut target = rng.random::<f64>() * total;
                let mut pick = points.len() - 1;
                for (i, d) in nearest.iter().enumerate() {
                    if target < *d {
                        pick = i;
                        break;
                    }
                    target -= d;
                }
                pick
            } else {
                // every point coincides with a centroid already
                rng.random_range(0..points.len())
            };

            centroids.push(points[chosen].clone());
            for (i, p) in points.iter().enumerate() {
                nearest[i] = nearest[i].min(squared_distance(p, &points[chosen]));
            }
        }
        centroids
    }

    fn lloyd(&self, points: &[Vec<f64>], mut centroids: Vec<Vec<f64>>) -> KMeansFit {
        let k = centroids.len();
        let dim = points[0].len();
        let mut labels = vec![usize::MAX; points.len()];

        for _ in 0..self.max_iter {
            let mut changed = false;
            for (i, p) in points.iter().enumerate() {
                let label = closest(p, &centroids);
                if labels[i] != label {
                    labels[i] = label;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut sums = vec![vec![0.0; dim]; k];
            let mut counts = vec![0usize; k];
            for (p, &label) in points.iter().zip(&labels) {
                counts[label] += 1;
                for (s, x) in sums[label].iter_mut().zip(p) {
                    *s += x;
                }
            }

            let mut shift = 0.0;
            for c in 0..k {
                // an empty cluster keeps its previous centroid
                if counts[c] == 0 {
                    continue;
                }
                let updated: Vec<f64> = sums[c].iter().map(|s| s / counts[c] as f64).collect();
                shift += squared_distance(&updated, &centroids[c]);
                centroids[c] = updated;
            }
            if shift <= self.tolerance {
                for (i, p) in points.iter().enumerate() {
                    labels[i] = closest(p, &centroids);
                }
                break;
            }
        }

        let inertia = points
            .iter()
            .zip(&labels)
            .map(|(p, &label)| squared_distance(p, &centroids[label]))
            .sum();
        KMeansFit {
            labels,
            centroids,
            inertia,
        }
    }
}

fn closest(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = c;
        }
    }
    best
}

// =============================================================================
// Nearest neighbors
// =============================================================================

/// Brute-force Euclidean neighbor search over a fixed point set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestNeighbors {
    points: Vec<Vec<f64>>,
}

impl NearestNeighbors {
    pub fn new(points: Vec<Vec<f64>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// The `k` closest rows as `(row, distance)`, nearest first.
    /// Equal distances are ordered by row.
    pub fn kneighbors(&self, query: &[f64], k: usize) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, squared_distance(query, p)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked.into_iter().map(|(i, d)| (i, d.sqrt())).collect()
    }
}

// =============================================================================
// User clusterer
// =============================================================================

/// How the query profile itself is kept out of a similar-user result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelfExclusion {
    /// Drop the first neighbor, whoever it is. Only correct when the query
    /// is itself a stored profile and no other row is closer.
    #[default]
    FirstResult,
    /// Drop every stored row with this username, wherever it ranks
    ByUsername(String),
}

/// Cluster label of one stored profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub username: String,
    pub cluster: usize,
}

/// Fitted encoders, scaler, cluster labels and neighbor index for the
/// stored profiles
#[derive(Debug, Clone, PartialEq)]
pub struct UserClusterer {
    encoder: ProfileEncoder,
    scaler: StandardScaler,
    neighbors: NearestNeighbors,
    /// Row-aligned with the profile table
    assignments: Vec<ClusterAssignment>,
    k: usize,
}

impl UserClusterer {
    /// Encode, standardize and cluster every stored profile.
    ///
    /// With no profiles the clusterer is empty: no clusters, no neighbors.
    #[instrument(skip_all, fields(profiles = profiles.len()))]
    pub fn build(profiles: &[UserProfileRecord], config: &EngineConfig) -> Result<Self> {
        let encoder = ProfileEncoder::fit(profiles);
        let features = encoder.encode_all(profiles)?;
        let scaler = StandardScaler::fit(&features);
        let scaled = features
            .iter()
            .map(|row| scaler.transform(row))
            .collect::<Result<Vec<_>>>()?;

        let k = config.max_clusters.min(profiles.len());
        let fit = KMeans::new(k, config.cluster_seed)
            .with_restarts(config.cluster_restarts)
            .with_max_iter(config.cluster_max_iter)
            .fit(&scaled);

        let assignments = profiles
            .iter()
            .zip(&fit.labels)
            .map(|(p, &cluster)| ClusterAssignment {
                username: p.username.clone(),
                cluster,
            })
            .collect();

        info!(
            "Clustered {} profiles into {} clusters (inertia {:.4})",
            profiles.len(),
            k,
            fit.inertia
        );

        Ok(Self {
            encoder,
            scaler,
            neighbors: NearestNeighbors::new(scaled),
            assignments,
            k,
        })
    }

    /// Rebuild from saved encoders, scaler and labels without refitting.
    ///
    /// The profile table must be the one the parts were fitted on.
    pub fn from_parts(
        encoder: ProfileEncoder,
        scaler: StandardScaler,
        assignments: Vec<ClusterAssignment>,
        profiles: &[UserProfileRecord],
    ) -> Result<Self> {
        if assignments.len() != profiles.len() {
            return Err(ModelError::ArtifactMismatch(format!(
                "{} cluster assignments for {} profiles",
                assignments.len(),
                profiles.len()
            )));
        }
        if let Some((a, p)) = assignments
            .iter()
            .zip(profiles)
            .find(|(a, p)| a.username != p.username)
        {
            return Err(ModelError::ArtifactMismatch(format!(
                "assignment for '{}' lines up with profile '{}'",
                a.username, p.username
            )));
        }

        let scaled = encoder
            .encode_all(profiles)?
            .iter()
            .map(|row| scaler.transform(row))
            .collect::<Result<Vec<_>>>()?;
        let k = assignments
            .iter()
            .map(|a| a.cluster + 1)
            .max()
            .unwrap_or(0);

        Ok(Self {
            encoder,
            scaler,
            neighbors: NearestNeighbors::new(scaled),
            assignments,
            k,
        })
    }

    /// Encode and standardize a profile with the fit-time statistics
    pub fn transform(&self, values: ProfileValues<'_>) -> Result<Vec<f64>> {
        let features = self.encoder.encode(values)?;
        self.scaler.transform(&features)
    }

    /// Rows of the `n` stored profiles closest to the query.
    ///
    /// Searches `n + 1` neighbors (capped at the stored count) and removes
    /// the query according to `exclusion`. Fails with `UnknownCategory` when
    /// a categorical value was not seen at fit time.
    pub fn nearest(
        &self,
        values: ProfileValues<'_>,
        n: usize,
        exclusion: &SelfExclusion,
    ) -> Result<Vec<(usize, f64)>> {
        if self.neighbors.is_empty() {
            return Ok(Vec::new());
        }
        let query = self.transform(values)?;
        let k = (n + 1).min(self.neighbors.len());
        let found = self.neighbors.kneighbors(&query, k);

        let kept: Vec<(usize, f64)> = match exclusion {
            SelfExclusion::FirstResult => found.into_iter().skip(1).collect(),
            SelfExclusion::ByUsername(username) => found
                .into_iter()
                .filter(|&(row, _)| self.assignments[row].username != *username)
                .take(n)
                .collect(),
        };
        Ok(kept)
    }

    /// Cluster of the first stored profile with this username
    pub fn cluster_of(&self, username: &str) -> Option<usize> {
        self.assignments
            .iter()
            .find(|a| a.username == username)
            .map(|a| a.cluster)
    }

    /// Usernames assigned to a cluster, in profile order
    pub fn cluster_members(&self, cluster: usize) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|a| a.cluster == cluster)
            .map(|a| a.username.as_str())
            .collect()
    }

    pub fn assignments(&self) -> &[ClusterAssignment] {
        &self.assignments
    }

    pub fn encoder(&self) -> &ProfileEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Standardized profile matrix, row-aligned with the profile table
    pub fn scaled(&self) -> &[Vec<f64>] {
        self.neighbors.points()
    }

    /// Number of clusters actually fitted
    pub fn cluster_count(&self) -> usize {
        self.k
    }
}
