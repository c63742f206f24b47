//! Saved model state, so a restart can skip refitting.
//!
//! Artifacts are JSON written by `serde_json` with float round-tripping, so a
//! loaded similarity matrix is bit-for-bit the saved one.

use crate::cluster::{ClusterAssignment, UserClusterer};
use crate::encoder::{ProfileEncoder, StandardScaler};
use crate::error::Result;
use crate::similarity::{SimilarityIndex, SimilarityMatrix};
use crate::tfidf::TfidfVectorizer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Every fitted structure of one engine build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifacts {
    pub meal_vectorizer: TfidfVectorizer,
    pub meal_similarity: SimilarityMatrix,
    pub exercise_vectorizer: TfidfVectorizer,
    pub exercise_similarity: SimilarityMatrix,
    pub scaler: StandardScaler,
    pub label_encoders: ProfileEncoder,
    pub user_clusters: Vec<ClusterAssignment>,
}

impl ModelArtifacts {
    /// Collect the artifacts of a built engine
    pub fn from_models(
        meals: &SimilarityIndex,
        exercises: &SimilarityIndex,
        users: &UserClusterer,
    ) -> Self {
        Self {
            meal_vectorizer: meals.vectorizer.clone(),
            meal_similarity: meals.matrix.clone(),
            exercise_vectorizer: exercises.vectorizer.clone(),
            exercise_similarity: exercises.matrix.clone(),
            scaler: users.scaler().clone(),
            label_encoders: users.encoder().clone(),
            user_clusters: users.assignments().to_vec(),
        }
    }

    /// Serialize to an opaque blob
    pub fn save(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Restore from a blob produced by [`ModelArtifacts::save`]
    pub fn load(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let bytes = self.save()?;
        fs::write(path, &bytes)?;
        info!("Saved model artifacts to {:?} ({} bytes)", path, bytes.len());
        Ok(())
    }

    /// Load artifacts from disk. A missing file is `Ok(None)`; an unreadable
    /// or corrupt one is an error.
    pub fn load_from_path(path: &Path) -> Result<Option<Self>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let artifacts = Self::load(&bytes)?;
        info!("Loaded model artifacts from {:?}", path);
        Ok(Some(artifacts))
    }

    pub fn meal_index(&self) -> SimilarityIndex {
        SimilarityIndex {
            vectorizer: self.meal_vectorizer.clone(),
            matrix: self.meal_similarity.clone(),
        }
    }

    pub fn exercise_index(&self) -> SimilarityIndex {
        SimilarityIndex {
            vectorizer: self.exercise_vectorizer.clone(),
            matrix: self.exercise_similarity.clone(),
        }
    }
}
