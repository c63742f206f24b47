//! # Models Crate
//!
//! Everything fitted from the tabular store once at startup:
//!
//! - **encoder**: label encoders and the standard scaler for user profiles
//! - **tfidf**: tokenizer, stop words and the TF-IDF vectorizer
//! - **similarity**: dense cosine similarity matrices over a catalog
//! - **cluster**: k-means over standardized profiles and the neighbor index
//! - **artifacts**: saving and loading all of the above
//! - **config**: engine knobs
//!
//! None of these structures can be updated in place; a catalog or profile
//! change means a full rebuild.
//!
//! ## Example Usage
//!
//! ```ignore
//! use models::{EngineConfig, SimilarityIndex, UserClusterer};
//!
//! let texts: Vec<String> = index.meals().iter().map(|m| m.combined_features()).collect();
//! let meals = SimilarityIndex::build(&texts, 1000);
//! let users = UserClusterer::build(index.profiles(), &EngineConfig::default())?;
//! ```

pub mod artifacts;
pub mod cluster;
pub mod config;
pub mod encoder;
pub mod error;
pub mod similarity;
pub mod tfidf;

pub use artifacts::ModelArtifacts;
pub use cluster::{ClusterAssignment, KMeans, KMeansFit, NearestNeighbors, SelfExclusion, UserClusterer};
pub use config::EngineConfig;
pub use encoder::{FEATURE_DIM, FeatureVector, LabelEncoder, ProfileEncoder, ProfileValues, StandardScaler};
pub use error::{ModelError, Result};
pub use similarity::{SimilarityIndex, SimilarityMatrix};
pub use tfidf::{STOP_WORDS, SparseVector, TfidfVectorizer, tokenize};
