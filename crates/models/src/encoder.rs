//! Feature encoding for user profiles.
//!
//! A profile becomes the 7-wide vector
//! `[goal, experience, equipment, gender, age, height_cm, weight_kg]`.
//! The four categorical slots hold label codes from encoders fitted on the
//! observed values of each column; codes are assigned in sorted (byte-wise
//! alphabetical) order of the distinct values. The codes are only valid for
//! one fit and must not be mixed across rebuilds.

use crate::error::{ModelError, Result};
use data_loader::UserProfileRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Width of an encoded profile
pub const FEATURE_DIM: usize = 7;

/// Encoded (unscaled) profile features
pub type FeatureVector = [f64; FEATURE_DIM];

/// Maps each distinct category to its index in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    field: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit over the observed values of one column
    pub fn fit<'a>(field: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
        let classes: BTreeSet<&str> = values.into_iter().collect();
        Self {
            field: field.to_string(),
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    /// Code of a value, or `UnknownCategory` if it was not seen during fit
    pub fn transform(&self, value: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .map_err(|_| ModelError::UnknownCategory {
                field: self.field.clone(),
                value: value.to_string(),
            })
    }

    /// The value behind a code
    pub fn inverse(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

/// Raw profile values to encode, borrowed from a stored row or a request
#[derive(Debug, Clone, Copy)]
pub struct ProfileValues<'a> {
    pub goal: &'a str,
    pub experience_level: &'a str,
    pub equipment_access: &'a str,
    pub gender: &'a str,
    pub age: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
}

impl<'a> From<&'a UserProfileRecord> for ProfileValues<'a> {
    fn from(profile: &'a UserProfileRecord) -> Self {
        Self {
            goal: &profile.goal,
            experience_level: &profile.experience_level,
            equipment_access: &profile.equipment_access,
            gender: &profile.gender,
            age: profile.age,
            height_cm: profile.height_cm,
            weight_kg: profile.initial_weight_kg,
        }
    }
}

/// The four label encoders of the profile table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEncoder {
    pub goal: LabelEncoder,
    pub experience_level: LabelEncoder,
    pub equipment_access: LabelEncoder,
    pub gender: LabelEncoder,
}

impl ProfileEncoder {
    /// Fit all four encoders over the stored profiles
    pub fn fit(profiles: &[UserProfileRecord]) -> Self {
        Self {
            goal: LabelEncoder::fit("goal", profiles.iter().map(|p| p.goal.as_str())),
            experience_level: LabelEncoder::fit(
                "experience_level",
                profiles.iter().map(|p| p.experience_level.as_str()),
            ),
            equipment_access: LabelEncoder::fit(
                "equipment_access",
                profiles.iter().map(|p| p.equipment_access.as_str()),
            ),
            gender: LabelEncoder::fit("gender", profiles.iter().map(|p| p.gender.as_str())),
        }
    }

    /// Encode one profile into its feature vector
    pub fn encode(&self, values: ProfileValues<'_>) -> Result<FeatureVector> {
        Ok([
            self.goal.transform(values.goal)? as f64,
            self.experience_level.transform(values.experience_level)? as f64,
            self.equipment_access.transform(values.equipment_access)? as f64,
            self.gender.transform(values.gender)? as f64,
            values.age,
            values.height_cm,
            values.weight_kg,
        ])
    }

    /// Encode every stored profile, in row order
    pub fn encode_all(&self, profiles: &[UserProfileRecord]) -> Result<Vec<FeatureVector>> {
        profiles
            .iter()
            .map(|p| self.encode(ProfileValues::from(p)))
            .collect()
    }
}

/// Per-dimension standardization with statistics frozen at fit time.
///
/// Uses the population standard deviation; a constant column gets scale 1 so
/// it maps to 0 instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit column means and deviations over the given rows
    pub fn fit(rows: &[FeatureVector]) -> Self {
        let n = rows.len() as f64;
        let mut mean = vec![0.0; FEATURE_DIM];
        let mut scale = vec![1.0; FEATURE_DIM];
        if rows.is_empty() {
            return Self { mean, scale };
        }

        for dim in 0..FEATURE_DIM {
            let mu = rows.iter().map(|r| r[dim]).sum::<f64>() / n;
            let variance = rows.iter().map(|r| (r[dim] - mu).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            mean[dim] = mu;
            scale[dim] = if std > f64::EPSILON { std } else { 1.0 };
        }
        Self { mean, scale }
    }

    /// Standardize one row with the fit-time statistics
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.mean.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.mean.len(),
                found: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mu, sigma))| (x - mu) / sigma)
            .collect())
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}
