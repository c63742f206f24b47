//! Per-request inputs: the caller's profile and the optional filters.
//!
//! Every profile field is optional and falls back to a fixed default, so an
//! empty profile is a valid request.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GOAL: &str = "maintain";
pub const DEFAULT_EXPERIENCE: &str = "beginner";
pub const DEFAULT_EQUIPMENT: &str = "full_gym";
pub const DEFAULT_GENDER: &str = "male";
pub const DEFAULT_AGE: f64 = 25.0;
pub const DEFAULT_HEIGHT_CM: f64 = 170.0;
pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
/// Diet preference that disables the dietary filter
pub const ALL_DIETS: &str = "all";

/// Profile supplied with a request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    /// Set when the request comes from a stored user
    pub username: Option<String>,
    pub goal: Option<String>,
    #[serde(alias = "experience")]
    pub experience_level: Option<String>,
    pub equipment_access: Option<String>,
    pub gender: Option<String>,
    pub age: Option<f64>,
    pub height_cm: Option<f64>,
    pub weight: Option<f64>,
    pub diet_preference: Option<String>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience_level = Some(experience.into());
        self
    }

    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.equipment_access = Some(equipment.into());
        self
    }

    pub fn with_diet(mut self, diet: impl Into<String>) -> Self {
        self.diet_preference = Some(diet.into());
        self
    }

    pub fn goal(&self) -> &str {
        self.goal.as_deref().unwrap_or(DEFAULT_GOAL)
    }

    pub fn experience_level(&self) -> &str {
        self.experience_level.as_deref().unwrap_or(DEFAULT_EXPERIENCE)
    }

    pub fn equipment_access(&self) -> &str {
        self.equipment_access.as_deref().unwrap_or(DEFAULT_EQUIPMENT)
    }

    pub fn gender(&self) -> &str {
        self.gender.as_deref().unwrap_or(DEFAULT_GENDER)
    }

    pub fn age(&self) -> f64 {
        self.age.unwrap_or(DEFAULT_AGE)
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm.unwrap_or(DEFAULT_HEIGHT_CM)
    }

    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT_KG)
    }

    pub fn diet_preference(&self) -> &str {
        self.diet_preference.as_deref().unwrap_or(ALL_DIETS)
    }
}

/// Everything a filter or scorer may look at for one request
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub profile: UserProfile,
    /// Meal pipeline only
    pub meal_type: Option<String>,
    /// Meal pipeline only; "all" or unset disables the dietary filter
    pub dietary_preference: Option<String>,
    /// Exercise pipeline only
    pub body_part: Option<String>,
}

impl RequestContext {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn with_meal_type(mut self, meal_type: Option<String>) -> Self {
        self.meal_type = meal_type;
        self
    }

    pub fn with_dietary_preference(mut self, preference: Option<String>) -> Self {
        self.dietary_preference = preference;
        self
    }

    pub fn with_body_part(mut self, body_part: Option<String>) -> Self {
        self.body_part = body_part;
        self
    }

    pub fn dietary_preference(&self) -> &str {
        self.dietary_preference.as_deref().unwrap_or(ALL_DIETS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_uses_defaults() {
        let profile = UserProfile::new();
        assert_eq!(profile.goal(), "maintain");
        assert_eq!(profile.experience_level(), "beginner");
        assert_eq!(profile.equipment_access(), "full_gym");
        assert_eq!(profile.gender(), "male");
        assert_eq!(profile.age(), 25.0);
        assert_eq!(profile.height_cm(), 170.0);
        assert_eq!(profile.weight(), 70.0);
        assert_eq!(profile.diet_preference(), "all");
    }

    #[test]
    fn test_profile_accepts_experience_alias() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"goal": "bulk", "experience": "advanced"}"#).unwrap();
        assert_eq!(profile.goal(), "bulk");
        assert_eq!(profile.experience_level(), "advanced");
        assert_eq!(profile.equipment_access(), "full_gym");
    }
}
