//! Keeps exercises the user has equipment for.

use crate::candidate::Candidate;
use crate::context::RequestContext;
use crate::traits::Filter;
use data_loader::ExerciseRecord;

const BODYWEIGHT: &[&str] = &["Bodyweight", "Other"];
const HOME_GYM: &[&str] = &["Dumbbell", "Kettlebell", "Bodyweight", "Other"];
const FULL_GYM: &[&str] = &[
    "Barbell",
    "Dumbbell",
    "Machine",
    "Cable",
    "Kettlebell",
    "Bodyweight",
    "Other",
];

/// Equipment values allowed for an `equipment_access` level.
/// Each level includes the one below it; unknown levels get bodyweight.
pub fn allowed_equipment(access: &str) -> &'static [&'static str] {
    match access {
        "full_gym" => FULL_GYM,
        "home_gym" => HOME_GYM,
        _ => BODYWEIGHT,
    }
}

/// Exact match of `equipment` against the allow-list. An empty result falls
/// back to the bodyweight rows of the whole catalog, ignoring any body part
/// filter that ran before.
pub struct EquipmentFilter;

impl Filter<ExerciseRecord> for EquipmentFilter {
    fn name(&self) -> &str {
        "EquipmentFilter"
    }

    fn keep(&self, exercise: &ExerciseRecord, context: &RequestContext) -> bool {
        allowed_equipment(context.profile.equipment_access()).contains(&exercise.equipment.as_str())
    }

    fn fallback<'a>(
        &self,
        _stage_input: &[Candidate<'a, ExerciseRecord>],
        catalog: &'a [ExerciseRecord],
        _context: &RequestContext,
    ) -> Option<Vec<Candidate<'a, ExerciseRecord>>> {
        Some(Candidate::matching(catalog, |e| e.equipment == "Bodyweight"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_levels_nest() {
        for level in [BODYWEIGHT, HOME_GYM] {
            assert!(level.iter().all(|e| FULL_GYM.contains(e)));
        }
        assert!(BODYWEIGHT.iter().all(|e| HOME_GYM.contains(e)));
    }

    #[test]
    fn test_unknown_access_is_bodyweight() {
        assert_eq!(allowed_equipment("hotel_gym"), ["Bodyweight", "Other"]);
        assert_eq!(allowed_equipment("Full_Gym"), ["Bodyweight", "Other"]);
    }
}
