use kaite_catalog::{SkillLevel, WaterType, WindRange};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Budget,
    Mid,
    Premium,
}

/// Rider preferences stored by the chat widget. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub preferred_water: Vec<WaterType>,
    #[serde(default)]
    pub wind_range: Option<WindRange>,
    #[serde(default)]
    pub budget: Option<BudgetTier>,
    #[serde(default)]
    pub experience_years: Option<u32>,
}

impl UserProfile {
    pub fn beginner() -> Self {
        Self {
            skill_level: Some(SkillLevel::Beginner),
            preferred_water: vec![WaterType::Flat],
            wind_range: Some(WindRange::new(12, 20)),
            ..Self::default()
        }
    }

    pub fn wave_rider() -> Self {
        Self {
            skill_level: Some(SkillLevel::Advanced),
            preferred_water: vec![WaterType::Waves],
            wind_range: Some(WindRange::new(18, 30)),
            ..Self::default()
        }
    }

    /// Fill empty fields from `fallback`; fields the rider set win
    pub fn merged_with(&self, fallback: &UserProfile) -> UserProfile {
        UserProfile {
            skill_level: self.skill_level.or(fallback.skill_level),
            preferred_water: if self.preferred_water.is_empty() {
                fallback.preferred_water.clone()
            } else {
                self.preferred_water.clone()
            },
            wind_range: self.wind_range.or(fallback.wind_range),
            budget: self.budget.or(fallback.budget),
            experience_years: self.experience_years.or(fallback.experience_years),
        }
    }

    /// Stated skill, else inferred from years on the water
    pub fn effective_skill(&self) -> Option<SkillLevel> {
        self.skill_level.or_else(|| {
            self.experience_years.map(|years| match years {
                0 => SkillLevel::Beginner,
                1..=2 => SkillLevel::Intermediate,
                _ => SkillLevel::Advanced,
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == UserProfile::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_rider_choices() {
        let rider = UserProfile {
            preferred_water: vec![WaterType::Chop],
            budget: Some(BudgetTier::Budget),
            ..UserProfile::default()
        };
        let merged = rider.merged_with(&UserProfile::beginner());

        assert_eq!(merged.skill_level, Some(SkillLevel::Beginner));
        assert_eq!(merged.preferred_water, vec![WaterType::Chop]);
        assert_eq!(merged.wind_range, Some(WindRange::new(12, 20)));
        assert_eq!(merged.budget, Some(BudgetTier::Budget));
    }

    #[test]
    fn test_skill_inferred_from_experience() {
        let mut profile = UserProfile { experience_years: Some(0), ..UserProfile::default() };
        assert_eq!(profile.effective_skill(), Some(SkillLevel::Beginner));
        profile.experience_years = Some(2);
        assert_eq!(profile.effective_skill(), Some(SkillLevel::Intermediate));
        profile.experience_years = Some(8);
        assert_eq!(profile.effective_skill(), Some(SkillLevel::Advanced));
        profile.skill_level = Some(SkillLevel::Beginner);
        assert_eq!(profile.effective_skill(), Some(SkillLevel::Beginner));
        assert!(UserProfile::default().is_empty());
    }

    #[test]
    fn test_profile_deserializes_partially() {
        let profile: UserProfile = serde_json::from_str(r#"{"skill_level": "intermediate", "wind_range": {"min_knots": 15, "max_knots": 25}}"#).unwrap();
        assert_eq!(profile.skill_level, Some(SkillLevel::Intermediate));
        assert!(profile.preferred_water.is_empty());
    }
}
