//! User profile collected during onboarding.
//!
//! The profile feeds the AI coach prompts (focus area, discipline,
//! available time) and is otherwise immutable after onboarding except
//! for the premium flag.

use serde::{Deserialize, Serialize};

/// Life area the user wants to improve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FocusArea {
    /// Career growth and work output.
    Career,
    /// Physical and mental health.
    Health,
    /// Learning and study routines.
    Studies,
    /// Personal finances.
    Finance,
    /// No single area.
    #[default]
    General,
}

impl std::fmt::Display for FocusArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FocusArea::Career => "career",
            FocusArea::Health => "health",
            FocusArea::Studies => "studies",
            FocusArea::Finance => "finance",
            FocusArea::General => "general",
        };
        write!(f, "{s}")
    }
}

/// Onboarding-collected user preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Main area of improvement.
    pub focus_area: FocusArea,
    /// Self-assessed discipline, 1 (low) to 10 (high).
    pub discipline_level: u8,
    /// Minutes per day the user can commit.
    pub available_minutes: u32,
    /// Whether onboarding has completed.
    pub onboarded: bool,
    /// Premium subscription flag.
    pub premium: bool,
}

impl UserProfile {
    /// Build a profile from onboarding answers.
    ///
    /// `discipline_level` is clamped to the 1..=10 scale.
    pub fn new(
        name: impl Into<String>,
        focus_area: FocusArea,
        discipline_level: u8,
        available_minutes: u32,
    ) -> Self {
        Self {
            name: name.into(),
            focus_area,
            discipline_level: discipline_level.clamp(1, 10),
            available_minutes,
            onboarded: false,
            premium: false,
        }
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            focus_area: FocusArea::General,
            discipline_level: 5,
            available_minutes: 30,
            onboarded: false,
            premium: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_discipline_to_scale() {
        assert_eq!(UserProfile::new("a", FocusArea::Health, 0, 30).discipline_level, 1);
        assert_eq!(UserProfile::new("a", FocusArea::Health, 7, 30).discipline_level, 7);
        assert_eq!(UserProfile::new("a", FocusArea::Health, 99, 30).discipline_level, 10);
    }

    #[test]
    fn default_profile_is_not_onboarded() {
        let p = UserProfile::default();
        assert!(!p.onboarded);
        assert!(!p.premium);
        assert_eq!(p.focus_area, FocusArea::General);
        assert_eq!(p.discipline_level, 5);
        assert_eq!(p.available_minutes, 30);
    }

    #[test]
    fn focus_area_serializes_lowercase() {
        let json = serde_json::to_string(&FocusArea::Studies).unwrap();
        assert_eq!(json, "\"studies\"");
        let back: FocusArea = serde_json::from_str("\"career\"").unwrap();
        assert_eq!(back, FocusArea::Career);
    }

    #[test]
    fn profile_roundtrip() {
        let p = UserProfile::new("Ana", FocusArea::Finance, 8, 60);
        let json = serde_json::to_string(&p).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "Ana");
        assert_eq!(back.focus_area, FocusArea::Finance);
        assert_eq!(back.discipline_level, 8);
        assert_eq!(back.available_minutes, 60);
    }
}
