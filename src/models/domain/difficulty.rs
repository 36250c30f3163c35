use std::fmt;

use serde::{Deserialize, Serialize};

/// Difficulty tier of a generated quiz, tied to a Bloom's taxonomy tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    #[serde(alias = "advanced")]
    Difficult,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Difficult => "difficult",
        }
    }

    pub fn bloom_tier(&self) -> u32 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 3,
            Difficulty::Difficult => 5,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Difficulty::Beginner => {
                "Remembering and Understanding level - basic facts, definitions, and simple concepts"
            }
            Difficulty::Intermediate => {
                "Applying and Analyzing level - practical application and analysis of concepts"
            }
            Difficulty::Difficult => {
                "Evaluating and Creating level - critical thinking, evaluation, and synthesis"
            }
        }
    }

    /// Tier a learner should practise at for a given mastery level.
    pub fn from_mastery_level(level: u32) -> Self {
        match level {
            0..=2 => Difficulty::Beginner,
            3..=4 => Difficulty::Intermediate,
            _ => Difficulty::Difficult,
        }
    }

    /// The following tier; `Difficult` is the ceiling.
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Beginner => Difficulty::Intermediate,
            Difficulty::Intermediate | Difficulty::Difficult => Difficulty::Difficult,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bloom_tiers_match_table() {
        assert_eq!(Difficulty::Beginner.bloom_tier(), 1);
        assert_eq!(Difficulty::Intermediate.bloom_tier(), 3);
        assert_eq!(Difficulty::Difficult.bloom_tier(), 5);
    }

    #[test]
    fn mastery_level_maps_to_difficulty() {
        assert_eq!(Difficulty::from_mastery_level(1), Difficulty::Beginner);
        assert_eq!(Difficulty::from_mastery_level(2), Difficulty::Beginner);
        assert_eq!(Difficulty::from_mastery_level(3), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_mastery_level(4), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_mastery_level(5), Difficulty::Difficult);
        assert_eq!(Difficulty::from_mastery_level(12), Difficulty::Difficult);
    }

    #[test]
    fn next_tier_stops_at_difficult() {
        assert_eq!(Difficulty::Beginner.next(), Difficulty::Intermediate);
        assert_eq!(Difficulty::Intermediate.next(), Difficulty::Difficult);
        assert_eq!(Difficulty::Difficult.next(), Difficulty::Difficult);
    }

    #[test]
    fn advanced_is_accepted_as_difficult() {
        let parsed: Difficulty = serde_json::from_str("\"advanced\"").expect("alias should parse");
        assert_eq!(parsed, Difficulty::Difficult);
        assert_eq!(
            serde_json::to_string(&Difficulty::Difficult).expect("should serialize"),
            "\"difficult\""
        );
    }
}
