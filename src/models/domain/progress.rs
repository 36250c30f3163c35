use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::difficulty::Difficulty;

pub const INITIAL_MASTERY_LEVEL: u32 = 1;

/// Mastery ratchet for one learner on one topic.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MasteryProgress {
    pub id: String,
    pub user_id: String,
    pub topic: String,
    pub level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl MasteryProgress {
    pub fn new(user_id: &str, topic: &str) -> Self {
        let now = Utc::now();
        MasteryProgress {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            topic: topic.to_string(),
            level: INITIAL_MASTERY_LEVEL,
            created_at: Some(now),
            modified_at: Some(now),
        }
    }

    pub fn recommended_difficulty(&self) -> Difficulty {
        Difficulty::from_mastery_level(self.level)
    }

    /// Moves the level up to `level`; lower values are ignored.
    pub fn raise_to(&mut self, level: u32) -> bool {
        if level <= self.level {
            return false;
        }
        self.level = level;
        self.modified_at = Some(Utc::now());
        true
    }
}
