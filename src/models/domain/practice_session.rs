use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::difficulty::Difficulty;
use crate::models::domain::question::Question;

/// A generated self-practice quiz waiting for the learner's answers.
/// Deleted once submitted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PracticeSession {
    pub id: String,
    pub user_id: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Learner's mastery level when the quiz was generated.
    pub attempted_level: u32,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

impl PracticeSession {
    pub fn new(
        user_id: &str,
        topic: &str,
        difficulty: Difficulty,
        attempted_level: u32,
        questions: Vec<Question>,
    ) -> Self {
        PracticeSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            topic: topic.to_string(),
            difficulty,
            attempted_level,
            questions,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
