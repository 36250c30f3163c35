use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::difficulty::Difficulty;
use crate::models::domain::question::{self, Question};

/// A teacher-owned quiz shared with students through its join code.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub code: String,               // Unique share code, upper-case
    pub created_by_user_id: String, // Owning teacher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub questions: Vec<QuizQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// A question as stored inside a shared quiz.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    #[serde(flatten)]
    pub question: Question,
}

impl QuizQuestion {
    pub fn new(question: Question) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question,
        }
    }
}

impl Quiz {
    pub fn new(
        title: &str,
        code: &str,
        created_by_user_id: &str,
        difficulty: Difficulty,
        questions: Vec<Question>,
    ) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            code: code.to_uppercase(),
            created_by_user_id: created_by_user_id.to_string(),
            topic: None,
            difficulty,
            duration_minutes: None,
            questions: questions.into_iter().map(QuizQuestion::new).collect(),
            created_at: Some(now),
            modified_at: Some(now),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_duration(mut self, duration_minutes: Option<u32>) -> Self {
        self.duration_minutes = duration_minutes;
        self
    }

    pub fn total_marks(&self) -> u32 {
        question::total_marks(self.questions.iter().map(|q| &q.question))
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.created_by_user_id == user_id
    }
}
