use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz_result::AnsweredQuestion;

/// A student's attempt at a shared quiz. Opened when the quiz is taken,
/// finalized exactly once by a manual submit or an auto-submit.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub answers: Vec<AnsweredQuestion>,
    pub score: f64,
    pub total_possible: u32,
    pub percentage: f64,
    pub passed: bool,
    pub answered_count: u32,
    pub question_count: u32,
    pub fullscreen_exit_flag: bool,
    pub is_full_completion: bool,
    pub completed: bool,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_unlocked_at: Option<DateTime<Utc>>,
}

impl QuizAttempt {
    pub fn open(quiz_id: &str, student_id: &str, question_count: u32) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            student_id: student_id.to_string(),
            answers: Vec::new(),
            score: 0.0,
            total_possible: 0,
            percentage: 0.0,
            passed: false,
            answered_count: 0,
            question_count,
            fullscreen_exit_flag: false,
            is_full_completion: false,
            completed: false,
            started_at: Utc::now(),
            submitted_at: None,
            review_unlocked_at: None,
        }
    }

    /// Replaces the stored answer for the same question, or appends it.
    pub fn upsert_answer(&mut self, answer: AnsweredQuestion) {
        match self
            .answers
            .iter_mut()
            .find(|existing| existing.question_id.is_some() && existing.question_id == answer.question_id)
        {
            Some(existing) => *existing = answer,
            None => self.answers.push(answer),
        }
    }

    pub fn is_review_unlocked(&self, now: DateTime<Utc>) -> bool {
        self.review_unlocked_at.is_some_and(|unlock| now >= unlock)
    }
}
