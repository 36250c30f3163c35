use serde::{Deserialize, Serialize};

use crate::models::domain::question::Question;

/// Outcome of grading one submitted answer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GradeResult {
    pub is_correct: bool,
    pub awarded_marks: f64,
    /// Evaluator confidence in [0, 1]; only set for subjective questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// The evaluator was unreachable or unreadable and the neutral score was used.
    #[serde(default)]
    pub degraded: bool,
}

impl GradeResult {
    pub fn unanswered() -> Self {
        Self {
            is_correct: false,
            awarded_marks: 0.0,
            confidence: None,
            degraded: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnsweredQuestion {
    /// Stored question id; set for shared quizzes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    pub question: Question,
    pub submitted_text: String,
    pub awarded_marks: f64,
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub degraded: bool,
}

impl AnsweredQuestion {
    pub fn new(question: Question, submitted_text: impl Into<String>, grade: GradeResult) -> Self {
        Self {
            question_id: None,
            question,
            submitted_text: submitted_text.into(),
            awarded_marks: grade.awarded_marks,
            is_correct: grade.is_correct,
            confidence: grade.confidence,
            degraded: grade.degraded,
        }
    }

    pub fn with_question_id(mut self, question_id: impl Into<String>) -> Self {
        self.question_id = Some(question_id.into());
        self
    }

    pub fn is_answered(&self) -> bool {
        !self.submitted_text.trim().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizResult {
    pub answers: Vec<AnsweredQuestion>,
    pub total_possible_marks: u32,
    pub total_awarded_marks: f64,
    pub percentage: f64,
    pub passed: bool,
    pub previous_mastery_level: u32,
    pub mastery_level: u32,
}

impl QuizResult {
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    pub fn leveled_up(&self) -> bool {
        self.mastery_level > self.previous_mastery_level
    }
}
