use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::models::domain::{Difficulty, Question, QuizFormat};
use crate::services::quiz_generator::{DEFAULT_MCQ_COUNT, DEFAULT_SUBJECTIVE_COUNT};

fn default_mcq_count() -> u32 {
    DEFAULT_MCQ_COUNT
}

fn default_subjective_count() -> u32 {
    DEFAULT_SUBJECTIVE_COUNT
}

fn default_marks() -> u32 {
    1
}

fn default_learning_level() -> Difficulty {
    Difficulty::Intermediate
}

fn default_learning_style() -> String {
    "theoretical".to_string()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GeneratePracticeQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,

    /// Omitted means "continue learning" at the level mastery suggests.
    pub difficulty: Option<Difficulty>,

    #[serde(default)]
    pub format: QuizFormat,

    #[validate(range(min = 1, max = 20))]
    #[serde(default = "default_mcq_count")]
    pub mcq_count: u32,

    #[validate(range(min = 1, max = 20))]
    #[serde(default = "default_subjective_count")]
    pub subjective_count: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NextLevelRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,

    #[serde(default)]
    pub current_difficulty: Difficulty,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitPracticeRequest {
    /// One entry per question, in question order; blank means unanswered.
    #[validate(length(max = 100))]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LearningPathRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,

    #[serde(default = "default_learning_level")]
    pub level: Difficulty,

    /// Free-form, e.g. "theoretical", "practical", "visual".
    #[validate(length(min = 1, max = 50))]
    #[serde(default = "default_learning_style")]
    pub style: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateManualQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// A JSON array of question objects, or a string holding one.
    pub questions: Value,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PreviewQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,

    #[validate(range(min = 1, max = 50))]
    pub count: u32,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_marks")]
    pub marks: u32,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FinalizeQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub topic: Option<String>,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<u32>,

    #[validate(length(min = 1, max = 100))]
    pub questions: Vec<Question>,

    /// Per-question marks by position; `null` keeps the draft's marks.
    #[serde(default)]
    pub marks_overrides: Vec<Option<u32>>,
}

/// Answers to a shared quiz keyed by stored question id.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitSharedQuizRequest {
    #[serde(default)]
    pub answers: HashMap<String, String>,

    #[serde(default)]
    pub fullscreen_exit: bool,
}
