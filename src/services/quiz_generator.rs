use std::sync::Arc;

use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::label_option;
use crate::models::domain::{
    Difficulty, OptionKey, Question, QuestionKind, QuizFormat, MAX_QUESTION_MARKS,
};
use crate::services::model_service::TextGenerator;
use crate::services::prompt_builder::build_quiz_prompt;
use crate::services::response_parser::{parse_question_array, RawQuestion};

pub const DEFAULT_MCQ_COUNT: u32 = 3;
pub const DEFAULT_SUBJECTIVE_COUNT: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub format: QuizFormat,
    pub mcq_count: u32,
    pub subjective_count: u32,
    /// Applied uniformly to every generated question when set.
    pub marks_override: Option<u32>,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, difficulty: Difficulty, format: QuizFormat) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            format,
            mcq_count: DEFAULT_MCQ_COUNT,
            subjective_count: DEFAULT_SUBJECTIVE_COUNT,
            marks_override: None,
        }
    }

    pub fn with_counts(mut self, mcq_count: u32, subjective_count: u32) -> Self {
        self.mcq_count = mcq_count;
        self.subjective_count = subjective_count;
        self
    }

    pub fn with_marks_override(mut self, marks: Option<u32>) -> Self {
        self.marks_override = marks;
        self
    }
}

/// Turns a topic into a validated question list through the text model.
pub struct QuizGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl QuizGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> AppResult<Vec<Question>> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(AppError::ValidationError("Topic must not be empty".to_string()));
        }
        if request.marks_override == Some(0) {
            return Err(AppError::ValidationError("Marks must be positive".to_string()));
        }

        log::info!(
            "Generating {:?} quiz on '{}' at {} level",
            request.format,
            topic,
            request.difficulty
        );

        let questions = match request.format {
            QuizFormat::Mcq => {
                self.generate_kind(topic, request, QuestionKind::MultipleChoice, request.mcq_count)
                    .await?
            }
            QuizFormat::Subjective => {
                self.generate_kind(topic, request, QuestionKind::Subjective, request.subjective_count)
                    .await?
            }
            QuizFormat::Both => {
                let (mut mcq, subjective) = tokio::try_join!(
                    self.generate_kind(topic, request, QuestionKind::MultipleChoice, request.mcq_count),
                    self.generate_kind(topic, request, QuestionKind::Subjective, request.subjective_count),
                )?;
                mcq.extend(subjective);
                mcq
            }
        };

        log::info!("Generated {} questions on '{}'", questions.len(), topic);
        Ok(questions)
    }

    async fn generate_kind(
        &self,
        topic: &str,
        request: &GenerationRequest,
        kind: QuestionKind,
        count: u32,
    ) -> AppResult<Vec<Question>> {
        if count == 0 {
            return Err(AppError::ValidationError(
                "Question count must be positive".to_string(),
            ));
        }

        let prompt = build_quiz_prompt(topic, request.difficulty, kind, count);
        let raw = self.generator.complete(&prompt.instruction).await.map_err(|e| {
            log::error!("Quiz generation call failed: {}", e);
            AppError::GenerationUnavailable(e.to_string())
        })?;

        parse_question_array(&raw)?
            .iter()
            .enumerate()
            .map(|(index, object)| {
                normalize_question(object, kind, request.marks_override).map_err(|reason| {
                    AppError::GenerationFormatError(format!("question {}: {}", index + 1, reason))
                })
            })
            .collect()
    }
}

/// Validates one loosely shaped question object and builds a [`Question`].
///
/// Shared by AI generation and manual authoring; callers map the returned
/// reason onto their own error variant.
pub fn normalize_question(
    object: &RawQuestion,
    kind: QuestionKind,
    marks_override: Option<u32>,
) -> Result<Question, String> {
    let text = required_text(object, "question")?;
    let answer = required_text(object, "answer")?;
    let marks = resolve_marks(object, kind, marks_override)?;

    let question = match kind {
        QuestionKind::MultipleChoice => {
            let options = labeled_options(object)?;
            let correct_key = OptionKey::parse_lenient(answer)
                .ok_or_else(|| format!("answer '{}' is not one of A, B, C or D", answer))?;
            Question::multiple_choice(text, options, correct_key, marks)
        }
        QuestionKind::Subjective => Question::subjective(text, answer, marks),
    };

    match object.get("level").and_then(Value::as_str).map(str::trim) {
        Some(level) if !level.is_empty() => Ok(question.with_taxonomy_level(level)),
        _ => Ok(question),
    }
}

fn required_text<'a>(object: &'a RawQuestion, field: &str) -> Result<&'a str, String> {
    match object.get(field).and_then(Value::as_str).map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(format!("'{}' is missing or blank", field)),
    }
}

fn labeled_options(object: &RawQuestion) -> Result<[String; 4], String> {
    let raw = object
        .get("options")
        .and_then(Value::as_array)
        .ok_or_else(|| "'options' must be an array".to_string())?;

    if raw.len() != OptionKey::ALL.len() {
        return Err(format!("expected 4 options, found {}", raw.len()));
    }

    let mut options: [String; 4] = Default::default();
    for (slot, (key, value)) in options.iter_mut().zip(OptionKey::ALL.iter().zip(raw)) {
        let text = value
            .as_str()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| format!("option {} must be non-empty text", key))?;
        *slot = label_option(*key, text);
    }
    Ok(options)
}

fn resolve_marks(
    object: &RawQuestion,
    kind: QuestionKind,
    marks_override: Option<u32>,
) -> Result<u32, String> {
    let marks = match (marks_override, object.get("marks")) {
        (Some(marks), _) => i64::from(marks),
        (None, None) | (None, Some(Value::Null)) => i64::from(kind.default_marks()),
        (None, Some(Value::Number(n))) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| format!("marks '{}' is not a whole number", n))?,
        (None, Some(Value::String(s))) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("marks '{}' is not a whole number", s))?,
        (None, Some(other)) => return Err(format!("marks has unsupported value {}", other)),
    };

    if marks <= 0 {
        return Err(format!("marks must be positive, got {}", marks));
    }
    if marks > i64::from(MAX_QUESTION_MARKS) {
        return Err(format!(
            "marks {} exceeds the maximum of {}",
            marks, MAX_QUESTION_MARKS
        ));
    }
    u32::try_from(marks).map_err(|_| format!("marks {} is too large", marks))
}
