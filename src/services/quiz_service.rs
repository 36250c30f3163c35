use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        question::label_option, OptionKey, Question, QuestionBody, QuestionKind, Quiz, QuizAttempt,
        QuizFormat, MAX_QUESTION_MARKS,
    },
    models::dto::{
        request::{
            CreateManualQuizRequest, FinalizeQuizRequest, PreviewQuizRequest, SubmitSharedQuizRequest,
        },
        response::{QuizDraft, QuizSummary, SharedQuizView, SubmissionView},
    },
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{
        quiz_generator::{normalize_question, GenerationRequest, QuizGenerator},
        submission_aggregator::{finalize_attempt, SubmissionAggregator},
    },
};

pub const SHARE_CODE_LENGTH: usize = 6;
const SHARE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_CODE_ATTEMPTS: usize = 16;
/// Teacher-authored questions default to one mark regardless of kind.
const MANUAL_DEFAULT_MARKS: u32 = 1;

pub fn generate_share_code() -> String {
    let mut rng = rand::rng();
    (0..SHARE_CODE_LENGTH)
        .map(|_| SHARE_CODE_ALPHABET[rng.random_range(0..SHARE_CODE_ALPHABET.len())] as char)
        .collect()
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Reads a teacher's question payload: a JSON array, or a string holding one.
pub fn parse_manual_questions(raw: &Value) -> AppResult<Vec<Question>> {
    let decoded;
    let value = match raw {
        Value::String(text) => {
            decoded = serde_json::from_str::<Value>(text).map_err(|e| {
                AppError::ValidationError(format!("Questions are not valid JSON: {}", e))
            })?;
            &decoded
        }
        other => other,
    };

    let items = match value.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Err(AppError::ValidationError(
                "Questions must be a non-empty JSON array".to_string(),
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            manual_question(item).map_err(|reason| {
                AppError::ValidationError(format!("Question {}: {}", index + 1, reason))
            })
        })
        .collect()
}

fn manual_question(item: &Value) -> Result<Question, String> {
    let object = item
        .as_object()
        .ok_or_else(|| "must be a JSON object".to_string())?;

    let kind = match object.get("type").and_then(Value::as_str).map(str::trim) {
        None | Some("mcq") | Some("multiple_choice") => QuestionKind::MultipleChoice,
        Some("subjective") => QuestionKind::Subjective,
        Some(other) => return Err(format!("unknown question type '{}'", other)),
    };

    let mut object: Map<String, Value> = object.clone();
    object
        .entry("marks")
        .or_insert_with(|| Value::from(MANUAL_DEFAULT_MARKS));

    normalize_question(&object, kind, None)
}

/// Re-checks a reviewed draft question and applies its marks override.
fn reviewed_question(question: Question, marks_override: Option<u32>) -> Result<Question, String> {
    if question.text.trim().is_empty() {
        return Err("question text is blank".to_string());
    }

    let marks = marks_override.unwrap_or(question.marks);
    if marks == 0 {
        return Err("marks must be positive".to_string());
    }
    if marks > MAX_QUESTION_MARKS {
        return Err(format!(
            "marks {} exceeds the maximum of {}",
            marks, MAX_QUESTION_MARKS
        ));
    }

    let body = match question.body {
        QuestionBody::MultipleChoice {
            options,
            correct_key,
        } => {
            let mut labeled: [String; 4] = Default::default();
            for ((slot, key), option) in labeled.iter_mut().zip(OptionKey::ALL).zip(options.iter()) {
                if option.trim().is_empty() {
                    return Err(format!("option {} is blank", key));
                }
                *slot = label_option(key, option);
            }
            QuestionBody::MultipleChoice {
                options: labeled,
                correct_key,
            }
        }
        QuestionBody::Subjective { reference_answer } => {
            if reference_answer.trim().is_empty() {
                return Err("reference answer is blank".to_string());
            }
            QuestionBody::Subjective { reference_answer }
        }
    };

    Ok(Question {
        text: question.text.trim().to_string(),
        marks,
        taxonomy_level: question.taxonomy_level,
        body,
    })
}

/// Teacher-shared quizzes: authoring, join codes, attempts and results.
pub struct QuizService {
    generator: Arc<QuizGenerator>,
    aggregator: Arc<SubmissionAggregator>,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl QuizService {
    pub fn new(
        generator: Arc<QuizGenerator>,
        aggregator: Arc<SubmissionAggregator>,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            generator,
            aggregator,
            quizzes,
            attempts,
        }
    }

    pub async fn create_manual(
        &self,
        owner_id: &str,
        request: CreateManualQuizRequest,
    ) -> AppResult<QuizSummary> {
        request.validate()?;

        let questions = parse_manual_questions(&request.questions)?;
        let code = self.unique_code().await?;
        let quiz = Quiz::new(request.title.trim(), &code, owner_id, request.difficulty, questions)
            .with_duration(request.duration_minutes);

        let quiz = self.quizzes.create(quiz).await?;
        log::info!("Teacher {} created quiz {} ({} questions)", owner_id, quiz.code, quiz.questions.len());

        Ok(QuizSummary::from(&quiz))
    }

    /// Generates an mcq draft for review. Nothing is stored.
    pub async fn preview_draft(&self, request: PreviewQuizRequest) -> AppResult<QuizDraft> {
        request.validate()?;

        let topic = request.topic.trim().to_string();
        let generation = GenerationRequest::new(topic.clone(), request.difficulty, QuizFormat::Mcq)
            .with_counts(request.count, 0)
            .with_marks_override(Some(request.marks));
        let questions = self.generator.generate(&generation).await?;

        let title = request
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("{} Quiz", topic));

        Ok(QuizDraft {
            title,
            topic,
            difficulty: request.difficulty,
            duration_minutes: request.duration_minutes,
            questions,
        })
    }

    pub async fn finalize_draft(
        &self,
        owner_id: &str,
        request: FinalizeQuizRequest,
    ) -> AppResult<QuizSummary> {
        request.validate()?;

        if request.marks_overrides.len() > request.questions.len() {
            return Err(AppError::ValidationError(format!(
                "Got {} marks overrides for {} questions",
                request.marks_overrides.len(),
                request.questions.len()
            )));
        }

        let overrides = request
            .marks_overrides
            .iter()
            .copied()
            .chain(std::iter::repeat(None));
        let questions = request
            .questions
            .into_iter()
            .zip(overrides)
            .enumerate()
            .map(|(index, (question, marks))| {
                reviewed_question(question, marks).map_err(|reason| {
                    AppError::ValidationError(format!("Question {}: {}", index + 1, reason))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let code = self.unique_code().await?;
        let mut quiz = Quiz::new(request.title.trim(), &code, owner_id, request.difficulty, questions)
            .with_duration(request.duration_minutes);
        if let Some(topic) = request.topic.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            quiz = quiz.with_topic(topic);
        }

        let quiz = self.quizzes.create(quiz).await?;
        log::info!("Teacher {} finalized draft as quiz {}", owner_id, quiz.code);

        Ok(QuizSummary::from(&quiz))
    }

    pub async fn list_own(&self, owner_id: &str) -> AppResult<Vec<QuizSummary>> {
        let quizzes = self.quizzes.list_by_owner(owner_id).await?;
        Ok(quizzes.iter().map(QuizSummary::from).collect())
    }

    /// Returns the quiz without answers and makes sure the student has an open attempt.
    pub async fn take(&self, student_id: &str, code: &str) -> AppResult<SharedQuizView> {
        let quiz = self.quiz_by_code(code).await?;
        let attempt = match self.attempts.find_open(&quiz.id, student_id).await? {
            Some(attempt) => attempt,
            None => {
                let attempt = QuizAttempt::open(&quiz.id, student_id, quiz.questions.len() as u32);
                self.attempts.create(attempt).await?
            }
        };

        Ok(SharedQuizView::new(&quiz, &attempt))
    }

    pub async fn submit(
        &self,
        student_id: &str,
        code: &str,
        request: SubmitSharedQuizRequest,
    ) -> AppResult<SubmissionView> {
        request.validate()?;

        let quiz = self.quiz_by_code(code).await?;
        let attempt = match self.attempts.find_open(&quiz.id, student_id).await? {
            Some(attempt) => attempt,
            None => {
                let attempt = QuizAttempt::open(&quiz.id, student_id, quiz.questions.len() as u32);
                self.attempts.create(attempt).await?
            }
        };

        self.finish(&quiz, attempt, request, false).await
    }

    /// Partial save on fullscreen exit or tab close. Only an open attempt can
    /// be auto-submitted; the result never counts as a full completion.
    pub async fn auto_submit(
        &self,
        student_id: &str,
        code: &str,
        request: SubmitSharedQuizRequest,
    ) -> AppResult<SubmissionView> {
        request.validate()?;

        let quiz = self.quiz_by_code(code).await?;
        let attempt = self
            .attempts
            .find_open(&quiz.id, student_id)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!("No open attempt on quiz {} to auto-submit", quiz.code))
            })?;

        self.finish(&quiz, attempt, request, true).await
    }

    pub async fn results(&self, owner_id: &str, code: &str) -> AppResult<Vec<SubmissionView>> {
        let quiz = self.quiz_by_code(code).await?;
        if !quiz.is_owned_by(owner_id) {
            return Err(AppError::Forbidden(
                "Only the quiz owner can view its results".to_string(),
            ));
        }

        let now = Utc::now();
        let attempts = self.attempts.list_by_quiz(&quiz.id).await?;
        Ok(attempts
            .into_iter()
            .map(|attempt| SubmissionView::for_teacher(attempt, now))
            .collect())
    }

    pub async fn my_submissions(&self, student_id: &str) -> AppResult<Vec<SubmissionView>> {
        let now = Utc::now();
        let attempts = self.attempts.list_by_student(student_id).await?;
        Ok(attempts
            .into_iter()
            .map(|attempt| SubmissionView::for_student(attempt, now))
            .collect())
    }

    async fn finish(
        &self,
        quiz: &Quiz,
        mut attempt: QuizAttempt,
        request: SubmitSharedQuizRequest,
        auto: bool,
    ) -> AppResult<SubmissionView> {
        let mut answers = request.answers;
        let pairs: Vec<(Question, String)> = quiz
            .questions
            .iter()
            .map(|stored| {
                let submitted = answers.remove(&stored.id).unwrap_or_default();
                (stored.question.clone(), submitted.trim().to_string())
            })
            .collect();

        let graded = self.aggregator.grade_all(&pairs).await;
        for (stored, answer) in quiz.questions.iter().zip(graded) {
            attempt.upsert_answer(answer.with_question_id(stored.id.clone()));
        }

        attempt.question_count = quiz.questions.len() as u32;
        attempt.fullscreen_exit_flag = auto || request.fullscreen_exit;
        let now = Utc::now();
        finalize_attempt(&mut attempt, now);

        let attempt = self.attempts.finalize(attempt).await?;
        log::info!(
            "Student {} {} quiz {}: {:.1}/{} ({:.0}%)",
            attempt.student_id,
            if auto { "auto-submitted" } else { "submitted" },
            quiz.code,
            attempt.score,
            attempt.total_possible,
            attempt.percentage
        );

        Ok(SubmissionView::for_student(attempt, now))
    }

    async fn quiz_by_code(&self, code: &str) -> AppResult<Quiz> {
        let code = normalize_code(code);
        self.quizzes
            .find_by_code(&code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with code '{}' not found", code)))
    }

    async fn unique_code(&self) -> AppResult<String> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_share_code();
            if !self.quizzes.code_exists(&code).await? {
                return Ok(code);
            }
        }
        Err(AppError::InternalError(
            "Could not allocate a unique quiz code".to_string(),
        ))
    }
}
