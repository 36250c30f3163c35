#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::RwLock;

use bloomquiz_server::{
    app_state::{AppState, Repositories},
    config::{AiConfig, Config},
    errors::{AppError, AppResult, ModelError},
    models::domain::{MasteryProgress, PracticeSession, Quiz, QuizAttempt},
    repositories::{
        PracticeSessionRepository, ProgressRepository, QuizAttemptRepository, QuizRepository,
    },
    services::TextGenerator,
};

pub const MCQ_REPLY: &str = r#"Sure! Here is your quiz:
```json
[
    {"question": "Capital of France?", "options": ["A. London", "B. Paris", "C. Rome", "D. Madrid"], "answer": "B", "type": "mcq", "level": "Remembering"},
    {"question": "Largest ocean?", "options": ["Atlantic", "Pacific", "Indian", "Arctic"], "answer": "B. Pacific", "type": "mcq", "level": "Remembering"}
]
```"#;

pub const SUBJECTIVE_REPLY: &str = r#"[{"question": "Explain plate tectonics", "answer": "Lithospheric plates move over the mantle", "type": "subjective", "marks": 10, "level": "Understanding"}]"#;

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "bloomquiz-test".to_string(),
        web_server_host: "localhost".to_string(),
        web_server_port: 8080,
        jwt_secret: SecretString::from("integration_test_jwt_secret_value_123".to_string()),
        jwt_expiration_hours: 1,
        ai: AiConfig {
            api_key: SecretString::from("test-ai-key".to_string()),
            api_base: "http://localhost:9/v1".to_string(),
            model: "test-model".to_string(),
            timeout_secs: 1,
        },
    }
}

type Script = dyn Fn(&str) -> Result<String, ModelError> + Send + Sync;

/// Text model stand-in that answers by prompt type and counts calls.
pub struct ScriptedGenerator {
    generation: Box<Script>,
    evaluation: Box<Script>,
    pub generation_calls: AtomicUsize,
    pub evaluation_calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(
        generation: impl Fn(&str) -> Result<String, ModelError> + Send + Sync + 'static,
        evaluation: impl Fn(&str) -> Result<String, ModelError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            generation: Box::new(generation),
            evaluation: Box::new(evaluation),
            generation_calls: AtomicUsize::new(0),
            evaluation_calls: AtomicUsize::new(0),
        }
    }

    /// Standard quiz replies plus a fixed evaluator reply.
    pub fn with_evaluator_reply(reply: &'static str) -> Self {
        Self::new(standard_quiz_reply, move |_| Ok(reply.to_string()))
    }

    pub fn generation_calls(&self) -> usize {
        self.generation_calls.load(Ordering::SeqCst)
    }

    pub fn evaluation_calls(&self) -> usize {
        self.evaluation_calls.load(Ordering::SeqCst)
    }
}

pub fn standard_quiz_reply(prompt: &str) -> Result<String, ModelError> {
    if prompt.contains("multiple-choice") {
        Ok(MCQ_REPLY.to_string())
    } else {
        Ok(SUBJECTIVE_REPLY.to_string())
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        if prompt.starts_with("Evaluate this student's answer") {
            self.evaluation_calls.fetch_add(1, Ordering::SeqCst);
            (self.evaluation)(prompt)
        } else {
            self.generation_calls.fetch_add(1, Ordering::SeqCst);
            (self.generation)(prompt)
        }
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<String, Quiz>>,
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.values().find(|q| q.code == code).cloned())
    }

    async fn code_exists(&self, code: &str) -> AppResult<bool> {
        Ok(self.find_by_code(code).await?.is_some())
    }

    async fn list_by_owner(&self, user_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes
            .values()
            .filter(|q| q.created_by_user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.values().any(|q| q.code == quiz.code) {
            return Err(AppError::AlreadyExists(format!("Quiz code {}", quiz.code)));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }
}

#[derive(Default)]
pub struct InMemoryQuizAttemptRepository {
    attempts: RwLock<HashMap<String, QuizAttempt>>,
}

impl InMemoryQuizAttemptRepository {
    pub async fn all(&self) -> Vec<QuizAttempt> {
        self.attempts.read().await.values().cloned().collect()
    }
}

fn newest_first(mut attempts: Vec<QuizAttempt>) -> Vec<QuizAttempt> {
    attempts.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    attempts
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.attempts
            .write()
            .await
            .insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_open(&self, quiz_id: &str, student_id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .find(|a| a.quiz_id == quiz_id && a.student_id == student_id && !a.completed)
            .cloned())
    }

    async fn finalize(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        match attempts.get(&attempt.id) {
            Some(stored) if !stored.completed => {
                attempts.insert(attempt.id.clone(), attempt.clone());
                Ok(attempt)
            }
            _ => Err(AppError::Conflict(format!(
                "Submission '{}' is already finalized",
                attempt.id
            ))),
        }
    }

    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(newest_first(
            attempts
                .values()
                .filter(|a| a.quiz_id == quiz_id && a.completed)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(newest_first(
            attempts
                .values()
                .filter(|a| a.student_id == student_id && a.completed)
                .cloned()
                .collect(),
        ))
    }
}

#[derive(Default)]
pub struct InMemoryProgressRepository {
    records: RwLock<HashMap<(String, String), MasteryProgress>>,
    fail_writes: AtomicBool,
}

impl InMemoryProgressRepository {
    /// Makes `raise_level` fail with a database error until switched back.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn find(&self, user_id: &str, topic: &str) -> AppResult<Option<MasteryProgress>> {
        let records = self.records.read().await;
        Ok(records
            .get(&(user_id.to_string(), topic.to_string()))
            .cloned())
    }

    async fn raise_level(&self, user_id: &str, topic: &str, level: u32) -> AppResult<MasteryProgress> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("progress store unavailable".to_string()));
        }
        let mut records = self.records.write().await;
        let record = records
            .entry((user_id.to_string(), topic.to_string()))
            .or_insert_with(|| MasteryProgress::new(user_id, topic));
        record.raise_to(level);
        record.modified_at = Some(Utc::now());
        Ok(record.clone())
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<MasteryProgress>> {
        let records = self.records.read().await;
        let mut items: Vec<_> = records
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.topic.cmp(&b.topic));
        Ok(items)
    }
}

#[derive(Default)]
pub struct InMemoryPracticeSessionRepository {
    sessions: RwLock<HashMap<String, PracticeSession>>,
}

#[async_trait]
impl PracticeSessionRepository for InMemoryPracticeSessionRepository {
    async fn create(&self, session: PracticeSession) -> AppResult<PracticeSession> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<PracticeSession>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn take(&self, id: &str) -> AppResult<Option<PracticeSession>> {
        Ok(self.sessions.write().await.remove(id))
    }
}

/// Application state over in-memory stores, with handles kept for assertions.
pub struct TestHarness {
    pub state: AppState,
    pub generator: Arc<ScriptedGenerator>,
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub attempts: Arc<InMemoryQuizAttemptRepository>,
    pub progress: Arc<InMemoryProgressRepository>,
    pub sessions: Arc<InMemoryPracticeSessionRepository>,
}

impl TestHarness {
    pub fn new(generator: ScriptedGenerator) -> Self {
        let generator = Arc::new(generator);
        let quizzes = Arc::new(InMemoryQuizRepository::default());
        let attempts = Arc::new(InMemoryQuizAttemptRepository::default());
        let progress = Arc::new(InMemoryProgressRepository::default());
        let sessions = Arc::new(InMemoryPracticeSessionRepository::default());

        let state = AppState::from_parts(
            test_config(),
            generator.clone(),
            Repositories {
                quizzes: quizzes.clone(),
                attempts: attempts.clone(),
                progress: progress.clone(),
                sessions: sessions.clone(),
            },
        );

        Self {
            state,
            generator,
            quizzes,
            attempts,
            progress,
            sessions,
        }
    }
}
