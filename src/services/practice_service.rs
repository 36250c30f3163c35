use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        progress::INITIAL_MASTERY_LEVEL, Difficulty, PracticeSession, Question, QuizFormat,
    },
    models::dto::{
        request::{GeneratePracticeQuizRequest, NextLevelRequest, SubmitPracticeRequest},
        response::{PracticeResultResponse, PracticeSessionView, ProgressView},
    },
    repositories::{PracticeSessionRepository, ProgressRepository},
    services::{
        quiz_generator::{GenerationRequest, QuizGenerator},
        submission_aggregator::SubmissionAggregator,
    },
};

/// Quizzes generated for "next level" and "continue learning" are 5 mcq.
pub const GUIDED_MCQ_COUNT: u32 = 5;

/// Self-practice: generate, take, grade and track mastery per topic.
pub struct PracticeService {
    generator: Arc<QuizGenerator>,
    aggregator: Arc<SubmissionAggregator>,
    sessions: Arc<dyn PracticeSessionRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl PracticeService {
    pub fn new(
        generator: Arc<QuizGenerator>,
        aggregator: Arc<SubmissionAggregator>,
        sessions: Arc<dyn PracticeSessionRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            generator,
            aggregator,
            sessions,
            progress,
        }
    }

    pub async fn start(
        &self,
        user_id: &str,
        request: GeneratePracticeQuizRequest,
    ) -> AppResult<PracticeSessionView> {
        request.validate()?;

        let topic = normalize_topic(&request.topic)?;
        let level = self.current_level(user_id, &topic).await?;

        let generation = match request.difficulty {
            Some(difficulty) => GenerationRequest::new(topic.clone(), difficulty, request.format)
                .with_counts(request.mcq_count, request.subjective_count),
            None => guided_request(&topic, Difficulty::from_mastery_level(level)),
        };

        self.open_session(user_id, &topic, level, generation).await
    }

    /// Generates the tier after `current_difficulty`; difficult stays difficult.
    pub async fn next_level(
        &self,
        user_id: &str,
        request: NextLevelRequest,
    ) -> AppResult<PracticeSessionView> {
        request.validate()?;

        let topic = normalize_topic(&request.topic)?;
        let level = self.current_level(user_id, &topic).await?;
        let generation = guided_request(&topic, request.current_difficulty.next());

        self.open_session(user_id, &topic, level, generation).await
    }

    pub async fn get_session(&self, user_id: &str, session_id: &str) -> AppResult<PracticeSessionView> {
        let session = self.owned_session(user_id, session_id).await?;
        Ok(PracticeSessionView::from(&session))
    }

    pub async fn submit(
        &self,
        user_id: &str,
        session_id: &str,
        request: SubmitPracticeRequest,
    ) -> AppResult<PracticeResultResponse> {
        request.validate()?;

        let session = self.owned_session(user_id, session_id).await?;
        if request.answers.len() != session.questions.len() {
            return Err(AppError::ValidationError(format!(
                "Expected {} answers, got {}",
                session.questions.len(),
                request.answers.len()
            )));
        }

        let prior_level = self.current_level(user_id, &session.topic).await?;
        let pairs: Vec<(Question, String)> = session
            .questions
            .iter()
            .cloned()
            .zip(request.answers)
            .collect();
        let result = self
            .aggregator
            .aggregate(&pairs, prior_level, session.attempted_level)
            .await;

        // Taking the session is the commit point; a concurrent submit loses here.
        if self.sessions.take(session_id).await?.is_none() {
            return Err(AppError::Conflict(format!(
                "Practice session '{}' was already submitted",
                session_id
            )));
        }

        let progress = match self
            .progress
            .raise_level(user_id, &session.topic, result.mastery_level)
            .await
        {
            Ok(progress) => progress,
            Err(err) => {
                log::error!(
                    "Could not record mastery for practice session {}: {}",
                    session.id,
                    err
                );
                // Put the session back so the learner can submit again.
                if let Err(restore_err) = self.sessions.create(session).await {
                    log::error!("Could not restore practice session: {}", restore_err);
                }
                return Err(err);
            }
        };

        log::info!(
            "Practice session {} on '{}' scored {:.1}% (mastery {} -> {})",
            session.id,
            session.topic,
            result.percentage,
            prior_level,
            progress.level
        );

        Ok(PracticeResultResponse {
            topic: session.topic,
            difficulty: session.difficulty,
            recommended_difficulty: progress.recommended_difficulty(),
            result,
        })
    }

    pub async fn list_progress(&self, user_id: &str) -> AppResult<Vec<ProgressView>> {
        let records = self.progress.list_by_user(user_id).await?;
        Ok(records.into_iter().map(ProgressView::from).collect())
    }

    async fn current_level(&self, user_id: &str, topic: &str) -> AppResult<u32> {
        Ok(self
            .progress
            .find(user_id, topic)
            .await?
            .map(|progress| progress.level)
            .unwrap_or(INITIAL_MASTERY_LEVEL))
    }

    async fn owned_session(&self, user_id: &str, session_id: &str) -> AppResult<PracticeSession> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Practice session '{}' not found", session_id))
            })?;

        if !session.is_owned_by(user_id) {
            return Err(AppError::Forbidden(
                "This practice session belongs to another learner".to_string(),
            ));
        }
        Ok(session)
    }

    async fn open_session(
        &self,
        user_id: &str,
        topic: &str,
        level: u32,
        generation: GenerationRequest,
    ) -> AppResult<PracticeSessionView> {
        let questions = self.generator.generate(&generation).await?;
        let session = PracticeSession::new(user_id, topic, generation.difficulty, level, questions);
        let session = self.sessions.create(session).await?;

        Ok(PracticeSessionView::from(&session))
    }
}

fn guided_request(topic: &str, difficulty: Difficulty) -> GenerationRequest {
    GenerationRequest::new(topic, difficulty, QuizFormat::Mcq).with_counts(GUIDED_MCQ_COUNT, 0)
}

fn normalize_topic(raw: &str) -> AppResult<String> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(AppError::ValidationError("Topic must not be empty".to_string()));
    }
    Ok(topic.to_string())
}
