use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoPracticeSessionRepository, MongoProgressRepository, MongoQuizAttemptRepository,
        MongoQuizRepository, PracticeSessionRepository, ProgressRepository, QuizAttemptRepository,
        QuizRepository,
    },
    services::{
        GradingService, LearningPathService, OpenAiTextGenerator, PracticeService, QuizGenerator,
        QuizService, SubmissionAggregator, TextGenerator,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub practice_service: Arc<PracticeService>,
    pub quiz_service: Arc<QuizService>,
    pub learning_service: Arc<LearningPathService>,
    pub config: Arc<Config>,
}

/// Repository handles the services are built from.
pub struct Repositories {
    pub quizzes: Arc<dyn QuizRepository>,
    pub attempts: Arc<dyn QuizAttemptRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub sessions: Arc<dyn PracticeSessionRepository>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;
        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;
        let progress_repository = Arc::new(MongoProgressRepository::new(&db));
        progress_repository.ensure_indexes().await?;
        let session_repository = Arc::new(MongoPracticeSessionRepository::new(&db));
        session_repository.ensure_indexes().await?;

        let text_generator = Arc::new(OpenAiTextGenerator::new(&config.ai));
        log::info!("Using text model '{}' at {}", text_generator.model(), config.ai.api_base);

        let repositories = Repositories {
            quizzes: quiz_repository,
            attempts: attempt_repository,
            progress: progress_repository,
            sessions: session_repository,
        };

        Ok(Self::from_parts(config, text_generator, repositories))
    }

    /// Wires services over any model and repository implementations.
    pub fn from_parts(
        config: Config,
        text_generator: Arc<dyn TextGenerator>,
        repositories: Repositories,
    ) -> Self {
        let generator = Arc::new(QuizGenerator::new(text_generator.clone()));
        let learning_service = Arc::new(LearningPathService::new(text_generator.clone()));
        let grading = Arc::new(GradingService::new(text_generator));
        let aggregator = Arc::new(SubmissionAggregator::new(grading));

        let practice_service = Arc::new(PracticeService::new(
            generator.clone(),
            aggregator.clone(),
            repositories.sessions,
            repositories.progress,
        ));
        let quiz_service = Arc::new(QuizService::new(
            generator,
            aggregator,
            repositories.quizzes,
            repositories.attempts,
        ));

        Self {
            practice_service,
            quiz_service,
            learning_service,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
