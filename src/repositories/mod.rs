pub mod practice_session_repository;
pub mod progress_repository;
pub mod quiz_attempt_repository;
pub mod quiz_repository;

pub use practice_session_repository::{MongoPracticeSessionRepository, PracticeSessionRepository};
pub use progress_repository::{MongoProgressRepository, ProgressRepository};
pub use quiz_attempt_repository::{MongoQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
