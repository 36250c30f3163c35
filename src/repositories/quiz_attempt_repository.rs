use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::QuizAttempt,
};

/// Student submissions for shared quizzes.
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    /// The uncompleted attempt of `student_id` on `quiz_id`, if one is open.
    async fn find_open(&self, quiz_id: &str, student_id: &str) -> AppResult<Option<QuizAttempt>>;
    /// Replaces the stored attempt only while it is still open.
    /// Fails with `Conflict` when another finalizer got there first.
    async fn finalize(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>>;
    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>>;
}

pub struct MongoQuizAttemptRepository {
    collection: Collection<QuizAttempt>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_student_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "student_id": 1, "completed": 1 })
            .options(
                IndexOptions::builder()
                    .name("quiz_student_completed".to_string())
                    .build(),
            )
            .build();

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "submitted_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("student_submitted_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(quiz_student_index).await?;
        self.collection.create_index(student_index).await?;

        log::info!("Successfully created indexes for quiz_attempts collection");
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn find_open(&self, quiz_id: &str, student_id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempt = self
            .collection
            .find_one(doc! {
                "quiz_id": quiz_id,
                "student_id": student_id,
                "completed": false
            })
            .await?;
        Ok(attempt)
    }

    async fn finalize(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let result = self
            .collection
            .replace_one(doc! { "id": &attempt.id, "completed": false }, &attempt)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::Conflict(format!(
                "Submission '{}' is already finalized",
                attempt.id
            )));
        }
        Ok(attempt)
    }

    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "quiz_id": quiz_id, "completed": true })
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "student_id": student_id, "completed": true })
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }
}
