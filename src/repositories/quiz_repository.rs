use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::Quiz};

/// Teacher-owned shared quizzes.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    /// Codes are stored upper-case; callers pass the normalized code.
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Quiz>>;
    async fn code_exists(&self, code: &str) -> AppResult<bool>;
    async fn list_by_owner(&self, user_id: &str) -> AppResult<Vec<Quiz>>;
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let code_index = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("code_unique".to_string())
                    .build(),
            )
            .build();

        let owner_index = IndexModel::builder()
            .keys(doc! { "created_by_user_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("owner_created_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(code_index).await?;
        self.collection.create_index(owner_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "code": code }).await?;
        Ok(quiz)
    }

    async fn code_exists(&self, code: &str) -> AppResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "code": code })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn list_by_owner(&self, user_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! { "created_by_user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }
}
