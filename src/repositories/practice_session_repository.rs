use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::PracticeSession};

#[async_trait]
pub trait PracticeSessionRepository: Send + Sync {
    async fn create(&self, session: PracticeSession) -> AppResult<PracticeSession>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<PracticeSession>>;
    /// Removes the session and returns it, or `None` if it was already taken.
    async fn take(&self, id: &str) -> AppResult<Option<PracticeSession>>;
}

pub struct MongoPracticeSessionRepository {
    collection: Collection<PracticeSession>,
}

impl MongoPracticeSessionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("practice_sessions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for practice_sessions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        log::info!("Successfully created indexes for practice_sessions collection");
        Ok(())
    }
}

#[async_trait]
impl PracticeSessionRepository for MongoPracticeSessionRepository {
    async fn create(&self, session: PracticeSession) -> AppResult<PracticeSession> {
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<PracticeSession>> {
        let session = self.collection.find_one(doc! { "id": id }).await?;
        Ok(session)
    }

    async fn take(&self, id: &str) -> AppResult<Option<PracticeSession>> {
        let session = self.collection.find_one_and_delete(doc! { "id": id }).await?;
        Ok(session)
    }
}
