use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use uuid::Uuid;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::MasteryProgress,
};

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn find(&self, user_id: &str, topic: &str) -> AppResult<Option<MasteryProgress>>;
    /// Creates the record if missing and moves its level up to `level`.
    /// A lower `level` leaves an existing record unchanged.
    async fn raise_level(&self, user_id: &str, topic: &str, level: u32) -> AppResult<MasteryProgress>;
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<MasteryProgress>>;
}

pub struct MongoProgressRepository {
    collection: Collection<MasteryProgress>,
}

impl MongoProgressRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("progress");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for progress collection");

        let user_topic_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "topic": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_topic_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(user_topic_index).await?;

        log::info!("Successfully created indexes for progress collection");
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for MongoProgressRepository {
    async fn find(&self, user_id: &str, topic: &str) -> AppResult<Option<MasteryProgress>> {
        let progress = self
            .collection
            .find_one(doc! { "user_id": user_id, "topic": topic })
            .await?;
        Ok(progress)
    }

    async fn raise_level(&self, user_id: &str, topic: &str, level: u32) -> AppResult<MasteryProgress> {
        let now = to_bson(&Utc::now())?;
        let update = doc! {
            "$max": { "level": i64::from(level) },
            "$set": { "modified_at": now.clone() },
            "$setOnInsert": {
                "id": Uuid::new_v4().to_string(),
                "created_at": now,
            },
        };

        self.collection
            .find_one_and_update(doc! { "user_id": user_id, "topic": topic }, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Progress upsert for '{}' on '{}' returned no document",
                    user_id, topic
                ))
            })
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<MasteryProgress>> {
        let records = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "topic": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }
}
