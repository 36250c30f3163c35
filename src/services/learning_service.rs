use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::dto::{request::LearningPathRequest, response::LearningPath},
    services::{model_service::TextGenerator, prompt_builder::build_learning_path_prompt},
};

/// Writes study guides for a topic; nothing is stored.
pub struct LearningPathService {
    generator: Arc<dyn TextGenerator>,
}

impl LearningPathService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate(&self, request: LearningPathRequest) -> AppResult<LearningPath> {
        request.validate()?;

        let topic = request.topic.trim();
        let style = request.style.trim();
        if topic.is_empty() {
            return Err(AppError::ValidationError("Topic must not be empty".to_string()));
        }
        if style.is_empty() {
            return Err(AppError::ValidationError(
                "Learning style must not be empty".to_string(),
            ));
        }

        let prompt = build_learning_path_prompt(topic, request.level, style);
        let reply = self.generator.complete(&prompt).await.map_err(|e| {
            log::error!("Learning path generation for '{}' failed: {}", topic, e);
            AppError::GenerationUnavailable(e.to_string())
        })?;

        let content = reply.trim();
        if content.is_empty() {
            return Err(AppError::GenerationUnavailable(
                "Model returned an empty learning path".to_string(),
            ));
        }

        log::info!(
            "Generated {} learning path on '{}' ({} chars)",
            request.level.as_str(),
            topic,
            content.len()
        );

        Ok(LearningPath {
            topic: topic.to_string(),
            level: request.level,
            style: style.to_string(),
            content: content.to_string(),
        })
    }
}
