use std::{future::Future, time::Duration};

use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::config::AiConfig;
use crate::errors::ModelError;

/// A hosted text model: prompt in, free-form text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiTextGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiTextGenerator {
    pub fn new(config: &AiConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.api_base);

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let request = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        let chat = self.client.chat();
        let call = chat.create_byot(request);
        let response: Value = with_deadline(self.timeout, call).await.inspect_err(|e| {
            if matches!(e, ModelError::Timeout(_)) {
                log::warn!("Model call to {} timed out", self.model);
            }
        })?;

        extract_message_text(&response).ok_or(ModelError::EmptyResponse)
    }
}

/// Runs a client call under `timeout`, folding both failure kinds into `ModelError`.
async fn with_deadline<T>(
    timeout: Duration,
    call: impl Future<Output = Result<T, OpenAIError>>,
) -> Result<T, ModelError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(response) => response.map_err(|e| ModelError::Request(e.to_string())),
        Err(_) => Err(ModelError::Timeout(timeout.as_secs())),
    }
}

/// Pulls the first choice's message content out of a chat-completions body.
fn extract_message_text(response: &Value) -> Option<String> {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
