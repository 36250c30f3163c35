use std::env;
use std::time::Duration;

use secrecy::SecretString;

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";
const DEFAULT_AI_API_KEY: &str = "ai_api_key";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub ai: AiConfig,
}

/// Connection settings for the OpenAI-compatible text model.
#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_key: SecretString,
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "bloomquiz-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            ai: AiConfig {
                api_key: SecretString::from(
                    env::var("AI_API_KEY").unwrap_or_else(|_| DEFAULT_AI_API_KEY.to_string()),
                ),
                api_base: env::var("AI_API_BASE").unwrap_or_else(|_| {
                    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
                }),
                model: env::var("AI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
                timeout_secs: env::var("AI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|s: &u64| *s > 0)
                    .unwrap_or(60),
            },
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if self.ai.api_key.expose_secret() == DEFAULT_AI_API_KEY {
            panic!("FATAL: AI_API_KEY is using default value! Set AI_API_KEY environment variable.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "bloomquiz-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            ai: AiConfig {
                api_key: SecretString::from("test-ai-key".to_string()),
                api_base: "http://127.0.0.1:9".to_string(),
                model: "test-model".to_string(),
                timeout_secs: 1,
            },
        }
    }
}
