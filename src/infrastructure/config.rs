use serde::Serialize;

use crate::domain::{DomainError, Result};

pub const DEFAULT_PORT: u16 = 8000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Immutable process configuration, read from the environment once at
/// startup and passed explicitly. Missing required values abort startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub vector_store_id: String,
    pub assistant_id: String,
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = require("OPENAI_API_KEY")?;
        let vector_store_id = require("VECTOR_STORE_ID")?;
        let assistant_id = require("ASSISTANT_ID")?;

        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.into());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| DomainError::config(format!("PORT must be a number, got {raw:?}")))?,
            Err(_) => DEFAULT_PORT,
        };
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            vector_store_id,
            assistant_id,
            host,
            port,
            base_url,
        })
    }

    /// Non-secret summary for the health endpoint: which values are set,
    /// and the public identifiers. The API key itself never leaves the
    /// process.
    pub fn presence(&self) -> ConfigPresence {
        ConfigPresence {
            api_key_present: !self.api_key.is_empty(),
            vector_store_id: self.vector_store_id.clone(),
            assistant_id: self.assistant_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigPresence {
    pub api_key_present: bool,
    pub vector_store_id: String,
    pub assistant_id: String,
}

fn require(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| DomainError::config(format!("{key} environment variable is required")))
}
