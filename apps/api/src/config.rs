use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{LlmConfig, DEFAULT_API_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Everything has a default; optional services stay off when unset.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote document store. `None` keeps every session on the local store.
    pub database_url: Option<String>,
    pub local_store_path: PathBuf,
    /// External recommendation service. `None` disables the external strategy.
    pub recommender: Option<LlmConfig>,
    pub bind_addr: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let recommender = match optional_env("RECOMMENDER_API_KEY") {
            Some(api_key) => Some(LlmConfig {
                api_key,
                endpoint: env_or("RECOMMENDER_URL", DEFAULT_API_URL),
                model: env_or("RECOMMENDER_MODEL", DEFAULT_MODEL),
                timeout: Duration::from_secs(
                    env_or("RECOMMENDER_TIMEOUT_SECS", "30")
                        .parse::<u64>()
                        .context("RECOMMENDER_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
            }),
            None => None,
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            local_store_path: PathBuf::from(env_or("LOCAL_STORE_PATH", "./medskill-local.json")),
            recommender,
            bind_addr: env_or("BIND_ADDR", "127.0.0.1"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

/// Unset and blank both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
