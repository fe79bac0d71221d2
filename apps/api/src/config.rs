use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::wizard::store::DEFAULT_SESSION_TTL;

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; a missing API key switches the
/// service to fallback-only strategies.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    /// 1 means a single request with no retry.
    pub llm_max_attempts: u32,
    pub max_upload_bytes: usize,
    /// Idle wizard sessions older than this are evicted.
    pub session_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            llm_max_attempts: parse_env::<u32>("LLM_MAX_ATTEMPTS", 1)?.max(1),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            session_ttl_secs: parse_env("SESSION_TTL_SECS", DEFAULT_SESSION_TTL.as_secs())?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            anthropic_api_key: None,
            llm_model: DEFAULT_MODEL.to_string(),
            llm_timeout_secs: 120,
            llm_max_attempts: 1,
            max_upload_bytes: 5 * 1024 * 1024,
            session_ttl_secs: DEFAULT_SESSION_TTL.as_secs(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

/// Empty values count as unset so `ANTHROPIC_API_KEY=` in a `.env` disables the client.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
