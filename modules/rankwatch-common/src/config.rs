use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{RankWatchError, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // SerpApi
    pub serp_api_key: String,
    pub serpapi_timeout: Duration,

    // Web server
    pub host: String,
    pub port: u16,

    // Storage
    pub data_file: PathBuf,
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    /// `SERP_API_KEY` is required; there is no built-in key.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let serp_api_key = var("SERP_API_KEY").ok_or_else(|| {
            RankWatchError::Config("SERP_API_KEY environment variable is required".to_string())
        })?;

        let port = match var("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| RankWatchError::Config(format!("PORT must be a number, got {p:?}")))?,
            None => 3000,
        };

        let timeout_secs: u64 = match var("SERPAPI_TIMEOUT_SECS") {
            Some(t) => t.trim().parse().map_err(|_| {
                RankWatchError::Config(format!("SERPAPI_TIMEOUT_SECS must be a number, got {t:?}"))
            })?,
            None => 30,
        };

        Ok(Self {
            serp_api_key,
            serpapi_timeout: Duration::from_secs(timeout_secs),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            data_file: var("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("domains.json")),
        })
    }

    pub fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  SERP_API_KEY: {}", key_preview(&self.serp_api_key));
        tracing::info!("  SERPAPI_TIMEOUT_SECS: {}", self.serpapi_timeout.as_secs());
        tracing::info!("  DATA_FILE: {}", self.data_file.display());
    }
}

/// First five characters of a secret plus its length in characters.
fn key_preview(val: &str) -> String {
    let n = val.chars().take(5).map(char::len_utf8).sum();
    format!("{}...({} chars)", &val[..n], val.chars().count())
}
