//! Runtime configuration loaded from `config.json`.
//!
//! Every section and field carries a default so a partial file (or no file at
//! all) falls back to the reference collection behaviour.

use crate::error::{CollabError, CollabResult};
use crate::logger::LogLevel;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Largest id list accepted by the batch artist endpoint and largest page size
/// accepted by the listing endpoints.
pub const MAX_API_PAGE: usize = 50;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub collection: CollectionConfig,
    pub pacing: PacingConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Number of traversal levels to expand. 1 expands the seeds only.
    pub max_depth: usize,
    /// Ids per batch profile request in the missing-profile pass.
    pub batch_size: usize,
    /// Page size for discography and track listings.
    pub page_size: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            batch_size: MAX_API_PAGE,
            page_size: MAX_API_PAGE,
        }
    }
}

/// Serialized throttling between upstream calls.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay after each successfully processed artist.
    pub artist_delay_ms: u64,
    /// Delay before each album track listing.
    pub album_delay_ms: u64,
    /// Delay after each batch profile request.
    pub batch_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            artist_delay_ms: 1000,
            album_delay_ms: 200,
            batch_delay_ms: 500,
        }
    }
}

impl PacingConfig {
    /// No delays at all. Used by tests and cache-backed replays.
    pub fn none() -> Self {
        Self {
            artist_delay_ms: 0,
            album_delay_ms: 0,
            batch_delay_ms: 0,
        }
    }

    pub fn artist_delay(&self) -> Duration {
        Duration::from_millis(self.artist_delay_ms)
    }

    pub fn album_delay(&self) -> Duration {
        Duration::from_millis(self.album_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
    pub timeout_s: u64,
    /// Retries for rate-limited and transient failures.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    /// Upper bound on a server-provided `Retry-After` wait.
    pub max_retry_after_ms: u64,
    /// Minimum interval between two HTTP requests.
    pub min_request_interval_ms: u64,
    /// Directory for cached successful responses. Disabled when unset.
    pub cache_dir: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.spotify.com/v1".to_string(),
            token_env: "SPOTIFY_ACCESS_TOKEN".to_string(),
            timeout_s: 10,
            max_retries: 3,
            backoff_base_ms: 500,
            max_retry_after_ms: 30_000,
            min_request_interval_ms: 0,
            cache_dir: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Parsed minimum level; unknown names fall back to `Info`.
    pub fn min_level(&self) -> LogLevel {
        LogLevel::parse(&self.level).unwrap_or(LogLevel::Info)
    }
}

impl Config {
    /// Checks the numeric bounds the collection pipeline relies on.
    pub fn validate(&self) -> CollabResult<()> {
        if self.collection.max_depth < 1 {
            return Err(CollabError::ConfigMissing(
                "collection.max_depth must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_API_PAGE).contains(&self.collection.batch_size) {
            return Err(CollabError::ConfigMissing(format!(
                "collection.batch_size must be between 1 and {}",
                MAX_API_PAGE
            )));
        }
        if !(1..=MAX_API_PAGE).contains(&self.collection.page_size) {
            return Err(CollabError::ConfigMissing(format!(
                "collection.page_size must be between 1 and {}",
                MAX_API_PAGE
            )));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(CollabError::ConfigMissing(
                "api.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parses configuration JSON and validates it.
pub fn parse_config(content: &str) -> CollabResult<Config> {
    let config: Config = serde_json::from_str(content)
        .map_err(|e| CollabError::ConfigMissing(format!("invalid config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Loads the configuration at `path`, or the defaults when the file does not exist.
pub fn load_config(path: &Path) -> CollabResult<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path).map_err(|e| {
        CollabError::ConfigMissing(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&content)
}
