//! Error taxonomy for collection runs.
//!
//! Per-artist failures (`NotFound`, `RateLimited`, `Transient`, `Api`, `Parse`)
//! are recovered by the traversal loop. `ConfigMissing`, `Io` and `Csv` abort the
//! run.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollabError {
    #[error("Artist not found: {0}")]
    NotFound(String),

    #[error("Rate limited by upstream (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Transient error: {0}")]
    Transient(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    ConfigMissing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CollabError {
    /// Whether the request that produced this error may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CollabError::RateLimited { .. } | CollabError::Transient(_)
        )
    }

    /// Whether this error must abort the whole run instead of a single artist.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CollabError::ConfigMissing(_) | CollabError::Io(_) | CollabError::Csv(_)
        )
    }
}

pub type CollabResult<T> = Result<T, CollabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(CollabError::RateLimited { retry_after: None }.is_retryable());
        assert!(CollabError::Transient("timeout".into()).is_retryable());
        assert!(!CollabError::NotFound("x".into()).is_retryable());
        assert!(!CollabError::Api {
            status: 403,
            body: String::new()
        }
        .is_retryable());
    }

    #[test]
    fn test_fatal_classification() {
        assert!(CollabError::ConfigMissing("seeds.txt".into()).is_fatal());
        assert!(!CollabError::NotFound("x".into()).is_fatal());
        assert!(!CollabError::Parse("bad json".into()).is_fatal());
    }

    #[test]
    fn test_display_includes_context() {
        let err = CollabError::Api {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "API error 502: bad gateway");
    }
}
