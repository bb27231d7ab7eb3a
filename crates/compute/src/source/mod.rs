//! Where readings come from.
//!
//! Every backend implements [`DataSource`]. The engine only ever sees the
//! trait, so live HTTP, synthetic data and caching wrappers are
//! interchangeable.

mod cached;
mod http;
mod synthetic;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ecu_core::Reading;

pub use self::cached::CachedSource;
pub use self::http::{ApiResponse, HttpDataSource};
pub use self::synthetic::SyntheticSource;

/// Which readings to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadingQuery {
    pub device_id: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Maximum number of readings to return (most recent kept).
    pub limit: usize,
}

impl ReadingQuery {
    /// The `limit` one-minute samples ending at `to`.
    pub fn window(device_id: impl Into<String>, to: DateTime<Utc>, limit: usize) -> Self {
        let span = chrono::Duration::minutes(limit.saturating_sub(1) as i64);
        Self {
            device_id: device_id.into(),
            from: to - span,
            to,
            limit,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid source URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Trait for reading backends.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short label for logs and warnings.
    fn name(&self) -> &str;

    /// Readings for `query`, oldest first.
    async fn fetch(&self, query: &ReadingQuery) -> Result<Vec<Reading>, SourceError>;
}
