//! Feed configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::error::IngestionError;

/// Public IPMA warnings document.
pub const IPMA_WARNINGS_URL: &str =
    "https://api.ipma.pt/open-data/forecast/warnings/warnings_www.json";

/// Deadline for one fetch, covering send and body read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Where and how to fetch the warning feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Endpoint returning the warnings JSON document.
    pub endpoint: String,
    /// Optional key, sent as `Authorization: Bearer` and `apikey`.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl FeedConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `HAZARD_FEED_URL` | Warnings endpoint | (required) |
    /// | `HAZARD_FEED_API_KEY` | Bearer key | none |
    /// | `HAZARD_FEED_TIMEOUT_SECS` | Fetch deadline, whole seconds above 0 | `8` |
    pub fn from_env() -> Result<Self, IngestionError> {
        let endpoint = env::var("HAZARD_FEED_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(IngestionError::ConfigMissing("HAZARD_FEED_URL"))?;

        let api_key = env::var("HAZARD_FEED_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let timeout = parse_timeout(env::var("HAZARD_FEED_TIMEOUT_SECS").ok().as_deref());

        Ok(Self {
            endpoint,
            api_key,
            timeout,
        })
    }
}

/// Seconds from the environment; zero or unparseable input keeps the default.
fn parse_timeout(value: Option<&str>) -> Duration {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT)
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new(IPMA_WARNINGS_URL)
    }
}
