//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Alerts API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server bind address.
    pub addr: SocketAddr,
    /// How long a successful upstream answer is served from cache.
    pub cache_ttl: Duration,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ALERTS_API_ADDR` | Server bind address | `127.0.0.1:8789` |
    /// | `ALERTS_CACHE_TTL_SECS` | Cache lifetime in seconds | `60` |
    ///
    /// The upstream feed itself is configured through `HAZARD_FEED_*`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("ALERTS_API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8789".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let cache_ttl = match env::var("ALERTS_CACHE_TTL_SECS") {
            Ok(v) => v
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTtl(v))?,
            Err(_) => Duration::from_secs(60),
        };

        Ok(Self { addr, cache_ttl })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ALERTS_API_ADDR format")]
    InvalidAddr,

    #[error("Invalid ALERTS_CACHE_TTL_SECS: {0}")]
    InvalidTtl(String),
}
