//! The single door between the warning feed and everything else.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use hazard_core::{normalize_document, Alert};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cancel::CancelFlag;
use crate::config::FeedConfig;
use crate::error::IngestionError;

const USER_AGENT: &str = concat!("hazard-feed/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce the current normalized alert list.
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// The full normalized list, or a typed error. Never a partial list.
    async fn fetch_alerts(&self) -> Result<Vec<Alert>, IngestionError>;

    /// Stable description used for logs and cache keys.
    fn describe(&self) -> String;
}

/// HTTP client for the upstream warnings document.
#[derive(Debug, Clone)]
pub struct AlertGate {
    http: Client,
    config: FeedConfig,
}

impl AlertGate {
    pub fn new(config: FeedConfig) -> Result<Self, IngestionError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| IngestionError::UpstreamUnreachable(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Build from `HAZARD_FEED_*` environment variables.
    pub fn from_env() -> Result<Self, IngestionError> {
        Self::new(FeedConfig::from_env()?)
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Fetch and normalize the feed within the configured deadline.
    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, IngestionError> {
        let started = Instant::now();
        let document = tokio::time::timeout(self.config.timeout, self.fetch_document())
            .await
            .map_err(|_| IngestionError::UpstreamTimeout(self.config.timeout))??;

        let alerts = normalize_document(&document)?;
        info!(
            endpoint = %self.config.endpoint,
            alerts = alerts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched alert feed"
        );
        Ok(alerts)
    }

    /// Like [`fetch_alerts`](Self::fetch_alerts), but yields `None` when
    /// `cancel` was set while the request was in flight. The request itself
    /// is allowed to finish; only its result is dropped.
    pub async fn fetch_alerts_cancellable(
        &self,
        cancel: &CancelFlag,
    ) -> Option<Result<Vec<Alert>, IngestionError>> {
        if cancel.is_cancelled() {
            return None;
        }
        let result = self.fetch_alerts().await;
        if cancel.is_cancelled() {
            debug!("dropping alert fetch result after cancellation");
            return None;
        }
        Some(result)
    }

    async fn fetch_document(&self) -> Result<Value, IngestionError> {
        let mut request = self
            .http
            .get(&self.config.endpoint)
            .header(ACCEPT, "application/json");
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "alert feed returned an error status");
            return Err(IngestionError::http(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| IngestionError::MalformedResponse(e.to_string()))
    }

    fn transport_error(&self, e: reqwest::Error) -> IngestionError {
        if e.is_timeout() {
            IngestionError::UpstreamTimeout(self.config.timeout)
        } else {
            warn!("alert feed unreachable: {}", e);
            IngestionError::UpstreamUnreachable(e.to_string())
        }
    }
}

#[async_trait]
impl AlertSource for AlertGate {
    async fn fetch_alerts(&self) -> Result<Vec<Alert>, IngestionError> {
        AlertGate::fetch_alerts(self).await
    }

    fn describe(&self) -> String {
        self.config.endpoint.clone()
    }
}

/// Fixed answer, for offline hosts and tests. Counts how often it was asked.
#[derive(Debug)]
pub struct StaticSource {
    result: Result<Vec<Alert>, IngestionError>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self {
            result: Ok(alerts),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: IngestionError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertSource for StaticSource {
    async fn fetch_alerts(&self) -> Result<Vec<Alert>, IngestionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazard_core::RawAlertRecord;

    #[tokio::test]
    async fn test_static_source_counts_calls() {
        let alert = Alert::from_raw(&RawAlertRecord::new("LRA", "Vento", "red"));
        let source = StaticSource::new(vec![alert]);
        assert_eq!(source.fetch_alerts().await.unwrap().len(), 1);
        assert_eq!(source.fetch_alerts().await.unwrap().len(), 1);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failing_static_source() {
        let source = StaticSource::failing(IngestionError::http(500, "boom"));
        assert!(matches!(
            source.fetch_alerts().await,
            Err(IngestionError::UpstreamHttpError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_skips_request() {
        // Port 9 is discard; the request must never be sent.
        let gate = AlertGate::new(FeedConfig::new("http://127.0.0.1:9/warnings")).unwrap();
        let cancel = CancelFlag::new();
        cancel.cancel();
        assert!(gate.fetch_alerts_cancellable(&cancel).await.is_none());
    }
}
