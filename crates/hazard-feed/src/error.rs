//! Error types for hazard-feed.

use std::time::Duration;

use hazard_core::EnvelopeError;
use thiserror::Error;

/// Upstream bodies are cut to this many characters before being reported.
pub const MAX_ERROR_BODY: usize = 200;

/// Errors that can occur while ingesting the warning feed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestionError {
    /// The feed endpoint is not configured.
    #[error("{0} environment variable is required")]
    ConfigMissing(&'static str),

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {status}: {body}")]
    UpstreamHttpError { status: u16, body: String },

    /// Upstream did not answer within the deadline.
    #[error("upstream did not answer within {0:?}")]
    UpstreamTimeout(Duration),

    /// Upstream answered 2xx with something that is not a warning document.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// The request never reached upstream (DNS, connect, TLS).
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),
}

impl IngestionError {
    pub fn http(status: u16, body: &str) -> Self {
        IngestionError::UpstreamHttpError {
            status,
            body: truncate_body(body),
        }
    }

    /// HTTP status a proxy should answer with for this failure.
    pub fn gateway_status(&self) -> u16 {
        match self {
            IngestionError::UpstreamHttpError { .. } => 502,
            IngestionError::UpstreamTimeout(_) => 504,
            _ => 500,
        }
    }
}

impl From<EnvelopeError> for IngestionError {
    fn from(e: EnvelopeError) -> Self {
        IngestionError::MalformedResponse(e.to_string())
    }
}

/// Keep at most [`MAX_ERROR_BODY`] characters, on a char boundary.
pub fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}
