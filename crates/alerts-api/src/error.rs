//! Error responses for the alerts API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hazard_core::AlertEnvelope;
use hazard_feed::IngestionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),
}

impl IntoResponse for ApiError {
    /// Same envelope as a success, with an empty list and an `error` field.
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Ingestion(err) => {
                tracing::error!("Alert feed error: {}", err);
                StatusCode::from_u16(err.gateway_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        };

        (status, Json(AlertEnvelope::failed(self.to_string()))).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
