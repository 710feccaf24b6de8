//! Error types for alert-board.

use hazard_feed::IngestionError;
use map_surface::ReconcileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("alert ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("map rendering failed: {0}")]
    Reconcile(#[from] ReconcileError),

    /// A point source could not produce its records.
    #[error("point source failed: {0}")]
    Points(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
