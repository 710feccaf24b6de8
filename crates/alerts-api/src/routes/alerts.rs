//! `GET /alerts`: the full normalized list, never filtered server-side.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use hazard_core::AlertEnvelope;
use tracing::{debug, info};

use crate::error::Result;
use crate::state::AppState;

pub async fn list_alerts(State(state): State<AppState>) -> Result<Json<AlertEnvelope>> {
    if let Some(alerts) = state.cached_alerts() {
        debug!(alerts = alerts.len(), "serving alerts from cache");
        return Ok(Json(AlertEnvelope::ok(alerts.as_ref().clone())));
    }

    let alerts = Arc::new(state.source.fetch_alerts().await?);
    info!(alerts = alerts.len(), source = %state.source.describe(), "refreshed alerts");
    state.store_alerts(alerts.clone());
    Ok(Json(AlertEnvelope::ok(alerts.as_ref().clone())))
}
