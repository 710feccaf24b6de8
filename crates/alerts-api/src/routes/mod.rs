//! Route handlers for the alerts API.

pub mod alerts;
pub mod health;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/alerts", get(alerts::list_alerts))
        .route("/health", get(health::health))
        .layer(cors)
}
