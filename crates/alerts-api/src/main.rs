use std::sync::Arc;

use alerts_api::{router, ApiConfig, AppState};
use hazard_feed::{AlertGate, FeedConfig, IngestionError};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = ApiConfig::from_env()?;
    let feed = match FeedConfig::from_env() {
        Ok(feed) => feed,
        Err(IngestionError::ConfigMissing(var)) => {
            info!("{} not set, using the public IPMA feed", var);
            FeedConfig::default()
        }
        Err(e) => return Err(e.into()),
    };
    info!(addr = %config.addr, endpoint = %feed.endpoint, "Starting alerts API");

    let gate = AlertGate::new(feed)?;
    let state = AppState::new(Arc::new(gate), config.cache_ttl);
    let app = router().with_state(state);

    info!(addr = %config.addr, "Alerts API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
