//! HTTP endpoint in front of the official warnings feed.
//!
//! `GET /alerts` answers `{ "alerts": [...] }` with the full normalized list,
//! or the same envelope with an empty list and an `error` field when the
//! upstream fails. Successful answers are cached for a configurable TTL.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
