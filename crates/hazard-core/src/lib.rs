//! Core types and pure transforms for the hazard alert map.
//!
//! This crate holds everything that does not touch the network or a map
//! surface:
//!
//! - [`classify_zone`] / [`area_display`] - area code lookups
//! - [`normalize`] / [`normalize_document`] - raw feed records to [`Alert`]s
//! - [`rank`] / [`filter`] / [`process`] - display ordering and filtering
//! - [`Pager`] - "show more" pagination over the processed list
//! - [`TtlCache`] - bounded, time-boxed memoization
//!
//! # Example
//!
//! ```rust
//! use hazard_core::{normalize_document, process, FilterState};
//! use serde_json::json;
//!
//! let feed = json!([
//!     {"idAreaAviso": "LRA", "awarenessTypeName": "Vento", "awarenessLevelID": "orange"},
//!     {"idAreaAviso": "PRT", "awarenessTypeName": "Mar", "awarenessLevelID": "green"},
//! ]);
//!
//! let alerts = normalize_document(&feed).unwrap();
//! let shown = process(&alerts, &FilterState::default());
//! assert_eq!(shown.len(), 1);
//! assert_eq!(shown[0].area_display(), "Leiria (LRA)");
//! ```

mod alert;
mod cache;
mod error;
mod filter;
mod level;
mod normalize;
mod page;
mod rank;
mod zone;

pub use alert::{Alert, AlertEnvelope, Anchor, RawAlertRecord, DEFAULT_SOURCE_NAME, DEFAULT_SOURCE_URL};
pub use cache::{content_key, TtlCache};
pub use error::EnvelopeError;
pub use filter::{filter, matches_level, matches_query, matches_zone, FilterState, LevelFilter, ZoneFilter};
pub use level::AlertLevel;
pub use normalize::{extract_records, normalize, normalize_document, normalize_values};
pub use page::{Pager, INITIAL_PAGE_SIZE, PAGE_STEP};
pub use rank::{compare, parse_time_millis, process, rank, severity};
pub use zone::{area_display, area_name, classify_zone, Zone};
