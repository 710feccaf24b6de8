//! Network side of the hazard alert map.
//!
//! [`AlertGate`] fetches the public warnings document under a fixed deadline
//! and hands back either the full normalized list or a typed
//! [`IngestionError`]. [`NominatimClient`] and [`DebouncedSearch`] back the
//! place search used when picking a location.

mod cancel;
mod config;
mod error;
mod gate;
mod geocode;

pub use cancel::{CancelFlag, CancelGuard};
pub use config::{FeedConfig, DEFAULT_TIMEOUT, IPMA_WARNINGS_URL};
pub use error::{truncate_body, IngestionError, MAX_ERROR_BODY};
pub use gate::{AlertGate, AlertSource, StaticSource};
pub use geocode::{
    DebouncedSearch, Geocoder, NominatimClient, Place, Suggestions, NOMINATIM_URL,
    SEARCH_DEBOUNCE,
};
