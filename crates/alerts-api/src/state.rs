//! Application state shared across handlers.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use hazard_core::{content_key, Alert, TtlCache};
use hazard_feed::AlertSource;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Where alerts come from.
    pub source: Arc<dyn AlertSource>,
    cache: Arc<Mutex<TtlCache<String, Arc<Vec<Alert>>>>>,
    cache_key: String,
}

impl AppState {
    pub fn new(source: Arc<dyn AlertSource>, cache_ttl: Duration) -> Self {
        let cache_key = content_key(&["alerts", &source.describe()]);
        Self {
            source,
            cache: Arc::new(Mutex::new(TtlCache::with_capacity(cache_ttl, 16))),
            cache_key,
        }
    }

    pub fn cached_alerts(&self) -> Option<Arc<Vec<Alert>>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&self.cache_key)
    }

    pub fn store_alerts(&self, alerts: Arc<Vec<Alert>>) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.cache_key.clone(), alerts);
    }
}
