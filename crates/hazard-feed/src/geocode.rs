//! Place search for the location picker, with debouncing and a result cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use hazard_core::{content_key, TtlCache};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::IngestionError;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
const RESULT_LIMIT: &str = "5";
const CACHE_TTL: Duration = Duration::from_secs(300);
const USER_AGENT: &str = "leiria-resolve-app";

/// One geocoding hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Nominatim reports coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimHit {
    #[serde(default)]
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimHit {
    fn into_place(self) -> Option<Place> {
        let latitude: f64 = self.lat.trim().parse().ok()?;
        let longitude: f64 = self.lon.trim().parse().ok()?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some(Place {
            display_name: self.display_name,
            latitude,
            longitude,
        })
    }
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, text: &str) -> Result<Vec<Place>, IngestionError>;
}

/// Nominatim search restricted to Portugal.
#[derive(Debug)]
pub struct NominatimClient {
    http: Client,
    base_url: String,
    cache: Mutex<TtlCache<String, Vec<Place>>>,
}

impl NominatimClient {
    pub fn new() -> Result<Self, IngestionError> {
        Self::with_base_url(NOMINATIM_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, IngestionError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(8))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| IngestionError::UpstreamUnreachable(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Mutex::new(TtlCache::with_capacity(CACHE_TTL, 256)),
        })
    }

    fn cached(&self, key: &String) -> Option<Vec<Place>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn search(&self, text: &str) -> Result<Vec<Place>, IngestionError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let key = content_key(&[&self.base_url, &text.to_lowercase()]);
        if let Some(places) = self.cached(&key) {
            debug!("place search cache hit: {}", text);
            return Ok(places);
        }

        let query = format!("{}, Portugal", text);
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("format", "json"),
                ("limit", RESULT_LIMIT),
                ("countrycodes", "pt"),
                ("q", query.as_str()),
            ])
            .send()
            .await
            .map_err(|e| IngestionError::UpstreamUnreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IngestionError::UpstreamUnreachable(e.to_string()))?;
        if !status.is_success() {
            return Err(IngestionError::http(status.as_u16(), &body));
        }

        let hits: Vec<NominatimHit> = serde_json::from_str(&body)
            .map_err(|e| IngestionError::MalformedResponse(e.to_string()))?;
        let places: Vec<Place> = hits.into_iter().filter_map(NominatimHit::into_place).collect();

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, places.clone());
        Ok(places)
    }
}

/// Suggestions for the latest search text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestions {
    pub query: String,
    pub places: Vec<Place>,
}

/// Debounced search-as-you-type.
///
/// Each keystroke bumps a generation counter and schedules a search after
/// the debounce delay; a search only runs, and its result is only
/// published, if no newer input arrived in the meantime.
pub struct DebouncedSearch {
    geocoder: Arc<dyn Geocoder>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    tx: watch::Sender<Suggestions>,
}

impl DebouncedSearch {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::with_delay(geocoder, SEARCH_DEBOUNCE)
    }

    pub fn with_delay(geocoder: Arc<dyn Geocoder>, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(Suggestions::default());
        Self {
            geocoder,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Suggestions> {
        self.tx.subscribe()
    }

    /// Latest published suggestions.
    pub fn current(&self) -> Suggestions {
        self.tx.borrow().clone()
    }

    /// Register new search text. Empty text clears suggestions immediately.
    pub fn input(&self, text: &str) -> Option<JoinHandle<()>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let text = text.trim().to_string();
        if text.is_empty() {
            self.tx.send_replace(Suggestions::default());
            return None;
        }

        let geocoder = self.geocoder.clone();
        let latest = self.generation.clone();
        let tx = self.tx.clone();
        let delay = self.delay;
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }
            let places = geocoder.search(&text).await.unwrap_or_else(|e| {
                warn!("place search failed: {}", e);
                Vec::new()
            });
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }
            tx.send_replace(Suggestions {
                query: text,
                places,
            });
        }))
    }
}
