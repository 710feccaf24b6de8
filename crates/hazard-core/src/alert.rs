//! Raw feed records and the canonical [`Alert`] shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::level::AlertLevel;
use crate::rank::parse_time_millis;
use crate::zone::{area_display, classify_zone, Zone};

pub const DEFAULT_SOURCE_NAME: &str = "IPMA";
pub const DEFAULT_SOURCE_URL: &str = "https://www.ipma.pt/";
const DEFAULT_TITLE: &str = "Aviso";

const AREA_KEYS: &[&str] = &["idAreaAviso", "areaCode", "area"];
const TYPE_KEYS: &[&str] = &["awarenessTypeName", "awarenessType", "type", "title"];
const LEVEL_KEYS: &[&str] = &["awarenessLevelID", "awarenessLevel", "level"];
const START_KEYS: &[&str] = &["startTime", "startsAt", "start"];
const END_KEYS: &[&str] = &["endTime", "endsAt", "end"];
const LAT_KEYS: &[&str] = &["latitude", "lat"];
const LNG_KEYS: &[&str] = &["longitude", "lon", "lng"];

/// A point an alert can be pinned to, when the feed supplies one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub latitude: f64,
    pub longitude: f64,
}

impl Anchor {
    /// Build an anchor, rejecting non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }
}

/// One upstream hazard record, after field-name reconciliation but before
/// any interpretation of its values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAlertRecord {
    pub area: String,
    pub type_name: Option<String>,
    pub level: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub source_name: Option<String>,
    pub source_url: Option<String>,
    pub anchor: Option<Anchor>,
}

impl RawAlertRecord {
    /// Convenience constructor used by fixtures and callers with typed input.
    pub fn new(area: impl Into<String>, type_name: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            type_name: Some(type_name.into()),
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Read a record out of an arbitrary JSON value.
    ///
    /// Returns `None` when the value is not an object. Each concept is looked
    /// up under several key spellings; the first non-empty one wins.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        Some(Self {
            area: first_scalar(obj, AREA_KEYS).unwrap_or_default(),
            type_name: first_scalar(obj, TYPE_KEYS),
            level: first_scalar(obj, LEVEL_KEYS).unwrap_or_default(),
            start: first_scalar(obj, START_KEYS),
            end: first_scalar(obj, END_KEYS),
            source_name: first_scalar(obj, &["sourceName"]),
            source_url: first_scalar(obj, &["sourceUrl"]),
            anchor: read_anchor(obj),
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn first_scalar(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(scalar_to_string)
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn first_number(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|key| obj.get(*key)).find_map(number)
}

fn read_anchor(obj: &Map<String, Value>) -> Option<Anchor> {
    if let Some(geometry) = obj.get("geometry").and_then(Value::as_object) {
        if geometry.get("type").and_then(Value::as_str) == Some("Point") {
            if let Some(coords) = geometry.get("coordinates").and_then(Value::as_array) {
                // GeoJSON order is [lng, lat].
                let lng = coords.first().and_then(number);
                let lat = coords.get(1).and_then(number);
                if let (Some(lat), Some(lng)) = (lat, lng) {
                    return Anchor::new(lat, lng);
                }
            }
        }
    }

    // Our own outbound shape.
    if let Some(anchor) = obj.get("anchor").and_then(Value::as_object) {
        let lat = first_number(anchor, LAT_KEYS);
        let lng = first_number(anchor, LNG_KEYS);
        if let (Some(lat), Some(lng)) = (lat, lng) {
            return Anchor::new(lat, lng);
        }
    }

    let lat = first_number(obj, LAT_KEYS)?;
    let lng = first_number(obj, LNG_KEYS)?;
    Anchor::new(lat, lng)
}

/// Canonical, display-ready alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub title: String,
    pub level: AlertLevel,
    /// Raw area code as sent by the feed.
    pub area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
    pub source_name: String,
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
}

impl Alert {
    /// Deterministic identity: the same upstream record always yields the
    /// same id, so re-ingesting a snapshot replaces instead of accumulating.
    pub fn derive_id(area: &str, title: &str, start: Option<&str>, level: AlertLevel) -> String {
        format!("{}-{}-{}-{}", area, title, start.unwrap_or(""), level.as_str())
    }

    pub fn from_raw(raw: &RawAlertRecord) -> Self {
        let level = AlertLevel::from_token(&raw.level);
        let title = raw
            .type_name
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let id = Self::derive_id(&raw.area, &title, raw.start.as_deref(), level);

        Self {
            id,
            title,
            level,
            area: raw.area.clone(),
            starts_at: raw.start.clone(),
            ends_at: raw.end.clone(),
            source_name: raw
                .source_name
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string()),
            source_url: raw
                .source_url
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            anchor: raw.anchor,
        }
    }

    /// Region bucket, recomputed from the area code on every call.
    pub fn zone(&self) -> Zone {
        classify_zone(&self.area)
    }

    pub fn area_display(&self) -> String {
        area_display(&self.area)
    }

    /// Start time in epoch millis; 0 when absent or unparseable.
    pub fn starts_at_millis(&self) -> i64 {
        parse_time_millis(self.starts_at.as_deref())
    }

    /// `"2024-01-01 10:00 — 2024-01-01 18:00"`, either side alone, or `None`.
    pub fn date_range(&self) -> Option<String> {
        let start = self.starts_at.as_deref().map(short_timestamp);
        let end = self.ends_at.as_deref().map(short_timestamp);
        match (start, end) {
            (Some(s), Some(e)) if !s.is_empty() && !e.is_empty() => Some(format!("{} — {}", s, e)),
            (Some(s), _) if !s.is_empty() => Some(s),
            (_, Some(e)) if !e.is_empty() => Some(e),
            _ => None,
        }
    }
}

fn short_timestamp(ts: &str) -> String {
    ts.replacen('T', " ", 1).chars().take(16).collect()
}

/// The outbound list shape consumed by the UI: `{ "alerts": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertEnvelope {
    pub alerts: Vec<Alert>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AlertEnvelope {
    pub fn ok(alerts: Vec<Alert>) -> Self {
        Self {
            alerts,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            alerts: Vec::new(),
            error: Some(error.into()),
        }
    }
}
