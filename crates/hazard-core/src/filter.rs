//! Filter predicates over normalized alerts.
//!
//! The zone, level and text predicates are independent of one another, so
//! applying them in any order gives the same result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alert::Alert;
use crate::level::AlertLevel;
use crate::zone::Zone;

/// Zone selection: everything, or a single bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ZoneFilter {
    #[default]
    All,
    Only(Zone),
}

/// Level selection: everything, or a single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LevelFilter {
    #[default]
    All,
    Only(AlertLevel),
}

impl FromStr for ZoneFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(ZoneFilter::All)
        } else {
            s.parse().map(ZoneFilter::Only)
        }
    }
}

impl FromStr for LevelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(LevelFilter::All)
        } else {
            s.parse().map(LevelFilter::Only)
        }
    }
}

impl TryFrom<String> for ZoneFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ZoneFilter> for String {
    fn from(value: ZoneFilter) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for LevelFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LevelFilter> for String {
    fn from(value: LevelFilter) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ZoneFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneFilter::All => f.write_str("all"),
            ZoneFilter::Only(zone) => fmt::Display::fmt(zone, f),
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFilter::All => f.write_str("all"),
            LevelFilter::Only(level) => fmt::Display::fmt(level, f),
        }
    }
}

/// What the user has selected in the filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub zone: ZoneFilter,
    #[serde(default)]
    pub level: LevelFilter,
    #[serde(default)]
    pub query: String,
}

impl FilterState {
    pub fn new(zone: ZoneFilter, level: LevelFilter, query: impl Into<String>) -> Self {
        Self {
            zone,
            level,
            query: query.into(),
        }
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        matches_zone(alert, self.zone)
            && matches_level(alert, self.level)
            && matches_query(alert, &self.query)
    }
}

pub fn matches_zone(alert: &Alert, zone: ZoneFilter) -> bool {
    match zone {
        ZoneFilter::All => true,
        ZoneFilter::Only(z) => alert.zone() == z,
    }
}

pub fn matches_level(alert: &Alert, level: LevelFilter) -> bool {
    match level {
        LevelFilter::All => true,
        LevelFilter::Only(l) => alert.level == l,
    }
}

/// Case-insensitive substring match against the title, the area label and
/// the raw area code. A blank query matches everything.
pub fn matches_query(alert: &Alert, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    alert.title.to_lowercase().contains(&q)
        || alert.area_display().to_lowercase().contains(&q)
        || alert.area.to_lowercase().contains(&q)
}

/// Keep the alerts matching every predicate in `state`, preserving order.
pub fn filter(alerts: &[Alert], state: &FilterState) -> Vec<Alert> {
    alerts
        .iter()
        .filter(|alert| state.matches(alert))
        .cloned()
        .collect()
}
