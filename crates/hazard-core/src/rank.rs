//! Severity ranking.

use std::cmp::{Ordering, Reverse};

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::alert::Alert;
use crate::filter::{filter, FilterState};
use crate::level::AlertLevel;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Higher is more severe. `Unknown` scores 0 so the mapping stays total.
pub fn severity(level: AlertLevel) -> u8 {
    match level {
        AlertLevel::Red => 3,
        AlertLevel::Orange => 2,
        AlertLevel::Yellow => 1,
        AlertLevel::Unknown => 0,
    }
}

/// Parse a feed timestamp into epoch millis.
///
/// Accepts RFC 3339 and zone-less ISO forms (read as UTC). Missing or
/// unparseable input yields 0, which sorts as the oldest possible start.
pub fn parse_time_millis(ts: Option<&str>) -> i64 {
    let Some(ts) = ts.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.timestamp_millis();
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(ts, fmt) {
            return dt.and_utc().timestamp_millis();
        }
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

/// Display order: most severe first, then most recent start first.
pub fn compare(a: &Alert, b: &Alert) -> Ordering {
    severity(b.level)
        .cmp(&severity(a.level))
        .then_with(|| b.starts_at_millis().cmp(&a.starts_at_millis()))
}

/// Sort alerts for display. Stable for alerts that compare equal.
pub fn rank(mut alerts: Vec<Alert>) -> Vec<Alert> {
    alerts.sort_by_cached_key(|a| (Reverse(severity(a.level)), Reverse(a.starts_at_millis())));
    alerts
}

/// The full display pipeline: `rank(filter(alerts, state))`.
pub fn process(alerts: &[Alert], state: &FilterState) -> Vec<Alert> {
    rank(filter(alerts, state))
}
