//! Weighted geo-points and the records they are built from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GeometryError;

/// Lifecycle of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(IssueStatus::Open),
            "in_progress" | "in-progress" => Ok(IssueStatus::InProgress),
            "resolved" => Ok(IssueStatus::Resolved),
            other => Err(format!("unknown issue status: {}", other)),
        }
    }
}

/// What a point represents. Drives marker styling and point weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum PointKind {
    Issue(IssueStatus),
    HelpNeed,
    HelpOffer,
}

impl PointKind {
    /// Weight contributed to a cluster. Open or urgent items weigh more than
    /// settled ones.
    pub fn weight(&self) -> f64 {
        match self {
            PointKind::Issue(IssueStatus::Open) => 2.0,
            PointKind::Issue(IssueStatus::InProgress) => 1.0,
            PointKind::Issue(IssueStatus::Resolved) => 0.6,
            PointKind::HelpNeed => 2.0,
            PointKind::HelpOffer => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PointKind::Issue(IssueStatus::Open) => "Open",
            PointKind::Issue(IssueStatus::InProgress) => "In Progress",
            PointKind::Issue(IssueStatus::Resolved) => "Resolved",
            PointKind::HelpNeed => "Pedido de ajuda",
            PointKind::HelpOffer => "Oferta de ajuda",
        }
    }
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated, weighted map point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub id: String,
    pub title: String,
    latitude: f64,
    longitude: f64,
    weight: f64,
    pub kind: PointKind,
    /// Issue category (`road_damage`, `lighting`, ...), when the source has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite coordinates.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        latitude: f64,
        longitude: f64,
        kind: PointKind,
    ) -> Result<Self, GeometryError> {
        let id = id.into();
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeometryError::NonFinite {
                id,
                latitude,
                longitude,
            });
        }
        Ok(Self {
            id,
            title: title.into(),
            latitude,
            longitude,
            weight: kind.weight(),
            kind,
            category: None,
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Anything that can be placed on the map: issues, help requests, or
/// records pushed by some other source.
pub trait Locatable {
    fn point_id(&self) -> String;
    fn point_title(&self) -> String;
    /// Raw coordinates, if the record has any.
    fn coordinates(&self) -> Option<(f64, f64)>;
    fn point_kind(&self) -> PointKind;

    fn point_category(&self) -> Option<String> {
        None
    }
}

/// Generic JSON point record:
/// `{id, title, latitude, longitude, status?, type?, category?}`.
///
/// `type` is `need` / `offer` for help requests; otherwise the record is an
/// issue and `status` selects its colour (missing status reads as open).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub help_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Locatable for PointRecord {
    fn point_id(&self) -> String {
        self.id.clone()
    }

    fn point_title(&self) -> String {
        self.title.clone()
    }

    fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    fn point_kind(&self) -> PointKind {
        match self.help_type.as_deref() {
            Some("need") => return PointKind::HelpNeed,
            Some("offer") => return PointKind::HelpOffer,
            _ => {}
        }
        let status = self
            .status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(IssueStatus::Open);
        PointKind::Issue(status)
    }

    fn point_category(&self) -> Option<String> {
        self.category.clone().filter(|c| !c.trim().is_empty())
    }
}

/// Convert records into points, skipping (and logging) any without valid
/// coordinates. Never fails as a whole.
pub fn collect_points<'a, T, I>(records: I) -> Vec<GeoPoint>
where
    T: Locatable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter_map(|record| {
            let Some((lat, lng)) = record.coordinates() else {
                warn!(id = %record.point_id(), "Skipping record without coordinates");
                return None;
            };
            match GeoPoint::new(
                record.point_id(),
                record.point_title(),
                lat,
                lng,
                record.point_kind(),
            ) {
                Ok(point) => Some(match record.point_category() {
                    Some(category) => point.with_category(category),
                    None => point,
                }),
                Err(e) => {
                    warn!("Skipping point: {}", e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: Option<f64>, lng: Option<f64>) -> PointRecord {
        PointRecord {
            id: "r1".into(),
            title: "Buraco".into(),
            latitude: lat,
            longitude: lng,
            status: None,
            help_type: None,
            category: None,
        }
    }

    #[test]
    fn test_weights_by_kind() {
        assert_eq!(PointKind::Issue(IssueStatus::Open).weight(), 2.0);
        assert_eq!(PointKind::Issue(IssueStatus::InProgress).weight(), 1.0);
        assert_eq!(PointKind::Issue(IssueStatus::Resolved).weight(), 0.6);
        assert!(PointKind::HelpNeed.weight() > PointKind::HelpOffer.weight());
    }

    #[test]
    fn test_non_finite_rejected() {
        let kind = PointKind::Issue(IssueStatus::Open);
        assert!(GeoPoint::new("a", "", f64::NAN, 0.0, kind).is_err());
        assert!(GeoPoint::new("a", "", 0.0, f64::INFINITY, kind).is_err());
        assert!(GeoPoint::new("a", "", 39.7, -8.8, kind).is_ok());
    }

    #[test]
    fn test_point_record_kind() {
        let mut r = record(Some(1.0), Some(2.0));
        assert_eq!(r.point_kind(), PointKind::Issue(IssueStatus::Open));
        r.status = Some("resolved".into());
        assert_eq!(r.point_kind(), PointKind::Issue(IssueStatus::Resolved));
        r.help_type = Some("offer".into());
        assert_eq!(r.point_kind(), PointKind::HelpOffer);
    }

    #[test]
    fn test_collect_points_skips_invalid() {
        let records = vec![
            record(Some(39.74), Some(-8.81)),
            record(None, Some(-8.81)),
            record(Some(f64::NAN), Some(-8.81)),
        ];
        let points = collect_points(&records);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].weight(), 2.0);
    }

    #[test]
    fn test_point_record_from_json() {
        let r: PointRecord = serde_json::from_str(
            r#"{"id": "h1", "title": "Água", "latitude": 39.7, "longitude": -8.8, "type": "need"}"#,
        )
        .unwrap();
        assert_eq!(r.point_kind(), PointKind::HelpNeed);
        assert_eq!(r.category, None);
    }

    #[test]
    fn test_category_carried_to_point() {
        let records: Vec<PointRecord> = serde_json::from_str(
            r#"[
                {"id": "1", "title": "Buraco", "latitude": 39.7, "longitude": -8.8, "category": "road_damage"},
                {"id": "2", "title": "Poste", "latitude": 39.7, "longitude": -8.8, "category": ""}
            ]"#,
        )
        .unwrap();
        let points = collect_points(&records);
        assert_eq!(points[0].category.as_deref(), Some("road_damage"));
        assert_eq!(points[1].category, None);
    }
}
