//! Sources of geo-located issue and help records, and the map's kind filter.

use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use geo_cluster::{GeoPoint, IssueStatus, PointKind, PointRecord};

use crate::error::BoardError;

/// Anything that can list the current point records.
#[async_trait]
pub trait PointSource: Send + Sync {
    async fn fetch_points(&self) -> Result<Vec<PointRecord>, BoardError>;
}

/// Fixed records.
#[derive(Debug, Clone, Default)]
pub struct StaticPoints {
    records: Vec<PointRecord>,
}

impl StaticPoints {
    pub fn new(records: Vec<PointRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl PointSource for StaticPoints {
    async fn fetch_points(&self) -> Result<Vec<PointRecord>, BoardError> {
        Ok(self.records.clone())
    }
}

/// A JSON array of point records on disk, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFilePoints {
    path: PathBuf,
}

impl JsonFilePoints {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PointSource for JsonFilePoints {
    async fn fetch_points(&self) -> Result<Vec<PointRecord>, BoardError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Which points the map shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PointFilter {
    #[default]
    All,
    Only(HashSet<PointKind>),
    /// Issues of one category (case-insensitive). Points without a category
    /// never match.
    Category(String),
    /// Both filters must match.
    And(Box<PointFilter>, Box<PointFilter>),
}

impl PointFilter {
    pub fn only<I: IntoIterator<Item = PointKind>>(kinds: I) -> Self {
        PointFilter::Only(kinds.into_iter().collect())
    }

    /// Issues with one status, nothing else.
    pub fn status(status: IssueStatus) -> Self {
        Self::only([PointKind::Issue(status)])
    }

    pub fn category(category: impl Into<String>) -> Self {
        PointFilter::Category(category.into())
    }

    /// Narrow this filter by another; `All` on either side is dropped.
    pub fn and(self, other: PointFilter) -> Self {
        match (self, other) {
            (PointFilter::All, f) | (f, PointFilter::All) => f,
            (a, b) => PointFilter::And(Box::new(a), Box::new(b)),
        }
    }

    pub fn matches(&self, point: &GeoPoint) -> bool {
        match self {
            PointFilter::All => true,
            PointFilter::Only(kinds) => kinds.contains(&point.kind),
            PointFilter::Category(category) => point
                .category
                .as_deref()
                .is_some_and(|c| c.trim().eq_ignore_ascii_case(category.trim())),
            PointFilter::And(a, b) => a.matches(point) && b.matches(point),
        }
    }

    pub fn apply(&self, points: Vec<GeoPoint>) -> Vec<GeoPoint> {
        match self {
            PointFilter::All => points,
            _ => points.into_iter().filter(|p| self.matches(p)).collect(),
        }
    }
}

/// Parse a kind name as used on the command line: `open`, `in_progress`,
/// `resolved`, `need` or `offer`.
pub fn parse_kind(s: &str) -> Option<PointKind> {
    match s.trim().to_lowercase().as_str() {
        "need" | "help_need" => Some(PointKind::HelpNeed),
        "offer" | "help_offer" => Some(PointKind::HelpOffer),
        other => other.parse::<IssueStatus>().ok().map(PointKind::Issue),
    }
}
