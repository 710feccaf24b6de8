//! Fixed colour mapping for every kind of marker.
//!
//! Every match here is exhaustive: a known status never falls through to an
//! unstyled default.

use geo_cluster::{IssueStatus, PointKind};
use hazard_core::AlertLevel;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub fill_opacity: f32,
}

impl MarkerStyle {
    const fn solid(color: &'static str) -> Self {
        Self {
            color,
            fill_opacity: 1.0,
        }
    }
}

pub fn point_style(kind: PointKind) -> MarkerStyle {
    match kind {
        PointKind::Issue(IssueStatus::Open) => MarkerStyle::solid("#ef4444"),
        PointKind::Issue(IssueStatus::InProgress) => MarkerStyle::solid("#f59e0b"),
        PointKind::Issue(IssueStatus::Resolved) => MarkerStyle::solid("#16a34a"),
        PointKind::HelpNeed => MarkerStyle::solid("#dc2626"),
        PointKind::HelpOffer => MarkerStyle::solid("#2563eb"),
    }
}

pub fn alert_style(level: AlertLevel) -> MarkerStyle {
    match level {
        AlertLevel::Red => MarkerStyle::solid("#dc2626"),
        AlertLevel::Orange => MarkerStyle::solid("#ea580c"),
        AlertLevel::Yellow => MarkerStyle::solid("#facc15"),
        AlertLevel::Unknown => MarkerStyle::solid("#6b7280"),
    }
}

pub fn cluster_style() -> MarkerStyle {
    MarkerStyle {
        color: "#ff5722",
        fill_opacity: 0.15,
    }
}

pub fn label_style() -> MarkerStyle {
    MarkerStyle::solid("#1f2937")
}
