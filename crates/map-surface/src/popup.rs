//! Popup content for points and alerts.

use geo_cluster::{GeoPoint, PointKind};
use hazard_core::Alert;

use crate::surface::Popup;

pub fn point_popup(point: &GeoPoint) -> Popup {
    let link = match point.kind {
        PointKind::Issue(_) => Some(format!("/issue/{}", point.id)),
        PointKind::HelpNeed | PointKind::HelpOffer => None,
    };
    let mut lines = vec![point.kind.label().to_string()];
    if let Some(category) = &point.category {
        lines.push(category.replace('_', " "));
    }
    Popup {
        title: point.title.clone(),
        lines,
        link,
    }
}

pub fn alert_popup(alert: &Alert) -> Popup {
    let mut lines = vec![
        alert.level.badge_label().to_string(),
        alert.area_display(),
        alert.zone().badge(),
    ];
    if let Some(range) = alert.date_range() {
        lines.push(range);
    }
    lines.push(alert.source_name.clone());
    Popup {
        title: alert.title.clone(),
        lines,
        link: Some(alert.source_url.clone()),
    }
}
