//! A scene is the complete desired marker set for one reconciliation pass.

use std::sync::Arc;

use geo_cluster::{Cluster, GeoPoint, LatLng, RadiusScale};
use hazard_core::Alert;

use crate::callback::CallbackCell;
use crate::popup::{alert_popup, point_popup};
use crate::style::{alert_style, cluster_style, label_style, point_style};
use crate::surface::{MarkerShape, MarkerSpec, Viewport};

/// Desired end state of the surface. Reconciling the same scene twice leaves
/// the surface unchanged.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    markers: Vec<MarkerSpec>,
    view: Option<Viewport>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// One pin per point. Clicking selects the point through `callback` and
    /// opens its popup.
    pub fn with_points(mut self, points: &[GeoPoint], callback: &CallbackCell) -> Self {
        for point in points {
            let position = LatLng::new(point.latitude(), point.longitude());
            let select = {
                let cell = callback.clone();
                let id = point.id.clone();
                Arc::new(move || {
                    cell.invoke(&id);
                })
            };
            let popup = {
                let point = point.clone();
                Arc::new(move || point_popup(&point))
            };
            self.markers.push(
                MarkerSpec::new(
                    format!("point-{}", point.id),
                    position,
                    MarkerShape::Pin,
                    point_style(point.kind),
                )
                .with_title(point.title.clone())
                .with_click(select)
                .with_popup(popup),
            );
        }
        self
    }

    /// One circle plus one count label per cluster.
    pub fn with_clusters(mut self, clusters: &[Cluster], scale: RadiusScale) -> Self {
        for (i, c) in clusters.iter().enumerate() {
            let label = c.label();
            self.markers.push(
                MarkerSpec::new(
                    format!("cluster-{}", i),
                    c.centroid,
                    MarkerShape::Circle {
                        radius_m: scale.radius(c.count),
                    },
                    cluster_style(),
                )
                .with_title(label.clone()),
            );
            self.markers.push(
                MarkerSpec::new(
                    format!("cluster-{}-label", i),
                    c.centroid,
                    MarkerShape::Label { text: label.clone() },
                    label_style(),
                )
                .with_title(label),
            );
        }
        self
    }

    /// Pins for alerts that carry an anchor; unanchored alerts are list-only.
    pub fn with_alerts(mut self, alerts: &[Alert]) -> Self {
        for alert in alerts {
            let Some(anchor) = alert.anchor else {
                continue;
            };
            let popup = {
                let alert = alert.clone();
                Arc::new(move || alert_popup(&alert))
            };
            self.markers.push(
                MarkerSpec::new(
                    format!("alert-{}", alert.id),
                    LatLng::new(anchor.latitude, anchor.longitude),
                    MarkerShape::Pin,
                    alert_style(alert.level),
                )
                .with_title(alert.title.clone())
                .with_popup(popup),
            );
        }
        self
    }

    pub fn with_view(mut self, view: Viewport) -> Self {
        self.view = Some(view);
        self
    }

    pub fn push(&mut self, marker: MarkerSpec) {
        self.markers.push(marker);
    }

    pub fn markers(&self) -> &[MarkerSpec] {
        &self.markers
    }

    pub fn view(&self) -> Option<Viewport> {
        self.view
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
