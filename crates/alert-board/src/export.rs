//! One-shot rendering of point records into a GeoJSON map layer.

use std::sync::Arc;

use geo_cluster::{ClusterOptions, PointRecord};
use map_surface::{CallbackCell, GeoJsonSurface, MarkerReconciler};
use serde_json::Value;

use crate::controller::MapController;
use crate::error::BoardError;
use crate::points::{PointFilter, StaticPoints};

/// Draw already-parsed records through the same pipeline as the live map and
/// return the layer as a FeatureCollection.
pub async fn export_layer(
    records: Vec<PointRecord>,
    filter: PointFilter,
    options: ClusterOptions,
) -> Result<Value, BoardError> {
    let mut reconciler = MarkerReconciler::new(CallbackCell::new());
    reconciler.attach(GeoJsonSurface::new())?;
    let mut controller = MapController::new(reconciler, Arc::new(StaticPoints::new(records)))
        .with_cluster_options(options);
    controller.set_filter(filter)?;
    controller.refresh().await?;

    Ok(controller
        .reconciler()
        .surface()
        .map(GeoJsonSurface::feature_collection)
        .unwrap_or(Value::Null))
}
