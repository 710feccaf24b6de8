//! Surface that renders the marker layer as a GeoJSON FeatureCollection, for
//! hosts that hand the layer to an external map library or a file.

use serde_json::{json, Map, Value};

use crate::error::SurfaceError;
use crate::surface::{MapSurface, MarkerShape, MarkerSpec, Popup, Viewport};

#[derive(Debug, Default)]
pub struct GeoJsonSurface {
    features: Vec<Value>,
    view: Option<Viewport>,
    popup: Option<(String, Popup)>,
}

impl GeoJsonSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn features(&self) -> &[Value] {
        &self.features
    }

    /// The popup currently open, with the id of its marker.
    pub fn popup(&self) -> Option<(&str, &Popup)> {
        self.popup.as_ref().map(|(id, popup)| (id.as_str(), popup))
    }

    /// The whole layer; the current view, if any, is carried as `bbox`.
    ///
    /// Popups are never built on export. Only the one opened through
    /// [`MapSurface::open_popup`] is attached to its feature.
    pub fn feature_collection(&self) -> Value {
        let mut features = self.features.clone();
        if let Some((id, popup)) = &self.popup {
            for feature in features.iter_mut() {
                if feature["properties"]["id"].as_str() != Some(id.as_str()) {
                    continue;
                }
                if let Some(props) = feature["properties"].as_object_mut() {
                    props.insert("popup".into(), json!(popup));
                }
                break;
            }
        }

        let mut fc = Map::new();
        fc.insert("type".into(), json!("FeatureCollection"));
        fc.insert("features".into(), Value::Array(features));
        if let Some(Viewport::Fit(b)) = self.view {
            fc.insert("bbox".into(), json!([b.west, b.south, b.east, b.north]));
        }
        Value::Object(fc)
    }

    pub fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.feature_collection())
    }
}

fn feature(marker: &MarkerSpec) -> Result<Value, SurfaceError> {
    let (lat, lng) = (marker.position.lat, marker.position.lng);
    if !lat.is_finite() || !lng.is_finite() {
        return Err(SurfaceError::Rejected(format!(
            "{} has non-finite position",
            marker.id
        )));
    }

    let mut props = Map::new();
    props.insert("id".into(), json!(marker.id));
    props.insert("title".into(), json!(marker.title));
    props.insert("color".into(), json!(marker.style.color));
    props.insert("fillOpacity".into(), json!(marker.style.fill_opacity));
    match &marker.shape {
        MarkerShape::Pin => {
            props.insert("shape".into(), json!("pin"));
        }
        MarkerShape::Circle { radius_m } => {
            props.insert("shape".into(), json!("circle"));
            props.insert("radius".into(), json!(radius_m));
        }
        MarkerShape::Label { text } => {
            props.insert("shape".into(), json!("label"));
            props.insert("label".into(), json!(text));
        }
    }
    props.insert("hasPopup".into(), json!(marker.popup.is_some()));

    Ok(json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [lng, lat] },
        "properties": Value::Object(props),
    }))
}

impl MapSurface for GeoJsonSurface {
    fn add_marker(&mut self, marker: MarkerSpec) -> Result<(), SurfaceError> {
        self.features.push(feature(&marker)?);
        Ok(())
    }

    fn remove_all_markers(&mut self) {
        self.features.clear();
        self.popup = None;
    }

    fn set_view(&mut self, view: Viewport) {
        self.view = Some(view);
    }

    fn open_popup(&mut self, marker_id: &str, popup: Popup) {
        self.popup = Some((marker_id.to_string(), popup));
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }

    fn marker_count(&self) -> usize {
        self.features.len()
    }

    fn name(&self) -> &str {
        "geojson"
    }
}
