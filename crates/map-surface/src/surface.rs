//! The backend-facing surface interface and the marker description it takes.
//!
//! Any map library is an adapter behind [`MapSurface`]; the reconciler and
//! everything upstream of it never see library types.

use std::fmt;
use std::sync::Arc;

use geo_cluster::{Bounds, LatLng};
use serde::Serialize;

use crate::error::SurfaceError;
use crate::style::MarkerStyle;

/// Invoked by the backend when the user clicks a marker.
pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;
/// Builds popup content when (and only when) the backend needs to show it.
pub type PopupSource = Arc<dyn Fn() -> Popup + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MarkerShape {
    /// A point marker.
    Pin,
    /// A translucent area circle, radius in metres.
    Circle { radius_m: f64 },
    /// A text label anchored at a position.
    Label { text: String },
}

/// Popup / info-window content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
    pub link: Option<String>,
}

/// Everything a backend needs to draw one marker.
#[derive(Clone)]
pub struct MarkerSpec {
    pub id: String,
    pub title: String,
    pub position: LatLng,
    pub shape: MarkerShape,
    pub style: MarkerStyle,
    pub on_click: Option<ClickHandler>,
    pub popup: Option<PopupSource>,
}

impl MarkerSpec {
    pub fn new(id: impl Into<String>, position: LatLng, shape: MarkerShape, style: MarkerStyle) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            position,
            shape,
            style,
            on_click: None,
            popup: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_click(mut self, handler: ClickHandler) -> Self {
        self.on_click = Some(handler);
        self
    }

    pub fn with_popup(mut self, source: PopupSource) -> Self {
        self.popup = Some(source);
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.on_click.is_some() || self.popup.is_some()
    }
}

impl fmt::Debug for MarkerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkerSpec")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("position", &self.position)
            .field("shape", &self.shape)
            .field("style", &self.style)
            .field("interactive", &self.is_interactive())
            .finish()
    }
}

/// What part of the world the surface should show.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewport {
    Fit(Bounds),
    Center { center: LatLng, zoom: u8 },
}

/// A drawable map. Implementations wrap one concrete rendering library.
pub trait MapSurface {
    /// Draw one marker.
    fn add_marker(&mut self, marker: MarkerSpec) -> Result<(), SurfaceError>;

    /// Remove every marker and overlay this surface has drawn.
    fn remove_all_markers(&mut self);

    fn set_view(&mut self, view: Viewport);

    /// Show `popup` anchored at the marker with id `marker_id`.
    fn open_popup(&mut self, marker_id: &str, popup: Popup);

    fn close_popup(&mut self);

    /// Markers currently on the surface.
    fn marker_count(&self) -> usize;

    /// Human-readable backend name, for logs.
    fn name(&self) -> &str;
}
