//! In-memory surface that records what was drawn. Used by headless hosts and
//! tests, and as the reference for what a real backend adapter must do.

use crate::error::SurfaceError;
use crate::surface::{MapSurface, MarkerSpec, Popup, Viewport};

#[derive(Debug, Default)]
pub struct RecordingSurface {
    markers: Vec<MarkerSpec>,
    view: Option<Viewport>,
    open_popup: Option<(String, Popup)>,
    capacity: Option<usize>,
    adds: usize,
    clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that rejects markers beyond `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn markers(&self) -> &[MarkerSpec] {
        &self.markers
    }

    pub fn marker(&self, id: &str) -> Option<&MarkerSpec> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn view(&self) -> Option<Viewport> {
        self.view
    }

    /// The open popup and the marker it belongs to.
    pub fn popup(&self) -> Option<(&str, &Popup)> {
        self.open_popup.as_ref().map(|(id, p)| (id.as_str(), p))
    }

    /// Total successful `add_marker` calls.
    pub fn adds(&self) -> usize {
        self.adds
    }

    /// Total `remove_all_markers` calls.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Simulate a user click: build and open the popup, then fire the click
    /// handler. Returns false if no such marker is drawn.
    pub fn click(&mut self, id: &str) -> bool {
        let Some(marker) = self.markers.iter().find(|m| m.id == id) else {
            return false;
        };
        let popup = marker.popup.as_ref().map(|build| build());
        let handler = marker.on_click.clone();
        if let Some(popup) = popup {
            self.open_popup(id, popup);
        }
        if let Some(handler) = handler {
            handler();
        }
        true
    }
}

impl MapSurface for RecordingSurface {
    fn add_marker(&mut self, marker: MarkerSpec) -> Result<(), SurfaceError> {
        if let Some(cap) = self.capacity {
            if self.markers.len() >= cap {
                return Err(SurfaceError::Rejected(format!(
                    "{} exceeds capacity {}",
                    marker.id, cap
                )));
            }
        }
        self.markers.push(marker);
        self.adds += 1;
        Ok(())
    }

    fn remove_all_markers(&mut self) {
        self.markers.clear();
        self.open_popup = None;
        self.clears += 1;
    }

    fn set_view(&mut self, view: Viewport) {
        self.view = Some(view);
    }

    fn open_popup(&mut self, marker_id: &str, popup: Popup) {
        self.open_popup = Some((marker_id.to_string(), popup));
    }

    fn close_popup(&mut self) {
        self.open_popup = None;
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn name(&self) -> &str {
        "recording"
    }
}
