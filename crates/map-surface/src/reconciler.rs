//! Full-replace marker reconciliation over a [`MapSurface`].

use tracing::{debug, info, warn};

use crate::callback::CallbackCell;
use crate::error::ReconcileError;
use crate::scene::Scene;
use crate::state::SurfaceState;
use crate::surface::MapSurface;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub rendered: usize,
    pub rejected: usize,
}

/// Whether a generation-tagged scene was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Drawn(ReconcileReport),
    /// The same or a newer generation was already drawn; the scene was discarded.
    Stale { latest: u64 },
}

/// Owns a surface and the markers drawn on it.
///
/// Every pass clears all previously drawn markers before drawing the new
/// scene, so the surface always shows exactly the last scene. Click handlers
/// read the selection callback through a shared [`CallbackCell`], which makes
/// swapping the callback free of marker rebuilds.
pub struct MarkerReconciler<S: MapSurface> {
    surface: Option<S>,
    state: SurfaceState,
    callback: CallbackCell,
    unavailable: Option<String>,
    latest_generation: Option<u64>,
}

impl<S: MapSurface> MarkerReconciler<S> {
    pub fn new(callback: CallbackCell) -> Self {
        Self {
            surface: None,
            state: SurfaceState::Uninitialized,
            callback,
            unavailable: None,
            latest_generation: None,
        }
    }

    /// Hand over an initialized surface. Valid only once, before disposal.
    pub fn attach(&mut self, surface: S) -> Result<(), ReconcileError> {
        match self.state {
            SurfaceState::Disposed => Err(ReconcileError::Disposed),
            SurfaceState::Ready => Err(ReconcileError::AlreadyInitialized),
            SurfaceState::Uninitialized => {
                info!("map surface attached: {}", surface.name());
                self.surface = Some(surface);
                self.state = SurfaceState::Ready;
                self.unavailable = None;
                Ok(())
            }
        }
    }

    /// Run a surface constructor; a failure is kept as a persistent
    /// "map unavailable" message rather than surfaced again on every pass.
    pub fn initialize_with<F, E>(&mut self, init: F) -> Result<(), ReconcileError>
    where
        F: FnOnce() -> Result<S, E>,
        E: std::fmt::Display,
    {
        if self.state != SurfaceState::Uninitialized {
            return self.attach_error();
        }
        match init() {
            Ok(surface) => self.attach(surface),
            Err(e) => {
                let message = e.to_string();
                self.fail_initialization(message.clone());
                Err(ReconcileError::SurfaceUnavailable(message))
            }
        }
    }

    pub fn fail_initialization(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("map surface unavailable: {}", message);
        self.unavailable = Some(message);
    }

    fn attach_error(&self) -> Result<(), ReconcileError> {
        match self.state {
            SurfaceState::Disposed => Err(ReconcileError::Disposed),
            _ => Err(ReconcileError::AlreadyInitialized),
        }
    }

    /// Replace the selection callback. Markers already on the surface use the
    /// new one on their next click.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.callback.set(callback);
    }

    pub fn callback(&self) -> &CallbackCell {
        &self.callback
    }

    /// Clear everything previously drawn, then draw `scene`.
    ///
    /// A marker the backend rejects is logged and skipped; the rest of the
    /// scene is still drawn.
    pub fn reconcile(&mut self, scene: &Scene) -> Result<ReconcileReport, ReconcileError> {
        if let Some(message) = &self.unavailable {
            return Err(ReconcileError::SurfaceUnavailable(message.clone()));
        }
        if !self.state.can_draw() {
            return Err(match self.state {
                SurfaceState::Disposed => ReconcileError::Disposed,
                other => ReconcileError::NotReady(other),
            });
        }
        let surface = self
            .surface
            .as_mut()
            .ok_or(ReconcileError::NotReady(self.state))?;

        surface.remove_all_markers();

        let mut report = ReconcileReport::default();
        for marker in scene.markers() {
            let id = marker.id.clone();
            match surface.add_marker(marker.clone()) {
                Ok(()) => report.rendered += 1,
                Err(e) => {
                    warn!("skipping marker {}: {}", id, e);
                    report.rejected += 1;
                }
            }
        }
        if let Some(view) = scene.view() {
            surface.set_view(view);
        }

        debug!(
            "reconciled {} markers ({} rejected) on {}",
            report.rendered,
            report.rejected,
            surface.name()
        );
        Ok(report)
    }

    /// Draw `scene` only if `generation` is newer than the last one drawn, so
    /// a slow load finishing after a newer one never overwrites the map.
    pub fn reconcile_generation(
        &mut self,
        generation: u64,
        scene: &Scene,
    ) -> Result<Applied, ReconcileError> {
        if let Some(latest) = self.latest_generation {
            if generation <= latest {
                debug!("discarding stale scene {} (latest {})", generation, latest);
                return Ok(Applied::Stale { latest });
            }
        }
        let report = self.reconcile(scene)?;
        self.latest_generation = Some(generation);
        Ok(Applied::Drawn(report))
    }

    /// Remove every marker and release the surface. Later draws fail.
    pub fn dispose(&mut self) -> Option<S> {
        if self.state == SurfaceState::Disposed {
            return None;
        }
        self.state = SurfaceState::Disposed;
        self.callback.clear();
        let mut surface = self.surface.take()?;
        surface.remove_all_markers();
        info!("map surface disposed: {}", surface.name());
        Some(surface)
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn unavailable_message(&self) -> Option<&str> {
        self.unavailable.as_deref()
    }

    pub fn marker_count(&self) -> usize {
        self.surface.as_ref().map_or(0, |s| s.marker_count())
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }
}

impl<S: MapSurface> Drop for MarkerReconciler<S> {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.remove_all_markers();
        }
    }
}
