//! Live issue map: refetch on change signals, redraw on filter changes.

use std::future::Future;
use std::sync::Arc;

use geo_cluster::{cluster_with, collect_points, Bounds, ClusterOptions, GeoPoint, RadiusScale};
use hazard_core::{process, Alert, FilterState};
use hazard_feed::{AlertSource, CancelFlag};
use map_surface::{Applied, MapSurface, MarkerReconciler, ReconcileError, Scene, Viewport};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::BoardError;
use crate::points::{PointFilter, PointSource};
use crate::sequence::{LastApplied, Sequencer, Ticket};

/// Something the map shows has changed upstream. Every tick triggers a full
/// refetch and re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataChanged {
    Issues,
    HelpRequests,
    Alerts,
}

/// Result of one spawned fetch.
#[derive(Debug)]
pub struct Loaded {
    pub ticket: Ticket,
    pub points: Result<Vec<GeoPoint>, BoardError>,
    pub alerts: Vec<Alert>,
}

/// What the map currently shows: a point filter and the alert pipeline's
/// filter state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapFilters {
    pub points: PointFilter,
    pub alerts: FilterState,
}

/// Owns the map reconciler and turns change signals into scenes.
///
/// Fetches run as spawned tasks; their results come back over a channel and
/// are applied on the controller's own task, in ticket order. A result older
/// than the last applied one is discarded. The last applied data is kept, so
/// a filter change redraws without fetching.
pub struct MapController<S: MapSurface> {
    reconciler: MarkerReconciler<S>,
    points: Arc<dyn PointSource>,
    alerts: Option<Arc<dyn AlertSource>>,
    filters: MapFilters,
    filter_updates: Option<mpsc::Receiver<MapFilters>>,
    options: ClusterOptions,
    scale: RadiusScale,
    fetches: Sequencer,
    applied: LastApplied,
    draws: Sequencer,
    last_points: Option<Vec<GeoPoint>>,
    last_alerts: Vec<Alert>,
    cancel: CancelFlag,
    rendered: watch::Sender<u64>,
}

impl<S: MapSurface> MapController<S> {
    pub fn new(reconciler: MarkerReconciler<S>, points: Arc<dyn PointSource>) -> Self {
        let (rendered, _) = watch::channel(0);
        Self {
            reconciler,
            points,
            alerts: None,
            filters: MapFilters::default(),
            filter_updates: None,
            options: ClusterOptions::default(),
            scale: RadiusScale::default(),
            fetches: Sequencer::new(),
            applied: LastApplied::default(),
            draws: Sequencer::new(),
            last_points: None,
            last_alerts: Vec::new(),
            cancel: CancelFlag::new(),
            rendered,
        }
    }

    /// Also draw anchored official alerts from `source`.
    pub fn with_alerts(mut self, source: Arc<dyn AlertSource>) -> Self {
        self.alerts = Some(source);
        self
    }

    pub fn with_cluster_options(mut self, options: ClusterOptions) -> Self {
        self.options = options;
        self
    }

    /// Filter changes to apply while [`run_with_shutdown`](Self::run_with_shutdown)
    /// is running.
    pub fn with_filter_updates(mut self, updates: mpsc::Receiver<MapFilters>) -> Self {
        self.filter_updates = Some(updates);
        self
    }

    pub fn filters(&self) -> &MapFilters {
        &self.filters
    }

    /// Change which points are shown and redraw from the last applied data.
    /// Returns `None` when nothing has been fetched yet.
    pub fn set_filter(&mut self, filter: PointFilter) -> Result<Option<Applied>, BoardError> {
        let alerts = self.filters.alerts.clone();
        self.set_filters(MapFilters {
            points: filter,
            alerts,
        })
    }

    /// Change the zone, level and query applied to the alert overlay.
    pub fn set_alert_filter(&mut self, filter: FilterState) -> Result<Option<Applied>, BoardError> {
        let points = self.filters.points.clone();
        self.set_filters(MapFilters {
            points,
            alerts: filter,
        })
    }

    pub fn set_filters(&mut self, filters: MapFilters) -> Result<Option<Applied>, BoardError> {
        if self.cancel.is_cancelled() {
            return Err(ReconcileError::Disposed.into());
        }
        self.filters = filters;
        if self.last_points.is_none() {
            return Ok(None);
        }
        self.draw().map(Some)
    }

    /// Replace the handler called with a point id when a pin is clicked.
    pub fn set_selection<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.reconciler.set_callback(callback);
    }

    pub fn reconciler(&self) -> &MarkerReconciler<S> {
        &self.reconciler
    }

    pub fn reconciler_mut(&mut self) -> &mut MarkerReconciler<S> {
        &mut self.reconciler
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Number of scenes drawn so far (0 before the first one).
    pub fn subscribe_renders(&self) -> watch::Receiver<u64> {
        self.rendered.subscribe()
    }

    /// Start a fetch in the background; its result is sent on `tx`.
    pub fn spawn_load(&self, tx: mpsc::Sender<Loaded>) -> Ticket {
        let ticket = self.fetches.issue();
        let points = self.points.clone();
        let alerts = self.alerts.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let loaded = fetch(ticket, points.as_ref(), alerts.as_deref()).await;
            if cancel.is_cancelled() {
                return;
            }
            if tx.send(loaded).await.is_err() {
                debug!("map controller gone; dropping fetch {:?}", ticket);
            }
        });
        ticket
    }

    /// Keep a fetch result and draw it, unless a newer one was already
    /// applied. A failed point fetch leaves the map as it is.
    pub fn apply(&mut self, loaded: Loaded) -> Result<Applied, BoardError> {
        if self.cancel.is_cancelled() {
            return Err(ReconcileError::Disposed.into());
        }
        let points = loaded.points?;
        if !self.applied.accept(loaded.ticket) {
            let latest = self.applied.last().map_or(0, |t| t.0);
            debug!("dropping stale fetch {:?} (latest {})", loaded.ticket, latest);
            return Ok(Applied::Stale { latest });
        }
        self.last_points = Some(points);
        self.last_alerts = loaded.alerts;
        self.draw()
    }

    /// Rebuild the scene from the last applied data and current filters.
    fn draw(&mut self) -> Result<Applied, BoardError> {
        let points = self
            .filters
            .points
            .apply(self.last_points.clone().unwrap_or_default());
        let alerts = process(&self.last_alerts, &self.filters.alerts);
        let scene = self.scene(&points, &alerts);

        let generation = self.draws.issue();
        let drawn = self.reconciler.reconcile_generation(generation.0, &scene)?;
        if let Applied::Drawn(report) = &drawn {
            debug!(
                "drew scene {}: {} markers, {} rejected",
                generation.0, report.rendered, report.rejected
            );
            self.rendered.send_replace(generation.0);
        }
        Ok(drawn)
    }

    fn scene(&self, points: &[GeoPoint], alerts: &[Alert]) -> Scene {
        let clusters = cluster_with(points, self.options);
        Scene::new()
            .with_points(points, self.reconciler.callback())
            .with_clusters(&clusters, self.scale)
            .with_alerts(alerts)
            .with_view(Viewport::Fit(Bounds::around(points)))
    }

    /// Fetch and draw once, in place.
    pub async fn refresh(&mut self) -> Result<Applied, BoardError> {
        let ticket = self.fetches.issue();
        let loaded = fetch(ticket, self.points.as_ref(), self.alerts.as_deref()).await;
        self.apply(loaded)
    }

    /// Draw once, then refetch on every change signal and redraw on every
    /// filter update until `shutdown` completes or the signal channel closes.
    /// Disposes the map on exit.
    pub async fn run_with_shutdown<F>(
        mut self,
        mut changes: broadcast::Receiver<DataChanged>,
        shutdown: F,
    ) -> Result<(), BoardError>
    where
        F: Future<Output = ()>,
    {
        let (tx, mut rx) = mpsc::channel(16);
        let mut filter_updates = self.filter_updates.take();
        self.spawn_load(tx.clone());
        info!("map controller started");

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!("shutdown signal received, disposing map");
                    break;
                }

                change = changes.recv() => {
                    match change {
                        Ok(kind) => {
                            debug!("data changed: {:?}", kind);
                            self.spawn_load(tx.clone());
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!("skipped {} change signals; refetching once", skipped);
                            self.spawn_load(tx.clone());
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            info!("change channel closed, stopping map controller");
                            break;
                        }
                    }
                }

                Some(filters) = async { filter_updates.as_mut()?.recv().await } => {
                    debug!("map filters changed: {:?}", filters);
                    if let Err(e) = self.set_filters(filters) {
                        warn!("map redraw failed: {}", e);
                    }
                }

                Some(loaded) = rx.recv() => {
                    if let Err(e) = self.apply(loaded) {
                        warn!("map update failed: {}", e);
                    }
                }
            }
        }

        self.dispose();
        Ok(())
    }

    /// Tear down: later fetch results are dropped and the map is cleared.
    pub fn dispose(&mut self) -> Option<S> {
        self.cancel.cancel();
        self.reconciler.dispose()
    }
}

async fn fetch(
    ticket: Ticket,
    points: &dyn PointSource,
    alerts: Option<&dyn AlertSource>,
) -> Loaded {
    let points = points.fetch_points().await.map(|records| collect_points(&records));
    let alerts = match alerts {
        Some(source) => source.fetch_alerts().await.unwrap_or_else(|e| {
            warn!("alert overlay unavailable: {}", e);
            Vec::new()
        }),
        None => Vec::new(),
    };
    Loaded {
        ticket,
        points,
        alerts,
    }
}
