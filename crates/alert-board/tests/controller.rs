use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alert_board::{
    AlertBoard, BoardError, DataChanged, LoadState, Loaded, MapController, MapFilters,
    PointFilter, PointSource, StaticPoints, Ticket,
};
use async_trait::async_trait;
use geo_cluster::{collect_points, IssueStatus, PointRecord};
use hazard_core::{
    Alert, AlertLevel, Anchor, FilterState, LevelFilter, RawAlertRecord, Zone, ZoneFilter,
};
use hazard_feed::{CancelFlag, IngestionError, StaticSource};
use map_surface::{Applied, CallbackCell, MarkerReconciler, RecordingSurface, SurfaceState};
use tokio::sync::{broadcast, mpsc, oneshot};

fn record(id: &str, lat: f64, lng: f64, status: Option<&str>, kind: Option<&str>) -> PointRecord {
    PointRecord {
        id: id.to_string(),
        title: format!("item {}", id),
        latitude: Some(lat),
        longitude: Some(lng),
        status: status.map(str::to_string),
        help_type: kind.map(str::to_string),
        category: None,
    }
}

fn records() -> Vec<PointRecord> {
    vec![
        record("1", 39.741, -8.812, Some("open"), None),
        record("2", 39.742, -8.811, Some("resolved"), None),
        record("3", 41.150, -8.610, None, Some("need")),
        PointRecord {
            latitude: None,
            ..record("4", 0.0, 0.0, None, None)
        },
    ]
}

fn controller(source: Arc<dyn PointSource>) -> MapController<RecordingSurface> {
    let mut reconciler = MarkerReconciler::new(CallbackCell::new());
    reconciler.attach(RecordingSurface::new()).unwrap();
    MapController::new(reconciler, source)
}

/// Counts fetches; fails while `failing` is set.
struct CountingPoints {
    records: Vec<PointRecord>,
    calls: AtomicUsize,
    failing: std::sync::atomic::AtomicBool,
}

#[async_trait]
impl PointSource for CountingPoints {
    async fn fetch_points(&self) -> Result<Vec<PointRecord>, BoardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(BoardError::Points("database offline".into()));
        }
        Ok(self.records.clone())
    }
}

#[tokio::test]
async fn test_refresh_draws_points_and_clusters() {
    let mut map = controller(Arc::new(StaticPoints::new(records())));
    let drawn = map.refresh().await.unwrap();

    // 3 valid pins, 2 clusters (circle + label each); record 4 has no latitude.
    assert!(matches!(drawn, Applied::Drawn(r) if r.rendered == 7));
    let surface = map.reconciler().surface().unwrap();
    assert!(surface.marker("cluster-0").is_some());
    assert!(surface.marker("point-4").is_none());
    assert!(surface.view().is_some());
}

#[tokio::test]
async fn test_kind_filter_limits_pins() {
    let mut map = controller(Arc::new(StaticPoints::new(records())));
    // nothing fetched yet, so nothing to redraw
    assert!(map.set_filter(PointFilter::status(IssueStatus::Open)).unwrap().is_none());
    map.refresh().await.unwrap();

    let surface = map.reconciler().surface().unwrap();
    assert!(surface.marker("point-1").is_some());
    assert!(surface.marker("point-2").is_none());
    assert!(surface.marker("point-3").is_none());
    // one pin + one cluster pair
    assert_eq!(surface.markers().len(), 3);
}

#[tokio::test]
async fn test_filter_change_redraws_without_refetch() {
    let source = Arc::new(CountingPoints {
        records: records(),
        calls: AtomicUsize::new(0),
        failing: false.into(),
    });
    let mut map = controller(source.clone());
    map.refresh().await.unwrap();
    assert!(map.reconciler().surface().unwrap().marker("point-2").is_some());

    let drawn = map.set_filter(PointFilter::status(IssueStatus::Open)).unwrap();
    assert!(matches!(drawn, Some(Applied::Drawn(_))));
    let surface = map.reconciler().surface().unwrap();
    assert!(surface.marker("point-1").is_some());
    assert!(surface.marker("point-2").is_none());
    assert!(surface.marker("point-3").is_none());

    map.set_filter(PointFilter::All).unwrap();
    assert!(map.reconciler().surface().unwrap().marker("point-2").is_some());
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

fn anchored(area: &str, level: &str, lat: f64, lng: f64) -> Alert {
    let mut raw = RawAlertRecord::new(area, "Vento", level);
    raw.anchor = Anchor::new(lat, lng);
    Alert::from_raw(&raw)
}

#[tokio::test]
async fn test_alert_overlay_is_ranked_and_filtered() {
    let alerts = vec![
        anchored("LRA", "yellow", 39.74, -8.8),
        anchored("LIS", "red", 38.72, -9.14),
    ];
    let mut map = controller(Arc::new(StaticPoints::default()))
        .with_alerts(Arc::new(StaticSource::new(alerts)));
    map.refresh().await.unwrap();

    let ids: Vec<_> = map
        .reconciler()
        .surface()
        .unwrap()
        .markers()
        .iter()
        .map(|m| m.id.clone())
        .collect();
    assert_eq!(ids, vec!["alert-LIS-Vento--red", "alert-LRA-Vento--yellow"]);

    map.set_alert_filter(FilterState::new(
        ZoneFilter::All,
        LevelFilter::Only(AlertLevel::Yellow),
        "",
    ))
    .unwrap();
    let surface = map.reconciler().surface().unwrap();
    assert_eq!(surface.markers().len(), 1);
    assert!(surface.marker("alert-LIS-Vento--red").is_none());

    map.set_alert_filter(FilterState::new(ZoneFilter::Only(Zone::Sul), LevelFilter::All, ""))
        .unwrap();
    let surface = map.reconciler().surface().unwrap();
    assert_eq!(surface.markers().len(), 1);
    assert!(surface.marker("alert-LIS-Vento--red").is_some());
}

#[tokio::test]
async fn test_out_of_order_results_keep_newest() {
    let mut map = controller(Arc::new(StaticPoints::new(records())));
    let all = collect_points(&records());

    let newer = Loaded {
        ticket: Ticket(2),
        points: Ok(all.clone()),
        alerts: Vec::new(),
    };
    let older = Loaded {
        ticket: Ticket(1),
        points: Ok(all[..1].to_vec()),
        alerts: Vec::new(),
    };

    assert!(matches!(map.apply(newer).unwrap(), Applied::Drawn(_)));
    assert!(matches!(
        map.apply(older).unwrap(),
        Applied::Stale { latest: 2 }
    ));
    assert!(map.reconciler().surface().unwrap().marker("point-3").is_some());
}

#[tokio::test]
async fn test_failed_point_fetch_keeps_previous_map() {
    let source = Arc::new(CountingPoints {
        records: records(),
        calls: AtomicUsize::new(0),
        failing: false.into(),
    });
    let mut map = controller(source.clone());
    map.refresh().await.unwrap();
    let before = map.reconciler().marker_count();

    source.failing.store(true, Ordering::SeqCst);
    assert!(matches!(map.refresh().await, Err(BoardError::Points(_))));
    assert_eq!(map.reconciler().marker_count(), before);
}

#[tokio::test]
async fn test_anchored_alerts_are_overlaid() {
    let mut anchored = RawAlertRecord::new("LRA", "Vento", "orange");
    anchored.anchor = Anchor::new(39.74, -8.8);
    let loose = RawAlertRecord::new("LIS", "Chuva", "yellow");
    let alerts = vec![Alert::from_raw(&anchored), Alert::from_raw(&loose)];

    let mut map = controller(Arc::new(StaticPoints::default()))
        .with_alerts(Arc::new(StaticSource::new(alerts)));
    map.refresh().await.unwrap();

    let surface = map.reconciler().surface().unwrap();
    assert_eq!(surface.markers().len(), 1);
    assert!(surface.markers()[0].id.starts_with("alert-LRA"));
}

#[tokio::test]
async fn test_selection_callback_swapped_without_rerender() {
    let mut map = controller(Arc::new(StaticPoints::new(records())));
    map.refresh().await.unwrap();

    let picked = Arc::new(Mutex::new(Vec::new()));
    let log = picked.clone();
    map.set_selection(move |id| log.lock().unwrap().push(format!("a:{}", id)));
    let log = picked.clone();
    map.set_selection(move |id| log.lock().unwrap().push(format!("b:{}", id)));

    map.reconciler_mut().surface_mut().unwrap().click("point-3");
    assert_eq!(*picked.lock().unwrap(), vec!["b:3"]);
}

#[tokio::test]
async fn test_change_signals_trigger_refetch() {
    let source = Arc::new(CountingPoints {
        records: records(),
        calls: AtomicUsize::new(0),
        failing: false.into(),
    });
    let map = controller(source.clone());
    let mut renders = map.subscribe_renders();

    let (changes_tx, changes_rx) = broadcast::channel(8);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(map.run_with_shutdown(changes_rx, async {
        let _ = stop_rx.await;
    }));

    // Initial draw.
    tokio::time::timeout(Duration::from_secs(5), renders.wait_for(|t| *t >= 1))
        .await
        .unwrap()
        .unwrap();

    changes_tx.send(DataChanged::Issues).unwrap();
    tokio::time::timeout(Duration::from_secs(5), renders.wait_for(|t| *t >= 2))
        .await
        .unwrap()
        .unwrap();

    stop_tx.send(()).unwrap();
    run.await.unwrap().unwrap();
    assert!(source.calls.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn test_filter_updates_redraw_running_map() {
    let source = Arc::new(CountingPoints {
        records: records(),
        calls: AtomicUsize::new(0),
        failing: false.into(),
    });
    let (filters_tx, filters_rx) = mpsc::channel(4);
    let map = controller(source.clone()).with_filter_updates(filters_rx);
    let mut renders = map.subscribe_renders();

    let (_changes_tx, changes_rx) = broadcast::channel::<DataChanged>(8);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let run = tokio::spawn(map.run_with_shutdown(changes_rx, async {
        let _ = stop_rx.await;
    }));

    tokio::time::timeout(Duration::from_secs(5), renders.wait_for(|t| *t >= 1))
        .await
        .unwrap()
        .unwrap();

    filters_tx
        .send(MapFilters {
            points: PointFilter::status(IssueStatus::Resolved),
            alerts: FilterState::default(),
        })
        .await
        .unwrap();
    tokio::time::timeout(Duration::from_secs(5), renders.wait_for(|t| *t >= 2))
        .await
        .unwrap()
        .unwrap();

    stop_tx.send(()).unwrap();
    run.await.unwrap().unwrap();
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_disposed_controller_rejects_results() {
    let mut map = controller(Arc::new(StaticPoints::new(records())));
    let surface = map.dispose().unwrap();
    assert_eq!(surface.markers().len(), 0);
    assert_eq!(map.reconciler().state(), SurfaceState::Disposed);
    assert!(map.refresh().await.is_err());
}

#[tokio::test]
async fn test_board_refresh_from_source() {
    let alerts = vec![
        Alert::from_raw(&RawAlertRecord::new("LIS", "Chuva", "yellow")),
        Alert::from_raw(&RawAlertRecord::new("LRA", "Vento", "red")),
    ];
    let source = StaticSource::new(alerts);
    let mut board = AlertBoard::new(CancelFlag::new());

    assert!(board.refresh(&source).await);
    assert_eq!(board.state(), &LoadState::Loaded);
    assert_eq!(board.processed()[0].area, "LRA");

    board.set_zone(ZoneFilter::Only(Zone::Sul));
    assert_eq!(board.processed().len(), 1);
    assert_eq!(board.processed()[0].area, "LIS");

    let failing = StaticSource::failing(IngestionError::http(502, "bad gateway"));
    assert!(board.refresh(&failing).await);
    assert!(matches!(board.state(), LoadState::Failed(_)));
    assert!(board.processed().is_empty());
}
