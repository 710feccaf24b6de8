use std::sync::{Arc, Mutex};

use geo_cluster::{cluster, Bounds, GeoPoint, IssueStatus, PointKind, RadiusScale};
use hazard_core::{Alert, Anchor, RawAlertRecord};
use map_surface::{
    Applied, CallbackCell, MapSurface, MarkerReconciler, ReconcileError, RecordingSurface, Scene,
    SurfaceError, SurfaceState, Viewport,
};

fn points() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new("1", "Buraco", 39.741, -8.812, PointKind::Issue(IssueStatus::Open)).unwrap(),
        GeoPoint::new("2", "Lixo", 39.742, -8.811, PointKind::Issue(IssueStatus::Resolved)).unwrap(),
        GeoPoint::new("3", "Água", 41.15, -8.61, PointKind::HelpNeed).unwrap(),
    ]
}

fn full_scene(callback: &CallbackCell) -> Scene {
    let pts = points();
    let clusters = cluster(&pts, 2, 5);
    Scene::new()
        .with_points(&pts, callback)
        .with_clusters(&clusters, RadiusScale::default())
        .with_view(Viewport::Fit(Bounds::around(&pts)))
}

fn ready(callback: CallbackCell) -> MarkerReconciler<RecordingSurface> {
    let mut map = MarkerReconciler::new(callback);
    map.attach(RecordingSurface::new()).unwrap();
    map
}

#[test]
fn test_reconcile_is_idempotent() {
    let callback = CallbackCell::new();
    let scene = full_scene(&callback);
    let mut map = ready(callback);

    let first = map.reconcile(&scene).unwrap();
    let ids_first: Vec<String> = map
        .surface()
        .unwrap()
        .markers()
        .iter()
        .map(|m| m.id.clone())
        .collect();

    let second = map.reconcile(&scene).unwrap();
    let ids_second: Vec<String> = map
        .surface()
        .unwrap()
        .markers()
        .iter()
        .map(|m| m.id.clone())
        .collect();

    assert_eq!(first, second);
    assert_eq!(ids_first, ids_second);
    // 3 pins + 2 clusters × (circle + label)
    assert_eq!(map.marker_count(), 7);
    assert_eq!(map.surface().unwrap().clears(), 2);
}

#[test]
fn test_reconcile_replaces_previous_scene() {
    let callback = CallbackCell::new();
    let mut map = ready(callback.clone());

    map.reconcile(&full_scene(&callback)).unwrap();
    assert_eq!(map.marker_count(), 7);

    map.reconcile(&Scene::new()).unwrap();
    assert_eq!(map.marker_count(), 0);
}

#[test]
fn test_stale_callback_is_never_used() {
    let callback = CallbackCell::new();
    let scene = full_scene(&callback);
    let mut map = ready(callback);
    map.reconcile(&scene).unwrap();

    let selected = Arc::new(Mutex::new(Vec::new()));

    let log = selected.clone();
    map.set_callback(move |id| log.lock().unwrap().push(format!("old:{}", id)));
    let log = selected.clone();
    map.set_callback(move |id| log.lock().unwrap().push(format!("new:{}", id)));

    // No re-render between the swap and the click.
    assert!(map.surface_mut().unwrap().click("point-1"));
    assert_eq!(*selected.lock().unwrap(), vec!["new:1"]);
}

#[test]
fn test_click_builds_popup_lazily() {
    let callback = CallbackCell::new();
    let scene = full_scene(&callback);
    let mut map = ready(callback);
    map.reconcile(&scene).unwrap();

    let surface = map.surface_mut().unwrap();
    assert!(surface.popup().is_none());
    assert!(surface.click("point-2"));
    let (id, popup) = surface.popup().unwrap();
    assert_eq!(id, "point-2");
    assert_eq!(popup.title, "Lixo");
    assert_eq!(popup.link.as_deref(), Some("/issue/2"));

    assert!(!surface.click("point-404"));
}

#[test]
fn test_alert_popup_through_surface() {
    let mut raw = RawAlertRecord::new("LRA", "Vento", "red").with_start("2024-01-01T10:00:00Z");
    raw.anchor = Anchor::new(39.74, -8.8);
    let alert = Alert::from_raw(&raw);
    let marker_id = format!("alert-{}", alert.id);

    let mut map = ready(CallbackCell::new());
    map.reconcile(&Scene::new().with_alerts(&[alert])).unwrap();

    let surface = map.surface_mut().unwrap();
    assert!(surface.click(&marker_id));
    let (_, popup) = surface.popup().unwrap();
    assert_eq!(popup.lines[0], "VERMELHO");
}

#[test]
fn test_rejected_marker_does_not_abort_pass() {
    let callback = CallbackCell::new();
    let scene = full_scene(&callback);
    let mut map = MarkerReconciler::new(callback);
    map.attach(RecordingSurface::with_capacity(4)).unwrap();

    let report = map.reconcile(&scene).unwrap();
    assert_eq!(report.rendered, 4);
    assert_eq!(report.rejected, 3);
    assert_eq!(map.marker_count(), 4);
}

#[test]
fn test_state_machine() {
    let mut map: MarkerReconciler<RecordingSurface> = MarkerReconciler::new(CallbackCell::new());
    assert_eq!(map.state(), SurfaceState::Uninitialized);
    assert_eq!(
        map.reconcile(&Scene::new()),
        Err(ReconcileError::NotReady(SurfaceState::Uninitialized))
    );

    map.attach(RecordingSurface::new()).unwrap();
    assert_eq!(map.state(), SurfaceState::Ready);
    assert_eq!(
        map.attach(RecordingSurface::new()),
        Err(ReconcileError::AlreadyInitialized)
    );

    let callback = map.callback().clone();
    map.reconcile(&full_scene(&callback)).unwrap();
    let surface = map.dispose().unwrap();
    assert_eq!(surface.marker_count(), 0);
    assert_eq!(map.state(), SurfaceState::Disposed);
    assert!(!callback.is_set());

    assert_eq!(map.reconcile(&Scene::new()), Err(ReconcileError::Disposed));
    assert_eq!(
        map.attach(RecordingSurface::new()),
        Err(ReconcileError::Disposed)
    );
    assert!(map.dispose().is_none());
}

#[test]
fn test_initialization_failure_is_persistent() {
    let mut map: MarkerReconciler<RecordingSurface> = MarkerReconciler::new(CallbackCell::new());
    let err = map
        .initialize_with(|| Err::<RecordingSurface, _>(SurfaceError::Unavailable("no webgl".into())))
        .unwrap_err();
    assert!(matches!(err, ReconcileError::SurfaceUnavailable(_)));
    assert!(map.unavailable_message().unwrap().contains("no webgl"));

    for _ in 0..2 {
        assert!(matches!(
            map.reconcile(&Scene::new()),
            Err(ReconcileError::SurfaceUnavailable(_))
        ));
    }
}

#[test]
fn test_older_generation_is_discarded() {
    let callback = CallbackCell::new();
    let mut map = ready(callback.clone());

    let newer = full_scene(&callback);
    let older = Scene::new();

    assert!(matches!(
        map.reconcile_generation(2, &newer),
        Ok(Applied::Drawn(_))
    ));
    assert_eq!(
        map.reconcile_generation(1, &older),
        Ok(Applied::Stale { latest: 2 })
    );
    assert_eq!(map.marker_count(), 7);

    assert!(matches!(
        map.reconcile_generation(3, &older),
        Ok(Applied::Drawn(_))
    ));
    assert_eq!(map.marker_count(), 0);
}
