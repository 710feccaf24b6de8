//! Clustering properties over realistic point sets.

use geo_cluster::{
    cluster, cluster_with, collect_points, ClusterOptions, GeoPoint, IssueStatus, PointKind,
    PointRecord, DEFAULT_TOP_N,
};

fn open_issue(id: usize, lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(
        format!("issue-{}", id),
        "Ocorrência",
        lat,
        lng,
        PointKind::Issue(IssueStatus::Open),
    )
    .unwrap()
}

fn ten_points() -> Vec<GeoPoint> {
    let shared = [
        (39.7401, -8.8101),
        (39.7399, -8.8098),
        (39.7412, -8.8072),
        (39.7389, -8.8131),
    ];
    let scattered = [
        (38.72, -9.14),
        (41.15, -8.61),
        (40.21, -8.43),
        (37.02, -7.93),
        (38.57, -7.91),
        (39.23, -8.68),
    ];
    shared
        .iter()
        .chain(scattered.iter())
        .enumerate()
        .map(|(i, (lat, lng))| open_issue(i, *lat, *lng))
        .collect()
}

#[test]
fn test_shared_location_forms_one_cluster() {
    let points = ten_points();
    let clusters = cluster(&points, 2, DEFAULT_TOP_N);

    assert!(clusters.len() <= DEFAULT_TOP_N);
    assert_eq!(clusters[0].count, 4);
    assert!((clusters[0].centroid.lat - 39.74).abs() < 0.01);
    assert!((clusters[0].centroid.lng - -8.81).abs() < 0.01);
}

#[test]
fn test_counts_are_conserved() {
    let points = ten_points();
    for top_n in 0..12 {
        let clusters = cluster(&points, 2, top_n);
        let total: usize = clusters.iter().map(|c| c.count).sum();
        assert!(total <= points.len());
        assert!(clusters.iter().all(|c| c.count > 0));
        assert!(clusters.len() <= top_n);
    }
    let all: usize = cluster(&points, 2, usize::MAX).iter().map(|c| c.count).sum();
    assert_eq!(all, points.len());
}

#[test]
fn test_coarser_precision_merges_more() {
    let points = ten_points();
    let fine = cluster(&points, 3, usize::MAX).len();
    let coarse = cluster(&points, 0, usize::MAX).len();
    assert!(coarse <= fine);
}

#[test]
fn test_all_invalid_records_yield_no_clusters() {
    let records = vec![
        PointRecord {
            id: "a".into(),
            title: String::new(),
            latitude: Some(f64::NAN),
            longitude: Some(1.0),
            status: None,
            help_type: None,
            category: None,
        },
        PointRecord {
            id: "b".into(),
            title: String::new(),
            latitude: None,
            longitude: None,
            status: Some("open".into()),
            help_type: None,
            category: None,
        },
    ];
    let points = collect_points(&records);
    assert!(points.is_empty());
    assert!(cluster_with(&points, ClusterOptions::default()).is_empty());
}

#[test]
fn test_mixed_sources_cluster_together() {
    let records: Vec<PointRecord> = serde_json::from_str(
        r#"[
            {"id": "i1", "title": "Árvore caída", "latitude": 39.741, "longitude": -8.811, "status": "in_progress"},
            {"id": "h1", "title": "Preciso de lona", "latitude": 39.742, "longitude": -8.809, "type": "need"},
            {"id": "h2", "title": "Tenho gerador", "latitude": 39.739, "longitude": -8.812, "type": "offer"}
        ]"#,
    )
    .unwrap();
    let points = collect_points(&records);
    let clusters = cluster(&points, 2, 5);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].count, 3);
    assert!((clusters[0].weight - 4.0).abs() < 1e-9);
}
