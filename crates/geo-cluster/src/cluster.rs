//! Grid clustering of weighted points.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::point::GeoPoint;

/// Decimal places kept when snapping to the grid (≈1.1 km cells).
pub const DEFAULT_PRECISION: u32 = 2;
/// Clusters kept after ranking; one label is drawn per cluster.
pub const DEFAULT_TOP_N: usize = 5;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Summary of the points sharing one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    /// Unweighted mean of member coordinates.
    pub centroid: LatLng,
    /// Sum of member weights; drives ranking.
    pub weight: f64,
    /// Member count; drives radius and label.
    pub count: usize,
}

impl Cluster {
    /// Overlay label, e.g. `"4 ocorrências"`.
    pub fn label(&self) -> String {
        format!("{} ocorrências", self.count)
    }
}

/// Parameters for [`cluster_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterOptions {
    pub precision: u32,
    pub top_n: usize,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Default)]
struct Bucket {
    sum_lat: f64,
    sum_lng: f64,
    weight: f64,
    count: usize,
}

/// Snap a coordinate to an integer grid index, rounding halves up.
fn grid_index(value: f64, scale: f64) -> i64 {
    (value * scale + 0.5).floor() as i64
}

/// Reduce points to at most `top_n` clusters, heaviest first.
///
/// Points are bucketed by their coordinates rounded to `precision` decimals.
/// Non-finite points are skipped; an empty input yields an empty list.
pub fn cluster(points: &[GeoPoint], precision: u32, top_n: usize) -> Vec<Cluster> {
    let scale = 10f64.powi(precision.min(12) as i32);
    let mut buckets: IndexMap<(i64, i64), Bucket> = IndexMap::new();

    for point in points {
        let (lat, lng) = (point.latitude(), point.longitude());
        if !lat.is_finite() || !lng.is_finite() {
            warn!(id = %point.id, "Skipping non-finite point");
            continue;
        }
        let key = (grid_index(lat, scale), grid_index(lng, scale));
        let bucket = buckets.entry(key).or_default();
        bucket.sum_lat += lat;
        bucket.sum_lng += lng;
        bucket.weight += point.weight();
        bucket.count += 1;
    }

    let mut clusters: Vec<Cluster> = buckets
        .into_values()
        .map(|b| Cluster {
            centroid: LatLng::new(b.sum_lat / b.count as f64, b.sum_lng / b.count as f64),
            weight: b.weight,
            count: b.count,
        })
        .collect();

    // Stable: equal weights keep first-seen order.
    clusters.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    clusters.truncate(top_n);

    debug!(
        points = points.len(),
        clusters = clusters.len(),
        precision,
        "Clustered points"
    );
    clusters
}

pub fn cluster_with(points: &[GeoPoint], options: ClusterOptions) -> Vec<Cluster> {
    cluster(points, options.precision, options.top_n)
}

/// Circle radius (metres) as a function of cluster size:
/// `min(base + count * step, cap)`, never below `base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    pub base: f64,
    pub step: f64,
    pub cap: f64,
}

impl Default for RadiusScale {
    fn default() -> Self {
        Self {
            base: 8000.0,
            step: 2000.0,
            cap: 30000.0,
        }
    }
}

impl RadiusScale {
    pub fn radius(&self, count: usize) -> f64 {
        (self.base + count as f64 * self.step).min(self.cap).max(self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{IssueStatus, PointKind};

    fn issue(id: &str, lat: f64, lng: f64, status: IssueStatus) -> GeoPoint {
        GeoPoint::new(id, id, lat, lng, PointKind::Issue(status)).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster(&[], 2, 5).is_empty());
    }

    #[test]
    fn test_shared_cell_accumulates() {
        let points = vec![
            issue("a", 39.741, -8.812, IssueStatus::Open),
            issue("b", 39.743, -8.808, IssueStatus::Resolved),
            issue("c", 38.70, -9.10, IssueStatus::Open),
        ];
        let clusters = cluster(&points, 2, 5);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].count, 2);
        assert!((clusters[0].weight - 2.6).abs() < 1e-9);
        assert!((clusters[0].centroid.lat - 39.742).abs() < 1e-9);
        assert!((clusters[0].centroid.lng - -8.81).abs() < 1e-9);
    }

    #[test]
    fn test_centroid_is_unweighted() {
        let points = vec![
            issue("a", 10.001, 20.001, IssueStatus::Open),
            issue("b", 10.003, 20.003, IssueStatus::Resolved),
        ];
        let c = &cluster(&points, 2, 5)[0];
        assert!((c.centroid.lat - 10.002).abs() < 1e-9);
        assert!((c.centroid.lng - 20.002).abs() < 1e-9);
    }

    #[test]
    fn test_half_rounds_up() {
        assert_eq!(grid_index(-8.805, 100.0), grid_index(-8.80, 100.0));
        assert_eq!(grid_index(1.5, 1.0), 2);
        assert_eq!(grid_index(-1.5, 1.0), -1);
    }

    #[test]
    fn test_top_n_by_weight() {
        let points = vec![
            issue("light", 1.0, 1.0, IssueStatus::Resolved),
            issue("heavy1", 2.0, 2.0, IssueStatus::Open),
            issue("heavy2", 2.0, 2.0, IssueStatus::Open),
            issue("mid", 3.0, 3.0, IssueStatus::InProgress),
        ];
        let clusters = cluster(&points, 2, 2);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].count, 2);
        assert_eq!(clusters[1].weight, 1.0);
    }

    #[test]
    fn test_equal_weights_keep_first_seen_order() {
        let points = vec![
            issue("x", 5.0, 5.0, IssueStatus::Open),
            issue("y", 6.0, 6.0, IssueStatus::Open),
        ];
        let clusters = cluster(&points, 2, 5);
        assert_eq!(clusters[0].centroid.lat, 5.0);
    }

    #[test]
    fn test_radius_is_clamped_and_monotonic() {
        let scale = RadiusScale::default();
        assert_eq!(scale.radius(0), 8000.0);
        assert_eq!(scale.radius(1), 10000.0);
        assert_eq!(scale.radius(11), 30000.0);
        assert_eq!(scale.radius(10_000), 30000.0);
        let mut last = 0.0;
        for n in 0..50 {
            let r = scale.radius(n);
            assert!(r >= last);
            last = r;
        }
    }

    #[test]
    fn test_label() {
        let c = Cluster {
            centroid: LatLng::new(0.0, 0.0),
            weight: 1.0,
            count: 4,
        };
        assert_eq!(c.label(), "4 ocorrências");
    }
}
