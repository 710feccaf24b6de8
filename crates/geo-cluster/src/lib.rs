//! Spatial reduction of issue and help-request points.
//!
//! Points are snapped to a decimal-degree grid, accumulated per cell, and
//! only the heaviest few cells are kept so the map overlays one label per
//! cluster without drowning in them.
//!
//! # Example
//!
//! ```rust
//! use geo_cluster::{cluster, GeoPoint, IssueStatus, PointKind};
//!
//! let points = vec![
//!     GeoPoint::new("1", "Buraco", 39.741, -8.812, PointKind::Issue(IssueStatus::Open)).unwrap(),
//!     GeoPoint::new("2", "Lixo", 39.743, -8.808, PointKind::Issue(IssueStatus::Resolved)).unwrap(),
//! ];
//! let clusters = cluster(&points, 2, 5);
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].count, 2);
//! ```

mod bounds;
mod cluster;
mod error;
mod point;

pub use bounds::{Bounds, PORTUGAL_BOUNDS};
pub use cluster::{
    cluster, cluster_with, Cluster, ClusterOptions, LatLng, RadiusScale, DEFAULT_PRECISION,
    DEFAULT_TOP_N,
};
pub use error::GeometryError;
pub use point::{collect_points, GeoPoint, IssueStatus, Locatable, PointKind, PointRecord};
