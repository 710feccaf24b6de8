//! Backend-agnostic map rendering.
//!
//! A [`Scene`] describes every marker that should be on the map. A
//! [`MarkerReconciler`] owns one [`MapSurface`] and, on every pass, clears
//! what it drew before and draws the scene. Concrete map libraries plug in
//! as `MapSurface` adapters; [`RecordingSurface`] and [`GeoJsonSurface`] ship
//! with the crate.
//!
//! # Example
//!
//! ```rust
//! use geo_cluster::{cluster, GeoPoint, IssueStatus, PointKind, RadiusScale};
//! use map_surface::{CallbackCell, MarkerReconciler, RecordingSurface, Scene};
//!
//! let points = vec![
//!     GeoPoint::new("1", "Buraco", 39.741, -8.812, PointKind::Issue(IssueStatus::Open)).unwrap(),
//! ];
//! let clusters = cluster(&points, 2, 5);
//!
//! let callback = CallbackCell::new();
//! let scene = Scene::new()
//!     .with_points(&points, &callback)
//!     .with_clusters(&clusters, RadiusScale::default());
//!
//! let mut map = MarkerReconciler::new(callback);
//! map.attach(RecordingSurface::new()).unwrap();
//! let report = map.reconcile(&scene).unwrap();
//! assert_eq!(report.rendered, 3);
//! ```

mod callback;
mod error;
mod geojson;
mod popup;
mod recording;
mod reconciler;
mod scene;
mod state;
mod style;
mod surface;

pub use callback::CallbackCell;
pub use error::{ReconcileError, SurfaceError};
pub use geojson::GeoJsonSurface;
pub use popup::{alert_popup, point_popup};
pub use recording::RecordingSurface;
pub use reconciler::{Applied, MarkerReconciler, ReconcileReport};
pub use scene::Scene;
pub use state::SurfaceState;
pub use style::{alert_style, cluster_style, label_style, point_style, MarkerStyle};
pub use surface::{ClickHandler, MapSurface, MarkerShape, MarkerSpec, Popup, PopupSource, Viewport};
