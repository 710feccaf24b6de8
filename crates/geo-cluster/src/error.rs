//! Error types for point construction.

use thiserror::Error;

/// A point that cannot be placed on a map.
///
/// Callers skip and log these; they are never fatal for a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid geometry for {id}: ({latitude}, {longitude}) is not finite")]
    NonFinite {
        id: String,
        latitude: f64,
        longitude: f64,
    },
}
