//! Error types for map surfaces and reconciliation.

use thiserror::Error;

use crate::state::SurfaceState;

/// Errors raised by a concrete map backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The backend refused a single marker; the rest of the layer is fine.
    #[error("marker rejected: {0}")]
    Rejected(String),

    /// The backend (map library) could not be brought up at all.
    #[error("map surface unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by the reconciler's state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// Drawing was attempted outside the `Ready` state.
    #[error("map surface is not ready (state: {0})")]
    NotReady(SurfaceState),

    /// A disposed reconciler cannot be revived; build a new one.
    #[error("map surface has been disposed")]
    Disposed,

    /// `attach` was called twice.
    #[error("map surface is already initialized")]
    AlreadyInitialized,

    /// The map library failed to initialize.
    #[error("map surface unavailable: {0}")]
    SurfaceUnavailable(String),
}
