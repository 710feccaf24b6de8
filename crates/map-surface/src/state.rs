//! Lifecycle of a map surface.

use std::fmt;

/// `Uninitialized → Ready → Disposed`, with no way back from `Disposed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceState {
    Uninitialized,
    Ready,
    Disposed,
}

impl SurfaceState {
    pub fn can_draw(&self) -> bool {
        matches!(self, SurfaceState::Ready)
    }
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SurfaceState::Uninitialized => "uninitialized",
            SurfaceState::Ready => "ready",
            SurfaceState::Disposed => "disposed",
        };
        f.write_str(s)
    }
}
