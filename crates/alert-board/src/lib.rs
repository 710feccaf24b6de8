//! Orchestration for the hazard alert map: the alerts board view model and
//! the live issue map controller.
//!
//! [`AlertBoard`] holds the fetched alert list, the user's filters and the
//! page cursor, and derives everything the board shows from them.
//! [`MapController`] listens for [`DataChanged`] signals, refetches points
//! (and optionally anchored alerts) in background tasks, clusters them and
//! reconciles the result onto a map surface.

mod board;
mod controller;
mod error;
mod export;
mod points;
mod sequence;

pub use board::{AlertBoard, LoadState, EMPTY_MESSAGE, LOADING_MESSAGE};
pub use controller::{DataChanged, Loaded, MapController, MapFilters};
pub use error::BoardError;
pub use export::export_layer;
pub use points::{parse_kind, JsonFilePoints, PointFilter, PointSource, StaticPoints};
pub use sequence::{LastApplied, Sequencer, Ticket};
