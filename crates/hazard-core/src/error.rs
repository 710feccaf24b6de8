//! Error types for document-level normalization.

use thiserror::Error;

/// The feed document did not have a shape we know how to read records from.
///
/// Individual malformed records never produce an error; they are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// Top-level value is neither a list nor an object.
    #[error("expected a JSON array or object, got {0}")]
    UnexpectedRoot(&'static str),

    /// Object without any recognised list key.
    #[error("no record list found (looked for {0})")]
    MissingRecordList(String),
}
