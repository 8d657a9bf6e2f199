//! Error types for the decision engine.

use thiserror::Error;

use crate::unit::UnitId;

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

/// An aggregate was requested over a unit selection that matched nothing.
///
/// This is always recoverable: the caller declines or skips the sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Empty selection: no unit matched the predicate")]
pub struct EmptySelection;

/// Top-level error type for the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An update referenced a unit that was never reported as new.
    ///
    /// The connector contract guarantees this cannot happen, so it is fatal.
    #[error("Update at tick {tick} references unknown unit {id}")]
    UnknownUnit {
        /// Unit identifier from the update.
        id: UnitId,
        /// Tick of the offending snapshot.
        tick: u64,
    },

    /// Aggregate over an empty selection.
    #[error(transparent)]
    EmptySelection(#[from] EmptySelection),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    /// Filesystem error while loading config or recordings.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Match recording could not be encoded, decoded or replayed.
    #[error("Recording error: {0}")]
    Recording(String),
}
