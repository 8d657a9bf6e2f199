//! Error types for the headless harness.

use thiserror::Error;
use vanguard_core::error::EngineError;

/// Result type alias using [`HeadlessError`].
pub type Result<T> = std::result::Result<T, HeadlessError>;

/// Errors raised while driving the engine from a stream.
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// The engine rejected a snapshot or its config.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// An input line was not a valid snapshot.
    #[error("Invalid snapshot on line {line}: {source}")]
    Json {
        /// 1-based input line number.
        line: usize,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// Reading input or writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A replayed recording produced a different command stream.
    #[error("Replay diverged at frame {0}")]
    Diverged(usize),
}
