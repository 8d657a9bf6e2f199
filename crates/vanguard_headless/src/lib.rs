//! Headless harness for the decision engine.
//!
//! Feeds world snapshots through an [`Engine`](vanguard_core::engine::Engine)
//! outside of a live match. Used for CI runs, match recording and replay
//! verification.
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: one `WorldSnapshot` per tick
//! - **stdout**: one `{"tick":N,"command":...}` answer per snapshot
//! - **stderr**: logs (human-readable)
//!
//! See [`protocol`] for the message formats.
//!
//! # Example
//!
//! ```bash
//! # Answer snapshots from a file
//! cargo run -p vanguard_headless -- run < match.jsonl
//!
//! # Record while answering, then verify the recording
//! cargo run -p vanguard_headless -- run --record match.bin < match.jsonl
//! cargo run -p vanguard_headless -- verify match.bin
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod protocol;
pub mod runner;

pub use error::{HeadlessError, Result};
pub use protocol::Response;
pub use runner::{HeadlessRunner, RunSummary};
