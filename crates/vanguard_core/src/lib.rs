//! # Vanguard Core
//!
//! Tactical decision engine for a tick-based, partially observable 2D
//! wargame.
//!
//! Each tick the engine receives a [`WorldSnapshot`](unit::WorldSnapshot)
//! carrying incremental unit deltas and answers with at most one
//! [`Command`](command::Command). Everything that has to survive between
//! ticks lives inside [`Engine`](engine::Engine):
//! - the unit table and the opponent grid index
//! - the action queue with its freeze timer
//! - policy state (formation phase, last evaded strike)
//! - the seeded tie-break RNG
//!
//! The engine is single-threaded and synchronous. It never does IO during a
//! tick; config and match recordings are loaded outside the tick loop.
//!
//! ## Crate Structure
//!
//! - [`tracker`] - Unit table and incremental delta application
//! - [`grid`] - Grid-hash index of opponent units
//! - [`cluster`] - BFS flood-fill clustering over the grid
//! - [`vision`] - Terrain/weather modulated ranges
//! - [`scheduler`] - Cooldown-gated FIFO of pending actions
//! - [`policy`] - Decision policies
//! - [`pipeline`] - Ordered policy dispatch
//! - [`engine`] - Per-tick control flow and force aggregates
//! - [`recording`] - Match recordings and replay verification
//! - [`math`] - 2D vector utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod cluster;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod math;
pub mod pipeline;
pub mod policy;
pub mod recording;
pub mod scheduler;
pub mod tracker;
pub mod unit;
pub mod vision;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cluster::{Cluster, ClusterCache};
    pub use crate::command::{ActionBatch, Command, Group, PendingAction, Rect};
    pub use crate::config::{EngineConfig, GameConstants, PolicyKind, TuningConfig};
    pub use crate::engine::{Engine, ForceAggregates};
    pub use crate::error::{EmptySelection, EngineError, Result};
    pub use crate::math::Vec2;
    pub use crate::scheduler::ActionScheduler;
    pub use crate::tracker::UnitTracker;
    pub use crate::unit::{
        PendingStrike, PlayerState, TerrainType, Unit, UnitKind, UnitUpdate, WeatherType,
        WorldSnapshot,
    };
    pub use crate::vision::VisionModel;
}
