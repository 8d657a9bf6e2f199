//! Match recordings.
//!
//! A recording stores the engine config plus every snapshot the engine saw
//! and the command it answered with. Since the engine is deterministic for
//! a given config, replaying the snapshots into a fresh engine must give
//! back the same command stream.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::command::Command;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::unit::WorldSnapshot;

/// Recording file format version.
pub const RECORDING_VERSION: u32 = 1;

/// One engine call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedTick {
    /// Input.
    pub snapshot: WorldSnapshot,
    /// Output.
    pub command: Option<Command>,
}

/// A complete match as seen by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecording {
    /// Format version.
    pub version: u32,
    /// Config the engine ran with.
    pub config: EngineConfig,
    /// Ticks in order.
    pub frames: Vec<RecordedTick>,
}

impl MatchRecording {
    /// Start an empty recording.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            version: RECORDING_VERSION,
            config,
            frames: Vec::new(),
        }
    }

    /// Append a tick.
    pub fn record(&mut self, snapshot: WorldSnapshot, command: Option<Command>) {
        self.frames.push(RecordedTick { snapshot, command });
    }

    /// Number of recorded ticks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Commands in tick order.
    pub fn commands(&self) -> impl Iterator<Item = Option<&Command>> {
        self.frames.iter().map(|f| f.command.as_ref())
    }

    /// Encode with bincode.
    ///
    /// # Errors
    /// Returns [`EngineError::Recording`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| EngineError::Recording(format!("Failed to serialize recording: {e}")))
    }

    /// Decode from bincode and check the version.
    ///
    /// # Errors
    /// Returns [`EngineError::Recording`] on malformed data or a version
    /// mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let recording: Self = bincode::deserialize(bytes)
            .map_err(|e| EngineError::Recording(format!("Failed to deserialize recording: {e}")))?;
        if recording.version != RECORDING_VERSION {
            return Err(EngineError::Recording(format!(
                "Recording version mismatch: expected {RECORDING_VERSION}, got {}",
                recording.version
            )));
        }
        Ok(recording)
    }

    /// Save to a file.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_bytes()?)?;
        Ok(())
    }

    /// Load from a file.
    ///
    /// # Errors
    /// Returns an error if reading or decoding fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(&std::fs::read(path.as_ref())?)
    }

    /// Replay the snapshots into a fresh engine and compare outputs.
    ///
    /// Returns the index of the first tick whose command differs, or `None`
    /// when the whole stream matches.
    ///
    /// # Errors
    /// Propagates config and engine errors.
    pub fn verify(&self) -> Result<Option<usize>> {
        let mut engine = Engine::new(self.config.clone())?;
        for (index, frame) in self.frames.iter().enumerate() {
            let command = engine.tick(&frame.snapshot)?;
            if command != frame.command {
                tracing::warn!(
                    index,
                    tick = frame.snapshot.tick,
                    expected = ?frame.command,
                    actual = ?command,
                    "Replay diverged"
                );
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}
