//! JSON lines protocol.
//!
//! **Input:** one [`WorldSnapshot`] per line, in tick order. Blank lines are
//! ignored.
//!
//! **Output:** one [`Response`] per snapshot, with `command` set to `null`
//! on ticks where the engine stays silent.
//!
//! # Example Session
//!
//! ```text
//! -> {"tick":0,"world_width":1024.0,"world_height":1024.0,"me":{...},"opponent":{...},"new_units":[...]}
//! <- {"tick":0,"command":null}
//! -> {"tick":1,"world_width":1024.0,"world_height":1024.0,"me":{...},"opponent":{...}}
//! <- {"tick":1,"command":{"ClearAndSelect":{"rect":{...},"kind":"Arrv"}}}
//! ```

use serde::{Deserialize, Serialize};
use vanguard_core::command::Command;
use vanguard_core::unit::WorldSnapshot;

use crate::error::{HeadlessError, Result};

/// Parse one input line. `line_number` is 1-based and only used for errors.
pub fn parse_snapshot(line: &str, line_number: usize) -> Result<WorldSnapshot> {
    serde_json::from_str(line).map_err(|source| HeadlessError::Json {
        line: line_number,
        source,
    })
}

/// The engine's answer for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Tick of the snapshot being answered.
    pub tick: u64,
    /// Command to send, if any.
    pub command: Option<Command>,
}

impl Response {
    /// Serialize to a single JSON line with trailing newline.
    pub fn to_json_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self).map_err(|source| HeadlessError::Json {
            line: 0,
            source,
        })?;
        line.push('\n');
        Ok(line)
    }
}
