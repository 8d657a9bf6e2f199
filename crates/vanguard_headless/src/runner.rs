//! Stream runner: snapshots in, responses out.

use std::io::{BufRead, Write};

use vanguard_core::command::Command;
use vanguard_core::config::EngineConfig;
use vanguard_core::engine::Engine;
use vanguard_core::recording::MatchRecording;
use vanguard_core::unit::WorldSnapshot;

use crate::error::Result;
use crate::protocol::{parse_snapshot, Response};

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Snapshots processed.
    pub ticks: usize,
    /// Ticks that produced a command.
    pub commands: usize,
}

/// Drives one engine over a snapshot stream, optionally recording it.
#[derive(Debug)]
pub struct HeadlessRunner {
    engine: Engine,
    recording: Option<MatchRecording>,
}

impl HeadlessRunner {
    /// Create a runner with a fresh engine.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            engine: Engine::new(config)?,
            recording: None,
        })
    }

    /// Also record every tick.
    #[must_use]
    pub fn with_recording(mut self) -> Self {
        self.recording = Some(MatchRecording::new(self.engine.config().clone()));
        self
    }

    /// Process one snapshot.
    pub fn step(&mut self, snapshot: WorldSnapshot) -> Result<Response> {
        let command = self.engine.tick(&snapshot)?;
        let response = Response {
            tick: snapshot.tick,
            command: command.clone(),
        };
        if let Some(recording) = &mut self.recording {
            recording.record(snapshot, command);
        }
        Ok(response)
    }

    /// Read snapshots until EOF, writing one response line per snapshot.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let snapshot = parse_snapshot(&line, index + 1)?;
            let response = self.step(snapshot)?;
            if let Some(command) = &response.command {
                summary.commands += 1;
                tracing::debug!(tick = response.tick, action = command.name(), "Answered");
            }
            summary.ticks += 1;
            output.write_all(response.to_json_line()?.as_bytes())?;
        }
        output.flush()?;
        tracing::info!(ticks = summary.ticks, commands = summary.commands, "Run finished");
        Ok(summary)
    }

    /// The engine being driven.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Take the recording, if recording was enabled.
    pub fn into_recording(self) -> Option<MatchRecording> {
        self.recording
    }
}

/// Convenience wrapper: answer a whole snapshot list in memory.
pub fn answer_all(
    config: EngineConfig,
    snapshots: Vec<WorldSnapshot>,
) -> Result<Vec<Option<Command>>> {
    let mut runner = HeadlessRunner::new(config)?;
    snapshots
        .into_iter()
        .map(|s| runner.step(s).map(|r| r.command))
        .collect()
}
