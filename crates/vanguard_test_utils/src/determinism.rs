//! Determinism testing utilities.
//!
//! The engine must answer the same snapshot stream with the same command
//! stream for a given config. The usual sources of drift are:
//!
//! - **Map iteration order**: unit and grid maps are ordered by key so
//!   clustering and tie-breaks never depend on hasher state.
//! - **Randomness**: the only RNG is the engine's seeded `ChaCha8Rng`.
//! - **Hidden state**: everything carried between ticks lives in `Engine`.
//!
//! # Example
//!
//! ```
//! use vanguard_core::config::EngineConfig;
//! use vanguard_test_utils::determinism::verify_engine_determinism;
//! use vanguard_test_utils::fixtures::opening_match;
//!
//! let result = verify_engine_determinism(3, &EngineConfig::default(), &opening_match(50))
//!     .unwrap();
//! result.assert_deterministic();
//! ```

use vanguard_core::command::Command;
use vanguard_core::config::EngineConfig;
use vanguard_core::engine::Engine;
use vanguard_core::error::Result;
use vanguard_core::unit::WorldSnapshot;

/// Command stream of one run, one entry per tick.
pub type CommandStream = Vec<Option<Command>>;

/// Feed `snapshots` into a fresh engine and collect its answers.
///
/// # Errors
///
/// Propagates config validation and tick errors.
pub fn run_engine(config: &EngineConfig, snapshots: &[WorldSnapshot]) -> Result<CommandStream> {
    let mut engine = Engine::new(config.clone())?;
    snapshots.iter().map(|s| engine.tick(s)).collect()
}

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical streams.
    pub is_deterministic: bool,
    /// Command stream of each run.
    pub streams: Vec<CommandStream>,
    /// First tick index at which some run differs from the first run.
    pub first_divergence: Option<usize>,
}

impl DeterminismResult {
    /// Commands actually issued by the first run.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.streams
            .first()
            .map_or(0, |s| s.iter().filter(|c| c.is_some()).count())
    }

    /// Assert that every run matched, with a detailed message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different command streams.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let index = self.first_divergence.unwrap_or_default();
            let at: Vec<_> = self.streams.iter().map(|s| s.get(index)).collect();
            panic!(
                "Engine is non-deterministic!\n\
                 Runs: {}\n\
                 First divergence at tick index {}\n\
                 Commands there: {:?}",
                self.streams.len(),
                index,
                at
            );
        }
    }
}

fn first_divergence(streams: &[CommandStream]) -> Option<usize> {
    let (reference, rest) = streams.split_first()?;
    rest.iter()
        .filter_map(|stream| {
            let common = reference.len().min(stream.len());
            (0..common)
                .find(|&i| reference[i] != stream[i])
                .or_else(|| (reference.len() != stream.len()).then_some(common))
        })
        .min()
}

/// Run the engine `runs` times over the same snapshots and compare.
///
/// # Errors
///
/// Propagates engine errors from any run.
pub fn verify_engine_determinism(
    runs: usize,
    config: &EngineConfig,
    snapshots: &[WorldSnapshot],
) -> Result<DeterminismResult> {
    let streams = (0..runs)
        .map(|_| run_engine(config, snapshots))
        .collect::<Result<Vec<_>>>()?;
    let first_divergence = first_divergence(&streams);
    if let Some(index) = first_divergence {
        tracing::warn!(runs, index, "Engine runs diverged");
    }
    Ok(DeterminismResult {
        is_deterministic: first_divergence.is_none(),
        streams,
        first_divergence,
    })
}
