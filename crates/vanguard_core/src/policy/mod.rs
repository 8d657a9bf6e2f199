//! Decision policies.
//!
//! A policy looks at the tracked state and either claims the turn by
//! returning an [`ActionBatch`] or declines with `None`. Policies that need
//! an aggregate which is undefined this tick (no own units, no visible
//! opponent) decline rather than emit a partial batch.

use rand_chacha::ChaCha8Rng;

use crate::cluster::{Cluster, ClusterCache};
use crate::command::{ActionBatch, Rect};
use crate::config::{EngineConfig, PolicyKind};
use crate::engine::ForceAggregates;
use crate::tracker::UnitTracker;
use crate::unit::PlayerState;
use crate::vision::VisionModel;

mod engagement;
mod evasion;
mod formation;
mod setup;
mod strike;

pub use engagement::{choose_posture, Engagement, Posture};
pub use evasion::StrikeEvasion;
pub use formation::{Formation, FormationPhase};
pub use setup::InitialSetup;
pub use strike::StrikeTargeting;

/// Read-only view of the engine handed to policies for one tick.
///
/// Clusters are the one lazily computed input: they are built on the first
/// [`DecisionContext::clusters`] call and reused while the grid is
/// unchanged.
#[derive(Debug)]
pub struct DecisionContext<'a> {
    /// Current tick.
    pub tick: u64,
    /// Whole-world selection rectangle.
    pub bounds: Rect,
    /// Controlling player.
    pub me: &'a PlayerState,
    /// Opposing player.
    pub opponent: &'a PlayerState,
    /// Unit table.
    pub tracker: &'a UnitTracker,
    /// Range model.
    pub vision: VisionModel<'a>,
    /// Per-tick force aggregates.
    pub aggregates: &'a ForceAggregates,
    /// Engine configuration.
    pub config: &'a EngineConfig,
    /// Seeded tie-break randomness.
    pub rng: &'a mut ChaCha8Rng,
    clusters: &'a mut ClusterCache,
}

impl<'a> DecisionContext<'a> {
    /// Assemble a context.
    #[must_use]
    pub fn new(
        tick: u64,
        bounds: Rect,
        me: &'a PlayerState,
        opponent: &'a PlayerState,
        tracker: &'a UnitTracker,
        vision: VisionModel<'a>,
        aggregates: &'a ForceAggregates,
        config: &'a EngineConfig,
        rng: &'a mut ChaCha8Rng,
        clusters: &'a mut ClusterCache,
    ) -> Self {
        Self {
            tick,
            bounds,
            me,
            opponent,
            tracker,
            vision,
            aggregates,
            config,
            rng,
            clusters,
        }
    }

    /// Opponent clusters, most populous first.
    pub fn clusters(&mut self) -> &[Cluster] {
        self.clusters.get(self.tracker)
    }
}

/// A decision policy.
pub trait Policy: std::fmt::Debug {
    /// Name for logs.
    fn name(&self) -> &'static str;

    /// Preempting policies run every tick, even while the queue is busy,
    /// and replace whatever is queued when they claim.
    fn preempts(&self) -> bool {
        false
    }

    /// Claim the turn with a batch, or decline.
    fn evaluate(&mut self, ctx: &mut DecisionContext<'_>) -> Option<ActionBatch>;
}

/// Instantiate the policy for a config entry.
#[must_use]
pub fn build_policy(kind: PolicyKind) -> Box<dyn Policy> {
    match kind {
        PolicyKind::StrikeEvasion => Box::new(StrikeEvasion::default()),
        PolicyKind::InitialSetup => Box::new(InitialSetup),
        PolicyKind::StrikeTargeting => Box::new(StrikeTargeting),
        PolicyKind::Formation => Box::new(Formation::default()),
        PolicyKind::Engagement => Box::new(Engagement),
    }
}
