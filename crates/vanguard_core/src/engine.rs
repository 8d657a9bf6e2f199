//! Per-tick control flow.
//!
//! ```text
//! apply deltas ─► aggregates ─► preempting policies ─┬─► queue busy? release one action
//!                                                    └─► idle? run pipeline, enqueue batch
//! ```
//!
//! # Example
//!
//! ```
//! use vanguard_core::config::EngineConfig;
//! use vanguard_core::engine::Engine;
//! use vanguard_core::unit::WorldSnapshot;
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! let command = engine.tick(&WorldSnapshot::default()).unwrap();
//! assert!(command.is_none());
//! ```

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cluster::{Cluster, ClusterCache};
use crate::command::{Command, Rect, ReleaseContext};
use crate::config::{EngineConfig, StrengthMetric};
use crate::error::Result;
use crate::math::Vec2;
use crate::pipeline::DecisionPipeline;
use crate::policy::DecisionContext;
use crate::scheduler::ActionScheduler;
use crate::tracker::UnitTracker;
use crate::unit::{PlayerId, UnitKind, WorldSnapshot};
use crate::vision::{MapGrids, VisionModel};

/// Strength ratio reported when the opponent has no capable attackers.
pub const STRENGTH_SENTINEL: f64 = f64::MAX;

/// Own strength divided by opponent strength.
///
/// A zero denominator yields [`STRENGTH_SENTINEL`] instead of a division by
/// zero. A zero numerator over a non-zero denominator is an ordinary 0.0.
#[must_use]
pub fn strength_ratio(own: f64, opponent: f64) -> f64 {
    if opponent <= 0.0 {
        STRENGTH_SENTINEL
    } else {
        own / opponent
    }
}

/// Aggregates derived from the unit table once per tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForceAggregates {
    /// Number of own units.
    pub own_count: usize,
    /// Mean own position; `None` without own units.
    pub own_centroid: Option<Vec2>,
    /// Largest own-unit distance from the centroid.
    pub spread_radius: f64,
    /// Own capable strength over opponent capable strength.
    pub strength_ratio: f64,
    /// Opponent unit nearest to the own centroid.
    pub nearest_enemy: Option<Vec2>,
    /// Largest effective vision among own units.
    pub max_own_vision: f64,
}

impl ForceAggregates {
    /// Derive aggregates from the tracker.
    #[must_use]
    pub fn compute(tracker: &UnitTracker, vision: &VisionModel<'_>, metric: StrengthMetric) -> Self {
        let own_centroid = tracker.mean_position(|u| u.player_id == tracker.me()).ok();
        let mut own_count = 0;
        let mut spread_radius = 0.0_f64;
        let mut max_own_vision = 0.0_f64;
        for unit in tracker.own_units() {
            own_count += 1;
            if let Some(centroid) = own_centroid {
                spread_radius = spread_radius.max(unit.position.distance(centroid));
            }
            max_own_vision = max_own_vision.max(vision.effective_vision(unit));
        }

        let own = capable_strength(tracker, vision, metric, tracker.me(), tracker.opponent());
        let opponent = capable_strength(tracker, vision, metric, tracker.opponent(), tracker.me());

        Self {
            own_count,
            own_centroid,
            spread_radius,
            strength_ratio: strength_ratio(own, opponent),
            nearest_enemy: own_centroid
                .and_then(|c| tracker.nearest_opponent(c))
                .map(|u| u.position),
            max_own_vision,
        }
    }

    /// Own units per unit area of the disc spanned by the force.
    ///
    /// A single unit (zero radius) counts as infinitely dense.
    #[must_use]
    pub fn density(&self) -> f64 {
        if self.own_count == 0 {
            return 0.0;
        }
        if self.spread_radius == 0.0 {
            return f64::INFINITY;
        }
        self.own_count as f64 / (std::f64::consts::PI * self.spread_radius * self.spread_radius)
    }

    /// Distance from the own centroid to the nearest enemy.
    #[must_use]
    pub fn enemy_distance(&self) -> Option<f64> {
        Some(self.own_centroid?.distance(self.nearest_enemy?))
    }

    /// Whether the nearest enemy is within sight of the force's edge.
    #[must_use]
    pub fn in_contact(&self) -> bool {
        self.enemy_distance()
            .is_some_and(|d| d - self.spread_radius <= self.max_own_vision)
    }
}

/// Strength of `side`'s units able to attack any kind `other` fields.
fn capable_strength(
    tracker: &UnitTracker,
    vision: &VisionModel<'_>,
    metric: StrengthMetric,
    side: PlayerId,
    other: PlayerId,
) -> f64 {
    let targets: BTreeSet<UnitKind> = tracker.units_of(other).map(|u| u.kind).collect();
    tracker
        .units_of(side)
        .filter(|u| targets.iter().any(|&t| vision.can_attack(u.kind, t)))
        .map(|u| match metric {
            StrengthMetric::Count => 1.0,
            StrengthMetric::Durability => f64::from(u.durability),
        })
        .sum()
}

/// The decision engine. Owns all state carried between ticks.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    tracker: UnitTracker,
    clusters: ClusterCache,
    scheduler: ActionScheduler,
    pipeline: DecisionPipeline,
    map: MapGrids,
    rng: ChaCha8Rng,
    aggregates: ForceAggregates,
}

impl Engine {
    /// Create an engine. Must be constructed before tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EngineError::Config`] for an invalid config.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tracker: UnitTracker::new(config.tuning.cell_size),
            clusters: ClusterCache::new(),
            scheduler: ActionScheduler::new(),
            pipeline: DecisionPipeline::from_config(&config),
            map: MapGrids::default(),
            rng: ChaCha8Rng::seed_from_u64(config.tuning.rng_seed),
            aggregates: ForceAggregates::default(),
            config,
        })
    }

    /// Process one snapshot and return the command for this tick, if any.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EngineError::UnknownUnit`] when the snapshot
    /// updates a unit that was never introduced.
    pub fn tick(&mut self, snapshot: &WorldSnapshot) -> Result<Option<Command>> {
        self.tracker.apply_deltas(snapshot)?;
        self.map.absorb(snapshot);

        let vision = VisionModel::new(&self.config.game, &self.map);
        self.aggregates =
            ForceAggregates::compute(&self.tracker, &vision, self.config.tuning.strength_metric);

        let mut ctx = DecisionContext::new(
            snapshot.tick,
            Rect::world(snapshot.world_width, snapshot.world_height),
            &snapshot.me,
            &snapshot.opponent,
            &self.tracker,
            vision,
            &self.aggregates,
            &self.config,
            &mut self.rng,
            &mut self.clusters,
        );

        if let Some(claim) = self.pipeline.evaluate_preempting(&mut ctx) {
            tracing::info!(
                tick = snapshot.tick,
                policy = claim.policy,
                actions = claim.batch.len(),
                "Preempting policy replaced the action queue"
            );
            self.scheduler.clear();
            self.scheduler.enqueue_batch(claim.batch);
        } else if self.scheduler.is_idle() {
            if let Some(claim) = self.pipeline.evaluate(&mut ctx) {
                tracing::debug!(
                    tick = snapshot.tick,
                    policy = claim.policy,
                    actions = claim.batch.len(),
                    "Policy claimed the turn"
                );
                self.scheduler.enqueue_batch(claim.batch);
            }
            return Ok(None);
        }

        Ok(self.release(snapshot.tick, snapshot.me.remaining_action_cooldown_ticks))
    }

    fn release(&mut self, tick: u64, action_cooldown: u32) -> Option<Command> {
        let action = self.scheduler.tick(action_cooldown)?;
        let ctx = ReleaseContext {
            tracker: &self.tracker,
        };
        match action.materialize(&ctx) {
            Some(command) => {
                tracing::debug!(tick, action = command.name(), "Released action");
                Some(command)
            }
            None => {
                tracing::debug!(tick, ?action, "Dropped action with undefined geometry");
                None
            }
        }
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Unit table.
    #[must_use]
    pub const fn tracker(&self) -> &UnitTracker {
        &self.tracker
    }

    /// Action queue.
    #[must_use]
    pub const fn scheduler(&self) -> &ActionScheduler {
        &self.scheduler
    }

    /// Aggregates from the last tick.
    #[must_use]
    pub const fn aggregates(&self) -> &ForceAggregates {
        &self.aggregates
    }

    /// Current opponent clusters, computed on demand.
    pub fn clusters(&mut self) -> &[Cluster] {
        self.clusters.get(&self.tracker)
    }

    /// Policy names in priority order.
    #[must_use]
    pub fn policy_names(&self) -> Vec<&'static str> {
        self.pipeline.names()
    }
}
