//! Rotate, shrink and march cycle for the whole force.

use super::{DecisionContext, Policy};
use crate::command::ActionBatch;

/// Where the formation cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormationPhase {
    /// Turn the force around its centroid.
    #[default]
    Rotate,
    /// Contract the force toward its centroid.
    Shrink,
    /// March toward the nearest opponent.
    Move,
}

/// Rotate, shrink and march cycle that keeps the force tight on the way
/// to the enemy.
///
/// A loose force (density under the threshold) restarts the cycle. Once the
/// enemy is in contact the policy steps aside for engagement.
#[derive(Debug, Clone, Default)]
pub struct Formation {
    phase: FormationPhase,
    shrinks_done: u32,
}

impl Formation {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> FormationPhase {
        self.phase
    }

    /// Shrinks issued in the current SHRINK phase.
    #[must_use]
    pub const fn shrinks_done(&self) -> u32 {
        self.shrinks_done
    }

    fn rotate(&mut self, ctx: &DecisionContext<'_>) -> ActionBatch {
        let tuning = &ctx.config.tuning;
        self.phase = if tuning.shrink_repeats == 0 {
            FormationPhase::Move
        } else {
            FormationPhase::Shrink
        };
        ActionBatch::new()
            .select_all(ctx.bounds)
            .rotate_around_own_centroid(tuning.rotate_angle)
            .then_freeze(tuning.rotate_freeze_ticks)
            .build()
    }

    fn shrink(&mut self, ctx: &DecisionContext<'_>) -> ActionBatch {
        let tuning = &ctx.config.tuning;
        self.shrinks_done += 1;
        if self.shrinks_done >= tuning.shrink_repeats {
            self.phase = FormationPhase::Move;
            self.shrinks_done = 0;
        }
        ActionBatch::new()
            .select_all(ctx.bounds)
            .scale_around_own_centroid(tuning.shrink_factor)
            .then_freeze(tuning.shrink_freeze_ticks)
            .build()
    }

    fn march(&mut self, ctx: &DecisionContext<'_>) -> Option<ActionBatch> {
        let aggregates = ctx.aggregates;
        let tuning = &ctx.config.tuning;
        if aggregates.density() < tuning.density_threshold {
            tracing::debug!(
                tick = ctx.tick,
                density = aggregates.density(),
                "Formation too loose, regrouping"
            );
            return Some(self.rotate(ctx));
        }
        if aggregates.in_contact() {
            return None;
        }

        let offset = aggregates.nearest_enemy? - aggregates.own_centroid?;
        let slowest = ctx
            .tracker
            .own_units()
            .map(|u| ctx.config.game.kinds.get(u.kind).speed)
            .reduce(f64::min)?;
        Some(
            ActionBatch::new()
                .select_all(ctx.bounds)
                .move_by(offset, Some(slowest))
                .then_freeze(tuning.march_freeze_ticks)
                .build(),
        )
    }
}

impl Policy for Formation {
    fn name(&self) -> &'static str {
        "formation"
    }

    fn evaluate(&mut self, ctx: &mut DecisionContext<'_>) -> Option<ActionBatch> {
        if ctx.aggregates.own_centroid.is_none() || ctx.aggregates.nearest_enemy.is_none() {
            return None;
        }
        match self.phase {
            FormationPhase::Rotate => Some(self.rotate(ctx)),
            FormationPhase::Shrink => Some(self.shrink(ctx)),
            FormationPhase::Move => self.march(ctx),
        }
    }
}
