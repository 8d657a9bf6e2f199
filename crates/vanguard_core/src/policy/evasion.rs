//! Dispersal from a known incoming strike.

use super::{DecisionContext, Policy};
use crate::command::ActionBatch;
use crate::unit::PendingStrike;

/// Spreads the force away from a known incoming strike, then regroups.
///
/// Each pending strike is answered once, and only when an own unit stands
/// within the blast radius of the impact point. The policy preempts: a claim
/// replaces whatever the scheduler was doing.
#[derive(Debug, Clone, Default)]
pub struct StrikeEvasion {
    handled: Option<PendingStrike>,
}

impl StrikeEvasion {
    /// The strike most recently answered.
    #[must_use]
    pub const fn handled(&self) -> Option<PendingStrike> {
        self.handled
    }
}

impl Policy for StrikeEvasion {
    fn name(&self) -> &'static str {
        "strike_evasion"
    }

    fn preempts(&self) -> bool {
        true
    }

    fn evaluate(&mut self, ctx: &mut DecisionContext<'_>) -> Option<ActionBatch> {
        let Some(strike) = ctx.opponent.next_strike else {
            self.handled = None;
            return None;
        };
        if self.handled == Some(strike) {
            return None;
        }
        let radius = ctx.config.game.strike_radius;
        let exposed = ctx
            .tracker
            .own_units()
            .filter(|u| u.position.distance(strike.target) <= radius)
            .count();
        if exposed == 0 {
            return None;
        }
        self.handled = Some(strike);

        let factor = ctx.config.tuning.evasion_expand_factor;
        tracing::info!(
            tick = ctx.tick,
            spotter = strike.spotter,
            x = strike.target.x,
            y = strike.target.y,
            exposed,
            "Dispersing from incoming strike"
        );
        Some(
            ActionBatch::new()
                .select_all(ctx.bounds)
                .scale(strike.target, factor)
                .then_freeze(ctx.config.game.strike_delay_ticks)
                .scale(strike.target, factor.recip())
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, PendingAction};
    use crate::math::Vec2;
    use crate::policy::fixture::{unit, Fixture, ENEMY, ME};
    use crate::unit::UnitKind;

    fn fixture_with_strike(strike: Option<PendingStrike>) -> Fixture {
        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Tank, 100.0, 100.0),
            unit(2, ENEMY, UnitKind::Tank, 300.0, 300.0),
        ]);
        fixture.opponent.next_strike = strike;
        fixture
    }

    const STRIKE: PendingStrike = PendingStrike {
        spotter: 2,
        target: Vec2::new(110.0, 90.0),
    };

    #[test]
    fn test_expand_then_regroup_around_impact() {
        let mut fixture = fixture_with_strike(Some(STRIKE));
        let mut policy = StrikeEvasion::default();
        let batch = policy.evaluate(&mut fixture.ctx()).unwrap();

        let actions: Vec<_> = batch.iter().collect();
        assert_eq!(actions.len(), 3);
        assert_eq!(
            actions[1].action,
            PendingAction::Issue(Command::Scale {
                center: STRIKE.target,
                factor: 10.0
            })
        );
        assert_eq!(actions[1].freeze_after, fixture.config.game.strike_delay_ticks);
        assert_eq!(
            actions[2].action,
            PendingAction::Issue(Command::Scale {
                center: STRIKE.target,
                factor: 0.1
            })
        );
    }

    #[test]
    fn test_same_strike_is_answered_once() {
        let mut fixture = fixture_with_strike(Some(STRIKE));
        let mut policy = StrikeEvasion::default();
        assert!(policy.evaluate(&mut fixture.ctx()).is_some());
        assert!(policy.evaluate(&mut fixture.ctx()).is_none());
        assert_eq!(policy.handled(), Some(STRIKE));
    }

    #[test]
    fn test_cleared_strike_resets_memory() {
        let mut fixture = fixture_with_strike(Some(STRIKE));
        let mut policy = StrikeEvasion::default();
        assert!(policy.evaluate(&mut fixture.ctx()).is_some());

        fixture.opponent.next_strike = None;
        assert!(policy.evaluate(&mut fixture.ctx()).is_none());
        assert_eq!(policy.handled(), None);

        fixture.opponent.next_strike = Some(STRIKE);
        assert!(policy.evaluate(&mut fixture.ctx()).is_some());
    }

    #[test]
    fn test_strike_outside_blast_radius_is_ignored() {
        let far = PendingStrike {
            spotter: 2,
            target: Vec2::new(151.0, 100.0),
        };
        let mut fixture = fixture_with_strike(Some(far));
        let mut policy = StrikeEvasion::default();
        assert!(policy.evaluate(&mut fixture.ctx()).is_none());
        assert_eq!(policy.handled(), None);

        // Edge of the blast counts.
        let edge = PendingStrike {
            spotter: 2,
            target: Vec2::new(150.0, 100.0),
        };
        fixture.opponent.next_strike = Some(edge);
        assert!(policy.evaluate(&mut fixture.ctx()).is_some());
        assert_eq!(policy.handled(), Some(edge));
    }

    #[test]
    fn test_no_strike_declines() {
        let mut fixture = fixture_with_strike(None);
        assert!(StrikeEvasion::default().evaluate(&mut fixture.ctx()).is_none());
    }
}
