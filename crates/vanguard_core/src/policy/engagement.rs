//! Posture choice against the nearest enemy.

use rand::Rng;

use super::{DecisionContext, Policy};
use crate::command::ActionBatch;

/// How the force responds to the nearest enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    /// Back away slowly, keeping a lead on score.
    Retreat,
    /// Close the distance.
    Advance,
    /// Step sideways off the line of approach.
    Sidestep,
}

/// Pick a posture.
///
/// `ahead` is own score above the opponent's. Retreat wins over every other
/// rule; advancing is forced once `tick` reaches `long_game_tick`.
#[must_use]
pub fn choose_posture(
    ahead: bool,
    in_contact: bool,
    strength_ratio: f64,
    tick: u64,
    long_game_tick: u64,
) -> Posture {
    if ahead && in_contact {
        Posture::Retreat
    } else if strength_ratio >= 1.0 || !in_contact || tick >= long_game_tick {
        Posture::Advance
    } else {
        Posture::Sidestep
    }
}

/// Advance, retreat or sidestep relative to the nearest enemy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engagement;

impl Policy for Engagement {
    fn name(&self) -> &'static str {
        "engagement"
    }

    fn evaluate(&mut self, ctx: &mut DecisionContext<'_>) -> Option<ActionBatch> {
        let aggregates = ctx.aggregates;
        let config = ctx.config;
        let tuning = &config.tuning;
        let toward = aggregates.nearest_enemy? - aggregates.own_centroid?;
        if toward.length() == 0.0 {
            return None;
        }
        let direction = toward.normalize();

        let posture = choose_posture(
            ctx.me.score > ctx.opponent.score,
            aggregates.in_contact(),
            aggregates.strength_ratio,
            ctx.tick,
            tuning.long_game_tick,
        );
        let (offset, max_speed) = match posture {
            Posture::Retreat => (
                -direction.scale(tuning.retreat_distance),
                Some(tuning.retreat_speed),
            ),
            Posture::Advance => (toward, None),
            Posture::Sidestep => {
                let side = if ctx.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                (direction.perpendicular().scale(side * tuning.sidestep_distance), None)
            }
        };
        tracing::debug!(
            tick = ctx.tick,
            ?posture,
            ratio = aggregates.strength_ratio,
            "Engagement posture"
        );
        Some(
            ActionBatch::new()
                .select_all(ctx.bounds)
                .move_by(offset, max_speed)
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

    #[test]
    fn test_retreat_when_ahead_in_contact() {
        assert_eq!(choose_posture(true, true, 0.5, 10, 15_000), Posture::Retreat);
        assert_eq!(choose_posture(true, true, 5.0, 20_000, 15_000), Posture::Retreat);
    }

    #[test]
    fn test_advance_rules() {
        assert_eq!(choose_posture(false, true, 1.0, 10, 15_000), Posture::Advance);
        assert_eq!(choose_posture(true, false, 0.1, 10, 15_000), Posture::Advance);
        assert_eq!(choose_posture(false, true, 0.1, 15_000, 15_000), Posture::Advance);
    }

    #[test]
    fn test_sidestep_when_outmatched_in_contact() {
        assert_eq!(choose_posture(false, true, 0.0, 10, 15_000), Posture::Sidestep);
        assert_eq!(choose_posture(false, true, 0.99, 14_999, 15_000), Posture::Sidestep);
    }

    fn move_of(batch: &ActionBatch) -> (Vec2, Option<f64>) {
        match batch.iter().nth(1).map(|s| &s.action) {
            Some(PendingAction::Issue(Command::Move { offset, max_speed })) => {
                (*offset, *max_speed)
            }
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn test_retreat_moves_away_slowly() {
        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Tank, 100.0, 100.0),
            unit(10, ENEMY, UnitKind::Tank, 150.0, 100.0),
        ]);
        fixture.me.score = 10;
        let batch = Engagement.evaluate(&mut fixture.ctx()).unwrap();
        assert_eq!(move_of(&batch), (Vec2::new(-30.0, 0.0), Some(0.2)));
    }

    #[test]
    fn test_advance_covers_full_offset() {
        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Tank, 100.0, 100.0),
            unit(10, ENEMY, UnitKind::Arrv, 150.0, 100.0),
        ]);
        // ARRVs cannot attack, so the ratio is the sentinel.
        let batch = Engagement.evaluate(&mut fixture.ctx()).unwrap();
        assert_eq!(move_of(&batch), (Vec2::new(50.0, 0.0), None));
    }

    #[test]
    fn test_sidestep_is_perpendicular() {
        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Arrv, 100.0, 100.0),
            unit(10, ENEMY, UnitKind::Tank, 150.0, 100.0),
        ]);
        let batch = Engagement.evaluate(&mut fixture.ctx()).unwrap();
        let (offset, max_speed) = move_of(&batch);
        assert_eq!(max_speed, None);
        assert!(offset.x.abs() < 1e-9);
        assert!((offset.y.abs() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_declines_when_stacked_on_enemy() {
        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Tank, 100.0, 100.0),
            unit(10, ENEMY, UnitKind::Tank, 100.0, 100.0),
        ]);
        assert!(Engagement.evaluate(&mut fixture.ctx()).is_none());
    }
}
