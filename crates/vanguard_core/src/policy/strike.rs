//! Special strike target selection.

use super::{DecisionContext, Policy};
use crate::cluster::Cluster;
use crate::command::ActionBatch;
use crate::math::Vec2;
use crate::unit::UnitId;

/// Calls the special strike on the largest opponent cluster an own unit can
/// see.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrikeTargeting;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    spotter: UnitId,
    target: Vec2,
    cluster_size: usize,
    centrality: f64,
}

impl Candidate {
    fn beats(&self, other: &Self) -> bool {
        self.cluster_size > other.cluster_size
            || (self.cluster_size == other.cluster_size && self.centrality < other.centrality)
    }
}

fn nearest_cluster(clusters: &[Cluster], point: Vec2) -> Option<&Cluster> {
    let mut best: Option<(&Cluster, f64)> = None;
    for cluster in clusters {
        let d = cluster.centroid().distance_squared(point);
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((cluster, d));
        }
    }
    best.map(|(cluster, _)| cluster)
}

impl Policy for StrikeTargeting {
    fn name(&self) -> &'static str {
        "strike_targeting"
    }

    fn evaluate(&mut self, ctx: &mut DecisionContext<'_>) -> Option<ActionBatch> {
        if ctx.me.remaining_strike_cooldown_ticks > 0 {
            return None;
        }
        let tracker = ctx.tracker;
        let vision = ctx.vision;
        let config = ctx.config;
        let tuning = &config.tuning;
        let tick = ctx.tick;
        let clusters = ctx.clusters();
        if clusters.is_empty() {
            return None;
        }

        let mut best: Option<Candidate> = None;
        for unit in tracker.own_units() {
            let Some(cluster) = nearest_cluster(clusters, unit.position) else {
                continue;
            };
            let Some(member) = cluster.nearest_member(unit.position) else {
                continue;
            };
            let reach = vision.effective_vision(unit) - tuning.strike_range_margin;
            if unit.position.distance(member.position) >= reach {
                continue;
            }
            let candidate = Candidate {
                spotter: unit.id,
                target: member.position,
                cluster_size: cluster.len(),
                centrality: member.position.distance(cluster.centroid()),
            };
            if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }

        let chosen = best?;
        tracing::info!(
            tick,
            spotter = chosen.spotter,
            cluster = chosen.cluster_size,
            clusters = clusters.len(),
            "Calling strike"
        );
        Some(
            ActionBatch::new()
                .strike(chosen.spotter, chosen.target)
                .then_freeze(tuning.strike_hold_ticks)
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, PendingAction};
    use crate::policy::fixture::{unit, Fixture, ENEMY, ME};
    use crate::unit::UnitKind;

    fn strike_of(batch: &ActionBatch) -> (UnitId, Vec2) {
        match batch.iter().next().map(|s| &s.action) {
            Some(PendingAction::Issue(Command::TacticalStrike { spotter, target })) => {
                (*spotter, *target)
            }
            other => panic!("expected strike, got {other:?}"),
        }
    }

    #[test]
    fn test_prefers_larger_cluster() {
        // Fighters see 120; each has one cluster 100 away.
        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Fighter, 500.0, 500.0),
            unit(2, ME, UnitKind::Fighter, 200.0, 500.0),
            unit(10, ENEMY, UnitKind::Tank, 600.0, 500.0),
            unit(11, ENEMY, UnitKind::Tank, 605.0, 500.0),
            unit(20, ENEMY, UnitKind::Tank, 300.0, 500.0),
            unit(21, ENEMY, UnitKind::Tank, 305.0, 500.0),
            unit(22, ENEMY, UnitKind::Tank, 310.0, 500.0),
        ]);
        let batch = StrikeTargeting.evaluate(&mut fixture.ctx()).unwrap();
        assert_eq!(strike_of(&batch), (2, Vec2::new(300.0, 500.0)));
        assert_eq!(
            batch.iter().next().map(|s| s.freeze_after),
            Some(fixture.config.tuning.strike_hold_ticks)
        );
    }

    #[test]
    fn test_vision_boundary_is_exclusive() {
        // Tank vision is exactly 80.
        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Tank, 100.0, 100.0),
            unit(10, ENEMY, UnitKind::Tank, 180.0, 100.0),
        ]);
        assert!(StrikeTargeting.evaluate(&mut fixture.ctx()).is_none());

        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Tank, 100.0, 100.0),
            unit(10, ENEMY, UnitKind::Tank, 179.9, 100.0),
        ]);
        let batch = StrikeTargeting.evaluate(&mut fixture.ctx()).unwrap();
        assert_eq!(strike_of(&batch).0, 1);
    }

    #[test]
    fn test_margin_shrinks_reach() {
        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Tank, 100.0, 100.0),
            unit(10, ENEMY, UnitKind::Tank, 170.0, 100.0),
        ]);
        fixture.config.tuning.strike_range_margin = 15.0;
        assert!(StrikeTargeting.evaluate(&mut fixture.ctx()).is_none());
    }

    #[test]
    fn test_declines_on_cooldown() {
        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Tank, 100.0, 100.0),
            unit(10, ENEMY, UnitKind::Tank, 120.0, 100.0),
        ]);
        fixture.me.remaining_strike_cooldown_ticks = 5;
        assert!(StrikeTargeting.evaluate(&mut fixture.ctx()).is_none());
    }

    #[test]
    fn test_declines_without_opponents() {
        let mut fixture = Fixture::new(vec![unit(1, ME, UnitKind::Tank, 100.0, 100.0)]);
        assert!(StrikeTargeting.evaluate(&mut fixture.ctx()).is_none());
    }

    #[test]
    fn test_equal_candidates_keep_first_found() {
        // Two singleton clusters; each unit only reaches its own side.
        let mut fixture = Fixture::new(vec![
            unit(1, ME, UnitKind::Tank, 100.0, 100.0),
            unit(2, ME, UnitKind::Tank, 700.0, 700.0),
            unit(10, ENEMY, UnitKind::Tank, 150.0, 100.0),
            unit(20, ENEMY, UnitKind::Tank, 750.0, 700.0),
        ]);
        // Singletons tie on size and centrality.
        let batch = StrikeTargeting.evaluate(&mut fixture.ctx()).unwrap();
        assert_eq!(strike_of(&batch), (1, Vec2::new(150.0, 100.0)));
    }
}
