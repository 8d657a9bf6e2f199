//! Test fixtures and helpers.
//!
//! Units and snapshots for consistent engine tests. Player 1 is always the
//! controlled side, player 2 the opponent.

use vanguard_core::math::Vec2;
use vanguard_core::unit::{
    PendingStrike, PlayerId, PlayerState, Unit, UnitId, UnitKind, UnitUpdate, WorldSnapshot,
};

/// Controlled player.
pub const ME: PlayerId = 1;
/// Opposing player.
pub const ENEMY: PlayerId = 2;
/// Side length of the default world.
pub const WORLD_SIZE: f64 = 1024.0;

/// A fresh unit at full durability.
#[must_use]
pub fn unit(id: UnitId, owner: PlayerId, kind: UnitKind, x: f64, y: f64) -> Unit {
    Unit {
        id,
        player_id: owner,
        position: Vec2::new(x, y),
        kind,
        durability: 100,
        groups: Vec::new(),
        selected: false,
        remaining_attack_cooldown_ticks: 0,
    }
}

/// A `cols` x `rows` block of units with ids counting up from `first_id`.
#[must_use]
pub fn block(
    owner: PlayerId,
    kind: UnitKind,
    first_id: UnitId,
    origin: Vec2,
    cols: u32,
    rows: u32,
    spacing: f64,
) -> Vec<Unit> {
    let mut units = Vec::with_capacity((cols * rows) as usize);
    let mut id = first_id;
    for row in 0..rows {
        for col in 0..cols {
            let x = origin.x + f64::from(col) * spacing;
            let y = origin.y + f64::from(row) * spacing;
            units.push(unit(id, owner, kind, x, y));
            id += 1;
        }
    }
    units
}

/// Builder for [`WorldSnapshot`]s.
///
/// ```
/// use vanguard_core::unit::UnitKind;
/// use vanguard_test_utils::fixtures::{unit, SnapshotBuilder, ME};
///
/// let snapshot = SnapshotBuilder::new(0)
///     .with_unit(unit(1, ME, UnitKind::Tank, 10.0, 10.0))
///     .action_cooldown(2)
///     .build();
/// assert_eq!(snapshot.new_units.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    snapshot: WorldSnapshot,
}

impl SnapshotBuilder {
    /// Empty snapshot for `tick` in the default world.
    #[must_use]
    pub fn new(tick: u64) -> Self {
        Self {
            snapshot: WorldSnapshot {
                tick,
                world_width: WORLD_SIZE,
                world_height: WORLD_SIZE,
                me: PlayerState {
                    id: ME,
                    ..PlayerState::default()
                },
                opponent: PlayerState {
                    id: ENEMY,
                    ..PlayerState::default()
                },
                ..WorldSnapshot::default()
            },
        }
    }

    /// Introduce a unit.
    #[must_use]
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.snapshot.new_units.push(unit);
        self
    }

    /// Introduce several units.
    #[must_use]
    pub fn with_units(mut self, units: impl IntoIterator<Item = Unit>) -> Self {
        self.snapshot.new_units.extend(units);
        self
    }

    /// Report a known unit at a new position.
    #[must_use]
    pub fn move_unit(mut self, id: UnitId, position: Vec2) -> Self {
        self.snapshot.updates.push(UnitUpdate {
            id,
            position,
            durability: 100,
            groups: Vec::new(),
            selected: false,
            remaining_attack_cooldown_ticks: 0,
        });
        self
    }

    /// Report a known unit destroyed.
    #[must_use]
    pub fn destroy(mut self, id: UnitId) -> Self {
        self.snapshot.updates.push(UnitUpdate {
            id,
            position: Vec2::ZERO,
            durability: 0,
            groups: Vec::new(),
            selected: false,
            remaining_attack_cooldown_ticks: 0,
        });
        self
    }

    /// Own action cooldown.
    #[must_use]
    pub fn action_cooldown(mut self, ticks: u32) -> Self {
        self.snapshot.me.remaining_action_cooldown_ticks = ticks;
        self
    }

    /// Own strike cooldown.
    #[must_use]
    pub fn strike_cooldown(mut self, ticks: u32) -> Self {
        self.snapshot.me.remaining_strike_cooldown_ticks = ticks;
        self
    }

    /// Scores of both players.
    #[must_use]
    pub fn scores(mut self, me: i32, opponent: i32) -> Self {
        self.snapshot.me.score = me;
        self.snapshot.opponent.score = opponent;
        self
    }

    /// Strike the opponent has called in.
    #[must_use]
    pub fn incoming_strike(mut self, spotter: UnitId, target: Vec2) -> Self {
        self.snapshot.opponent.next_strike = Some(PendingStrike { spotter, target });
        self
    }

    /// Finish.
    #[must_use]
    pub fn build(self) -> WorldSnapshot {
        self.snapshot
    }
}

/// Opening tick: 20 own units of four kinds in the top-left corner and a
/// tank block in the far corner.
#[must_use]
pub fn opening_snapshot() -> WorldSnapshot {
    let own = [UnitKind::Arrv, UnitKind::Fighter, UnitKind::Ifv, UnitKind::Tank]
        .into_iter()
        .zip(0_i64..)
        .flat_map(|(kind, i)| {
            let origin = Vec2::new(20.0 + 40.0 * i as f64, 20.0);
            block(ME, kind, 1 + 5 * i, origin, 5, 1, 6.0)
        });
    let enemy = block(ENEMY, UnitKind::Tank, 1000, Vec2::new(900.0, 900.0), 3, 3, 6.0);
    SnapshotBuilder::new(0)
        .with_units(own)
        .with_units(enemy)
        .build()
}

/// Snapshots with no deltas for ticks `from..from + count`.
#[must_use]
pub fn quiet_ticks(from: u64, count: u64) -> Vec<WorldSnapshot> {
    (from..from + count)
        .map(|tick| SnapshotBuilder::new(tick).build())
        .collect()
}

/// The opening tick followed by `count` quiet ticks.
#[must_use]
pub fn opening_match(count: u64) -> Vec<WorldSnapshot> {
    let mut ticks = vec![opening_snapshot()];
    ticks.extend(quiet_ticks(1, count));
    ticks
}
