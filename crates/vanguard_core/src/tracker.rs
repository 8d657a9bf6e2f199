//! Authoritative unit table.
//!
//! The tracker is the only owner of unit state and of the opponent
//! [`GridIndex`]. Everything downstream (clusterer, policies) reads it
//! through shared references.
//!
//! # Update ordering
//!
//! For every opponent update the unit is pulled out of its old cell
//! *before* anything else happens. A unit that moved is therefore never in
//! two cells, and a destroyed unit never leaves a stale grid entry.

use std::collections::BTreeMap;

use crate::error::{EmptySelection, EngineError, Result};
use crate::grid::GridIndex;
use crate::math::Vec2;
use crate::unit::{PlayerId, Unit, UnitId, WorldSnapshot};

/// Unit table plus the opponent grid index.
#[derive(Debug, Clone)]
pub struct UnitTracker {
    /// Units keyed by id; `BTreeMap` gives sorted iteration.
    units: BTreeMap<UnitId, Unit>,
    /// Opponent-only spatial index.
    grid: GridIndex,
    /// Controlling player.
    me: PlayerId,
    /// Opposing player.
    opponent: PlayerId,
    /// Bumped on every grid mutation.
    generation: u64,
}

impl UnitTracker {
    /// Create an empty tracker with the given grid cell size.
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            units: BTreeMap::new(),
            grid: GridIndex::new(cell_size),
            me: 0,
            opponent: 0,
            generation: 0,
        }
    }

    /// Apply one tick of world deltas.
    ///
    /// New units are inserted first, then updates are applied in order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownUnit`] if an update names a unit that was
    /// never reported. Deltas before the offending update stay applied.
    pub fn apply_deltas(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        self.me = snapshot.me.id;
        self.opponent = snapshot.opponent.id;

        for unit in &snapshot.new_units {
            if let Some(previous) = self.units.remove(&unit.id) {
                if previous.player_id == self.opponent {
                    self.grid.remove(previous.id, previous.position);
                    self.generation += 1;
                }
            }
            if unit.player_id == self.opponent {
                self.grid.insert(unit.id, unit.position);
                self.generation += 1;
            }
            self.units.insert(unit.id, unit.clone());
        }

        for update in &snapshot.updates {
            let Some(unit) = self.units.get_mut(&update.id) else {
                return Err(EngineError::UnknownUnit {
                    id: update.id,
                    tick: snapshot.tick,
                });
            };

            let is_opponent = unit.player_id == self.opponent;
            if is_opponent {
                self.grid.remove(unit.id, unit.position);
                self.generation += 1;
            }

            if update.is_terminal() {
                self.units.remove(&update.id);
                continue;
            }

            unit.position = update.position;
            unit.durability = update.durability;
            unit.groups.clone_from(&update.groups);
            unit.selected = update.selected;
            unit.remaining_attack_cooldown_ticks = update.remaining_attack_cooldown_ticks;

            if is_opponent {
                self.grid.insert(unit.id, unit.position);
            }
        }

        Ok(())
    }

    /// Controlling player id (as of the last snapshot).
    #[must_use]
    pub const fn me(&self) -> PlayerId {
        self.me
    }

    /// Opposing player id (as of the last snapshot).
    #[must_use]
    pub const fn opponent(&self) -> PlayerId {
        self.opponent
    }

    /// Opponent grid index.
    #[must_use]
    pub const fn grid(&self) -> &GridIndex {
        &self.grid
    }

    /// Grid mutation counter. Derived views compare against it to detect
    /// staleness.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Get a unit by id.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Number of tracked units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if no unit is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// All units in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Units of one owner in ascending id order.
    pub fn units_of(&self, owner: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.player_id == owner)
    }

    /// Own units.
    pub fn own_units(&self) -> impl Iterator<Item = &Unit> {
        self.units_of(self.me)
    }

    /// Opponent units.
    pub fn opponent_units(&self) -> impl Iterator<Item = &Unit> {
        self.units_of(self.opponent)
    }

    /// Mean position of the units matching `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySelection`] when nothing matches.
    pub fn mean_position<P>(&self, predicate: P) -> std::result::Result<Vec2, EmptySelection>
    where
        P: Fn(&Unit) -> bool,
    {
        Vec2::mean(self.units.values().filter(|u| predicate(u)).map(|u| u.position))
    }

    /// Opponent unit closest to `point`; lowest id wins ties.
    #[must_use]
    pub fn nearest_opponent(&self, point: Vec2) -> Option<&Unit> {
        let mut best: Option<(&Unit, f64)> = None;
        for unit in self.opponent_units() {
            let d = unit.position.distance_squared(point);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((unit, d));
            }
        }
        best.map(|(unit, _)| unit)
    }
}
