//! World data model.
//!
//! These types mirror what the game connector delivers each tick. They are
//! pure data; all bookkeeping lives in [`crate::tracker`].

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Unique identifier for units.
pub type UnitId = i64;

/// Unique identifier for players.
pub type PlayerId = i64;

/// Unit category.
///
/// The declaration order is the fixed enumeration order used wherever the
/// engine iterates kinds (initial group assignment, capability tables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Armored repair vehicle. Unarmed.
    Arrv,
    /// Air superiority fighter. Only hits aerial targets.
    Fighter,
    /// Attack helicopter.
    Helicopter,
    /// Infantry fighting vehicle.
    Ifv,
    /// Main battle tank.
    Tank,
}

impl UnitKind {
    /// All kinds in enumeration order.
    pub const ALL: [Self; 5] = [
        Self::Arrv,
        Self::Fighter,
        Self::Helicopter,
        Self::Ifv,
        Self::Tank,
    ];

    /// Position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Arrv => 0,
            Self::Fighter => 1,
            Self::Helicopter => 2,
            Self::Ifv => 3,
            Self::Tank => 4,
        }
    }

    /// Check if this kind flies. Aerial vision depends on weather, ground
    /// vision on terrain.
    #[must_use]
    pub const fn is_aerial(self) -> bool {
        matches!(self, Self::Fighter | Self::Helicopter)
    }
}

/// Terrain type of a coarse map cell. Affects ground units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainType {
    /// Open ground.
    #[default]
    Plain,
    /// Marsh.
    Swamp,
    /// Woodland.
    Forest,
}

/// Weather type of a coarse map cell. Affects aerial units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeatherType {
    /// Clear skies.
    #[default]
    Clear,
    /// Overcast.
    Cloud,
    /// Rain.
    Rain,
}

/// A tracked unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier.
    pub id: UnitId,
    /// Owning player.
    pub player_id: PlayerId,
    /// World position.
    pub position: Vec2,
    /// Category.
    pub kind: UnitKind,
    /// Remaining durability. Zero means destroyed.
    pub durability: i32,
    /// Group numbers this unit belongs to.
    pub groups: Vec<u32>,
    /// Whether the unit is in the owner's current selection.
    pub selected: bool,
    /// Ticks until this unit may attack again.
    pub remaining_attack_cooldown_ticks: u32,
}

/// Attribute delta for an already-known unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitUpdate {
    /// Unit the update refers to.
    pub id: UnitId,
    /// New position.
    pub position: Vec2,
    /// New durability. Zero signals destruction.
    pub durability: i32,
    /// New group membership.
    pub groups: Vec<u32>,
    /// New selection flag.
    pub selected: bool,
    /// New attack cooldown.
    pub remaining_attack_cooldown_ticks: u32,
}

impl UnitUpdate {
    /// Whether this update reports the unit destroyed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.durability == 0
    }
}

/// A special strike that has been called in but not yet landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingStrike {
    /// Unit designating the strike.
    pub spotter: UnitId,
    /// Predicted impact point.
    pub target: Vec2,
}

/// Per-player state reported every tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerState {
    /// Player identifier.
    pub id: PlayerId,
    /// Current score.
    pub score: i32,
    /// Ticks until the player may act again.
    pub remaining_action_cooldown_ticks: u32,
    /// Ticks until the player may call another special strike.
    pub remaining_strike_cooldown_ticks: u32,
    /// Strike in flight, when known.
    #[serde(default)]
    pub next_strike: Option<PendingStrike>,
}

/// Everything the connector hands over for one tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Simulation tick.
    pub tick: u64,
    /// World width.
    pub world_width: f64,
    /// World height.
    pub world_height: f64,
    /// Controlling player.
    pub me: PlayerState,
    /// Opposing player.
    pub opponent: PlayerState,
    /// Units that became visible this tick.
    #[serde(default)]
    pub new_units: Vec<Unit>,
    /// Deltas for known units.
    #[serde(default)]
    pub updates: Vec<UnitUpdate>,
    /// Terrain by `[cell_x][cell_y]`. Usually only sent on the first tick.
    #[serde(default)]
    pub terrain: Vec<Vec<TerrainType>>,
    /// Weather by `[cell_x][cell_y]`. Usually only sent on the first tick.
    #[serde(default)]
    pub weather: Vec<Vec<WeatherType>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_index_matches_enumeration_order() {
        for (i, kind) in UnitKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_aerial_kinds() {
        let aerial: Vec<_> = UnitKind::ALL.into_iter().filter(|k| k.is_aerial()).collect();
        assert_eq!(aerial, vec![UnitKind::Fighter, UnitKind::Helicopter]);
    }
}
