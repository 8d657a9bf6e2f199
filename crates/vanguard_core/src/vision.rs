//! Terrain and weather modulated ranges.
//!
//! Ground units see according to the terrain under them, aerial units
//! according to the weather above them. Both grids are indexed
//! `[cell_x][cell_y]` with cells of `terrain_cell_size`.

use crate::config::GameConstants;
use crate::math::Vec2;
use crate::unit::{TerrainType, Unit, UnitKind, WeatherType, WorldSnapshot};

/// Static terrain and weather grids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapGrids {
    /// Terrain by `[cell_x][cell_y]`.
    pub terrain: Vec<Vec<TerrainType>>,
    /// Weather by `[cell_x][cell_y]`.
    pub weather: Vec<Vec<WeatherType>>,
}

impl MapGrids {
    /// Take any grids carried by the snapshot. Empty grids keep the old ones.
    pub fn absorb(&mut self, snapshot: &WorldSnapshot) {
        if !snapshot.terrain.is_empty() {
            self.terrain.clone_from(&snapshot.terrain);
        }
        if !snapshot.weather.is_empty() {
            self.weather.clone_from(&snapshot.weather);
        }
    }
}

fn lookup<T: Copy>(grid: &[Vec<T>], cell: Option<(usize, usize)>) -> Option<T> {
    let (x, y) = cell?;
    grid.get(x)?.get(y).copied()
}

/// Range calculator over the current map grids.
#[derive(Debug, Clone, Copy)]
pub struct VisionModel<'a> {
    constants: &'a GameConstants,
    map: &'a MapGrids,
}

impl<'a> VisionModel<'a> {
    /// Create a model over the given constants and grids.
    #[must_use]
    pub const fn new(constants: &'a GameConstants, map: &'a MapGrids) -> Self {
        Self { constants, map }
    }

    fn cell_of(&self, position: Vec2) -> Option<(usize, usize)> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let size = self.constants.terrain_cell_size;
        Some(((position.x / size) as usize, (position.y / size) as usize))
    }

    /// Range multiplier at a position for a unit kind.
    ///
    /// Falls back to 1.0 when the position is outside the known grid.
    #[must_use]
    pub fn factor_at(&self, kind: UnitKind, position: Vec2) -> f64 {
        let cell = self.cell_of(position);
        if kind.is_aerial() {
            if let Some(weather) = lookup(&self.map.weather, cell) {
                return self.constants.weather_vision.get(weather);
            }
        } else if let Some(terrain) = lookup(&self.map.terrain, cell) {
            return self.constants.terrain_vision.get(terrain);
        }
        1.0
    }

    /// Effective vision range of a unit.
    #[must_use]
    pub fn effective_vision(&self, unit: &Unit) -> f64 {
        let base = self.constants.kinds.get(unit.kind).vision_range;
        base * self.factor_at(unit.kind, unit.position)
    }

    /// Effective attack range of a unit against a target kind.
    #[must_use]
    pub fn effective_attack_range(&self, unit: &Unit, target: UnitKind) -> f64 {
        let base = self.constants.kinds.get(unit.kind).attack_range_vs(target);
        base * self.factor_at(unit.kind, unit.position)
    }

    /// Whether an attacker kind can damage a target kind at all.
    #[must_use]
    pub fn can_attack(&self, attacker: UnitKind, target: UnitKind) -> bool {
        let profile = self.constants.kinds.get(attacker);
        profile.damage_vs(target) > 0 && profile.attack_range_vs(target) > 0.0
    }

    /// Whether a specific unit can reach and hurt a target standing at
    /// `target_position`.
    #[must_use]
    pub fn can_engage(&self, unit: &Unit, target: UnitKind, target_position: Vec2) -> bool {
        self.can_attack(unit.kind, target)
            && unit.position.distance(target_position) <= self.effective_attack_range(unit, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(kind: UnitKind, x: f64, y: f64) -> Unit {
        Unit {
            id: 1,
            player_id: 1,
            position: Vec2::new(x, y),
            kind,
            durability: 100,
            groups: Vec::new(),
            selected: false,
            remaining_attack_cooldown_ticks: 0,
        }
    }

    fn map() -> MapGrids {
        MapGrids {
            terrain: vec![
                vec![TerrainType::Plain, TerrainType::Forest],
                vec![TerrainType::Swamp, TerrainType::Plain],
            ],
            weather: vec![
                vec![WeatherType::Clear, WeatherType::Rain],
                vec![WeatherType::Cloud, WeatherType::Clear],
            ],
        }
    }

    #[test]
    fn test_ground_unit_uses_terrain() {
        let constants = GameConstants::default();
        let map = map();
        let vision = VisionModel::new(&constants, &map);
        // Cell (0, 1) is forest.
        let tank = unit(UnitKind::Tank, 10.0, 40.0);
        assert!((vision.effective_vision(&tank) - 80.0 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_aerial_unit_uses_weather() {
        let constants = GameConstants::default();
        let map = map();
        let vision = VisionModel::new(&constants, &map);
        // Cell (0, 1) is rain for aircraft, forest does not matter.
        let fighter = unit(UnitKind::Fighter, 10.0, 40.0);
        assert!((vision.effective_vision(&fighter) - 120.0 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_outside_grid_uses_base_range() {
        let constants = GameConstants::default();
        let map = map();
        let vision = VisionModel::new(&constants, &map);
        assert_eq!(vision.effective_vision(&unit(UnitKind::Ifv, 500.0, 500.0)), 80.0);
        assert_eq!(vision.effective_vision(&unit(UnitKind::Ifv, -1.0, 5.0)), 80.0);
    }

    #[test]
    fn test_attack_range_is_modulated() {
        let constants = GameConstants::default();
        let map = map();
        let vision = VisionModel::new(&constants, &map);
        let heli = unit(UnitKind::Helicopter, 40.0, 10.0); // cloud
        assert!((vision.effective_attack_range(&heli, UnitKind::Tank) - 20.0 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_capability_table() {
        let constants = GameConstants::default();
        let map = MapGrids::default();
        let vision = VisionModel::new(&constants, &map);
        assert!(!vision.can_attack(UnitKind::Arrv, UnitKind::Tank));
        assert!(!vision.can_attack(UnitKind::Fighter, UnitKind::Tank));
        assert!(vision.can_attack(UnitKind::Fighter, UnitKind::Helicopter));
        assert!(vision.can_attack(UnitKind::Tank, UnitKind::Fighter));
    }

    #[test]
    fn test_can_engage_checks_distance() {
        let constants = GameConstants::default();
        let map = MapGrids::default();
        let vision = VisionModel::new(&constants, &map);
        let tank = unit(UnitKind::Tank, 100.0, 100.0);
        assert!(vision.can_engage(&tank, UnitKind::Ifv, Vec2::new(115.0, 100.0)));
        assert!(!vision.can_engage(&tank, UnitKind::Ifv, Vec2::new(125.0, 100.0)));
    }
}
