//! Engine configuration.
//!
//! Two layers, both read-only after startup:
//! - [`GameConstants`] come from the game rules (ranges, factors, strike timing).
//! - [`TuningConfig`] holds the strategy knobs. Observed configurations differ
//!   slightly in these, so none of them is baked into policy logic.
//!
//! # Example RON
//!
//! ```ron
//! EngineConfig(
//!     tuning: TuningConfig(
//!         cell_size: 16.0,
//!         density_threshold: 0.04,
//!     ),
//!     policies: [StrikeEvasion, InitialSetup, StrikeTargeting, Formation, Engagement],
//! )
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::unit::{TerrainType, UnitKind, WeatherType};

/// Static profile of one unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindProfile {
    /// Maximum speed in world units per tick.
    pub speed: f64,
    /// Base vision range.
    pub vision_range: f64,
    /// Attack range against ground targets.
    pub ground_attack_range: f64,
    /// Attack range against aerial targets.
    pub aerial_attack_range: f64,
    /// Damage against ground targets.
    pub ground_damage: i32,
    /// Damage against aerial targets.
    pub aerial_damage: i32,
}

impl KindProfile {
    /// Attack range against the given target kind.
    #[must_use]
    pub fn attack_range_vs(&self, target: UnitKind) -> f64 {
        if target.is_aerial() {
            self.aerial_attack_range
        } else {
            self.ground_attack_range
        }
    }

    /// Damage against the given target kind.
    #[must_use]
    pub fn damage_vs(&self, target: UnitKind) -> i32 {
        if target.is_aerial() {
            self.aerial_damage
        } else {
            self.ground_damage
        }
    }
}

/// Profiles for every unit kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindProfiles {
    /// Repair vehicle.
    pub arrv: KindProfile,
    /// Fighter.
    pub fighter: KindProfile,
    /// Helicopter.
    pub helicopter: KindProfile,
    /// Infantry fighting vehicle.
    pub ifv: KindProfile,
    /// Tank.
    pub tank: KindProfile,
}

impl KindProfiles {
    /// Profile for a kind.
    #[must_use]
    pub const fn get(&self, kind: UnitKind) -> &KindProfile {
        match kind {
            UnitKind::Arrv => &self.arrv,
            UnitKind::Fighter => &self.fighter,
            UnitKind::Helicopter => &self.helicopter,
            UnitKind::Ifv => &self.ifv,
            UnitKind::Tank => &self.tank,
        }
    }
}

impl Default for KindProfiles {
    fn default() -> Self {
        Self {
            arrv: KindProfile {
                speed: 0.4,
                vision_range: 60.0,
                ground_attack_range: 0.0,
                aerial_attack_range: 0.0,
                ground_damage: 0,
                aerial_damage: 0,
            },
            fighter: KindProfile {
                speed: 1.2,
                vision_range: 120.0,
                ground_attack_range: 0.0,
                aerial_attack_range: 20.0,
                ground_damage: 0,
                aerial_damage: 100,
            },
            helicopter: KindProfile {
                speed: 0.9,
                vision_range: 100.0,
                ground_attack_range: 20.0,
                aerial_attack_range: 20.0,
                ground_damage: 100,
                aerial_damage: 80,
            },
            ifv: KindProfile {
                speed: 0.4,
                vision_range: 80.0,
                ground_attack_range: 20.0,
                aerial_attack_range: 20.0,
                ground_damage: 90,
                aerial_damage: 80,
            },
            tank: KindProfile {
                speed: 0.3,
                vision_range: 80.0,
                ground_attack_range: 20.0,
                aerial_attack_range: 20.0,
                ground_damage: 100,
                aerial_damage: 60,
            },
        }
    }
}

/// Vision multipliers for ground units by terrain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainFactors {
    /// Plain multiplier.
    pub plain: f64,
    /// Swamp multiplier.
    pub swamp: f64,
    /// Forest multiplier.
    pub forest: f64,
}

impl TerrainFactors {
    /// Multiplier for a terrain type.
    #[must_use]
    pub const fn get(&self, terrain: TerrainType) -> f64 {
        match terrain {
            TerrainType::Plain => self.plain,
            TerrainType::Swamp => self.swamp,
            TerrainType::Forest => self.forest,
        }
    }
}

impl Default for TerrainFactors {
    fn default() -> Self {
        Self {
            plain: 1.0,
            swamp: 1.0,
            forest: 0.8,
        }
    }
}

/// Vision multipliers for aerial units by weather.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherFactors {
    /// Clear multiplier.
    pub clear: f64,
    /// Cloud multiplier.
    pub cloud: f64,
    /// Rain multiplier.
    pub rain: f64,
}

impl WeatherFactors {
    /// Multiplier for a weather type.
    #[must_use]
    pub const fn get(&self, weather: WeatherType) -> f64 {
        match weather {
            WeatherType::Clear => self.clear,
            WeatherType::Cloud => self.cloud,
            WeatherType::Rain => self.rain,
        }
    }
}

impl Default for WeatherFactors {
    fn default() -> Self {
        Self {
            clear: 1.0,
            cloud: 0.8,
            rain: 0.6,
        }
    }
}

/// Constants defined by the game rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConstants {
    /// Side length of a terrain/weather cell in world units.
    pub terrain_cell_size: f64,
    /// Per-kind movement, vision and attack profiles.
    pub kinds: KindProfiles,
    /// Ground vision multipliers.
    pub terrain_vision: TerrainFactors,
    /// Aerial vision multipliers.
    pub weather_vision: WeatherFactors,
    /// Special strike blast radius.
    pub strike_radius: f64,
    /// Ticks between calling a strike and impact.
    pub strike_delay_ticks: u32,
}

impl Default for GameConstants {
    fn default() -> Self {
        Self {
            terrain_cell_size: 32.0,
            kinds: KindProfiles::default(),
            terrain_vision: TerrainFactors::default(),
            weather_vision: WeatherFactors::default(),
            strike_radius: 50.0,
            strike_delay_ticks: 30,
        }
    }
}

/// How attacker strength is measured for the engagement ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrengthMetric {
    /// Number of capable units.
    Count,
    /// Summed durability of capable units.
    #[default]
    Durability,
}

/// Strategy tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Grid cell size for the opponent index; also the cluster merge distance.
    pub cell_size: f64,
    /// Minimum own-force density (units per square world unit) to keep marching.
    pub density_threshold: f64,
    /// Scale-down repetitions per SHRINK phase.
    pub shrink_repeats: u32,
    /// Scale factor applied by each shrink.
    pub shrink_factor: f64,
    /// Freeze after each shrink.
    pub shrink_freeze_ticks: u32,
    /// Rotation angle in radians for the ROTATE phase.
    pub rotate_angle: f64,
    /// Freeze after a rotation.
    pub rotate_freeze_ticks: u32,
    /// Freeze after each march step.
    pub march_freeze_ticks: u32,
    /// Distance of a slow retreat.
    pub retreat_distance: f64,
    /// Speed cap while retreating.
    pub retreat_speed: f64,
    /// Lateral distance of an evasive sidestep.
    pub sidestep_distance: f64,
    /// Tick after which the force always advances.
    pub long_game_tick: u64,
    /// Strength measure for the attacker ratio.
    pub strength_metric: StrengthMetric,
    /// Safety margin subtracted from vision when checking strike feasibility.
    pub strike_range_margin: f64,
    /// Freeze after calling a strike so the spotter stays put.
    pub strike_hold_ticks: u32,
    /// Scale factor used to disperse from an incoming strike.
    pub evasion_expand_factor: f64,
    /// Seed for tie-break randomness.
    pub rng_seed: u64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            cell_size: 16.0,
            density_threshold: 0.037,
            shrink_repeats: 2,
            shrink_factor: 0.1,
            shrink_freeze_ticks: 30,
            rotate_angle: std::f64::consts::PI,
            rotate_freeze_ticks: 60,
            march_freeze_ticks: 20,
            retreat_distance: 30.0,
            retreat_speed: 0.2,
            sidestep_distance: 40.0,
            long_game_tick: 15_000,
            strength_metric: StrengthMetric::default(),
            strike_range_margin: 0.0,
            strike_hold_ticks: 30,
            evasion_expand_factor: 10.0,
            rng_seed: 0x5EED,
        }
    }
}

/// Decision policies that can be placed in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    /// Disperse from a known incoming strike. Preempts the queue.
    StrikeEvasion,
    /// Group assignment on tick 0.
    InitialSetup,
    /// Call special strikes on opponent clusters.
    StrikeTargeting,
    /// Rotate/shrink/march formation cycle.
    Formation,
    /// Advance, retreat or sidestep based on relative strength.
    Engagement,
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Game rule constants.
    pub game: GameConstants,
    /// Strategy knobs.
    pub tuning: TuningConfig,
    /// Policies in priority order.
    pub policies: Vec<PolicyKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            game: GameConstants::default(),
            tuning: TuningConfig::default(),
            policies: vec![
                PolicyKind::StrikeEvasion,
                PolicyKind::InitialSetup,
                PolicyKind::StrikeTargeting,
                PolicyKind::Formation,
                PolicyKind::Engagement,
            ],
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a RON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&contents)
    }

    /// Parse and validate a config from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self = ron::from_str(ron)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {e}")))
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        let tuning = &self.tuning;
        require_positive("cell_size", tuning.cell_size)?;
        require_positive("terrain_cell_size", self.game.terrain_cell_size)?;
        require_positive("density_threshold", tuning.density_threshold)?;
        require_positive("strike_radius", self.game.strike_radius)?;
        if !(tuning.shrink_factor > 0.0 && tuning.shrink_factor < 1.0) {
            return Err(EngineError::Config(format!(
                "shrink_factor must be in (0, 1), got {}",
                tuning.shrink_factor
            )));
        }
        if !(tuning.evasion_expand_factor > 1.0 && tuning.evasion_expand_factor.is_finite()) {
            return Err(EngineError::Config(format!(
                "evasion_expand_factor must exceed 1, got {}",
                tuning.evasion_expand_factor
            )));
        }
        if self.policies.is_empty() {
            return Err(EngineError::Config("policy list is empty".into()));
        }
        let mut seen = HashSet::new();
        for kind in &self.policies {
            if !seen.insert(kind) {
                return Err(EngineError::Config(format!("duplicate policy {kind:?}")));
            }
        }
        Ok(())
    }
}

/// NaN and infinity fail too.
fn require_positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::Config(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_ron_roundtrip() {
        let config = EngineConfig::default();
        let ron = config.to_ron_string().unwrap();
        let parsed = EngineConfig::from_ron_str(&ron).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let parsed = EngineConfig::from_ron_str(
            "EngineConfig(tuning: TuningConfig(density_threshold: 0.04))",
        )
        .unwrap();
        assert_eq!(parsed.tuning.density_threshold, 0.04);
        assert_eq!(parsed.tuning.cell_size, 16.0);
        assert_eq!(parsed.policies, EngineConfig::default().policies);
    }

    #[test]
    fn test_rejects_duplicate_policy() {
        let mut config = EngineConfig::default();
        config.policies.push(PolicyKind::Formation);
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_rejects_non_shrinking_factor() {
        let mut config = EngineConfig::default();
        config.tuning.shrink_factor = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_cell_size() {
        let err = EngineConfig::from_ron_str("EngineConfig(tuning: TuningConfig(cell_size: NaN))")
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(msg) if msg.contains("cell_size")));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut config = EngineConfig::default();
        config.game.terrain_cell_size = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.tuning.density_threshold = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.tuning.evasion_expand_factor = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fighter_cannot_hit_ground() {
        let kinds = KindProfiles::default();
        assert_eq!(kinds.get(UnitKind::Fighter).damage_vs(UnitKind::Tank), 0);
        assert!(kinds.get(UnitKind::Fighter).damage_vs(UnitKind::Helicopter) > 0);
    }
}
