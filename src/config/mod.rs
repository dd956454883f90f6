//! # Configuration Module
//!
//! Size presets, map styles, user overrides, and stocking configuration.
//!
//! A generate call resolves its working configuration as
//! `preset ∪ style ∪ user overrides`, right-most wins. Only configuration
//! problems fail a call; every downstream shortfall is carried in metadata.

use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Routing style for corridors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorridorStyle {
    /// L- and Z-shaped routes only.
    Straight,
    /// Straight routes with wobble applied to long runs.
    Organic,
    /// Diagonal routes with wedge-segment tiling where geometry permits.
    Diagonal,
}

/// Inclusive range for the number of rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCountRange {
    pub min: u32,
    pub max: u32,
}

/// Inclusive ranges for room bounding-box extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSizeRange {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

/// Resolved generation configuration for one call.
///
/// Build one with [`resolve_config`] or start from
/// [`SizePreset::config`] and mutate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Style the config was resolved with; drives stocking pools and is
    /// echoed into metadata.
    pub style: MapStyle,
    pub grid_width: u32,
    pub grid_height: u32,
    pub room_count: RoomCountRange,
    pub room_size: RoomSizeRange,
    /// Minimum empty cells between room bounding boxes and to the grid edge
    /// (edge margin is `padding + 1`).
    pub padding: u32,
    pub corridor_width: u32,
    pub corridor_style: CorridorStyle,
    pub circle_chance: f64,
    pub complex_room_chance: f64,
    pub loop_chance: f64,
    pub door_chance: f64,
    pub secret_door_chance: f64,
    pub wide_corridor_chance: f64,
    pub diagonal_corridor_chance: f64,
    pub water_chance: f64,
    /// Skew applied to room-size draws, `-1` (small) to `1` (large).
    pub room_size_bias: f64,
    pub floor_color: String,
    pub water_color: String,
    pub water_opacity: f64,
}

impl GenerationConfig {
    /// Validates the configuration, returning `DelveError::Config` on the
    /// first problem found.
    pub fn validate(&self) -> DelveResult<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(DelveError::Config("grid dimensions must be positive".into()));
        }
        if self.room_count.min == 0 {
            return Err(DelveError::Config("room count minimum must be at least 1".into()));
        }
        if self.room_count.min > self.room_count.max {
            return Err(DelveError::Config(format!(
                "room count min {} exceeds max {}",
                self.room_count.min, self.room_count.max
            )));
        }
        if self.room_size.min_width < 2 || self.room_size.min_height < 2 {
            return Err(DelveError::Config("minimum room extent is 2 cells".into()));
        }
        if self.room_size.min_width > self.room_size.max_width
            || self.room_size.min_height > self.room_size.max_height
        {
            return Err(DelveError::Config("room size min exceeds max".into()));
        }
        if !(1..=2).contains(&self.corridor_width) {
            return Err(DelveError::Config(format!(
                "corridor width must be 1 or 2, got {}",
                self.corridor_width
            )));
        }
        let margin = 2 * (self.padding + 1);
        if self.grid_width < self.room_size.min_width + margin
            || self.grid_height < self.room_size.min_height + margin
        {
            return Err(DelveError::Config(format!(
                "{}x{} grid cannot hold a {}x{} room inside a {}-cell margin",
                self.grid_width,
                self.grid_height,
                self.room_size.min_width,
                self.room_size.min_height,
                self.padding + 1
            )));
        }
        for (name, value) in [
            ("circleChance", self.circle_chance),
            ("complexRoomChance", self.complex_room_chance),
            ("loopChance", self.loop_chance),
            ("doorChance", self.door_chance),
            ("secretDoorChance", self.secret_door_chance),
            ("wideCorridorChance", self.wide_corridor_chance),
            ("diagonalCorridorChance", self.diagonal_corridor_chance),
            ("waterChance", self.water_chance),
            ("waterOpacity", self.water_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DelveError::Config(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if !(-1.0..=1.0).contains(&self.room_size_bias) {
            return Err(DelveError::Config(format!(
                "roomSizeBias must lie in [-1, 1], got {}",
                self.room_size_bias
            )));
        }
        Ok(())
    }
}

/// Named size presets for the grid and room mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Small,
    Medium,
    Large,
}

impl SizePreset {
    /// Base configuration for this preset, before style and user overrides.
    pub fn config(self) -> GenerationConfig {
        match self {
            SizePreset::Small => GenerationConfig {
                style: MapStyle::Classic,
                grid_width: 30,
                grid_height: 30,
                room_count: RoomCountRange { min: 3, max: 5 },
                room_size: RoomSizeRange {
                    min_width: 3,
                    max_width: 6,
                    min_height: 3,
                    max_height: 6,
                },
                padding: 2,
                corridor_width: 1,
                corridor_style: CorridorStyle::Straight,
                circle_chance: 0.15,
                complex_room_chance: 0.25,
                loop_chance: 0.15,
                door_chance: 0.6,
                secret_door_chance: 0.15,
                wide_corridor_chance: 0.0,
                diagonal_corridor_chance: 0.0,
                water_chance: 0.1,
                room_size_bias: 0.0,
                floor_color: "#8a8a8a".to_string(),
                water_color: "#3b6ea5".to_string(),
                water_opacity: 0.55,
            },
            SizePreset::Medium => GenerationConfig {
                style: MapStyle::Classic,
                grid_width: 48,
                grid_height: 48,
                room_count: RoomCountRange { min: 6, max: 10 },
                room_size: RoomSizeRange {
                    min_width: 4,
                    max_width: 9,
                    min_height: 4,
                    max_height: 9,
                },
                padding: 2,
                corridor_width: 1,
                corridor_style: CorridorStyle::Straight,
                circle_chance: 0.15,
                complex_room_chance: 0.25,
                loop_chance: 0.2,
                door_chance: 0.6,
                secret_door_chance: 0.15,
                wide_corridor_chance: 0.2,
                diagonal_corridor_chance: 0.15,
                water_chance: 0.1,
                room_size_bias: 0.0,
                floor_color: "#8a8a8a".to_string(),
                water_color: "#3b6ea5".to_string(),
                water_opacity: 0.55,
            },
            SizePreset::Large => GenerationConfig {
                style: MapStyle::Classic,
                grid_width: 72,
                grid_height: 72,
                room_count: RoomCountRange { min: 10, max: 16 },
                room_size: RoomSizeRange {
                    min_width: 4,
                    max_width: 12,
                    min_height: 4,
                    max_height: 12,
                },
                padding: 2,
                corridor_width: 1,
                corridor_style: CorridorStyle::Straight,
                circle_chance: 0.15,
                complex_room_chance: 0.25,
                loop_chance: 0.25,
                door_chance: 0.6,
                secret_door_chance: 0.15,
                wide_corridor_chance: 0.3,
                diagonal_corridor_chance: 0.2,
                water_chance: 0.1,
                room_size_bias: 0.0,
                floor_color: "#8a8a8a".to_string(),
                water_color: "#3b6ea5".to_string(),
                water_opacity: 0.55,
            },
        }
    }
}

impl FromStr for SizePreset {
    type Err = DelveError;

    fn from_str(s: &str) -> DelveResult<Self> {
        match s.to_lowercase().as_str() {
            "small" => Ok(SizePreset::Small),
            "medium" => Ok(SizePreset::Medium),
            "large" => Ok(SizePreset::Large),
            other => Err(DelveError::Config(format!("unknown size preset: {}", other))),
        }
    }
}

/// Named map styles. Each style overrides the shape mix, corridor routing,
/// door rates, water rate, and palette of its preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    Classic,
    Cavern,
    Fortress,
    Crypt,
}

impl MapStyle {
    /// Style tuning constants, applied on top of the preset.
    pub fn overrides(self) -> GenerationOverrides {
        match self {
            MapStyle::Classic => GenerationOverrides {
                corridor_style: Some(CorridorStyle::Straight),
                circle_chance: Some(0.15),
                complex_room_chance: Some(0.25),
                door_chance: Some(0.6),
                secret_door_chance: Some(0.15),
                water_chance: Some(0.1),
                room_size_bias: Some(0.0),
                ..GenerationOverrides::default()
            },
            MapStyle::Cavern => GenerationOverrides {
                corridor_style: Some(CorridorStyle::Organic),
                circle_chance: Some(0.6),
                complex_room_chance: Some(0.2),
                loop_chance: Some(0.25),
                door_chance: Some(0.0),
                secret_door_chance: Some(0.0),
                water_chance: Some(0.35),
                room_size_bias: Some(0.2),
                floor_color: Some("#a08563".to_string()),
                ..GenerationOverrides::default()
            },
            MapStyle::Fortress => GenerationOverrides {
                corridor_style: Some(CorridorStyle::Straight),
                circle_chance: Some(0.0),
                complex_room_chance: Some(0.45),
                door_chance: Some(0.95),
                secret_door_chance: Some(0.1),
                wide_corridor_chance: Some(0.7),
                water_chance: Some(0.05),
                floor_color: Some("#7d7f85".to_string()),
                ..GenerationOverrides::default()
            },
            MapStyle::Crypt => GenerationOverrides {
                corridor_style: Some(CorridorStyle::Straight),
                circle_chance: Some(0.05),
                complex_room_chance: Some(0.35),
                door_chance: Some(0.75),
                secret_door_chance: Some(0.35),
                diagonal_corridor_chance: Some(0.25),
                water_chance: Some(0.0),
                room_size_bias: Some(-0.3),
                floor_color: Some("#6e6a75".to_string()),
                ..GenerationOverrides::default()
            },
        }
    }
}

impl FromStr for MapStyle {
    type Err = DelveError;

    fn from_str(s: &str) -> DelveResult<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(MapStyle::Classic),
            "cavern" => Ok(MapStyle::Cavern),
            "fortress" => Ok(MapStyle::Fortress),
            "crypt" => Ok(MapStyle::Crypt),
            other => Err(DelveError::Config(format!("unknown map style: {}", other))),
        }
    }
}

/// Partial configuration; present fields replace the resolved value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOverrides {
    pub grid_width: Option<u32>,
    pub grid_height: Option<u32>,
    pub room_count: Option<RoomCountRange>,
    pub room_size: Option<RoomSizeRange>,
    pub padding: Option<u32>,
    pub corridor_width: Option<u32>,
    pub corridor_style: Option<CorridorStyle>,
    pub circle_chance: Option<f64>,
    pub complex_room_chance: Option<f64>,
    pub loop_chance: Option<f64>,
    pub door_chance: Option<f64>,
    pub secret_door_chance: Option<f64>,
    pub wide_corridor_chance: Option<f64>,
    pub diagonal_corridor_chance: Option<f64>,
    pub water_chance: Option<f64>,
    pub room_size_bias: Option<f64>,
    pub floor_color: Option<String>,
    pub water_color: Option<String>,
    pub water_opacity: Option<f64>,
}

impl GenerationOverrides {
    /// Applies every present field onto `config`.
    pub fn apply(&self, config: &mut GenerationConfig) {
        if let Some(v) = self.grid_width {
            config.grid_width = v;
        }
        if let Some(v) = self.grid_height {
            config.grid_height = v;
        }
        if let Some(v) = self.room_count {
            config.room_count = v;
        }
        if let Some(v) = self.room_size {
            config.room_size = v;
        }
        if let Some(v) = self.padding {
            config.padding = v;
        }
        if let Some(v) = self.corridor_width {
            config.corridor_width = v;
        }
        if let Some(v) = self.corridor_style {
            config.corridor_style = v;
        }
        if let Some(v) = self.circle_chance {
            config.circle_chance = v;
        }
        if let Some(v) = self.complex_room_chance {
            config.complex_room_chance = v;
        }
        if let Some(v) = self.loop_chance {
            config.loop_chance = v;
        }
        if let Some(v) = self.door_chance {
            config.door_chance = v;
        }
        if let Some(v) = self.secret_door_chance {
            config.secret_door_chance = v;
        }
        if let Some(v) = self.wide_corridor_chance {
            config.wide_corridor_chance = v;
        }
        if let Some(v) = self.diagonal_corridor_chance {
            config.diagonal_corridor_chance = v;
        }
        if let Some(v) = self.water_chance {
            config.water_chance = v;
        }
        if let Some(v) = self.room_size_bias {
            config.room_size_bias = v;
        }
        if let Some(v) = &self.floor_color {
            config.floor_color = v.clone();
        }
        if let Some(v) = &self.water_color {
            config.water_color = v.clone();
        }
        if let Some(v) = self.water_opacity {
            config.water_opacity = v;
        }
    }
}

/// Resolves the working configuration for a generate call:
/// preset base, then style overrides, then user overrides.
pub fn resolve_config(
    preset: SizePreset,
    style: MapStyle,
    user: Option<&GenerationOverrides>,
) -> DelveResult<GenerationConfig> {
    let mut config = preset.config();
    config.style = style;
    style.overrides().apply(&mut config);
    if let Some(user) = user {
        user.apply(&mut config);
    }
    config.validate()?;
    Ok(config)
}

/// Configuration for the stocking phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockingConfig {
    /// Multiplier on per-room object budgets.
    pub object_density: f64,
    pub monster_weight: f64,
    pub empty_weight: f64,
    pub feature_weight: f64,
    pub trap_weight: f64,
    pub use_templates: bool,
    pub corridor_trap_chance: f64,
}

impl StockingConfig {
    /// B/X-flavored default stocking mix.
    pub fn new() -> Self {
        Self {
            object_density: 1.0,
            monster_weight: 2.0,
            empty_weight: 2.0,
            feature_weight: 1.0,
            trap_weight: 1.0,
            use_templates: true,
            corridor_trap_chance: 0.1,
        }
    }

    /// Category weights normalized to sum to one, in
    /// monster/empty/feature/trap order. A degenerate all-zero mix
    /// normalizes to uniform.
    pub fn normalized_weights(&self) -> [f64; 4] {
        let raw = [
            self.monster_weight.max(0.0),
            self.empty_weight.max(0.0),
            self.feature_weight.max(0.0),
            self.trap_weight.max(0.0),
        ];
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return [0.25; 4];
        }
        [
            raw[0] / total,
            raw[1] / total,
            raw[2] / total,
            raw[3] / total,
        ]
    }

    /// Validates density and chances.
    pub fn validate(&self) -> DelveResult<()> {
        if self.object_density <= 0.0 {
            return Err(DelveError::Config(format!(
                "objectDensity must be positive, got {}",
                self.object_density
            )));
        }
        for (name, value) in [
            ("monsterWeight", self.monster_weight),
            ("emptyWeight", self.empty_weight),
            ("featureWeight", self.feature_weight),
            ("trapWeight", self.trap_weight),
        ] {
            if value < 0.0 {
                return Err(DelveError::Config(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.corridor_trap_chance) {
            return Err(DelveError::Config(format!(
                "corridorTrapChance must lie in [0, 1], got {}",
                self.corridor_trap_chance
            )));
        }
        Ok(())
    }
}

impl Default for StockingConfig {
    fn default() -> Self {
        Self::new()
    }
}
