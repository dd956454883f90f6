//! # Placed Objects
//!
//! The object vocabulary and the record emitted for every placed sprite:
//! doors, stairs, monsters, furnishings, treasure, and traps.

use crate::map::Position;
use serde::{Deserialize, Serialize};

/// Every object type the generator can place.
///
/// Structural kinds (doors and stairs) anchor the layout and survive
/// objects-only re-rolls; the rest are thematic stock drawn from style
/// pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectKind {
    // Structural
    DoorHorizontal,
    DoorVertical,
    SecretDoor,
    StairsUp,
    StairsDown,
    // Creatures
    Monster,
    Guard,
    Boss,
    BossAlt,
    // Treasure containers
    Chest,
    Sack,
    Crate,
    // Furnishings
    Altar,
    Statue,
    Table,
    Chair,
    Bed,
    Coffin,
    Book,
    Cauldron,
    Fountain,
    Anvil,
    Cage,
    // Flora
    Plant,
    Flower,
    // Hazards
    Trap,
    Pit,
    Hazard,
    Poison,
}

impl ObjectKind {
    /// Whether this kind anchors the layout (doors and stairs).
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            ObjectKind::DoorHorizontal
                | ObjectKind::DoorVertical
                | ObjectKind::SecretDoor
                | ObjectKind::StairsUp
                | ObjectKind::StairsDown
        )
    }

    /// Whether this kind is a treasure container.
    pub fn is_treasure(self) -> bool {
        matches!(self, ObjectKind::Chest | ObjectKind::Sack | ObjectKind::Crate)
    }
}

/// Position of a sprite within its cell or against a wall edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Center,
    North,
    South,
    East,
    West,
    Ne,
    Se,
    Sw,
    Nw,
}

impl Alignment {
    /// Maps a travel delta (sign-normalized) onto an alignment.
    ///
    /// Cardinal deltas give wall alignments; diagonal deltas are preserved
    /// as corner alignments rather than coerced to cardinal.
    pub fn from_delta(dx: i32, dy: i32) -> Alignment {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Alignment::North,
            (0, 1) => Alignment::South,
            (1, 0) => Alignment::East,
            (-1, 0) => Alignment::West,
            (1, -1) => Alignment::Ne,
            (1, 1) => Alignment::Se,
            (-1, 1) => Alignment::Sw,
            (-1, -1) => Alignment::Nw,
            _ => Alignment::Center,
        }
    }

    /// The opposite alignment (north ↔ south, ne ↔ sw, center fixed).
    pub fn reversed(self) -> Alignment {
        match self {
            Alignment::Center => Alignment::Center,
            Alignment::North => Alignment::South,
            Alignment::South => Alignment::North,
            Alignment::East => Alignment::West,
            Alignment::West => Alignment::East,
            Alignment::Ne => Alignment::Sw,
            Alignment::Se => Alignment::Nw,
            Alignment::Sw => Alignment::Ne,
            Alignment::Nw => Alignment::Se,
        }
    }

    /// Whether this is a corner alignment.
    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Alignment::Ne | Alignment::Se | Alignment::Sw | Alignment::Nw
        )
    }
}

fn default_size() -> (u32, u32) {
    (1, 1)
}

fn is_unit_size(size: &(u32, u32)) -> bool {
    *size == (1, 1)
}

fn default_scale() -> f64 {
    1.0
}

/// A placed object in the artifact.
///
/// # Examples
///
/// ```
/// use delve::{Alignment, MapObject, ObjectKind, Position};
///
/// let chest = MapObject::new(7, ObjectKind::Chest, Position::new(4, 9));
/// assert_eq!(chest.scale, 1.0);
/// assert_eq!(chest.alignment, Alignment::Center);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapObject {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub position: Position,
    #[serde(default = "default_size", skip_serializing_if = "is_unit_size")]
    pub size: (u32, u32),
    pub alignment: Alignment,
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub custom_tooltip: Option<String>,
}

impl MapObject {
    /// Creates an object with default presentation: unit size, centered,
    /// unscaled, unrotated.
    pub fn new(id: u32, kind: ObjectKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            size: default_size(),
            alignment: Alignment::Center,
            scale: default_scale(),
            rotation: 0.0,
            label: None,
            custom_tooltip: None,
        }
    }
}
