//! # Map Artifact
//!
//! The serializable product of a generate call: filled cells, placed
//! objects, and the metadata record needed to re-stock the same layout
//! later.

use crate::config::MapStyle;
use crate::map::{Alignment, Cell, MapObject, ObjectKind, Position, Room, SegmentSet};
use crate::DelveResult;
use serde::{Deserialize, Serialize};

/// An unordered connection between two rooms.
///
/// Spanning-tree edges come first in the connection list; edges added for
/// loops carry `is_loop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub a: u32,
    pub b: u32,
    pub is_loop: bool,
}

impl Connection {
    /// Creates a connection, normalizing so `a < b`.
    pub fn new(a: u32, b: u32, is_loop: bool) -> Self {
        Self {
            a: a.min(b),
            b: a.max(b),
            is_loop,
        }
    }
}

/// One occupied corridor cell: a full fill, or wedge segments for diagonal
/// crooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorridorCell {
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub segments: Option<SegmentSet>,
}

impl CorridorCell {
    /// A fully-filled corridor cell.
    pub fn full(position: Position) -> Self {
        Self {
            position,
            segments: None,
        }
    }

    /// A wedge-segment corridor cell.
    pub fn segmented(position: Position, segments: SegmentSet) -> Self {
        Self {
            position,
            segments: Some(segments),
        }
    }

    /// Whether this cell is a full fill.
    pub fn is_full(&self) -> bool {
        self.segments.is_none()
    }
}

/// The carved route for one connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorridorRecord {
    pub room_a: u32,
    pub room_b: u32,
    /// Ordered centerline from room A's center cell to room B's.
    pub path: Vec<Position>,
    pub width: u32,
    pub has_diagonals: bool,
    /// Set when both L orientations failed the adjacency tests and no
    /// Z-path cleared; the least-bad route was carved anyway.
    pub dirty: bool,
    /// Full footprint the corridor occupies.
    pub cells: Vec<CorridorCell>,
}

/// A materialized door, kept in metadata for re-stocking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorPosition {
    pub position: Position,
    pub room_id: u32,
    pub alignment: Alignment,
    pub kind: ObjectKind,
}

/// Metadata retained with the artifact.
///
/// Sufficient to re-run the stocking phase on the same layout: rooms,
/// connections, corridors, doors, and the entry/exit/water assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonMetadata {
    pub rooms: Vec<Room>,
    pub connections: Vec<Connection>,
    pub grid_width: u32,
    pub grid_height: u32,
    /// Rooms actually placed; may undershoot `requested_room_count` when
    /// rejection sampling runs out of attempts.
    pub room_count: u32,
    pub requested_room_count: u32,
    pub door_count: u32,
    pub secret_door_count: u32,
    pub has_wide_corridors: bool,
    pub has_diagonal_corridors: bool,
    pub entry_room_id: Option<u32>,
    pub exit_room_id: Option<u32>,
    pub water_room_ids: Vec<u32>,
    /// Rooms the connection phase could not reach; no corridors serve them.
    pub isolated_room_ids: Vec<u32>,
    pub corridor_result: Vec<CorridorRecord>,
    pub door_positions: Vec<DoorPosition>,
    pub style: MapStyle,
}

/// The complete product of a generate call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonArtifact {
    pub cells: Vec<Cell>,
    pub objects: Vec<MapObject>,
    pub metadata: DungeonMetadata,
}

impl DungeonArtifact {
    /// Serializes the artifact to compact JSON.
    pub fn to_json(&self) -> DelveResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the artifact to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> DelveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes an artifact from JSON.
    pub fn from_json(json: &str) -> DelveResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The structural objects (doors and stairs) of the artifact.
    pub fn structural_objects(&self) -> Vec<MapObject> {
        self.objects
            .iter()
            .filter(|object| object.kind.is_structural())
            .cloned()
            .collect()
    }
}
