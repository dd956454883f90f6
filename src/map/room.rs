//! # Rooms
//!
//! Room values with shape variants and the cell-membership tests the
//! corridor, door, and stocking phases rely on.

use crate::map::{Position, Rect};
use serde::{Deserialize, Serialize};

/// Shape variant of a room.
///
/// The bounding box always encloses the shape; membership of individual
/// cells depends on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoomShape {
    /// Occupies the full bounding box.
    Rectangle,
    /// A disc inscribed in the bounding box; `radius` is half the width.
    Circle { radius: u32 },
    /// An L- or T-shaped union of axis-aligned rectangular parts.
    Composite {
        kind: CompositeKind,
        parts: Vec<Rect>,
    },
}

/// Layout family of a composite room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeKind {
    L,
    T,
}

/// A placed room.
///
/// # Examples
///
/// ```
/// use delve::{Position, Room, RoomShape};
///
/// let room = Room::new(0, Position::new(5, 5), 6, 4, RoomShape::Rectangle);
/// assert!(room.contains_cell(7, 6));
/// assert!(!room.contains_cell(11, 6));
/// assert_eq!(room.center(), Position::new(8, 7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique identifier, dense from zero in placement order.
    pub id: u32,
    /// Top-left corner of the bounding box.
    pub top_left: Position,
    /// Bounding-box width in cells.
    pub width: u32,
    /// Bounding-box height in cells.
    pub height: u32,
    /// Shape variant determining which bounding-box cells are filled.
    pub shape: RoomShape,
}

impl Room {
    /// Creates a new room.
    pub fn new(id: u32, top_left: Position, width: u32, height: u32, shape: RoomShape) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
            shape,
        }
    }

    /// Bounding box of the room.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.top_left.x, self.top_left.y, self.width, self.height)
    }

    /// Integer center cell of the bounding box.
    pub fn center(&self) -> Position {
        self.bounds().center()
    }

    /// Shape-aware cell membership test.
    ///
    /// Circles measure from the cell center `(x + 0.5, y + 0.5)` to the disc
    /// center; composites test the union of their parts.
    pub fn contains_cell(&self, x: i32, y: i32) -> bool {
        match &self.shape {
            RoomShape::Rectangle => self.bounds().contains_cell(x, y),
            RoomShape::Circle { radius } => {
                let r = *radius as f64;
                let center_x = self.top_left.x as f64 + r;
                let center_y = self.top_left.y as f64 + r;
                let dx = (x as f64 + 0.5) - center_x;
                let dy = (y as f64 + 0.5) - center_y;
                (dx * dx + dy * dy).sqrt() <= r
            }
            RoomShape::Composite { parts, .. } => {
                parts.iter().any(|part| part.contains_cell(x, y))
            }
        }
    }

    /// Bounding-box-only membership test.
    ///
    /// Used where circular or composite corners must not distort boundary
    /// detection, such as corridor alongside-room counting.
    pub fn contains_cell_rect(&self, x: i32, y: i32) -> bool {
        self.bounds().contains_cell(x, y)
    }

    /// Whether `(x, y)` lies outside the bounding box but touches it through
    /// one of its four cardinal neighbors.
    pub fn is_cell_adjacent(&self, x: i32, y: i32) -> bool {
        if self.contains_cell_rect(x, y) {
            return false;
        }
        Position::new(x, y)
            .cardinal_neighbors()
            .iter()
            .any(|n| self.contains_cell_rect(n.x, n.y))
    }

    /// Enumerates every filled cell of the room, row-major over the
    /// bounding box.
    pub fn cells(&self) -> Vec<Position> {
        self.bounds()
            .cells()
            .filter(|pos| self.contains_cell(pos.x, pos.y))
            .collect()
    }

    /// Number of filled cells.
    pub fn cell_count(&self) -> usize {
        self.cells().len()
    }
}
