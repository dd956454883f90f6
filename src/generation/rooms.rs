//! # Room Placement
//!
//! Monte Carlo room placement with collision rejection.
//!
//! Rooms are sampled one candidate at a time: a shape is rolled from the
//! configured mix, sized with the style's bias, and dropped at a uniform
//! interior position. Candidates that leave the interior margin or land
//! within `padding` cells of an existing room are rejected. Placement
//! gives up silently once the attempt budget is spent; the caller reports
//! the shortfall in metadata.

use crate::config::GenerationConfig;
use crate::map::{CompositeKind, Position, Rect, Room, RoomShape};
use crate::rng::DiceRoller;
use log::{debug, warn};

/// Result of the placement phase.
#[derive(Debug, Clone)]
pub struct RoomPlacement {
    /// Rooms actually placed, ids dense from zero.
    pub rooms: Vec<Room>,
    /// The rolled target; `rooms.len()` may be smaller.
    pub requested_count: u32,
}

/// Places rooms for one generate call.
pub struct RoomGenerator<'a> {
    config: &'a GenerationConfig,
}

impl<'a> RoomGenerator<'a> {
    /// Attempt budget multiplier per requested room.
    const ATTEMPTS_PER_ROOM: u32 = 50;

    pub fn new(config: &'a GenerationConfig) -> Self {
        Self { config }
    }

    /// Runs rejection sampling until the rolled room count is reached or the
    /// attempt budget is exhausted.
    pub fn place_rooms(&self, dice: &mut DiceRoller) -> RoomPlacement {
        let target = dice.int(
            self.config.room_count.min as i32,
            self.config.room_count.max as i32,
        ) as u32;
        let budget = Self::ATTEMPTS_PER_ROOM * target;

        let mut rooms: Vec<Room> = Vec::with_capacity(target as usize);
        let mut attempts = 0;
        while (rooms.len() as u32) < target && attempts < budget {
            attempts += 1;
            let id = rooms.len() as u32;
            let Some(candidate) = self.roll_candidate(dice, id) else {
                continue;
            };
            if self.accepts(&candidate, &rooms) {
                rooms.push(candidate);
            }
        }

        if (rooms.len() as u32) < self.config.room_count.min {
            warn!(
                "room placement underfilled: {} of {} after {} attempts",
                rooms.len(),
                target,
                attempts
            );
        }
        debug!("placed {} rooms in {} attempts", rooms.len(), attempts);

        RoomPlacement {
            rooms,
            requested_count: target,
        }
    }

    /// Rolls one candidate: circle, composite, or rectangle per the shape
    /// mix. Returns `None` when the rolled extent cannot fit the grid.
    fn roll_candidate(&self, dice: &mut DiceRoller, id: u32) -> Option<Room> {
        let roll = dice.unit();
        if roll < self.config.circle_chance {
            self.roll_circle(dice, id)
        } else if roll < self.config.circle_chance + self.config.complex_room_chance {
            self.roll_composite(dice, id)
        } else {
            self.roll_rectangle(dice, id)
        }
    }

    fn roll_rectangle(&self, dice: &mut DiceRoller, id: u32) -> Option<Room> {
        let size = &self.config.room_size;
        let width = dice.biased_int(
            size.min_width as i32,
            size.max_width as i32,
            self.config.room_size_bias,
        ) as u32;
        let height = dice.biased_int(
            size.min_height as i32,
            size.max_height as i32,
            self.config.room_size_bias,
        ) as u32;
        let top_left = self.roll_position(dice, width, height)?;
        Some(Room::new(id, top_left, width, height, RoomShape::Rectangle))
    }

    fn roll_circle(&self, dice: &mut DiceRoller, id: u32) -> Option<Room> {
        let size = &self.config.room_size;
        let min_radius = (size.min_width.min(size.min_height) / 2).max(1);
        let max_radius = (size.max_width.min(size.max_height) / 2).max(min_radius);
        let radius = dice.biased_int(
            min_radius as i32,
            max_radius as i32,
            self.config.room_size_bias,
        ) as u32;
        let diameter = 2 * radius;
        let top_left = self.roll_position(dice, diameter, diameter)?;
        Some(Room::new(
            id,
            top_left,
            diameter,
            diameter,
            RoomShape::Circle { radius },
        ))
    }

    /// Composite rooms are an L (70%) or a T (30%) in one of four
    /// orientations: two overlapping rectangular parts whose overlap is at
    /// least one cell deep, so the union is 4-connected.
    fn roll_composite(&self, dice: &mut DiceRoller, id: u32) -> Option<Room> {
        let size = &self.config.room_size;
        // Arms need room to read as an L or T.
        let min_width = size.min_width.max(4);
        let min_height = size.min_height.max(4);
        if min_width > size.max_width || min_height > size.max_height {
            return self.roll_rectangle(dice, id);
        }
        let width = dice.biased_int(
            min_width as i32,
            size.max_width as i32,
            self.config.room_size_bias,
        ) as u32;
        let height = dice.biased_int(
            min_height as i32,
            size.max_height as i32,
            self.config.room_size_bias,
        ) as u32;
        let top_left = self.roll_position(dice, width, height)?;

        let kind = if dice.chance(0.7) {
            CompositeKind::L
        } else {
            CompositeKind::T
        };
        let orientation = dice.int(0, 3);
        let arm_width = dice.int(2, (width / 2).max(2) as i32) as u32;
        let arm_height = dice.int(2, (height / 2).max(2) as i32) as u32;

        let parts = match kind {
            CompositeKind::L => {
                composite_l_parts(top_left, width, height, arm_width, arm_height, orientation)
            }
            CompositeKind::T => {
                composite_t_parts(top_left, width, height, arm_width, arm_height, orientation)
            }
        };
        Some(Room::new(
            id,
            top_left,
            width,
            height,
            RoomShape::Composite { kind, parts },
        ))
    }

    /// Uniform interior position keeping the margin `padding + 1`; `None`
    /// when the extent cannot fit.
    fn roll_position(&self, dice: &mut DiceRoller, width: u32, height: u32) -> Option<Position> {
        let margin = self.config.padding as i32 + 1;
        let max_x = self.config.grid_width as i32 - width as i32 - margin;
        let max_y = self.config.grid_height as i32 - height as i32 - margin;
        if max_x < margin || max_y < margin {
            return None;
        }
        Some(Position::new(
            dice.int(margin, max_x),
            dice.int(margin, max_y),
        ))
    }

    /// Margin and padded-overlap rejection.
    fn accepts(&self, candidate: &Room, rooms: &[Room]) -> bool {
        let margin = self.config.padding as i32 + 1;
        let bounds = candidate.bounds();
        let inside = bounds.x >= margin
            && bounds.y >= margin
            && bounds.right() <= self.config.grid_width as i32 - margin
            && bounds.bottom() <= self.config.grid_height as i32 - margin;
        if !inside {
            return false;
        }
        rooms
            .iter()
            .all(|room| !bounds.overlaps_padded(&room.bounds(), self.config.padding as i32))
    }
}

/// The two parts of an L room. Orientation picks which corner holds the
/// elbow: 0 top-left, 1 top-right, 2 bottom-right, 3 bottom-left.
fn composite_l_parts(
    top_left: Position,
    width: u32,
    height: u32,
    arm_width: u32,
    arm_height: u32,
    orientation: i32,
) -> Vec<Rect> {
    let (x, y) = (top_left.x, top_left.y);
    let right_arm_x = x + (width - arm_width) as i32;
    let bottom_arm_y = y + (height - arm_height) as i32;
    match orientation.rem_euclid(4) {
        0 => vec![
            Rect::new(x, y, arm_width, height),
            Rect::new(x, y, width, arm_height),
        ],
        1 => vec![
            Rect::new(right_arm_x, y, arm_width, height),
            Rect::new(x, y, width, arm_height),
        ],
        2 => vec![
            Rect::new(right_arm_x, y, arm_width, height),
            Rect::new(x, bottom_arm_y, width, arm_height),
        ],
        _ => vec![
            Rect::new(x, y, arm_width, height),
            Rect::new(x, bottom_arm_y, width, arm_height),
        ],
    }
}

/// The two parts of a T room: a bar along one side and a stem through the
/// middle. Orientation picks the bar side: 0 top, 1 right, 2 bottom,
/// 3 left.
fn composite_t_parts(
    top_left: Position,
    width: u32,
    height: u32,
    arm_width: u32,
    arm_height: u32,
    orientation: i32,
) -> Vec<Rect> {
    let (x, y) = (top_left.x, top_left.y);
    let stem_x = x + ((width - arm_width) / 2) as i32;
    let stem_y = y + ((height - arm_height) / 2) as i32;
    match orientation.rem_euclid(4) {
        0 => vec![
            Rect::new(x, y, width, arm_height),
            Rect::new(stem_x, y, arm_width, height),
        ],
        1 => vec![
            Rect::new(x + (width - arm_width) as i32, y, arm_width, height),
            Rect::new(x, stem_y, width, arm_height),
        ],
        2 => vec![
            Rect::new(x, y + (height - arm_height) as i32, width, arm_height),
            Rect::new(stem_x, y, arm_width, height),
        ],
        _ => vec![
            Rect::new(x, y, arm_width, height),
            Rect::new(x, stem_y, width, arm_height),
        ],
    }
}
