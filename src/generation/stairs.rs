//! # Stairs and Water
//!
//! Chooses the entry and exit rooms, drops the stair pair, and rolls
//! water rooms.

use crate::config::GenerationConfig;
use crate::map::{ObjectKind, Position, Room};
use crate::rng::DiceRoller;
use log::debug;

/// Result of the stair-and-water pass.
#[derive(Debug, Clone)]
pub struct StairWaterResult {
    pub entry_room_id: Option<u32>,
    pub exit_room_id: Option<u32>,
    /// Stair objects to place, at most one of each kind.
    pub stairs: Vec<(ObjectKind, Position)>,
    pub water_room_ids: Vec<u32>,
    /// Every cell of every water room.
    pub water_cells: Vec<Position>,
}

/// Places stairs and selects water rooms.
///
/// The entry room is the one whose center sits highest on the map (ties
/// break left), the exit the lowest (ties break right). `stairs-down` goes
/// in the entry room, `stairs-up` in the exit room; a single-room dungeon
/// holds both. Water is rolled independently for every other room.
pub fn place_stairs_and_water(
    rooms: &[Room],
    config: &GenerationConfig,
    dice: &mut DiceRoller,
) -> StairWaterResult {
    if rooms.is_empty() {
        return StairWaterResult {
            entry_room_id: None,
            exit_room_id: None,
            stairs: Vec::new(),
            water_room_ids: Vec::new(),
            water_cells: Vec::new(),
        };
    }

    let entry = rooms
        .iter()
        .min_by_key(|room| {
            let center = room.center();
            (center.y, center.x)
        })
        .expect("non-empty room list");
    let exit = rooms
        .iter()
        .max_by_key(|room| {
            let center = room.center();
            (center.y, center.x)
        })
        .expect("non-empty room list");

    let mut stairs = Vec::new();
    let mut entry_cells = entry.cells();
    if let Some(&down) = dice.pick(&entry_cells) {
        stairs.push((ObjectKind::StairsDown, down));
        if entry.id == exit.id {
            // Single-room dungeon: both stairs share the room when it has
            // space for two.
            entry_cells.retain(|cell| *cell != down);
            if let Some(&up) = dice.pick(&entry_cells) {
                stairs.push((ObjectKind::StairsUp, up));
            }
        }
    }
    if entry.id != exit.id {
        if let Some(&up) = dice.pick(&exit.cells()) {
            stairs.push((ObjectKind::StairsUp, up));
        }
    }

    let mut water_room_ids = Vec::new();
    let mut water_cells = Vec::new();
    for room in rooms {
        if room.id == entry.id || room.id == exit.id {
            continue;
        }
        if dice.chance(config.water_chance) {
            water_room_ids.push(room.id);
            water_cells.extend(room.cells());
        }
    }
    debug!(
        "entry room {}, exit room {}, {} water rooms",
        entry.id,
        exit.id,
        water_room_ids.len()
    );

    StairWaterResult {
        entry_room_id: Some(entry.id),
        exit_room_id: Some(exit.id),
        stairs,
        water_room_ids,
        water_cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizePreset;
    use crate::map::RoomShape;

    fn room(id: u32, x: i32, y: i32) -> Room {
        Room::new(id, Position::new(x, y), 4, 4, RoomShape::Rectangle)
    }

    #[test]
    fn test_entry_is_topmost_exit_is_bottommost() {
        let rooms = vec![room(0, 10, 20), room(1, 5, 4), room(2, 18, 30)];
        let config = SizePreset::Small.config();
        let mut dice = DiceRoller::seeded(1);
        let result = place_stairs_and_water(&rooms, &config, &mut dice);
        assert_eq!(result.entry_room_id, Some(1));
        assert_eq!(result.exit_room_id, Some(2));
        let down = result
            .stairs
            .iter()
            .find(|(kind, _)| *kind == ObjectKind::StairsDown)
            .unwrap();
        assert!(rooms[1].contains_cell(down.1.x, down.1.y));
        let up = result
            .stairs
            .iter()
            .find(|(kind, _)| *kind == ObjectKind::StairsUp)
            .unwrap();
        assert!(rooms[2].contains_cell(up.1.x, up.1.y));
    }

    #[test]
    fn test_vertical_tie_breaks_on_x() {
        // Same center y: entry takes the smaller x, exit the larger.
        let rooms = vec![room(0, 12, 6), room(1, 4, 6)];
        let config = SizePreset::Small.config();
        let mut dice = DiceRoller::seeded(1);
        let result = place_stairs_and_water(&rooms, &config, &mut dice);
        assert_eq!(result.entry_room_id, Some(1));
        assert_eq!(result.exit_room_id, Some(0));
    }

    #[test]
    fn test_single_room_holds_both_stairs() {
        let rooms = vec![room(0, 6, 6)];
        let config = SizePreset::Small.config();
        let mut dice = DiceRoller::seeded(3);
        let result = place_stairs_and_water(&rooms, &config, &mut dice);
        assert_eq!(result.entry_room_id, Some(0));
        assert_eq!(result.exit_room_id, Some(0));
        assert_eq!(result.stairs.len(), 2);
        let positions: Vec<Position> = result.stairs.iter().map(|(_, pos)| *pos).collect();
        assert_ne!(positions[0], positions[1]);
        assert!(result.water_room_ids.is_empty());
    }

    #[test]
    fn test_water_never_touches_entry_or_exit() {
        let rooms = vec![room(0, 6, 4), room(1, 6, 14), room(2, 6, 24), room(3, 16, 14)];
        let mut config = SizePreset::Small.config();
        config.water_chance = 1.0;
        let mut dice = DiceRoller::seeded(7);
        let result = place_stairs_and_water(&rooms, &config, &mut dice);
        assert_eq!(result.entry_room_id, Some(0));
        assert_eq!(result.exit_room_id, Some(2));
        assert_eq!(result.water_room_ids, vec![1, 3]);
        // Water cells cover the full rooms.
        assert_eq!(result.water_cells.len(), 2 * 16);
    }

    #[test]
    fn test_zero_water_chance() {
        let rooms = vec![room(0, 6, 4), room(1, 6, 14), room(2, 6, 24)];
        let mut config = SizePreset::Small.config();
        config.water_chance = 0.0;
        let mut dice = DiceRoller::seeded(7);
        let result = place_stairs_and_water(&rooms, &config, &mut dice);
        assert!(result.water_room_ids.is_empty());
        assert!(result.water_cells.is_empty());
    }
}
