//! # Cell Materialization
//!
//! Merges room, corridor, and water cells into the final cell map.
//!
//! Precedence is pinned: room cells are always full; a corridor full fill
//! upgrades a segment entry but never the other way around; the first
//! writer wins within a class; water overwrites whatever it lands on.

use crate::config::GenerationConfig;
use crate::map::{Cell, CorridorRecord, Position, Room};
use log::debug;
use std::collections::HashMap;

/// Builds the output cell collection.
///
/// Cells outside the grid are discarded, so the result always satisfies
/// the grid-bounds invariant regardless of how corridors were carved.
pub fn materialize_cells(
    rooms: &[Room],
    corridors: &[CorridorRecord],
    water_cells: &[Position],
    config: &GenerationConfig,
) -> Vec<Cell> {
    let mut cells: Vec<Cell> = Vec::new();
    let mut index: HashMap<Position, usize> = HashMap::new();
    let in_grid = |pos: Position| {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < config.grid_width as i32
            && pos.y < config.grid_height as i32
    };

    // Rooms first: always full.
    for room in rooms {
        for pos in room.cells() {
            if !in_grid(pos) || index.contains_key(&pos) {
                continue;
            }
            index.insert(pos, cells.len());
            cells.push(Cell::full(pos.x, pos.y, &config.floor_color));
        }
    }

    // Corridor cells: full beats segments, first writer wins per class.
    for record in corridors {
        for corridor_cell in &record.cells {
            let pos = corridor_cell.position;
            if !in_grid(pos) {
                continue;
            }
            match index.get(&pos) {
                None => {
                    index.insert(pos, cells.len());
                    let cell = match corridor_cell.segments {
                        Some(segments) => {
                            Cell::segmented(pos.x, pos.y, &config.floor_color, segments)
                        }
                        None => Cell::full(pos.x, pos.y, &config.floor_color),
                    };
                    cells.push(cell);
                }
                Some(&slot) => {
                    if !cells[slot].is_full() && corridor_cell.is_full() {
                        cells[slot] = Cell::full(pos.x, pos.y, &config.floor_color);
                    }
                }
            }
        }
    }

    // Water last: overwrites floor.
    for pos in water_cells {
        if !in_grid(*pos) {
            continue;
        }
        let mut water = Cell::full(pos.x, pos.y, &config.water_color);
        water.opacity = Some(config.water_opacity);
        match index.get(pos) {
            Some(&slot) => cells[slot] = water,
            None => {
                index.insert(*pos, cells.len());
                cells.push(water);
            }
        }
    }

    debug!("materialized {} cells", cells.len());
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizePreset;
    use crate::map::{CorridorCell, RoomShape, SegmentSet, Wedge};

    fn config() -> GenerationConfig {
        SizePreset::Small.config()
    }

    fn record_with_cells(cells: Vec<CorridorCell>) -> CorridorRecord {
        CorridorRecord {
            room_a: 0,
            room_b: 1,
            path: Vec::new(),
            width: 1,
            has_diagonals: false,
            dirty: false,
            cells,
        }
    }

    fn cell_at(cells: &[Cell], x: i32, y: i32) -> &Cell {
        cells
            .iter()
            .find(|cell| cell.x == x && cell.y == y)
            .expect("cell present")
    }

    #[test]
    fn test_room_full_beats_corridor_segments() {
        let room = Room::new(0, Position::new(4, 4), 3, 3, RoomShape::Rectangle);
        let segments = SegmentSet::of(&[Wedge::N]);
        let corridor =
            record_with_cells(vec![CorridorCell::segmented(Position::new(5, 5), segments)]);
        let cells = materialize_cells(&[room], &[corridor], &[], &config());
        assert!(cell_at(&cells, 5, 5).is_full());
    }

    #[test]
    fn test_corridor_full_upgrades_segments() {
        let segments = SegmentSet::of(&[Wedge::E]);
        let first = record_with_cells(vec![CorridorCell::segmented(Position::new(8, 8), segments)]);
        let second = record_with_cells(vec![CorridorCell::full(Position::new(8, 8))]);
        let cells = materialize_cells(&[], &[first, second], &[], &config());
        assert_eq!(cells.len(), 1);
        assert!(cells[0].is_full());
    }

    #[test]
    fn test_first_segment_writer_wins() {
        let first = record_with_cells(vec![CorridorCell::segmented(
            Position::new(8, 8),
            SegmentSet::of(&[Wedge::E]),
        )]);
        let second = record_with_cells(vec![CorridorCell::segmented(
            Position::new(8, 8),
            SegmentSet::of(&[Wedge::W]),
        )]);
        let cells = materialize_cells(&[], &[first, second], &[], &config());
        assert_eq!(cells.len(), 1);
        let segments = cells[0].segments.expect("still segmented");
        assert!(segments.contains(Wedge::E));
        assert!(!segments.contains(Wedge::W));
    }

    #[test]
    fn test_water_overwrites_floor() {
        let room = Room::new(0, Position::new(4, 4), 3, 3, RoomShape::Rectangle);
        let cfg = config();
        let cells = materialize_cells(&[room], &[], &[Position::new(5, 5)], &cfg);
        let water = cell_at(&cells, 5, 5);
        assert_eq!(water.color, cfg.water_color);
        assert_eq!(water.opacity, Some(cfg.water_opacity));
        let floor = cell_at(&cells, 4, 4);
        assert_eq!(floor.color, cfg.floor_color);
    }

    #[test]
    fn test_out_of_grid_cells_are_discarded() {
        let corridor = record_with_cells(vec![
            CorridorCell::full(Position::new(-1, 5)),
            CorridorCell::full(Position::new(5, 500)),
            CorridorCell::full(Position::new(5, 5)),
        ]);
        let cells = materialize_cells(&[], &[corridor], &[], &config());
        assert_eq!(cells.len(), 1);
        assert_eq!((cells[0].x, cells[0].y), (5, 5));
    }
}
