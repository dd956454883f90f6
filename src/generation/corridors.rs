//! # Corridor Carving
//!
//! Routes a corridor for every connection: L-shaped by default, Z-shaped
//! (offset elbow) when both L orientations hug a wall, with organic wobble
//! or diagonal wedge tiling depending on the corridor style.
//!
//! Carving never fails a generate call. When every candidate route is bad
//! the least-bad L is carved and the record is tagged `dirty`.

use crate::config::{CorridorStyle, GenerationConfig};
use crate::map::{
    Connection, CorridorCell, CorridorRecord, Position, Room, SegmentSet, Wedge,
};
use crate::rng::DiceRoller;
use log::debug;
use std::collections::HashMap;

/// Z-path elbow offsets, tried in order.
const Z_OFFSETS: [i32; 6] = [2, -2, 3, -3, 4, -4];

/// Chance an interior run cell starts wobbling.
const WOBBLE_START_CHANCE: f64 = 0.25;
/// Chance a wobble persists into the next cell.
const WOBBLE_PERSIST_CHANCE: f64 = 0.7;
/// Minimum straight-run length eligible for wobble.
const WOBBLE_MIN_RUN: usize = 4;

/// Carves corridors for one generate call.
pub struct CorridorCarver<'a> {
    config: &'a GenerationConfig,
    rooms: &'a [Room],
}

impl<'a> CorridorCarver<'a> {
    pub fn new(config: &'a GenerationConfig, rooms: &'a [Room]) -> Self {
        Self { config, rooms }
    }

    /// Carves every connection in order.
    pub fn carve_all(
        &self,
        connections: &[Connection],
        dice: &mut DiceRoller,
    ) -> Vec<CorridorRecord> {
        connections
            .iter()
            .filter_map(|connection| {
                let room_a = self.room_by_id(connection.a)?;
                let room_b = self.room_by_id(connection.b)?;
                Some(self.carve(room_a, room_b, dice))
            })
            .collect()
    }

    fn room_by_id(&self, id: u32) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// Routes one corridor between two rooms.
    pub fn carve(&self, room_a: &Room, room_b: &Room, dice: &mut DiceRoller) -> CorridorRecord {
        let width = if self.config.corridor_width >= 2 || dice.chance(self.config.wide_corridor_chance)
        {
            2
        } else {
            1
        };

        let diagonal_allowed = self.config.corridor_style == CorridorStyle::Diagonal
            || dice.chance(self.config.diagonal_corridor_chance);
        if diagonal_allowed && self.diagonal_eligible(room_a, room_b) {
            return self.carve_diagonal(room_a, room_b, width);
        }

        let (mut path, dirty) = self.route_straight(room_a, room_b, width, dice);
        if self.config.corridor_style == CorridorStyle::Organic {
            path = self.apply_wobble(path, room_a, room_b, dice);
        }
        let cells = self.expand_path(&path, width, room_a, room_b);

        CorridorRecord {
            room_a: room_a.id,
            room_b: room_b.id,
            path,
            width,
            has_diagonals: false,
            dirty,
            cells,
        }
    }

    // ----- straight routing -------------------------------------------------

    /// Picks an L or Z centerline, falling back to the least-bad L.
    fn route_straight(
        &self,
        room_a: &Room,
        room_b: &Room,
        width: u32,
        dice: &mut DiceRoller,
    ) -> (Vec<Position>, bool) {
        let start = room_a.center();
        let goal = room_b.center();

        let horizontal_first = l_path(start, goal, true);
        let vertical_first = l_path(start, goal, false);
        let h_clean = self.route_is_clean(&horizontal_first, width);
        let v_clean = self.route_is_clean(&vertical_first, width);

        match (h_clean, v_clean) {
            (true, true) => {
                let path = if dice.chance(0.5) {
                    horizontal_first
                } else {
                    vertical_first
                };
                (path, false)
            }
            (true, false) => (horizontal_first, false),
            (false, true) => (vertical_first, false),
            (false, false) => {
                if let Some(path) = self.route_z(start, goal, width) {
                    return (path, false);
                }
                // Least-bad L, preferring horizontal-first on a tie.
                let h_badness = self.route_badness(&horizontal_first, width);
                let v_badness = self.route_badness(&vertical_first, width);
                debug!(
                    "dirty corridor {} -> {} (badness {} / {})",
                    room_a.id, room_b.id, h_badness, v_badness
                );
                if v_badness < h_badness {
                    (vertical_first, true)
                } else {
                    (horizontal_first, true)
                }
            }
        }
    }

    /// Tries Z-paths with an offset elbow, both orientations per offset.
    fn route_z(&self, start: Position, goal: Position, width: u32) -> Option<Vec<Position>> {
        for offset in Z_OFFSETS {
            for horizontal_first in [true, false] {
                let path = z_path(start, goal, offset, horizontal_first);
                if self.route_is_clean(&path, width) {
                    return Some(path);
                }
            }
        }
        None
    }

    /// A route is clean when its expanded footprint neither runs alongside
    /// its endpoint rooms' walls nor hugs a third room: more than one
    /// wall-adjacent cell against any room rejects the route.
    fn route_is_clean(&self, path: &[Position], width: u32) -> bool {
        let in_grid = footprint(path, width).into_iter().all(|pos| {
            pos.x >= 0
                && pos.y >= 0
                && pos.x < self.config.grid_width as i32
                && pos.y < self.config.grid_height as i32
        });
        in_grid && self.route_badness(path, width) == 0
    }

    /// Total wall-hugging excess over every room, endpoint rooms included.
    /// At most one wall-adjacent cell per room is tolerated; wider routes
    /// that cannot meet it fall through to Z-paths and the dirty fallback.
    fn route_badness(&self, path: &[Position], width: u32) -> usize {
        let cells = footprint(path, width);
        let threshold = 1;
        let mut badness = 0;
        for room in self.rooms {
            let adjacent = cells
                .iter()
                .filter(|pos| room.is_cell_adjacent(pos.x, pos.y))
                .count();
            badness += adjacent.saturating_sub(threshold);
        }
        badness
    }

    // ----- organic wobble ---------------------------------------------------

    /// Nudges long straight runs sideways with a persistence state machine.
    fn apply_wobble(
        &self,
        path: Vec<Position>,
        room_a: &Room,
        room_b: &Room,
        dice: &mut DiceRoller,
    ) -> Vec<Position> {
        let mut wobbled = path.clone();
        for run in straight_runs(&path) {
            if run.len < WOBBLE_MIN_RUN {
                continue;
            }
            // Leave the run ends anchored.
            let interior_start = run.start + 2;
            let interior_end = (run.start + run.len).saturating_sub(2);
            let perpendicular = if run.horizontal {
                Position::new(0, 1)
            } else {
                Position::new(1, 0)
            };

            let mut wobble = 0i32;
            for index in interior_start..interior_end {
                if wobble == 0 {
                    if dice.chance(WOBBLE_START_CHANCE) {
                        wobble = if dice.chance(0.5) { 1 } else { -1 };
                    }
                } else if !dice.chance(WOBBLE_PERSIST_CHANCE) {
                    wobble = 0;
                }
                if wobble == 0 {
                    continue;
                }
                let nudged = Position::new(
                    path[index].x + perpendicular.x * wobble,
                    path[index].y + perpendicular.y * wobble,
                );
                if self.touches_foreign_room(nudged, room_a, room_b) {
                    wobble = 0;
                    continue;
                }
                wobbled[index] = nudged;
            }
        }
        wobbled
    }

    /// Whether a cell is inside or 4-adjacent to any non-endpoint room.
    fn touches_foreign_room(&self, pos: Position, room_a: &Room, room_b: &Room) -> bool {
        self.rooms.iter().any(|room| {
            room.id != room_a.id
                && room.id != room_b.id
                && (room.contains_cell_rect(pos.x, pos.y) || room.is_cell_adjacent(pos.x, pos.y))
        })
    }

    // ----- diagonal routing -------------------------------------------------

    /// Diagonals need at least a 3-cell offset on both axes and a clear
    /// straight line between the centers.
    fn diagonal_eligible(&self, room_a: &Room, room_b: &Room) -> bool {
        let start = room_a.center();
        let goal = room_b.center();
        let dx = (goal.x - start.x).abs();
        let dy = (goal.y - start.y).abs();
        if dx < 3 || dy < 3 {
            return false;
        }
        // Sample the segment finely; any other room's box blocks the route.
        let steps = (dx.max(dy) * 4) as usize;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = start.x as f64 + 0.5 + t * (goal.x - start.x) as f64;
            let y = start.y as f64 + 0.5 + t * (goal.y - start.y) as f64;
            let cell = Position::new(x.floor() as i32, y.floor() as i32);
            let blocked = self.rooms.iter().any(|room| {
                room.id != room_a.id
                    && room.id != room_b.id
                    && room.contains_cell_rect(cell.x, cell.y)
            });
            if blocked {
                return false;
            }
        }
        true
    }

    /// Carves a diagonal route: orthogonal exit, 45° run with wedge crooks,
    /// transition wedge, orthogonal finish.
    fn carve_diagonal(&self, room_a: &Room, room_b: &Room, width: u32) -> CorridorRecord {
        let start = room_a.center();
        let goal = room_b.center();
        let x_dir = (goal.x - start.x).signum();
        let y_dir = (goal.y - start.y).signum();

        let mut path = vec![start];
        let mut cursor = start;

        // (a) leave room A horizontally until clear of its box.
        let bounds_a = room_a.bounds();
        while bounds_a.contains_cell(cursor.x + x_dir, cursor.y) {
            cursor = Position::new(cursor.x + x_dir, cursor.y);
            path.push(cursor);
        }
        cursor = Position::new(cursor.x + x_dir, cursor.y);
        path.push(cursor);

        // (b) diagonal run until one axis aligns with the goal.
        let mut crooks: Vec<(Position, SegmentSet)> = Vec::new();
        let mut track: Vec<Position> = Vec::new();
        let (x_mask, y_mask) = crook_segments(x_dir, y_dir);
        while (goal.x - cursor.x).abs() > 0
            && (goal.y - cursor.y).abs() > 0
            && (goal.x - cursor.x).signum() == x_dir
            && (goal.y - cursor.y).signum() == y_dir
        {
            crooks.push((Position::new(cursor.x + x_dir, cursor.y), x_mask));
            crooks.push((Position::new(cursor.x, cursor.y + y_dir), y_mask));
            if width >= 2 {
                // Second diagonal track: one cell to the perpendicular side,
                // clear of both crook cells so their wedges survive.
                track.push(Position::new(cursor.x - y_dir, cursor.y + x_dir));
            }
            cursor = Position::new(cursor.x + x_dir, cursor.y + y_dir);
            path.push(cursor);
        }

        // (c) transition wedge where the diagonal meets the approach.
        if !crooks.is_empty() {
            let transition = if cursor.x != goal.x {
                Position::new(cursor.x + x_dir, cursor.y - y_dir)
            } else {
                Position::new(cursor.x - x_dir, cursor.y + y_dir)
            };
            crooks.push((transition, if cursor.x != goal.x { y_mask } else { x_mask }));
        }

        // (d) orthogonal finish into room B's center. The exit may have
        // overshot an axis, so derive each step from the remaining delta.
        let x_step = (goal.x - cursor.x).signum();
        while cursor.x != goal.x {
            cursor = Position::new(cursor.x + x_step, cursor.y);
            path.push(cursor);
        }
        let y_step = (goal.y - cursor.y).signum();
        while cursor.y != goal.y {
            cursor = Position::new(cursor.x, cursor.y + y_step);
            path.push(cursor);
        }

        let mut accumulator = CellAccumulator::new();
        for pos in footprint(&path, width) {
            accumulator.push_full(pos);
        }
        for pos in track {
            accumulator.push_full(pos);
        }
        for (pos, mask) in crooks {
            accumulator.push_segments(pos, mask);
        }

        CorridorRecord {
            room_a: room_a.id,
            room_b: room_b.id,
            path,
            width,
            has_diagonals: true,
            dirty: false,
            cells: accumulator.into_cells(),
        }
    }

    // ----- footprint --------------------------------------------------------

    /// Expands the final centerline to its full cell set, filling wobble
    /// elbows to keep the footprint 4-connected.
    fn expand_path(
        &self,
        path: &[Position],
        width: u32,
        room_a: &Room,
        room_b: &Room,
    ) -> Vec<CorridorCell> {
        let mut accumulator = CellAccumulator::new();
        for pos in footprint(path, width) {
            accumulator.push_full(pos);
        }
        // Wobble transitions leave diagonal neighbors; bridge them.
        for pair in path.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let dx = curr.x - prev.x;
            let dy = curr.y - prev.y;
            if dx != 0 && dy != 0 {
                for elbow in [
                    Position::new(prev.x + dx, prev.y),
                    Position::new(prev.x, prev.y + dy),
                ] {
                    if !self.touches_foreign_room(elbow, room_a, room_b) {
                        accumulator.push_full(elbow);
                    }
                }
            }
        }
        accumulator.into_cells()
    }
}

/// An L-shaped centerline between two cells.
fn l_path(start: Position, goal: Position, horizontal_first: bool) -> Vec<Position> {
    let corner = if horizontal_first {
        Position::new(goal.x, start.y)
    } else {
        Position::new(start.x, goal.y)
    };
    let mut path = vec![start];
    push_line(&mut path, start, corner);
    push_line(&mut path, corner, goal);
    path
}

/// A Z-shaped centerline with the elbow leg shifted by `offset`.
fn z_path(start: Position, goal: Position, offset: i32, horizontal_first: bool) -> Vec<Position> {
    let mut path = vec![start];
    if horizontal_first {
        let elbow_x = goal.x + offset;
        let first = Position::new(elbow_x, start.y);
        let second = Position::new(elbow_x, goal.y);
        push_line(&mut path, start, first);
        push_line(&mut path, first, second);
        push_line(&mut path, second, goal);
    } else {
        let elbow_y = goal.y + offset;
        let first = Position::new(start.x, elbow_y);
        let second = Position::new(goal.x, elbow_y);
        push_line(&mut path, start, first);
        push_line(&mut path, first, second);
        push_line(&mut path, second, goal);
    }
    path
}

/// Appends the cells strictly after `from` up to and including `to`, one
/// axis at a time.
fn push_line(path: &mut Vec<Position>, from: Position, to: Position) {
    let mut cursor = from;
    let dx = (to.x - from.x).signum();
    while cursor.x != to.x {
        cursor = Position::new(cursor.x + dx, cursor.y);
        path.push(cursor);
    }
    let dy = (to.y - from.y).signum();
    while cursor.y != to.y {
        cursor = Position::new(cursor.x, cursor.y + dy);
        path.push(cursor);
    }
}

/// Expands a centerline perpendicular to travel by the width offsets
/// `[-(w-1)/2, w/2]`; elbows emit both expansions so corners fill cleanly.
fn footprint(path: &[Position], width: u32) -> Vec<Position> {
    let lo = -((width as i32 - 1) / 2);
    let hi = width as i32 / 2;
    let mut cells = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut push = |pos: Position| {
        if seen.insert(pos) {
            cells.push(pos);
        }
    };

    for (index, pos) in path.iter().enumerate() {
        let incoming = index
            .checked_sub(1)
            .map(|prev| (*pos - path[prev]))
            .filter(|d| d.x.abs() + d.y.abs() == 1);
        let outgoing = path
            .get(index + 1)
            .map(|next| (*next - *pos))
            .filter(|d| d.x.abs() + d.y.abs() == 1);

        let mut directions: Vec<Position> = Vec::with_capacity(2);
        for direction in [incoming, outgoing].into_iter().flatten() {
            if !directions.contains(&direction) {
                directions.push(direction);
            }
        }
        if directions.is_empty() {
            // Isolated or diagonal-step point: emit the cell itself.
            push(*pos);
            continue;
        }
        for direction in directions {
            for offset in lo..=hi {
                let cell = if direction.x != 0 {
                    Position::new(pos.x, pos.y + offset)
                } else {
                    Position::new(pos.x + offset, pos.y)
                };
                push(cell);
            }
        }
    }
    cells
}

/// Wedge masks for the two crook cells of one diagonal step, keyed by the
/// travel direction. The first mask fills the crook in `x_dir`, the second
/// the crook in `y_dir`; each covers the two cell edges facing the full
/// diagonal cells so the open hypotenuse reads as a 45° wall.
fn crook_segments(x_dir: i32, y_dir: i32) -> (SegmentSet, SegmentSet) {
    let top = SegmentSet::of(&[Wedge::Nw, Wedge::N, Wedge::Ne]);
    let bottom = SegmentSet::of(&[Wedge::Sw, Wedge::S, Wedge::Se]);
    let left = SegmentSet::of(&[Wedge::W]);
    let right = SegmentSet::of(&[Wedge::E]);

    let left_top = left.union(top);
    let left_bottom = left.union(bottom);
    let right_top = right.union(top);
    let right_bottom = right.union(bottom);

    match (x_dir, y_dir) {
        // north-east travel
        (1, -1) => (left_top, right_bottom),
        // south-east travel
        (1, 1) => (left_bottom, right_top),
        // south-west travel
        (-1, 1) => (right_bottom, left_top),
        // north-west travel
        _ => (right_top, left_bottom),
    }
}

/// A maximal straight run inside a centerline.
struct StraightRun {
    start: usize,
    len: usize,
    horizontal: bool,
}

/// Finds maximal straight runs of a centerline.
fn straight_runs(path: &[Position]) -> Vec<StraightRun> {
    let mut runs = Vec::new();
    if path.len() < 2 {
        return runs;
    }
    let mut run_start = 0;
    let mut run_delta = path[1] - path[0];
    for index in 1..path.len() {
        let delta = path[index] - path[index - 1];
        if delta != run_delta {
            runs.push(StraightRun {
                start: run_start,
                len: index - run_start,
                horizontal: run_delta.x != 0,
            });
            run_start = index - 1;
            run_delta = delta;
        }
    }
    runs.push(StraightRun {
        start: run_start,
        len: path.len() - run_start,
        horizontal: run_delta.x != 0,
    });
    runs
}

/// Orders corridor cells by insertion, full fills beating segments and the
/// first segment write winning.
struct CellAccumulator {
    cells: Vec<CorridorCell>,
    index: HashMap<Position, usize>,
}

impl CellAccumulator {
    fn new() -> Self {
        Self {
            cells: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn push_full(&mut self, position: Position) {
        match self.index.get(&position) {
            Some(&slot) => {
                // Full upgrades a segment entry.
                if !self.cells[slot].is_full() {
                    self.cells[slot] = CorridorCell::full(position);
                }
            }
            None => {
                self.index.insert(position, self.cells.len());
                self.cells.push(CorridorCell::full(position));
            }
        }
    }

    fn push_segments(&mut self, position: Position, segments: SegmentSet) {
        if self.index.contains_key(&position) {
            return;
        }
        self.index.insert(position, self.cells.len());
        self.cells.push(CorridorCell::segmented(position, segments));
    }

    fn into_cells(self) -> Vec<CorridorCell> {
        self.cells
    }
}
