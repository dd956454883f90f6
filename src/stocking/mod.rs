//! # Stocking Module
//!
//! B/X-style dungeon stocking: one weighted category roll per room, an
//! object budget scaled by room size and density, and zone-aware placement
//! with per-kind preferences. Water rooms and corridors have their own
//! paths.
//!
//! Stocking works entirely from [`DungeonMetadata`], so an objects-only
//! re-roll can run it again on a stored layout.

pub mod pools;
pub mod templates;

pub use pools::*;
pub use templates::*;

use crate::config::{MapStyle, StockingConfig};
use crate::map::{DungeonMetadata, MapObject, ObjectKind, Position, Room};
use crate::rng::DiceRoller;
use log::debug;
use std::collections::HashSet;

/// The stocking category rolled once per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockCategory {
    Monster,
    Empty,
    Feature,
    Trap,
}

impl StockCategory {
    /// Category order matching the normalized weight array.
    pub const ALL: [StockCategory; 4] = [
        StockCategory::Monster,
        StockCategory::Empty,
        StockCategory::Feature,
        StockCategory::Trap,
    ];
}

/// A named subset of a room's cells used to constrain placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementZone {
    /// Near a bounding-box corner on both axes.
    Corner,
    /// On the bounding-box boundary.
    Wall,
    /// Off the boundary.
    Center,
    /// Any non-door cell.
    Scattered,
}

/// Chance a monster room also hides guarded treasure.
const GUARDED_TREASURE_CHANCE: f64 = 0.5;
/// Chance a trap room baits the trap with treasure.
const BAIT_TREASURE_CHANCE: f64 = 0.33;
/// Chance an empty room hides a corner treasure anyway.
const HIDDEN_TREASURE_CHANCE: f64 = 0.17;
/// Chance a big-enough feature room uses a template.
const TEMPLATE_CHANCE: f64 = 0.5;
/// Chance a water room gets a center island feature.
const ISLAND_CHANCE: f64 = 0.3;
/// Chance a cavern water room holds an aquatic monster.
const AQUATIC_MONSTER_CHANCE: f64 = 0.3;

/// Stocks a dungeon layout, returning the non-structural objects.
///
/// `start_id` seeds the object id counter so stocked ids continue after the
/// structural objects the caller already holds.
pub fn stock_dungeon(
    metadata: &DungeonMetadata,
    stocking: &StockingConfig,
    start_id: u32,
    dice: &mut DiceRoller,
) -> Vec<MapObject> {
    let mut placer = ObjectPlacer::new(metadata, stocking, start_id);
    placer.run(dice);
    debug!("stocked {} objects", placer.objects.len());
    placer.objects
}

struct ObjectPlacer<'a> {
    metadata: &'a DungeonMetadata,
    stocking: &'a StockingConfig,
    /// Door cells and their 4-neighbors; nothing is placed here.
    blocked: HashSet<Position>,
    next_id: u32,
    objects: Vec<MapObject>,
}

impl<'a> ObjectPlacer<'a> {
    fn new(metadata: &'a DungeonMetadata, stocking: &'a StockingConfig, start_id: u32) -> Self {
        let mut blocked = HashSet::new();
        for door in &metadata.door_positions {
            blocked.insert(door.position);
            blocked.extend(door.position.cardinal_neighbors());
        }
        Self {
            metadata,
            stocking,
            blocked,
            next_id: start_id,
            objects: Vec::new(),
        }
    }

    fn style(&self) -> MapStyle {
        self.metadata.style
    }

    fn run(&mut self, dice: &mut DiceRoller) {
        let weights = self.stocking.normalized_weights();
        let rooms = self.metadata.rooms.clone();
        for room in &rooms {
            if Some(room.id) == self.metadata.entry_room_id
                || Some(room.id) == self.metadata.exit_room_id
            {
                continue;
            }
            if self.metadata.water_room_ids.contains(&room.id) {
                self.stock_water_room(room, dice);
            } else {
                self.stock_room(room, &weights, dice);
            }
        }
        self.place_corridor_traps(dice);
    }

    // ----- dry rooms --------------------------------------------------------

    fn stock_room(&mut self, room: &Room, weights: &[f64; 4], dice: &mut DiceRoller) {
        let zones = RoomZones::for_room(room, &self.blocked);
        if zones.scattered.is_empty() {
            return;
        }
        let mut occupied: HashSet<Position> = HashSet::new();
        let budget = self.roll_budget(room.cell_count(), dice);
        let category = StockCategory::ALL[dice.weighted_pick(weights)];

        match category {
            StockCategory::Monster => {
                let monsters = (0.6 * budget as f64).ceil() as u32;
                for _ in 0..monsters {
                    let Some(&kind) = dice.pick(monster_pool(self.style())) else {
                        break;
                    };
                    self.place(kind, None, &zones, &mut occupied, dice, || {
                        tooltip_text(StockCategory::Monster, false, None, false)
                    });
                }
                if dice.chance(GUARDED_TREASURE_CHANCE) {
                    let treasures = (0.3 * budget as f64).floor() as u32;
                    for _ in 0..treasures {
                        let Some(&kind) = dice.pick(treasure_pool(self.style())) else {
                            break;
                        };
                        self.place(
                            kind,
                            Some(&[
                                PlacementZone::Corner,
                                PlacementZone::Wall,
                                PlacementZone::Scattered,
                            ]),
                            &zones,
                            &mut occupied,
                            dice,
                            || tooltip_text(StockCategory::Monster, true, None, false),
                        );
                    }
                }
            }
            StockCategory::Trap => {
                let traps = dice.int(1, 2);
                for _ in 0..traps {
                    let Some(&kind) = dice.pick(trap_pool(self.style())) else {
                        break;
                    };
                    self.place(kind, None, &zones, &mut occupied, dice, || {
                        tooltip_text(StockCategory::Trap, false, None, false)
                    });
                }
                if dice.chance(BAIT_TREASURE_CHANCE) {
                    if let Some(&kind) = dice.pick(treasure_pool(self.style())) {
                        self.place(
                            kind,
                            Some(&[PlacementZone::Center, PlacementZone::Scattered]),
                            &zones,
                            &mut occupied,
                            dice,
                            || tooltip_text(StockCategory::Trap, true, None, false),
                        );
                    }
                }
            }
            StockCategory::Feature => {
                self.stock_feature_room(room, budget, &zones, &mut occupied, dice);
            }
            StockCategory::Empty => {
                if dice.chance(HIDDEN_TREASURE_CHANCE) {
                    if let Some(&kind) = dice.pick(treasure_pool(self.style())) {
                        self.place(
                            kind,
                            Some(&[PlacementZone::Corner, PlacementZone::Wall]),
                            &zones,
                            &mut occupied,
                            dice,
                            || tooltip_text(StockCategory::Empty, true, None, false),
                        );
                    }
                }
            }
        }
    }

    fn stock_feature_room(
        &mut self,
        room: &Room,
        budget: u32,
        zones: &RoomZones,
        occupied: &mut HashSet<Position>,
        dice: &mut DiceRoller,
    ) {
        let cell_count = room.cell_count();
        if cell_count >= 9 && self.stocking.use_templates && dice.chance(TEMPLATE_CHANCE) {
            let valid = valid_templates(cell_count);
            if let Some(&template) = dice.pick(&valid) {
                self.apply_template(template, zones, occupied, dice);
                return;
            }
        }
        for _ in 0..budget {
            let Some(&kind) = dice.pick(feature_pool(self.style())) else {
                break;
            };
            self.place(kind, None, zones, occupied, dice, || {
                tooltip_text(StockCategory::Feature, false, None, false)
            });
        }
    }

    fn apply_template(
        &mut self,
        template: &RoomTemplate,
        zones: &RoomZones,
        occupied: &mut HashSet<Position>,
        dice: &mut DiceRoller,
    ) {
        for item in template.items {
            let count = dice.int(item.min as i32, item.max as i32);
            for _ in 0..count {
                self.place(
                    item.kind,
                    Some(&[item.zone, PlacementZone::Scattered]),
                    zones,
                    occupied,
                    dice,
                    || tooltip_text(StockCategory::Feature, false, Some(template.name), false),
                );
            }
        }
    }

    // ----- water rooms ------------------------------------------------------

    fn stock_water_room(&mut self, room: &Room, dice: &mut DiceRoller) {
        let budget = ((room.cell_count() / 12) as u32).max(1);
        let bounds = room.bounds();
        let mut shore: Vec<Position> = Vec::new();
        let mut deep: Vec<Position> = Vec::new();
        for pos in room.cells() {
            if self.blocked.contains(&pos) {
                continue;
            }
            let near_edge = pos.x <= bounds.x + 1
                || pos.x >= bounds.right() - 2
                || pos.y <= bounds.y + 1
                || pos.y >= bounds.bottom() - 2;
            if near_edge {
                shore.push(pos);
            } else {
                deep.push(pos);
            }
        }

        let mut occupied: HashSet<Position> = HashSet::new();
        let mut placed = 0u32;

        if dice.chance(ISLAND_CHANCE) {
            if let (Some(&kind), Some(pos)) =
                (dice.pick(&ISLAND_POOL), pick_free(&deep, &occupied, dice))
            {
                self.push_object(kind, pos, "Water feature".to_string());
                occupied.insert(pos);
                placed += 1;
            }
        }
        if self.style() == MapStyle::Cavern && dice.chance(AQUATIC_MONSTER_CHANCE) {
            if let Some(pos) = pick_free(&deep, &occupied, dice) {
                self.push_object(ObjectKind::Monster, pos, "Aquatic monster".to_string());
                occupied.insert(pos);
                placed += 1;
            }
        }
        while placed < budget {
            let Some(&kind) = dice.pick(&SHORE_POOL) else {
                break;
            };
            let Some(pos) = pick_free(&shore, &occupied, dice) else {
                break;
            };
            let tooltip = if kind.is_treasure() {
                "Shoreline cache"
            } else {
                "Lurking monster"
            };
            self.push_object(kind, pos, tooltip.to_string());
            occupied.insert(pos);
            placed += 1;
        }
    }

    // ----- corridors --------------------------------------------------------

    fn place_corridor_traps(&mut self, dice: &mut DiceRoller) {
        let rooms = &self.metadata.rooms;
        let mut candidates: Vec<Position> = Vec::new();
        let mut seen: HashSet<Position> = HashSet::new();
        for record in &self.metadata.corridor_result {
            for cell in &record.cells {
                let pos = cell.position;
                if !cell.is_full()
                    || self.blocked.contains(&pos)
                    || pos.x < 0
                    || pos.y < 0
                    || pos.x >= self.metadata.grid_width as i32
                    || pos.y >= self.metadata.grid_height as i32
                {
                    continue;
                }
                if rooms.iter().any(|room| room.contains_cell(pos.x, pos.y)) {
                    continue;
                }
                if seen.insert(pos) {
                    candidates.push(pos);
                }
            }
        }

        let count = (candidates.len() as f64 * self.stocking.corridor_trap_chance / 10.0).floor()
            as usize;
        let mut occupied: HashSet<Position> = HashSet::new();
        for _ in 0..count {
            let Some(&kind) = dice.pick(trap_pool(self.style())) else {
                break;
            };
            let Some(pos) = pick_free(&candidates, &occupied, dice) else {
                break;
            };
            self.push_object(kind, pos, tooltip_text(StockCategory::Trap, false, None, true));
            occupied.insert(pos);
        }
    }

    // ----- placement machinery ----------------------------------------------

    /// Rolls the per-room object budget from the cell count, scaled by
    /// density, never below one.
    fn roll_budget(&self, cell_count: usize, dice: &mut DiceRoller) -> u32 {
        let base = if cell_count <= 6 {
            dice.int(1, 2)
        } else if cell_count <= 15 {
            dice.int(2, 4)
        } else {
            dice.int(4, 6)
        };
        ((base as f64 * self.stocking.object_density).round() as u32).max(1)
    }

    /// Places one object in the first preferred zone with a free cell.
    /// Exhausted zones simply yield nothing.
    fn place(
        &mut self,
        kind: ObjectKind,
        preference_override: Option<&[PlacementZone]>,
        zones: &RoomZones,
        occupied: &mut HashSet<Position>,
        dice: &mut DiceRoller,
        tooltip: impl FnOnce() -> String,
    ) -> bool {
        let preferences = preference_override.unwrap_or_else(|| zone_preferences(kind));
        for zone in preferences {
            if let Some(pos) = pick_free(zones.cells(*zone), occupied, dice) {
                self.push_object(kind, pos, tooltip());
                occupied.insert(pos);
                return true;
            }
        }
        false
    }

    fn push_object(&mut self, kind: ObjectKind, position: Position, tooltip: String) {
        let mut object = MapObject::new(self.next_id, kind, position);
        object.custom_tooltip = Some(tooltip);
        self.next_id += 1;
        self.objects.push(object);
    }
}

/// Uniform pick among cells not yet occupied.
fn pick_free(
    cells: &[Position],
    occupied: &HashSet<Position>,
    dice: &mut DiceRoller,
) -> Option<Position> {
    let free: Vec<Position> = cells
        .iter()
        .copied()
        .filter(|pos| !occupied.contains(pos))
        .collect();
    dice.pick(&free).copied()
}

/// The zone breakdown of one room's usable cells.
struct RoomZones {
    corner: Vec<Position>,
    wall: Vec<Position>,
    center: Vec<Position>,
    scattered: Vec<Position>,
}

impl RoomZones {
    /// Splits the room's cells (minus blocked door surroundings) into
    /// zones. Corner cells sit within two cells of a bounding-box corner on
    /// both axes; wall cells lie on the boundary; center cells don't.
    fn for_room(room: &Room, blocked: &HashSet<Position>) -> Self {
        let bounds = room.bounds();
        let corners = [
            Position::new(bounds.x, bounds.y),
            Position::new(bounds.right() - 1, bounds.y),
            Position::new(bounds.x, bounds.bottom() - 1),
            Position::new(bounds.right() - 1, bounds.bottom() - 1),
        ];
        let mut zones = RoomZones {
            corner: Vec::new(),
            wall: Vec::new(),
            center: Vec::new(),
            scattered: Vec::new(),
        };
        for pos in room.cells() {
            if blocked.contains(&pos) {
                continue;
            }
            zones.scattered.push(pos);
            let near_corner = corners
                .iter()
                .any(|c| (pos.x - c.x).abs() < 2 && (pos.y - c.y).abs() < 2);
            if near_corner {
                zones.corner.push(pos);
            }
            let on_wall = pos.x == bounds.x
                || pos.x == bounds.right() - 1
                || pos.y == bounds.y
                || pos.y == bounds.bottom() - 1;
            if on_wall {
                zones.wall.push(pos);
            } else {
                zones.center.push(pos);
            }
        }
        zones
    }

    fn cells(&self, zone: PlacementZone) -> &[Position] {
        match zone {
            PlacementZone::Corner => &self.corner,
            PlacementZone::Wall => &self.wall,
            PlacementZone::Center => &self.center,
            PlacementZone::Scattered => &self.scattered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Connection, CorridorCell, CorridorRecord, RoomShape};

    fn room(id: u32, x: i32, y: i32, w: u32, h: u32) -> Room {
        Room::new(id, Position::new(x, y), w, h, RoomShape::Rectangle)
    }

    /// Four rooms in a column: entry (0), two middle rooms, exit (3).
    fn metadata(water_room_ids: Vec<u32>, style: MapStyle) -> DungeonMetadata {
        let rooms = vec![
            room(0, 4, 2, 5, 5),
            room(1, 4, 12, 6, 6),
            room(2, 14, 12, 6, 6),
            room(3, 4, 24, 5, 5),
        ];
        DungeonMetadata {
            rooms,
            connections: vec![
                Connection::new(0, 1, false),
                Connection::new(1, 2, false),
                Connection::new(2, 3, false),
            ],
            grid_width: 40,
            grid_height: 40,
            room_count: 4,
            requested_room_count: 4,
            door_count: 0,
            secret_door_count: 0,
            has_wide_corridors: false,
            has_diagonal_corridors: false,
            entry_room_id: Some(0),
            exit_room_id: Some(3),
            water_room_ids,
            isolated_room_ids: vec![],
            corridor_result: vec![],
            door_positions: vec![],
            style,
        }
    }

    fn kinds_in_room(objects: &[MapObject], room: &Room) -> Vec<ObjectKind> {
        objects
            .iter()
            .filter(|o| room.contains_cell(o.position.x, o.position.y))
            .map(|o| o.kind)
            .collect()
    }

    #[test]
    fn test_entry_and_exit_rooms_are_skipped() {
        let meta = metadata(vec![], MapStyle::Classic);
        let stocking = StockingConfig::new();
        for seed in 0..10 {
            let mut dice = DiceRoller::seeded(seed);
            let objects = stock_dungeon(&meta, &stocking, 0, &mut dice);
            assert!(kinds_in_room(&objects, &meta.rooms[0]).is_empty());
            assert!(kinds_in_room(&objects, &meta.rooms[3]).is_empty());
        }
    }

    #[test]
    fn test_objects_land_on_room_cells_and_ids_are_sequential() {
        let meta = metadata(vec![], MapStyle::Classic);
        let stocking = StockingConfig::new();
        let mut dice = DiceRoller::seeded(11);
        let objects = stock_dungeon(&meta, &stocking, 100, &mut dice);
        for (index, object) in objects.iter().enumerate() {
            assert_eq!(object.id, 100 + index as u32);
            let in_some_room = meta
                .rooms
                .iter()
                .any(|room| room.contains_cell(object.position.x, object.position.y));
            assert!(in_some_room, "{:?} floats outside every room", object);
            assert!(object.custom_tooltip.is_some());
        }
    }

    #[test]
    fn test_no_two_objects_share_a_cell_within_a_room() {
        let meta = metadata(vec![], MapStyle::Fortress);
        let stocking = StockingConfig {
            object_density: 2.0,
            ..StockingConfig::new()
        };
        for seed in 0..10 {
            let mut dice = DiceRoller::seeded(seed);
            let objects = stock_dungeon(&meta, &stocking, 0, &mut dice);
            let mut positions = HashSet::new();
            for object in &objects {
                assert!(
                    positions.insert(object.position),
                    "seed {}: two objects at {:?}",
                    seed,
                    object.position
                );
            }
        }
    }

    #[test]
    fn test_water_rooms_only_hold_aquatic_stock() {
        let allowed: HashSet<ObjectKind> = [
            ObjectKind::Chest,
            ObjectKind::Sack,
            ObjectKind::Monster,
            ObjectKind::Fountain,
            ObjectKind::Statue,
        ]
        .into();
        let meta = metadata(vec![1, 2], MapStyle::Cavern);
        let stocking = StockingConfig::new();
        for seed in 0..20 {
            let mut dice = DiceRoller::seeded(seed);
            let objects = stock_dungeon(&meta, &stocking, 0, &mut dice);
            for water_id in [1u32, 2] {
                let room = &meta.rooms[water_id as usize];
                for kind in kinds_in_room(&objects, room) {
                    assert!(
                        allowed.contains(&kind),
                        "seed {}: {:?} placed in water room",
                        seed,
                        kind
                    );
                }
            }
        }
    }

    #[test]
    fn test_density_scales_object_counts() {
        let meta = metadata(vec![], MapStyle::Classic);
        let sparse = StockingConfig {
            object_density: 0.5,
            ..StockingConfig::new()
        };
        let dense = StockingConfig {
            object_density: 2.0,
            ..StockingConfig::new()
        };
        let mut sparse_total = 0usize;
        let mut dense_total = 0usize;
        for seed in 0..40 {
            let mut dice = DiceRoller::seeded(seed);
            sparse_total += stock_dungeon(&meta, &sparse, 0, &mut dice).len();
            let mut dice = DiceRoller::seeded(seed);
            dense_total += stock_dungeon(&meta, &dense, 0, &mut dice).len();
        }
        assert!(
            dense_total > sparse_total,
            "density 2.0 produced {} objects vs {} at 0.5",
            dense_total,
            sparse_total
        );
    }

    #[test]
    fn test_monster_only_weights_always_stock_creatures() {
        let meta = metadata(vec![], MapStyle::Classic);
        let stocking = StockingConfig {
            monster_weight: 1.0,
            empty_weight: 0.0,
            feature_weight: 0.0,
            trap_weight: 0.0,
            ..StockingConfig::new()
        };
        let creatures: HashSet<ObjectKind> = [
            ObjectKind::Monster,
            ObjectKind::Guard,
            ObjectKind::Boss,
            ObjectKind::BossAlt,
        ]
        .into();
        for seed in 0..10 {
            let mut dice = DiceRoller::seeded(seed);
            let objects = stock_dungeon(&meta, &stocking, 0, &mut dice);
            for middle in [1usize, 2] {
                let kinds = kinds_in_room(&objects, &meta.rooms[middle]);
                assert!(
                    kinds.iter().any(|kind| creatures.contains(kind)),
                    "seed {}: monster-only weights left room {} creatureless",
                    seed,
                    middle
                );
            }
        }
    }

    #[test]
    fn test_corridor_trap_count_follows_formula() {
        let mut meta = metadata(vec![], MapStyle::Classic);
        // A 40-cell corridor strip outside every room.
        let cells: Vec<CorridorCell> = (0..40)
            .map(|i| CorridorCell::full(Position::new(i, 35)))
            .collect();
        meta.corridor_result = vec![CorridorRecord {
            room_a: 0,
            room_b: 3,
            path: vec![],
            width: 1,
            has_diagonals: false,
            dirty: false,
            cells,
        }];
        let stocking = StockingConfig {
            // Stop room stocking from interfering with the count.
            monster_weight: 0.0,
            empty_weight: 1.0,
            feature_weight: 0.0,
            trap_weight: 0.0,
            corridor_trap_chance: 1.0,
            ..StockingConfig::new()
        };
        let mut dice = DiceRoller::seeded(2);
        let objects = stock_dungeon(&meta, &stocking, 0, &mut dice);
        let traps: Vec<&MapObject> = objects
            .iter()
            .filter(|o| o.position.y == 35)
            .collect();
        // floor(40 * 1.0 / 10) = 4 corridor traps.
        assert_eq!(traps.len(), 4);
        for trap in traps {
            assert_eq!(trap.custom_tooltip.as_deref(), Some("Corridor trap"));
        }
    }

    #[test]
    fn test_blocked_door_surroundings_stay_clear() {
        use crate::map::{Alignment, DoorPosition};
        let mut meta = metadata(vec![], MapStyle::Classic);
        // A door on room 1's north wall; its cell and neighbors are off
        // limits.
        let door = Position::new(6, 11);
        meta.door_positions = vec![DoorPosition {
            position: door,
            room_id: 1,
            alignment: Alignment::North,
            kind: ObjectKind::DoorHorizontal,
        }];
        let stocking = StockingConfig {
            object_density: 3.0,
            ..StockingConfig::new()
        };
        for seed in 0..20 {
            let mut dice = DiceRoller::seeded(seed);
            let objects = stock_dungeon(&meta, &stocking, 0, &mut dice);
            let mut forbidden: HashSet<Position> = HashSet::from([door]);
            forbidden.extend(door.cardinal_neighbors());
            for object in objects {
                assert!(
                    !forbidden.contains(&object.position),
                    "seed {}: object on blocked cell {:?}",
                    seed,
                    object.position
                );
            }
        }
    }
}
