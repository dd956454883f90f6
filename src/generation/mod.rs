//! # Generation Module
//!
//! The two-stage dungeon pipeline and its entry points.
//!
//! Layout phases run strictly forward — rooms, connections, corridors,
//! doors, stairs and water, cell materialization — and hand their results
//! to the stocking stage. [`generate`] runs everything; [`restock`] re-runs
//! stocking alone on stored metadata.

pub mod cells;
pub mod connections;
pub mod corridors;
pub mod doors;
pub mod rooms;
pub mod stairs;

pub use cells::*;
pub use connections::*;
pub use corridors::*;
pub use doors::*;
pub use rooms::*;
pub use stairs::*;

use crate::config::{
    resolve_config, GenerationConfig, GenerationOverrides, MapStyle, SizePreset, StockingConfig,
};
use crate::map::{DoorPosition, DungeonArtifact, DungeonMetadata, MapObject};
use crate::rng::DiceRoller;
use crate::stocking::stock_dungeon;
use crate::DelveResult;
use log::info;

/// Generates a complete dungeon artifact from a resolved configuration.
///
/// This is a pure function of `(config, stocking, dice)`: the same inputs
/// replay the same artifact cell for cell and object for object. Only an
/// invalid configuration fails; every generation shortfall is reported in
/// the artifact's metadata instead.
pub fn generate(
    config: &GenerationConfig,
    stocking: &StockingConfig,
    dice: &mut DiceRoller,
) -> DelveResult<DungeonArtifact> {
    config.validate()?;
    stocking.validate()?;

    let placement = rooms::RoomGenerator::new(config).place_rooms(dice);
    let rooms = placement.rooms;
    info!("layout: {} rooms", rooms.len());

    let connection_result = connections::build_connections(&rooms, config.loop_chance, dice);
    let corridor_result = corridors::CorridorCarver::new(config, &rooms)
        .carve_all(&connection_result.connections, dice);
    let doors = doors::infer_doors(
        &rooms,
        &corridor_result,
        config.door_chance,
        config.secret_door_chance,
        dice,
    );
    let stair_water = stairs::place_stairs_and_water(&rooms, config, dice);
    let cells =
        cells::materialize_cells(&rooms, &corridor_result, &stair_water.water_cells, config);

    // Structural objects first: doors, then stairs.
    let mut objects: Vec<MapObject> = Vec::new();
    let mut next_id = 0u32;
    for door in &doors {
        let mut object = MapObject::new(next_id, door.kind, door.position);
        object.alignment = door.alignment;
        object.scale = door.scale;
        object.rotation = door.rotation;
        objects.push(object);
        next_id += 1;
    }
    for (kind, position) in &stair_water.stairs {
        objects.push(MapObject::new(next_id, *kind, *position));
        next_id += 1;
    }

    let door_positions: Vec<DoorPosition> = doors
        .iter()
        .map(|door| DoorPosition {
            position: door.position,
            room_id: door.room_id,
            alignment: door.alignment,
            kind: door.kind,
        })
        .collect();
    let secret_door_count = doors
        .iter()
        .filter(|door| door.kind == crate::map::ObjectKind::SecretDoor)
        .count() as u32;

    let metadata = DungeonMetadata {
        room_count: rooms.len() as u32,
        requested_room_count: placement.requested_count,
        rooms,
        connections: connection_result.connections,
        grid_width: config.grid_width,
        grid_height: config.grid_height,
        door_count: doors.len() as u32,
        secret_door_count,
        has_wide_corridors: corridor_result.iter().any(|record| record.width >= 2),
        has_diagonal_corridors: corridor_result.iter().any(|record| record.has_diagonals),
        entry_room_id: stair_water.entry_room_id,
        exit_room_id: stair_water.exit_room_id,
        water_room_ids: stair_water.water_room_ids,
        isolated_room_ids: connection_result.isolated_room_ids,
        corridor_result,
        door_positions,
        style: config.style,
    };

    objects.extend(stock_dungeon(&metadata, stocking, next_id, dice));
    info!("artifact: {} cells, {} objects", cells.len(), objects.len());

    Ok(DungeonArtifact {
        cells,
        objects,
        metadata,
    })
}

/// Convenience wrapper: resolves `preset ∪ style ∪ overrides`, seeds a
/// roller, and generates.
pub fn generate_seeded(
    preset: SizePreset,
    style: MapStyle,
    overrides: Option<&GenerationOverrides>,
    stocking: &StockingConfig,
    seed: u64,
) -> DelveResult<DungeonArtifact> {
    let config = resolve_config(preset, style, overrides)?;
    let mut dice = DiceRoller::seeded(seed);
    generate(&config, stocking, &mut dice)
}

/// Objects-only re-roll.
///
/// Re-runs the stocking stage against stored metadata with an updated
/// stocking configuration. The caller's structural objects (doors and
/// stairs) are preserved verbatim at the head of the result; stocked ids
/// continue after the highest structural id.
pub fn restock(
    metadata: &DungeonMetadata,
    structural_objects: &[MapObject],
    stocking: &StockingConfig,
    dice: &mut DiceRoller,
) -> DelveResult<Vec<MapObject>> {
    stocking.validate()?;
    let next_id = structural_objects
        .iter()
        .map(|object| object.id + 1)
        .max()
        .unwrap_or(0);
    let mut objects = structural_objects.to_vec();
    objects.extend(stock_dungeon(metadata, stocking, next_id, dice));
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomCountRange;
    use crate::map::ObjectKind;

    #[test]
    fn test_generate_small_classic_smoke() {
        let artifact = generate_seeded(
            SizePreset::Small,
            MapStyle::Classic,
            None,
            &StockingConfig::default(),
            42,
        )
        .expect("generation must succeed");
        let meta = &artifact.metadata;
        assert!(meta.room_count >= 1);
        assert!(!artifact.cells.is_empty());
        assert!(meta.entry_room_id.is_some());
        assert!(meta.exit_room_id.is_some());
    }

    #[test]
    fn test_generate_is_deterministic() {
        let stocking = StockingConfig::default();
        let a = generate_seeded(SizePreset::Medium, MapStyle::Cavern, None, &stocking, 7)
            .expect("generation must succeed");
        let b = generate_seeded(SizePreset::Medium, MapStyle::Cavern, None, &stocking, 7)
            .expect("generation must succeed");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let stocking = StockingConfig::default();
        let a = generate_seeded(SizePreset::Small, MapStyle::Classic, None, &stocking, 1)
            .expect("generation must succeed");
        let b = generate_seeded(SizePreset::Small, MapStyle::Classic, None, &stocking, 2)
            .expect("generation must succeed");
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_config_is_the_only_failure() {
        let overrides = GenerationOverrides {
            corridor_width: Some(5),
            ..GenerationOverrides::default()
        };
        let result = generate_seeded(
            SizePreset::Small,
            MapStyle::Classic,
            Some(&overrides),
            &StockingConfig::default(),
            1,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_single_room_degenerate() {
        let overrides = GenerationOverrides {
            room_count: Some(RoomCountRange { min: 1, max: 1 }),
            ..GenerationOverrides::default()
        };
        let artifact = generate_seeded(
            SizePreset::Small,
            MapStyle::Classic,
            Some(&overrides),
            &StockingConfig::default(),
            9,
        )
        .expect("generation must succeed");
        assert!(artifact.metadata.connections.is_empty());
        let stairs_down = artifact
            .objects
            .iter()
            .filter(|o| o.kind == ObjectKind::StairsDown)
            .count();
        let stairs_up = artifact
            .objects
            .iter()
            .filter(|o| o.kind == ObjectKind::StairsUp)
            .count();
        assert_eq!(stairs_down, 1);
        assert_eq!(stairs_up, 1);
        let doors = artifact
            .objects
            .iter()
            .filter(|o| {
                matches!(
                    o.kind,
                    ObjectKind::DoorHorizontal | ObjectKind::DoorVertical | ObjectKind::SecretDoor
                )
            })
            .count();
        assert_eq!(doors, 0);
    }

    #[test]
    fn test_restock_preserves_structural_objects() {
        let artifact = generate_seeded(
            SizePreset::Medium,
            MapStyle::Classic,
            None,
            &StockingConfig::default(),
            31,
        )
        .expect("generation must succeed");
        let structural = artifact.structural_objects();
        let mut dice = DiceRoller::seeded(99);
        let restocked = restock(
            &artifact.metadata,
            &structural,
            &StockingConfig::default(),
            &mut dice,
        )
        .expect("restock must succeed");
        let restocked_structural: Vec<MapObject> = restocked
            .iter()
            .filter(|object| object.kind.is_structural())
            .cloned()
            .collect();
        assert_eq!(restocked_structural, structural);
        // Stocked ids continue after the structural ids.
        let max_structural = structural.iter().map(|o| o.id).max().unwrap_or(0);
        assert!(restocked
            .iter()
            .filter(|o| !o.kind.is_structural())
            .all(|o| o.id > max_structural));
    }
}
