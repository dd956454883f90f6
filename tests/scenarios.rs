//! Fixed end-to-end scenarios: style contracts, degenerate shapes, and the
//! determinism and re-stock laws.

use delve::{
    generate_seeded, restock, DiceRoller, GenerationOverrides, MapStyle, ObjectKind,
    RoomCountRange, RoomShape, SizePreset, StockingConfig,
};
use std::collections::HashSet;

#[test]
fn small_classic_fixed_seed() {
    let artifact = generate_seeded(
        SizePreset::Small,
        MapStyle::Classic,
        None,
        &StockingConfig::default(),
        42,
    )
    .expect("generation must succeed");
    let meta = &artifact.metadata;

    assert!(
        (3..=5).contains(&meta.room_count),
        "small preset rolled {} rooms",
        meta.room_count
    );
    // The small preset never widens corridors or cuts diagonals.
    assert!(meta.corridor_result.iter().all(|record| record.width == 1));
    assert!(!meta.has_wide_corridors);
    assert!(!meta.has_diagonal_corridors);
    // One stair pair.
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
    assert_eq!((stairs_down, stairs_up), (1, 1));
}

#[test]
fn medium_cavern_has_no_doors_and_favors_circles() {
    let mut rooms_total = 0usize;
    let mut circles_total = 0usize;
    let mut any_wobble = false;

    for seed in 0..20u64 {
        let artifact = generate_seeded(
            SizePreset::Medium,
            MapStyle::Cavern,
            None,
            &StockingConfig::default(),
            seed,
        )
        .expect("generation must succeed");
        let meta = &artifact.metadata;

        // doorChance 0 is absolute: no door objects, no door metadata.
        assert_eq!(meta.door_count, 0);
        assert!(meta.door_positions.is_empty());
        assert!(!artifact.objects.iter().any(|o| matches!(
            o.kind,
            ObjectKind::DoorHorizontal | ObjectKind::DoorVertical | ObjectKind::SecretDoor
        )));

        rooms_total += meta.rooms.len();
        circles_total += meta
            .rooms
            .iter()
            .filter(|room| matches!(room.shape, RoomShape::Circle { .. }))
            .count();

        // Organic corridors wobble: some centerline step leaves the
        // orthogonal grid.
        any_wobble |= meta.corridor_result.iter().any(|record| {
            record
                .path
                .windows(2)
                .any(|pair| (pair[1].x - pair[0].x) != 0 && (pair[1].y - pair[0].y) != 0)
        });
    }

    let circle_share = circles_total as f64 / rooms_total as f64;
    assert!(
        circle_share >= 0.4,
        "circleChance 0.6 produced only {:.0}% circles",
        100.0 * circle_share
    );
    assert!(any_wobble, "no organic corridor wobbled across 20 seeds");
}

#[test]
fn large_fortress_is_square_and_wide() {
    let mut corridors_total = 0usize;
    let mut wide_total = 0usize;

    for seed in 100..110u64 {
        let artifact = generate_seeded(
            SizePreset::Large,
            MapStyle::Fortress,
            None,
            &StockingConfig::default(),
            seed,
        )
        .expect("generation must succeed");
        let meta = &artifact.metadata;

        // circleChance 0: no round rooms, ever.
        assert!(meta
            .rooms
            .iter()
            .all(|room| !matches!(room.shape, RoomShape::Circle { .. })));
        // doorChance 0.95 over a dozen corridors: doors all but certain.
        assert!(meta.door_count > 0, "seed {} placed no doors", seed);

        corridors_total += meta.corridor_result.len();
        wide_total += meta
            .corridor_result
            .iter()
            .filter(|record| record.width == 2)
            .count();
    }

    let wide_share = wide_total as f64 / corridors_total as f64;
    assert!(
        wide_share >= 0.5,
        "wideCorridorChance 0.7 produced only {:.0}% wide corridors",
        100.0 * wide_share
    );
}

#[test]
fn single_room_dungeon_degenerates_cleanly() {
    let overrides = GenerationOverrides {
        room_count: Some(RoomCountRange { min: 1, max: 1 }),
        ..GenerationOverrides::default()
    };
    for seed in 0..10u64 {
        let artifact = generate_seeded(
            SizePreset::Small,
            MapStyle::Classic,
            Some(&overrides),
            &StockingConfig::default(),
            seed,
        )
        .expect("generation must succeed");
        let meta = &artifact.metadata;
        assert!(meta.connections.is_empty());
        assert!(meta.corridor_result.is_empty());
        assert_eq!(meta.door_count, 0);
        assert_eq!(meta.entry_room_id, meta.exit_room_id);
        let kinds: Vec<ObjectKind> = artifact
            .objects
            .iter()
            .filter(|o| o.kind.is_structural())
            .map(|o| o.kind)
            .collect();
        assert!(kinds.contains(&ObjectKind::StairsDown));
        assert!(kinds.contains(&ObjectKind::StairsUp));
    }
}

#[test]
fn generate_is_deterministic_cell_for_cell() {
    for (preset, style) in [
        (SizePreset::Small, MapStyle::Crypt),
        (SizePreset::Medium, MapStyle::Fortress),
        (SizePreset::Large, MapStyle::Cavern),
    ] {
        let a = generate_seeded(preset, style, None, &StockingConfig::default(), 1234)
            .expect("generation must succeed");
        let b = generate_seeded(preset, style, None, &StockingConfig::default(), 1234)
            .expect("generation must succeed");
        assert_eq!(a.cells, b.cells);
        assert_eq!(a.objects, b.objects);
        assert_eq!(a.metadata, b.metadata);
    }
}

#[test]
fn restock_density_scales_object_volume() {
    let sparse_config = StockingConfig {
        object_density: 0.5,
        ..StockingConfig::default()
    };
    let dense_config = StockingConfig {
        object_density: 2.0,
        ..StockingConfig::default()
    };

    let mut sparse_total = 0usize;
    let mut dense_total = 0usize;
    for seed in 0..30u64 {
        let artifact = generate_seeded(
            SizePreset::Medium,
            MapStyle::Classic,
            None,
            &StockingConfig::default(),
            seed,
        )
        .expect("generation must succeed");
        let structural = artifact.structural_objects();

        let mut dice = DiceRoller::seeded(seed.wrapping_add(1000));
        let sparse = restock(&artifact.metadata, &structural, &sparse_config, &mut dice)
            .expect("restock must succeed");
        let mut dice = DiceRoller::seeded(seed.wrapping_add(1000));
        let dense = restock(&artifact.metadata, &structural, &dense_config, &mut dice)
            .expect("restock must succeed");

        sparse_total += sparse.iter().filter(|o| !o.kind.is_structural()).count();
        dense_total += dense.iter().filter(|o| !o.kind.is_structural()).count();
    }
    assert!(
        dense_total > sparse_total,
        "density 2.0 stocked {} objects vs {} at 0.5",
        dense_total,
        sparse_total
    );
}

#[test]
fn saturated_water_rooms_hold_only_aquatic_stock() {
    let overrides = GenerationOverrides {
        water_chance: Some(1.0),
        ..GenerationOverrides::default()
    };
    let forbidden: HashSet<ObjectKind> = [
        ObjectKind::Table,
        ObjectKind::Chair,
        ObjectKind::Bed,
        ObjectKind::Coffin,
        ObjectKind::Book,
        ObjectKind::Crate,
        ObjectKind::Trap,
        ObjectKind::Pit,
        ObjectKind::Guard,
    ]
    .into();

    for seed in 0..10u64 {
        let artifact = generate_seeded(
            SizePreset::Medium,
            MapStyle::Classic,
            Some(&overrides),
            &StockingConfig::default(),
            seed,
        )
        .expect("generation must succeed");
        let meta = &artifact.metadata;
        if meta.rooms.len() < 3 {
            continue;
        }
        // Every non-entry/exit room floods.
        for room in &meta.rooms {
            let special =
                Some(room.id) == meta.entry_room_id || Some(room.id) == meta.exit_room_id;
            assert_eq!(
                meta.water_room_ids.contains(&room.id),
                !special,
                "seed {}: room {} water assignment wrong",
                seed,
                room.id
            );
        }
        // Flooded rooms never grow dry-room furnishings or floor traps.
        for water_id in &meta.water_room_ids {
            let room = meta.rooms.iter().find(|r| r.id == *water_id).unwrap();
            for object in &artifact.objects {
                if room.contains_cell(object.position.x, object.position.y) {
                    assert!(
                        !forbidden.contains(&object.kind),
                        "seed {}: {:?} in water room {}",
                        seed,
                        object.kind,
                        water_id
                    );
                }
            }
        }
    }
}

#[test]
fn crypt_style_rolls_diagonal_corridors() {
    // diagonalCorridorChance 0.25 across many seeds: at least one diagonal
    // corridor somewhere.
    let found = (0..30u64).any(|seed| {
        let artifact = generate_seeded(
            SizePreset::Large,
            MapStyle::Crypt,
            None,
            &StockingConfig::default(),
            seed,
        )
        .expect("generation must succeed");
        artifact.metadata.has_diagonal_corridors
    });
    assert!(found, "no diagonal corridor in 30 crypt seeds");
}
