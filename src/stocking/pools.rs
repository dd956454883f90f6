//! # Style Pools and Placement Preferences
//!
//! Per-style object pools, the zone preference list of every object kind,
//! and the contextual tooltip table.

use crate::config::MapStyle;
use crate::map::ObjectKind;
use crate::stocking::{PlacementZone, StockCategory};

/// Creatures rolled for monster rooms.
pub fn monster_pool(style: MapStyle) -> &'static [ObjectKind] {
    match style {
        MapStyle::Classic => &[ObjectKind::Monster, ObjectKind::Guard, ObjectKind::Boss],
        MapStyle::Cavern => &[ObjectKind::Monster, ObjectKind::BossAlt],
        MapStyle::Fortress => &[ObjectKind::Guard, ObjectKind::Monster, ObjectKind::Boss],
        MapStyle::Crypt => &[ObjectKind::Monster, ObjectKind::BossAlt],
    }
}

/// Furnishings rolled for feature rooms.
pub fn feature_pool(style: MapStyle) -> &'static [ObjectKind] {
    match style {
        MapStyle::Classic => &[
            ObjectKind::Table,
            ObjectKind::Chair,
            ObjectKind::Statue,
            ObjectKind::Plant,
            ObjectKind::Book,
        ],
        MapStyle::Cavern => &[
            ObjectKind::Plant,
            ObjectKind::Flower,
            ObjectKind::Fountain,
            ObjectKind::Statue,
        ],
        MapStyle::Fortress => &[
            ObjectKind::Anvil,
            ObjectKind::Table,
            ObjectKind::Cage,
            ObjectKind::Crate,
        ],
        MapStyle::Crypt => &[
            ObjectKind::Coffin,
            ObjectKind::Altar,
            ObjectKind::Statue,
            ObjectKind::Cauldron,
        ],
    }
}

/// Hazards rolled for trap rooms and corridors.
pub fn trap_pool(style: MapStyle) -> &'static [ObjectKind] {
    match style {
        MapStyle::Classic => &[ObjectKind::Trap, ObjectKind::Pit],
        MapStyle::Cavern => &[ObjectKind::Pit, ObjectKind::Hazard],
        MapStyle::Fortress => &[ObjectKind::Trap, ObjectKind::Pit],
        MapStyle::Crypt => &[ObjectKind::Poison, ObjectKind::Trap, ObjectKind::Hazard],
    }
}

/// Containers rolled for treasure placements.
pub fn treasure_pool(style: MapStyle) -> &'static [ObjectKind] {
    match style {
        MapStyle::Cavern => &[ObjectKind::Chest, ObjectKind::Sack],
        _ => &[ObjectKind::Chest, ObjectKind::Sack, ObjectKind::Crate],
    }
}

/// Shore finds in water rooms. Nothing here appears in the dry-room
/// furnishing pools, so flooded rooms never grow beds or bookshelves.
pub const SHORE_POOL: [ObjectKind; 3] = [ObjectKind::Chest, ObjectKind::Monster, ObjectKind::Sack];

/// Center-island features for water rooms.
pub const ISLAND_POOL: [ObjectKind; 2] = [ObjectKind::Fountain, ObjectKind::Statue];

/// Ordered zone preferences per object kind. The placer walks the list and
/// takes the first zone with a free cell.
pub fn zone_preferences(kind: ObjectKind) -> &'static [PlacementZone] {
    use PlacementZone::*;
    match kind {
        ObjectKind::Altar | ObjectKind::Cauldron | ObjectKind::Fountain => &[Center],
        ObjectKind::Boss | ObjectKind::BossAlt => &[Center, Scattered],
        ObjectKind::Chest => &[Corner, Wall],
        ObjectKind::Sack | ObjectKind::Crate => &[Corner, Wall, Scattered],
        ObjectKind::Monster | ObjectKind::Guard => &[Scattered, Center],
        ObjectKind::Statue | ObjectKind::Anvil => &[Center, Wall],
        ObjectKind::Table => &[Center],
        ObjectKind::Chair => &[Scattered, Center],
        ObjectKind::Bed => &[Wall, Corner],
        ObjectKind::Coffin => &[Center, Wall],
        ObjectKind::Book => &[Wall, Corner],
        ObjectKind::Cage => &[Corner, Wall],
        ObjectKind::Plant | ObjectKind::Flower => &[Corner, Scattered],
        ObjectKind::Trap | ObjectKind::Hazard | ObjectKind::Poison => &[Scattered, Center],
        ObjectKind::Pit => &[Center, Scattered],
        // Structural kinds are placed explicitly, never through zones.
        _ => &[Scattered],
    }
}

/// Tooltip text for a stocked object.
pub fn tooltip_text(
    category: StockCategory,
    treasure: bool,
    template: Option<&str>,
    corridor: bool,
) -> String {
    if corridor {
        return "Corridor trap".to_string();
    }
    if let Some(name) = template {
        return format!("{} furnishing", name);
    }
    match (category, treasure) {
        (StockCategory::Monster, true) => "Guarded treasure".to_string(),
        (StockCategory::Monster, false) => "Wandering monster".to_string(),
        (StockCategory::Trap, true) => "Bait treasure".to_string(),
        (StockCategory::Trap, false) => "Hidden trap".to_string(),
        (StockCategory::Empty, _) => "Hidden treasure".to_string(),
        (StockCategory::Feature, _) => "Room feature".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRY_ONLY_KINDS: [ObjectKind; 9] = [
        ObjectKind::Table,
        ObjectKind::Chair,
        ObjectKind::Bed,
        ObjectKind::Coffin,
        ObjectKind::Book,
        ObjectKind::Crate,
        ObjectKind::Trap,
        ObjectKind::Pit,
        ObjectKind::Guard,
    ];

    #[test]
    fn test_water_pools_exclude_dry_furnishings() {
        for kind in SHORE_POOL.iter().chain(ISLAND_POOL.iter()) {
            assert!(
                !DRY_ONLY_KINDS.contains(kind),
                "{:?} must not appear in water rooms",
                kind
            );
        }
    }

    #[test]
    fn test_every_pool_is_non_empty() {
        for style in [
            MapStyle::Classic,
            MapStyle::Cavern,
            MapStyle::Fortress,
            MapStyle::Crypt,
        ] {
            assert!(!monster_pool(style).is_empty());
            assert!(!feature_pool(style).is_empty());
            assert!(!trap_pool(style).is_empty());
            assert!(!treasure_pool(style).is_empty());
        }
    }

    #[test]
    fn test_pools_hold_no_structural_kinds() {
        for style in [
            MapStyle::Classic,
            MapStyle::Cavern,
            MapStyle::Fortress,
            MapStyle::Crypt,
        ] {
            for kind in monster_pool(style)
                .iter()
                .chain(feature_pool(style))
                .chain(trap_pool(style))
                .chain(treasure_pool(style))
            {
                assert!(!kind.is_structural());
            }
        }
    }

    #[test]
    fn test_tooltip_contexts() {
        assert_eq!(
            tooltip_text(StockCategory::Monster, true, None, false),
            "Guarded treasure"
        );
        assert_eq!(
            tooltip_text(StockCategory::Empty, true, None, false),
            "Hidden treasure"
        );
        assert_eq!(
            tooltip_text(StockCategory::Feature, false, Some("Library"), false),
            "Library furnishing"
        );
        assert_eq!(
            tooltip_text(StockCategory::Trap, false, None, true),
            "Corridor trap"
        );
    }
}
