//! # Room Templates
//!
//! Named furnishing recipes applied to feature rooms: each template is a
//! list of object kinds with a count range and a preferred zone, plus the
//! smallest room it fits.

use crate::map::ObjectKind;
use crate::stocking::PlacementZone;

/// One line of a template: a kind, how many to roll, and where they go.
#[derive(Debug, Clone, Copy)]
pub struct TemplateItem {
    pub kind: ObjectKind,
    pub min: u32,
    pub max: u32,
    pub zone: PlacementZone,
}

/// A named furnishing recipe.
#[derive(Debug, Clone, Copy)]
pub struct RoomTemplate {
    pub name: &'static str,
    /// Smallest room cell count the template reads well in.
    pub min_room_size: usize,
    pub items: &'static [TemplateItem],
}

const fn item(kind: ObjectKind, min: u32, max: u32, zone: PlacementZone) -> TemplateItem {
    TemplateItem {
        kind,
        min,
        max,
        zone,
    }
}

/// The template library.
pub const TEMPLATES: [RoomTemplate; 6] = [
    RoomTemplate {
        name: "Library",
        min_room_size: 9,
        items: &[
            item(ObjectKind::Book, 2, 4, PlacementZone::Wall),
            item(ObjectKind::Table, 1, 2, PlacementZone::Center),
            item(ObjectKind::Chair, 1, 3, PlacementZone::Scattered),
        ],
    },
    RoomTemplate {
        name: "Storage",
        min_room_size: 9,
        items: &[
            item(ObjectKind::Crate, 2, 5, PlacementZone::Corner),
            item(ObjectKind::Sack, 1, 3, PlacementZone::Wall),
            item(ObjectKind::Chest, 0, 1, PlacementZone::Corner),
        ],
    },
    RoomTemplate {
        name: "Shrine",
        min_room_size: 9,
        items: &[
            item(ObjectKind::Altar, 1, 1, PlacementZone::Center),
            item(ObjectKind::Statue, 0, 2, PlacementZone::Wall),
            item(ObjectKind::Book, 0, 1, PlacementZone::Wall),
        ],
    },
    RoomTemplate {
        name: "Barracks",
        min_room_size: 12,
        items: &[
            item(ObjectKind::Bed, 2, 4, PlacementZone::Wall),
            item(ObjectKind::Table, 0, 1, PlacementZone::Center),
            item(ObjectKind::Chest, 0, 1, PlacementZone::Corner),
        ],
    },
    RoomTemplate {
        name: "Treasury",
        min_room_size: 9,
        items: &[
            item(ObjectKind::Chest, 1, 3, PlacementZone::Corner),
            item(ObjectKind::Sack, 1, 2, PlacementZone::Wall),
            item(ObjectKind::Guard, 1, 2, PlacementZone::Scattered),
        ],
    },
    RoomTemplate {
        name: "Guard Room",
        min_room_size: 9,
        items: &[
            item(ObjectKind::Guard, 2, 3, PlacementZone::Scattered),
            item(ObjectKind::Table, 0, 1, PlacementZone::Center),
            item(ObjectKind::Cage, 0, 1, PlacementZone::Corner),
        ],
    },
];

/// Templates whose size floor fits a room of `cell_count` cells.
pub fn valid_templates(cell_count: usize) -> Vec<&'static RoomTemplate> {
    TEMPLATES
        .iter()
        .filter(|template| template.min_room_size <= cell_count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_has_six_templates() {
        assert_eq!(TEMPLATES.len(), 6);
        let names: Vec<&str> = TEMPLATES.iter().map(|t| t.name).collect();
        assert!(names.contains(&"Library"));
        assert!(names.contains(&"Guard Room"));
    }

    #[test]
    fn test_count_ranges_are_ordered() {
        for template in &TEMPLATES {
            for item in template.items {
                assert!(item.min <= item.max, "{} has inverted range", template.name);
            }
            // Every template guarantees at least one object.
            assert!(template.items.iter().any(|item| item.min > 0));
        }
    }

    #[test]
    fn test_size_filter() {
        let small = valid_templates(9);
        assert!(small.iter().all(|t| t.min_room_size <= 9));
        assert!(!small.iter().any(|t| t.name == "Barracks"));
        let large = valid_templates(30);
        assert_eq!(large.len(), TEMPLATES.len());
        assert!(valid_templates(4).is_empty());
    }
}
