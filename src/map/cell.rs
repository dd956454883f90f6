//! # Cells and Wedges
//!
//! Output cells of the generated map, including partial fills.
//!
//! A cell is either a full square or a subset of eight named triangular
//! wedges. Each wedge runs from the cell center to a pair of perimeter
//! vertices at fixed ratios; renderers share the same table so diagonal
//! corridor walls line up as clean 45° edges.

use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// One of the eight triangular subdivisions of a unit cell.
///
/// Naming runs `nw, n, ne` along the top edge clockwise, `e` on the right,
/// `se, s, sw` along the bottom, and `w` on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wedge {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

/// Perimeter vertex pairs per wedge, as `(x, y)` ratios of the unit cell.
/// The triangle's third vertex is always the cell center `(0.5, 0.5)`.
pub const WEDGE_VERTICES: [[(f64, f64); 2]; 8] = [
    [(0.0, 0.0), (0.25, 0.0)],  // nw
    [(0.25, 0.0), (0.75, 0.0)], // n
    [(0.75, 0.0), (1.0, 0.0)],  // ne
    [(1.0, 0.0), (1.0, 1.0)],   // e
    [(1.0, 1.0), (0.75, 1.0)],  // se
    [(0.75, 1.0), (0.25, 1.0)], // s
    [(0.25, 1.0), (0.0, 1.0)],  // sw
    [(0.0, 1.0), (0.0, 0.0)],   // w
];

impl Wedge {
    /// All wedges in mask-bit order.
    pub const ALL: [Wedge; 8] = [
        Wedge::Nw,
        Wedge::N,
        Wedge::Ne,
        Wedge::E,
        Wedge::Se,
        Wedge::S,
        Wedge::Sw,
        Wedge::W,
    ];

    /// Mask bit index of this wedge.
    pub fn bit(self) -> u8 {
        match self {
            Wedge::Nw => 0,
            Wedge::N => 1,
            Wedge::Ne => 2,
            Wedge::E => 3,
            Wedge::Se => 4,
            Wedge::S => 5,
            Wedge::Sw => 6,
            Wedge::W => 7,
        }
    }

    /// Wire name of this wedge.
    pub fn name(self) -> &'static str {
        match self {
            Wedge::Nw => "nw",
            Wedge::N => "n",
            Wedge::Ne => "ne",
            Wedge::E => "e",
            Wedge::Se => "se",
            Wedge::S => "s",
            Wedge::Sw => "sw",
            Wedge::W => "w",
        }
    }

    /// Parses a wire name back into a wedge.
    pub fn from_name(name: &str) -> Option<Wedge> {
        Wedge::ALL.into_iter().find(|w| w.name() == name)
    }

    /// Perimeter vertex pair of this wedge's triangle.
    pub fn vertices(self) -> [(f64, f64); 2] {
        WEDGE_VERTICES[self.bit() as usize]
    }
}

/// A set of wedges, bit-packed into a single byte.
///
/// Serializes on the wire as a map of wedge names to `true`, matching the
/// renderer's segment format.
///
/// # Examples
///
/// ```
/// use delve::{SegmentSet, Wedge};
///
/// let set = SegmentSet::of(&[Wedge::Ne, Wedge::E]);
/// assert!(set.contains(Wedge::Ne));
/// assert!(!set.contains(Wedge::Sw));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SegmentSet(u8);

impl SegmentSet {
    /// The empty set.
    pub fn empty() -> Self {
        SegmentSet(0)
    }

    /// Builds a set from a list of wedges.
    pub fn of(wedges: &[Wedge]) -> Self {
        let mut set = SegmentSet::empty();
        for wedge in wedges {
            set.insert(*wedge);
        }
        set
    }

    /// Adds a wedge to the set.
    pub fn insert(&mut self, wedge: Wedge) {
        self.0 |= 1 << wedge.bit();
    }

    /// Whether the set contains a wedge.
    pub fn contains(self, wedge: Wedge) -> bool {
        self.0 & (1 << wedge.bit()) != 0
    }

    /// Union of two sets.
    pub fn union(self, other: SegmentSet) -> SegmentSet {
        SegmentSet(self.0 | other.0)
    }

    /// Whether no wedges are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of wedges in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the wedges in mask-bit order.
    pub fn iter(self) -> impl Iterator<Item = Wedge> {
        Wedge::ALL.into_iter().filter(move |w| self.contains(*w))
    }
}

impl Serialize for SegmentSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for wedge in self.iter() {
            map.serialize_entry(wedge.name(), &true)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SegmentSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, bool>::deserialize(deserializer)?;
        let mut set = SegmentSet::empty();
        for (name, present) in entries {
            let wedge = Wedge::from_name(&name)
                .ok_or_else(|| D::Error::custom(format!("unknown wedge name: {}", name)))?;
            if present {
                set.insert(wedge);
            }
        }
        Ok(set)
    }
}

/// One cell of the generated map.
///
/// A cell without `segments` is a full fill; with `segments` only the named
/// wedges are painted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    /// Fill color as a CSS hex string.
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub segments: Option<SegmentSet>,
}

impl Cell {
    /// A fully-filled cell.
    pub fn full(x: i32, y: i32, color: &str) -> Self {
        Self {
            x,
            y,
            color: color.to_string(),
            opacity: None,
            segments: None,
        }
    }

    /// A partially-filled cell showing only the given wedges.
    pub fn segmented(x: i32, y: i32, color: &str, segments: SegmentSet) -> Self {
        Self {
            x,
            y,
            color: color.to_string(),
            opacity: None,
            segments: Some(segments),
        }
    }

    /// Whether this cell is a full fill.
    pub fn is_full(&self) -> bool {
        self.segments.is_none()
    }
}
