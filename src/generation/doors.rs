//! # Door Inference
//!
//! Walks every corridor centerline, detects where it crosses a room
//! boundary, and turns contiguous runs of crossings into doors.
//!
//! Containment uses the shape-aware room test so circular and composite
//! rooms produce doors on their actual boundary rather than the bounding
//! box.

use crate::map::{Alignment, CorridorRecord, ObjectKind, Position, Room};
use crate::rng::DiceRoller;
use log::debug;
use std::collections::{HashMap, HashSet};

/// A door the inference pass decided to materialize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferredDoor {
    pub position: Position,
    pub room_id: u32,
    pub alignment: Alignment,
    pub kind: ObjectKind,
    pub scale: f64,
    pub rotation: f64,
}

/// A boundary crossing before grouping and the materialization rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DoorCandidate {
    position: Position,
    room_id: u32,
    alignment: Alignment,
    vertical: bool,
}

/// Infers doors for all corridors.
///
/// Per entrance group (a 4-connected run of candidates sharing room and
/// alignment) a single `door_chance` roll decides materialization and a
/// single `secret_door_chance` roll upgrades the whole group to secret
/// doors. Groups of two or more cells get grander doors (`scale` 1.2).
pub fn infer_doors(
    rooms: &[Room],
    corridors: &[CorridorRecord],
    door_chance: f64,
    secret_door_chance: f64,
    dice: &mut DiceRoller,
) -> Vec<InferredDoor> {
    let mut candidates: Vec<DoorCandidate> = Vec::new();
    let mut seen: HashSet<DoorCandidate> = HashSet::new();

    for record in corridors {
        let Some(room_a) = rooms.iter().find(|room| room.id == record.room_a) else {
            continue;
        };
        let Some(room_b) = rooms.iter().find(|room| room.id == record.room_b) else {
            continue;
        };
        for candidate in walk_centerline(record, room_a, room_b) {
            if is_valid(&candidate, rooms) && seen.insert(candidate) {
                candidates.push(candidate);
            }
        }
    }

    let groups = group_candidates(candidates);
    let mut doors = Vec::new();
    for group in groups {
        if !dice.chance(door_chance) {
            continue;
        }
        let secret = dice.chance(secret_door_chance);
        let scale = if group.len() >= 2 { 1.2 } else { 1.0 };
        for candidate in &group {
            let kind = if secret {
                ObjectKind::SecretDoor
            } else if candidate.vertical {
                ObjectKind::DoorVertical
            } else {
                ObjectKind::DoorHorizontal
            };
            doors.push(InferredDoor {
                position: candidate.position,
                room_id: candidate.room_id,
                alignment: candidate.alignment,
                kind,
                scale,
                rotation: door_rotation(kind, candidate.vertical, candidate.alignment),
            });
        }
    }
    debug!("materialized {} doors", doors.len());
    doors
}

/// Walks one centerline pairwise and records exit/entry crossings,
/// spreading each crossing perpendicular to travel for wide corridors.
fn walk_centerline(record: &CorridorRecord, room_a: &Room, room_b: &Room) -> Vec<DoorCandidate> {
    let mut found = Vec::new();
    for pair in record.path.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let delta = curr - prev;
        let vertical_door = delta.x != 0 && delta.y == 0;

        let prev_in_a = room_a.contains_cell(prev.x, prev.y);
        let curr_in_a = room_a.contains_cell(curr.x, curr.y);
        if prev_in_a && !curr_in_a {
            // Exiting room A: the door sits on the first outside cell, facing
            // back the way we came.
            push_spread(
                &mut found,
                curr,
                delta,
                record.width,
                DoorCandidate {
                    position: curr,
                    room_id: room_a.id,
                    alignment: Alignment::from_delta(-delta.x, -delta.y),
                    vertical: vertical_door,
                },
            );
        }

        let prev_in_b = room_b.contains_cell(prev.x, prev.y);
        let curr_in_b = room_b.contains_cell(curr.x, curr.y);
        if !prev_in_b && curr_in_b {
            // Entering room B: the door sits on the last outside cell, facing
            // the direction of travel.
            push_spread(
                &mut found,
                prev,
                delta,
                record.width,
                DoorCandidate {
                    position: prev,
                    room_id: room_b.id,
                    alignment: Alignment::from_delta(delta.x, delta.y),
                    vertical: vertical_door,
                },
            );
        }
    }
    found
}

/// Emits the candidate plus its width-spread copies perpendicular to
/// travel.
fn push_spread(
    found: &mut Vec<DoorCandidate>,
    origin: Position,
    delta: Position,
    width: u32,
    template: DoorCandidate,
) {
    let perpendicular = if delta.x != 0 {
        Position::new(0, 1)
    } else {
        Position::new(1, 0)
    };
    for offset in 0..width as i32 {
        found.push(DoorCandidate {
            position: Position::new(
                origin.x + perpendicular.x * offset,
                origin.y + perpendicular.y * offset,
            ),
            ..template
        });
    }
}

/// A candidate must actually touch its room; diagonal entries can leave
/// floating crossings with no shared wall.
fn is_valid(candidate: &DoorCandidate, rooms: &[Room]) -> bool {
    let Some(room) = rooms.iter().find(|room| room.id == candidate.room_id) else {
        return false;
    };
    if room.contains_cell(candidate.position.x, candidate.position.y) {
        return false;
    }
    candidate
        .position
        .cardinal_neighbors()
        .iter()
        .any(|n| room.contains_cell(n.x, n.y))
}

/// Groups candidates by `(room, alignment)` and splits each group into
/// 4-connected runs in `(x, y)` order.
fn group_candidates(candidates: Vec<DoorCandidate>) -> Vec<Vec<DoorCandidate>> {
    let mut by_key: HashMap<(u32, Alignment), Vec<DoorCandidate>> = HashMap::new();
    for candidate in candidates {
        by_key
            .entry((candidate.room_id, candidate.alignment))
            .or_default()
            .push(candidate);
    }

    let mut keys: Vec<(u32, Alignment)> = by_key.keys().copied().collect();
    keys.sort_by_key(|(room_id, alignment)| (*room_id, *alignment as u8));

    let mut groups = Vec::new();
    for key in keys {
        let mut members = by_key.remove(&key).unwrap_or_default();
        members.sort_by_key(|candidate| (candidate.position.x, candidate.position.y));
        let mut run: Vec<DoorCandidate> = Vec::new();
        for candidate in members {
            let contiguous = run
                .iter()
                .any(|other| other.position.is_cardinal_neighbor(candidate.position));
            if run.is_empty() || contiguous {
                run.push(candidate);
            } else {
                groups.push(std::mem::take(&mut run));
                run.push(candidate);
            }
        }
        if !run.is_empty() {
            groups.push(run);
        }
    }
    groups
}

/// Sprite rotation: diagonal alignments tilt ±45°, and secret doors of
/// vertical type on an east/west wall stand upright at 90°.
fn door_rotation(kind: ObjectKind, vertical: bool, alignment: Alignment) -> f64 {
    match alignment {
        Alignment::Ne | Alignment::Sw => 45.0,
        Alignment::Nw | Alignment::Se => -45.0,
        Alignment::East | Alignment::West
            if kind == ObjectKind::SecretDoor && vertical =>
        {
            90.0
        }
        _ => 0.0,
    }
}
