//! # Connection Graph
//!
//! Builds the room connection graph: a Prim-style minimum spanning tree
//! over inter-center distances, then optional loop edges.

use crate::map::{Connection, Room};
use crate::rng::DiceRoller;
use log::debug;
use pathfinding::undirected::connected_components::components;

/// Result of the connection phase.
#[derive(Debug, Clone)]
pub struct ConnectionResult {
    /// Spanning edges first, then loop edges in distance order.
    pub connections: Vec<Connection>,
    /// Rooms unreachable from room 0. Empty in practice, since the
    /// candidate edge set is complete; carried for metadata either way.
    pub isolated_room_ids: Vec<u32>,
}

/// Builds the connection graph for the placed rooms.
///
/// The MST grows from room 0; distance ties break on the lexicographic
/// room-id pair. Every non-tree edge then joins independently with
/// `loop_chance`, visited in distance-sorted order.
pub fn build_connections(
    rooms: &[Room],
    loop_chance: f64,
    dice: &mut DiceRoller,
) -> ConnectionResult {
    if rooms.len() < 2 {
        return ConnectionResult {
            connections: Vec::new(),
            isolated_room_ids: Vec::new(),
        };
    }

    let n = rooms.len();
    let distance = |i: usize, j: usize| rooms[i].center().euclidean_distance(rooms[j].center());

    // Prim's algorithm from room 0 over the complete distance matrix.
    let mut in_tree = vec![false; n];
    in_tree[0] = true;
    let mut mst: Vec<(usize, usize)> = Vec::with_capacity(n - 1);
    while mst.len() < n - 1 {
        let mut best: Option<(f64, usize, usize)> = None;
        for i in 0..n {
            if !in_tree[i] {
                continue;
            }
            for j in 0..n {
                if in_tree[j] {
                    continue;
                }
                let (lo, hi) = (i.min(j), i.max(j));
                let d = distance(lo, hi);
                let candidate = (d, lo, hi);
                let better = match best {
                    None => true,
                    Some((bd, bl, bh)) => {
                        d < bd || (d == bd && (lo, hi) < (bl, bh))
                    }
                };
                if better {
                    best = Some(candidate);
                }
            }
        }
        let Some((_, lo, hi)) = best else {
            break; // no edge can extend the tree
        };
        let joined = if in_tree[lo] { hi } else { lo };
        in_tree[joined] = true;
        mst.push((lo, hi));
    }

    let mut connections: Vec<Connection> = mst
        .iter()
        .map(|&(a, b)| Connection::new(rooms[a].id, rooms[b].id, false))
        .collect();

    // Loop edges: every non-MST pair in distance order, each rolled
    // independently.
    let mst_set: std::collections::HashSet<(usize, usize)> = mst.into_iter().collect();
    let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if !mst_set.contains(&(i, j)) {
                candidates.push((distance(i, j), i, j));
            }
        }
    }
    candidates.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (a.1, a.2).cmp(&(b.1, b.2)))
    });
    for (_, i, j) in candidates {
        if dice.chance(loop_chance) {
            connections.push(Connection::new(rooms[i].id, rooms[j].id, true));
        }
    }

    let isolated_room_ids = find_isolated(rooms, &connections);
    debug!(
        "connected {} rooms with {} edges ({} isolated)",
        n,
        connections.len(),
        isolated_room_ids.len()
    );

    ConnectionResult {
        connections,
        isolated_room_ids,
    }
}

/// Audits reachability from room 0 over the final edge set.
fn find_isolated(rooms: &[Room], connections: &[Connection]) -> Vec<u32> {
    if rooms.is_empty() {
        return Vec::new();
    }
    let mut groups: Vec<Vec<u32>> = rooms.iter().map(|room| vec![room.id]).collect();
    groups.extend(
        connections
            .iter()
            .map(|connection| vec![connection.a, connection.b]),
    );
    let component_sets = components(&groups);
    let root = rooms[0].id;
    let mut isolated: Vec<u32> = Vec::new();
    for set in &component_sets {
        if !set.contains(&root) {
            isolated.extend(set.iter().copied());
        }
    }
    isolated.sort_unstable();
    isolated
}
