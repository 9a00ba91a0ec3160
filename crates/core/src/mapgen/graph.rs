//! Adjacency derivation and reachability scans over the door graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::model::{Door, RoomId};

pub type Adjacency = BTreeMap<RoomId, BTreeSet<RoomId>>;

/// Symmetric closure of `doors`. Every room gets an entry, even without doors.
pub fn build_adjacency(rooms: &[RoomId], doors: &[Door]) -> Adjacency {
    let mut adjacency: Adjacency = rooms.iter().map(|&id| (id, BTreeSet::new())).collect();
    for door in doors {
        adjacency.entry(door.from).or_default().insert(door.to);
        adjacency.entry(door.to).or_default().insert(door.from);
    }
    adjacency
}

/// Breadth-first order of rooms reachable from `start`. `blocked` rooms are never entered,
/// so rooms only reachable through them are left out.
pub fn reachable_from(adjacency: &Adjacency, start: RoomId, blocked: &[RoomId]) -> Vec<RoomId> {
    if blocked.contains(&start) {
        return Vec::new();
    }

    let mut order = vec![start];
    let mut seen = BTreeSet::from([start]);
    let mut open = VecDeque::from([start]);

    while let Some(room) = open.pop_front() {
        for &next in adjacency.get(&room).into_iter().flatten() {
            if blocked.contains(&next) || !seen.insert(next) {
                continue;
            }
            order.push(next);
            open.push_back(next);
        }
    }

    order
}
