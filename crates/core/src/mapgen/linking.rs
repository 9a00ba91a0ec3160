//! Door construction: grows a spanning tree from the first room so every room is reachable.

use std::collections::BTreeSet;

use crate::rng::WardRng;

use super::model::{Door, RoomId};

/// Perturbation added to every candidate score so equal distances break by seed.
const TIE_BREAK_JITTER: f64 = 0.01;

/// Repeatedly links the closest (squared Euclidean) pair with exactly one end connected.
///
/// Both orderings of each frontier pair are scored, one draw per ordering, and the door keeps
/// the orientation of the winning ordering.
pub(super) fn link_nearest_frontier(rng: &mut WardRng, coords: &[RoomId]) -> Vec<Door> {
    let mut doors = Vec::with_capacity(coords.len().saturating_sub(1));
    if coords.is_empty() {
        return doors;
    }

    let mut connected = vec![false; coords.len()];
    connected[0] = true;
    let mut connected_count = 1;

    while connected_count < coords.len() {
        let mut best: Option<(usize, usize, f64)> = None;
        for (a_index, &a) in coords.iter().enumerate() {
            for (b_index, &b) in coords.iter().enumerate() {
                if a_index == b_index || connected[a_index] == connected[b_index] {
                    continue;
                }
                let score = a.squared_distance(b) as f64 + rng.next_f64() * TIE_BREAK_JITTER;
                if best.is_none_or(|(_, _, best_score)| score < best_score) {
                    best = Some((a_index, b_index, score));
                }
            }
        }

        let Some((a_index, b_index, _)) = best else {
            break;
        };
        doors.push(Door { from: coords[a_index], to: coords[b_index] });
        connected[a_index] = true;
        connected[b_index] = true;
        connected_count += 1;
    }

    doors
}

/// Links only orthogonal neighbours. When the connected set touches no unconnected room, a
/// stepping-stone room is appended to `coords` on the free cell beside the connected set that
/// is closest to the remaining rooms.
pub(super) fn link_grid_adjacent(
    rng: &mut WardRng,
    coords: &mut Vec<RoomId>,
    grid_size: u32,
) -> Vec<Door> {
    let mut doors = Vec::with_capacity(coords.len().saturating_sub(1));
    if coords.is_empty() {
        return doors;
    }

    let mut occupied: BTreeSet<RoomId> = coords.iter().copied().collect();
    let mut connected = vec![false; coords.len()];
    connected[0] = true;
    let mut connected_count = 1;

    while connected_count < coords.len() {
        if let Some((a_index, b_index)) = best_adjacent_pair(rng, coords, &connected) {
            doors.push(Door { from: coords[a_index], to: coords[b_index] });
            connected[b_index] = true;
            connected_count += 1;
            continue;
        }

        let Some((a_index, stone)) =
            best_stepping_stone(rng, coords, &connected, &occupied, grid_size)
        else {
            break;
        };
        doors.push(Door { from: coords[a_index], to: stone });
        occupied.insert(stone);
        coords.push(stone);
        connected.push(true);
        connected_count += 1;
    }

    doors
}

/// Connected/unconnected pair at Manhattan distance 1, oriented connected → unconnected.
fn best_adjacent_pair(
    rng: &mut WardRng,
    coords: &[RoomId],
    connected: &[bool],
) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for (a_index, &a) in coords.iter().enumerate() {
        if !connected[a_index] {
            continue;
        }
        for (b_index, &b) in coords.iter().enumerate() {
            if connected[b_index] || a.manhattan(b) != 1 {
                continue;
            }
            let score = rng.next_f64();
            if best.is_none_or(|(_, _, best_score)| score < best_score) {
                best = Some((a_index, b_index, score));
            }
        }
    }
    best.map(|(a_index, b_index, _)| (a_index, b_index))
}

fn best_stepping_stone(
    rng: &mut WardRng,
    coords: &[RoomId],
    connected: &[bool],
    occupied: &BTreeSet<RoomId>,
    grid_size: u32,
) -> Option<(usize, RoomId)> {
    let grid = grid_size as i32;
    let unconnected: Vec<RoomId> = coords
        .iter()
        .zip(connected)
        .filter(|(_, is_connected)| !**is_connected)
        .map(|(&id, _)| id)
        .collect();

    let mut best: Option<(usize, RoomId, f64)> = None;
    for (a_index, &a) in coords.iter().enumerate() {
        if !connected[a_index] {
            continue;
        }
        for cell in a.orthogonal_neighbors() {
            if cell.x < 0 || cell.y < 0 || cell.x >= grid || cell.y >= grid {
                continue;
            }
            if occupied.contains(&cell) {
                continue;
            }
            let Some(gap) = unconnected.iter().map(|&target| cell.manhattan(target)).min() else {
                continue;
            };
            let score = f64::from(gap) + rng.next_f64() * TIE_BREAK_JITTER;
            if best.is_none_or(|(_, _, best_score)| score < best_score) {
                best = Some((a_index, cell, score));
            }
        }
    }
    best.map(|(a_index, cell, _)| (a_index, cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::graph::{build_adjacency, reachable_from};

    fn assert_spanning(rooms: &[RoomId], doors: &[Door]) {
        assert_eq!(doors.len(), rooms.len() - 1, "a spanning tree has n-1 edges");
        let adjacency = build_adjacency(rooms, doors);
        assert_eq!(reachable_from(&adjacency, rooms[0], &[]).len(), rooms.len());
    }

    #[test]
    fn nearest_frontier_matches_reference_doors_for_known_seed() {
        let mut rng = WardRng::from_seed_key("abc123");
        let coords = super::super::placement::place_rooms(&mut rng, 8, 5);
        let doors = link_nearest_frontier(&mut rng, &coords);

        let rendered: Vec<String> =
            doors.iter().map(|door| format!("{}->{}", door.from, door.to)).collect();
        assert_eq!(
            rendered,
            ["4,0->2,0", "1,0->2,0", "1,0->1,1", "1,2->1,1", "1,3->1,2", "0,1->1,1", "4,0->4,2"]
        );
    }

    #[test]
    fn nearest_frontier_spans_scattered_rooms() {
        let coords: Vec<RoomId> = [(0, 0), (4, 4), (2, 2), (0, 4), (4, 0)]
            .iter()
            .map(|&(x, y)| RoomId::new(x, y))
            .collect();
        let mut rng = WardRng::from_seed_key("span");
        let doors = link_nearest_frontier(&mut rng, &coords);
        assert_spanning(&coords, &doors);
    }

    #[test]
    fn grid_adjacent_only_links_orthogonal_neighbours() {
        let mut coords: Vec<RoomId> =
            [(0, 0), (3, 0), (3, 3), (0, 3)].iter().map(|&(x, y)| RoomId::new(x, y)).collect();
        let mut rng = WardRng::from_seed_key("stones");
        let doors = link_grid_adjacent(&mut rng, &mut coords, 4);

        assert!(coords.len() > 4, "gaps should be bridged with stepping stones");
        assert!(doors.iter().all(|door| door.from.manhattan(door.to) == 1));
        assert_spanning(&coords, &doors);
        let unique: BTreeSet<_> = coords.iter().collect();
        assert_eq!(unique.len(), coords.len(), "stepping stones never overlap rooms");
    }

    #[test]
    fn grid_adjacent_needs_no_stones_for_a_contiguous_row() {
        let mut coords: Vec<RoomId> = (0..5).map(|x| RoomId::new(x, 2)).collect();
        let mut rng = WardRng::from_seed_key("row");
        let doors = link_grid_adjacent(&mut rng, &mut coords, 5);
        assert_eq!(coords.len(), 5);
        assert_spanning(&coords, &doors);
    }
}
