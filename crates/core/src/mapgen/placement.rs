//! Rejection sampling of distinct room coordinates on the logical grid.

use std::collections::BTreeSet;

use crate::rng::WardRng;

use super::model::RoomId;

/// Draws `room_count` distinct cells in draw order. Callers validate `room_count <= grid_size²`
/// first; otherwise this never terminates.
pub(super) fn place_rooms(rng: &mut WardRng, room_count: usize, grid_size: u32) -> Vec<RoomId> {
    let grid = grid_size as usize;
    let mut taken = BTreeSet::new();
    let mut coords = Vec::with_capacity(room_count);

    while coords.len() < room_count {
        let x = rng.below(grid) as i32;
        let y = rng.below(grid) as i32;
        let candidate = RoomId::new(x, y);
        if taken.insert(candidate) {
            coords.push(candidate);
        }
    }

    coords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_distinct_cells_inside_the_grid() {
        let mut rng = WardRng::from_seed_key("placement");
        let coords = place_rooms(&mut rng, 12, 4);
        assert_eq!(coords.len(), 12);
        let unique: BTreeSet<_> = coords.iter().copied().collect();
        assert_eq!(unique.len(), 12);
        assert!(coords.iter().all(|id| (0..4).contains(&id.x) && (0..4).contains(&id.y)));
    }

    #[test]
    fn fills_every_cell_when_asked_for_the_whole_grid() {
        let mut rng = WardRng::from_seed_key("full");
        let coords = place_rooms(&mut rng, 9, 3);
        let unique: BTreeSet<_> = coords.into_iter().collect();
        assert_eq!(unique.len(), 9);
    }

    #[test]
    fn draws_two_values_per_attempt() {
        let mut rng = WardRng::from_seed_key("draws");
        let coords = place_rooms(&mut rng, 1, 5);
        assert_eq!(coords.len(), 1);
        assert_eq!(rng.draw_count(), 2);
    }
}
