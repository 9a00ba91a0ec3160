//! Shard placement restricted to rooms reachable without passing through a locked room.

use crate::rng::WardRng;

use super::graph::{Adjacency, reachable_from};
use super::model::RoomId;

pub const SHARDS_PER_WARD: usize = 3;

pub(super) struct ShardAnchors {
    pub(super) start: RoomId,
    pub(super) boss: RoomId,
    pub(super) exit: RoomId,
}

/// Up to [`SHARDS_PER_WARD`] distinct rooms. The scan never enters the boss or exit room, whose
/// doors stay locked until shards are in hand. Fewer rooms are returned when those two wall off
/// most of the ward.
pub(super) fn pick_shard_rooms(
    rng: &mut WardRng,
    adjacency: &Adjacency,
    anchors: &ShardAnchors,
) -> Vec<RoomId> {
    let locked = [anchors.boss, anchors.exit];
    let mut candidates: Vec<RoomId> = reachable_from(adjacency, anchors.start, &locked)
        .into_iter()
        .filter(|&room| room != anchors.start)
        .collect();
    rng.shuffle(&mut candidates);
    candidates.truncate(SHARDS_PER_WARD);
    candidates
}
