//! Mutable per-run bookkeeping: where the player is, what has been visited, and the gate flags.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::mapgen::RoomId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRuntimeState {
    pub cleared: bool,
    pub shards_collected: u32,
    pub loot_taken: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub current_room_id: RoomId,
    pub visited: BTreeSet<RoomId>,
    pub collected_shards_total: u32,
    pub boss_unlocked: bool,
    pub boss_defeated: bool,
    pub room_states: BTreeMap<RoomId, RoomRuntimeState>,
}

impl RunState {
    /// Nothing is visited yet; entering the start room is the caller's first transition.
    pub fn new(start: RoomId) -> Self {
        Self {
            current_room_id: start,
            visited: BTreeSet::new(),
            collected_shards_total: 0,
            boss_unlocked: false,
            boss_defeated: false,
            room_states: BTreeMap::new(),
        }
    }

    pub fn room_state(&self, id: RoomId) -> Option<&RoomRuntimeState> {
        self.room_states.get(&id)
    }

    /// The only place runtime state is created.
    pub fn room_state_mut(&mut self, id: RoomId) -> &mut RoomRuntimeState {
        self.room_states.entry(id).or_default()
    }

    pub fn is_cleared(&self, id: RoomId) -> bool {
        self.room_state(id).is_some_and(|room| room.cleared)
    }
}
