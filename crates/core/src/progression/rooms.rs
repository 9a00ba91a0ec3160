//! Room entry, spawning and clearing.
//! Spawns are gated on the room's runtime flags so re-entry never duplicates collected or
//! destroyed content.

use tracing::debug;

use super::*;
use crate::mapgen::RoomType;

impl Run {
    pub(super) fn enter_room(&mut self, room: RoomId) {
        // Anything still alive in the room being left is despawned; it respawns in full on
        // re-entry while that room stays uncleared.
        self.enemies.clear();

        self.state.current_room_id = room;
        let first_visit = self.state.visited.insert(room);
        let runtime = *self.state.room_state_mut(room);
        let room_type = self.layout.room_type(room).unwrap_or(RoomType::Combat);
        debug!(%room, ?room_type, first_visit, "entered room");
        self.emit(OutboundEvent::RoomEntered { room, room_type, first_visit });

        if !runtime.cleared {
            self.spawn_enemies(room);
        }

        let shards_left = self.layout.shards_in(room).saturating_sub(runtime.shards_collected);
        if shards_left > 0 {
            self.emit(OutboundEvent::ShardsPlaced { room, count: shards_left });
        }

        let items: Vec<_> =
            self.layout.items_in(room).into_iter().skip(runtime.loot_taken as usize).collect();
        if !items.is_empty() {
            self.emit(OutboundEvent::LootPlaced { room, items });
        }

        if room_type == RoomType::Boss && !self.state.boss_defeated {
            self.emit(OutboundEvent::BossSpawned { health: self.boss_health });
        }

        if !runtime.cleared && self.enemies.is_empty() && !self.boss_blocks_clear(room) {
            self.mark_cleared(room);
        }
        self.emit_doors();
    }

    fn spawn_enemies(&mut self, room: RoomId) {
        let count = self.layout.enemy_count_in(room);
        if count == 0 {
            return;
        }
        let health = self.config.enemy_health;
        let spawned: Vec<EnemyId> =
            (0..count).map(|_| self.enemies.insert(LiveEnemy { room, health })).collect();
        self.emit(OutboundEvent::EnemiesSpawned { room, enemies: spawned });
    }

    /// Clears the current room once its last enemy is gone and, in the boss room, the boss too.
    pub(super) fn try_clear_current_room(&mut self) {
        let room = self.state.current_room_id;
        if self.state.is_cleared(room) || !self.enemies.is_empty() || self.boss_blocks_clear(room)
        {
            return;
        }
        self.mark_cleared(room);
        self.emit_doors();
    }

    fn boss_blocks_clear(&self, room: RoomId) -> bool {
        room == self.layout.boss_room.id && !self.state.boss_defeated
    }

    fn mark_cleared(&mut self, room: RoomId) {
        self.state.room_state_mut(room).cleared = true;
        debug!(%room, "room cleared");
        self.emit(OutboundEvent::RoomCleared { room });
    }
}
