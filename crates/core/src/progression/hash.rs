//! Stable snapshot hashing for deterministic verification.
//! Covers every piece of mutable run state; the layout is covered through the seed and options.

use std::hash::Hasher;

use slotmap::Key;
use xxhash_rust::xxh3::Xxh3;

use super::*;
use crate::mapgen::LinkStrategy;

impl Run {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed.len() as u64);
        hasher.write(self.seed.as_bytes());
        hasher.write_u64(self.layout.options.room_count as u64);
        hasher.write_u32(self.layout.options.grid_size);
        hasher.write_u8(match self.layout.options.link_strategy {
            LinkStrategy::NearestFrontier => 0,
            LinkStrategy::GridAdjacent => 1,
        });

        hasher.write_u32(self.rng.state());
        hasher.write_u64(self.rng.draw_count());

        write_room(&mut hasher, self.state.current_room_id);
        hasher.write_u64(self.state.visited.len() as u64);
        for &room in &self.state.visited {
            write_room(&mut hasher, room);
        }
        hasher.write_u32(self.state.collected_shards_total);
        hasher.write_u8(u8::from(self.state.boss_unlocked));
        hasher.write_u8(u8::from(self.state.boss_defeated));
        hasher.write_u64(self.state.room_states.len() as u64);
        for (&room, runtime) in &self.state.room_states {
            write_room(&mut hasher, room);
            hasher.write_u8(u8::from(runtime.cleared));
            hasher.write_u32(runtime.shards_collected);
            hasher.write_u32(runtime.loot_taken);
        }

        hasher.write_u64(self.traits.len() as u64);
        for kind in &self.traits {
            hasher.write_u8(*kind as u8);
        }
        hasher.write_u8(self.weapon.kind as u8);
        hasher.write_i32(self.health);
        hasher.write_u32(self.insight);
        hasher.write_u64(self.insight_progress);
        hasher.write_u8(self.layer as u8);

        hasher.write_u64(self.enemies.len() as u64);
        for (id, enemy) in &self.enemies {
            hasher.write_u64(id.data().as_ffi());
            write_room(&mut hasher, enemy.room);
            hasher.write_i32(enemy.health);
        }
        hasher.write_i32(self.boss_health);

        match self.transitioning {
            Some(room) => {
                hasher.write_u8(1);
                write_room(&mut hasher, room);
            }
            None => hasher.write_u8(0),
        }
        hasher.write_u64(self.elapsed_ms);
        hasher.write_u64(self.audit_remaining_ms.unwrap_or(u64::MAX));
        hasher.write_u64(self.next_fire_at_ms);
        hasher.write_u8(match self.outcome.as_ref().map(|summary| summary.result) {
            None => 0,
            Some(RunResult::Discharged) => 1,
            Some(RunResult::Died) => 2,
            Some(RunResult::Audited) => 3,
        });
        hasher.finish()
    }
}

fn write_room(hasher: &mut Xxh3, room: RoomId) {
    hasher.write_i32(room.x);
    hasher.write_i32(room.y);
}
