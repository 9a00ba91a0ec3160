//! Shard and loot collection.
//! Pickups are count based: each one takes the next untaken placement in the current room.

use super::*;
use crate::loadout::{WeaponKind, roll_trait};
use crate::mapgen::LootKind;

impl Run {
    pub(super) fn on_shard_pickup(&mut self) -> EventOutcome {
        let room = self.state.current_room_id;
        let placed = self.layout.shards_in(room);
        let runtime = self.state.room_state_mut(room);
        if runtime.shards_collected >= placed {
            return EventOutcome::Ignored(IgnoreReason::NothingToCollect);
        }
        runtime.shards_collected += 1;
        self.state.collected_shards_total += 1;

        let total = self.state.collected_shards_total;
        let required = self.shards_required();
        self.emit(OutboundEvent::ShardCollected { room, total, required });

        if !self.state.boss_unlocked && total >= required {
            self.state.boss_unlocked = true;
            info!(seed = %self.seed, total, "boss door unlocked");
            self.emit(OutboundEvent::BossUnlocked);
            self.emit_doors();
        }
        EventOutcome::Applied
    }

    pub(super) fn on_loot_pickup(&mut self) -> EventOutcome {
        let room = self.state.current_room_id;
        let taken = self.state.room_state_mut(room).loot_taken;
        let Some(kind) = self.layout.items_in(room).get(taken as usize).copied() else {
            return EventOutcome::Ignored(IgnoreReason::NothingToCollect);
        };
        self.state.room_state_mut(room).loot_taken += 1;

        let reward = match kind {
            LootKind::Weapon => {
                let weapon = WeaponKind::ALL[self.rng.below(WeaponKind::ALL.len())];
                self.weapon = create_weapon(weapon);
                LootReward::Weapon(weapon)
            }
            LootKind::Trait => {
                let gained = roll_trait(&mut self.rng);
                self.gain_trait(gained);
                LootReward::Trait(gained)
            }
            LootKind::Consumable | LootKind::Shard => {
                let before = self.health;
                let healed = self.health.saturating_add(self.config.consumable_heal.max(0));
                self.health = healed.min(self.stats.max_health);
                LootReward::Heal { amount: self.health.saturating_sub(before) }
            }
        };
        self.emit(OutboundEvent::LootCollected { room, reward });
        EventOutcome::Applied
    }

    /// Refolds stats from the base so trait order stays the acquisition order. Extra max health
    /// is granted as current health too.
    fn gain_trait(&mut self, gained: TraitKind) {
        self.traits.push(gained);
        let stats = apply_traits_to_stats(&self.config.base_stats, &self.traits);
        let health_gain = (stats.max_health - self.stats.max_health).max(0);
        self.stats = stats;
        self.health = self.health.saturating_add(health_gain).min(self.stats.max_health);
    }
}
