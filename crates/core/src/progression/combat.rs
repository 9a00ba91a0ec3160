//! Enemy, boss and weapon handlers.

use super::*;
use crate::loadout::{Vec2, generate_projectiles, next_fire_time};

impl Run {
    pub(super) fn on_enemy_hit(&mut self, enemy: EnemyId, damage: i32) -> EventOutcome {
        if damage < 0 {
            return EventOutcome::Ignored(IgnoreReason::NegativeAmount);
        }
        let Some(live) = self.enemies.get_mut(enemy) else {
            return EventOutcome::Ignored(IgnoreReason::UnknownEnemy);
        };
        live.health = live.health.saturating_sub(damage);
        if live.health <= 0 {
            self.kill_enemy(enemy);
        }
        EventOutcome::Applied
    }

    pub(super) fn on_enemy_killed(&mut self, enemy: EnemyId) -> EventOutcome {
        if !self.enemies.contains_key(enemy) {
            return EventOutcome::Ignored(IgnoreReason::UnknownEnemy);
        }
        self.kill_enemy(enemy);
        EventOutcome::Applied
    }

    fn kill_enemy(&mut self, enemy: EnemyId) {
        self.enemies.remove(enemy);
        self.emit(OutboundEvent::EnemyDied { enemy });
        self.try_clear_current_room();
    }

    pub(super) fn on_boss_hit(&mut self, damage: i32) -> EventOutcome {
        if self.state.current_room_id != self.layout.boss_room.id {
            return EventOutcome::Ignored(IgnoreReason::NotInBossRoom);
        }
        if self.state.boss_defeated {
            return EventOutcome::Ignored(IgnoreReason::BossAlreadyDefeated);
        }
        if damage < 0 {
            return EventOutcome::Ignored(IgnoreReason::NegativeAmount);
        }

        self.boss_health = self.boss_health.saturating_sub(damage);
        self.emit(OutboundEvent::BossDamaged { health: self.boss_health });
        if self.boss_health <= 0 {
            self.state.boss_defeated = true;
            let audit_ms = u64::try_from(self.stats.audit_timer_sec).unwrap_or(0) * 1_000;
            self.audit_remaining_ms = Some(audit_ms);
            info!(seed = %self.seed, audit_ms, "boss defeated, exit unlocked");
            self.emit(OutboundEvent::BossDefeated);
            self.try_clear_current_room();
            if audit_ms == 0 {
                self.end_run(RunResult::Audited);
            }
        }
        EventOutcome::Applied
    }

    pub(super) fn on_fire_weapon(
        &mut self,
        origin: Vec2,
        aim_angle_rad: f64,
        charge_ratio: Option<f64>,
    ) -> EventOutcome {
        if self.elapsed_ms < self.next_fire_at_ms {
            return EventOutcome::Ignored(IgnoreReason::WeaponCooling);
        }
        let weapon = self.weapon.with_stats(&self.stats);
        let projectiles =
            generate_projectiles(origin, aim_angle_rad, &weapon, &mut self.rng, charge_ratio);
        self.next_fire_at_ms = next_fire_time(self.elapsed_ms, &weapon);
        self.emit(OutboundEvent::ProjectilesFired { projectiles });
        EventOutcome::Applied
    }
}
