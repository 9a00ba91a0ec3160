//! Player vitals, the run clock and HUD reporting.

use super::*;

const MS_PER_MINUTE: u64 = 60_000;

impl Run {
    pub(super) fn on_player_hit(&mut self, damage: i32) -> EventOutcome {
        if damage < 0 {
            return EventOutcome::Ignored(IgnoreReason::NegativeAmount);
        }
        self.health = self.health.saturating_sub(damage);
        if self.health <= 0 {
            self.end_run(RunResult::Died);
        }
        EventOutcome::Applied
    }

    pub(super) fn on_exit_interact(&mut self) -> EventOutcome {
        if self.state.current_room_id != self.layout.exit_room.id {
            return EventOutcome::Ignored(IgnoreReason::NotInExitRoom);
        }
        if !self.state.boss_defeated {
            return EventOutcome::Ignored(IgnoreReason::ExitLocked);
        }
        self.end_run(RunResult::Discharged);
        EventOutcome::Applied
    }

    pub(super) fn on_toggle_layer(&mut self) -> EventOutcome {
        self.layer = self.layer.toggled();
        EventOutcome::Applied
    }

    pub(super) fn on_tick(&mut self, elapsed_ms: u64) -> EventOutcome {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);

        let regen = u64::from(self.stats.insight_regen_per_min);
        let gained = regen.saturating_mul(elapsed_ms);
        self.insight_progress = self.insight_progress.saturating_add(gained);
        let whole = self.insight_progress / MS_PER_MINUTE;
        if whole > 0 {
            self.insight = self.insight.saturating_add(u32::try_from(whole).unwrap_or(u32::MAX));
            self.insight_progress %= MS_PER_MINUTE;
        }

        if let Some(remaining) = self.audit_remaining_ms {
            let remaining = remaining.saturating_sub(elapsed_ms);
            self.audit_remaining_ms = Some(remaining);
            if remaining == 0 {
                self.end_run(RunResult::Audited);
            }
        }
        EventOutcome::Applied
    }

    pub fn hud(&self) -> HudUpdate {
        let traits: Vec<&str> = self.traits.iter().map(|kind| kind.key()).collect();
        let loadout = if traits.is_empty() {
            self.weapon.name.to_string()
        } else {
            format!("{} | {}", self.weapon.name, traits.join(", "))
        };
        HudUpdate {
            health: self.health.max(0),
            max_health: self.stats.max_health,
            insight: self.insight,
            audit: self.audit_remaining_ms.map(|ms| ms.div_ceil(1_000)),
            loadout,
            layer: self.layer,
        }
    }

    /// Emits a HUD update only when a displayed field changed.
    pub(super) fn emit_hud(&mut self) {
        let hud = self.hud();
        if self.last_hud.as_ref() == Some(&hud) {
            return;
        }
        self.last_hud = Some(hud.clone());
        self.emit(OutboundEvent::Hud(hud));
    }
}
