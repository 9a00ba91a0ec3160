//! Live run state machine. `Run::handle` is the only mutation entry point; every state change
//! is reported through the outbound queue drained by `Run::drain_events`.

use std::mem;

use slotmap::SlotMap;
use tracing::info;

use crate::config::{RunConfig, WardConfig};
use crate::error::GenerationError;
use crate::loadout::{
    PlayerStats, TraitKind, Weapon, apply_traits_to_stats, create_weapon, parse_trait_list,
    roll_starting_traits,
};
use crate::mapgen::{Layout, RoomId, SHARDS_PER_WARD, WardGenerator};
use crate::rng::WardRng;

mod combat;
mod doors;
mod events;
mod hash;
mod pickups;
mod rooms;
mod state;
mod vitals;

pub use events::{
    DoorView, EnemyId, EventOutcome, HudUpdate, IgnoreReason, InboundEvent, Layer, LootReward,
    OutboundEvent, RunResult, RunSummary,
};
pub use state::{RoomRuntimeState, RunState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiveEnemy {
    pub room: RoomId,
    pub health: i32,
}

pub struct Run {
    seed: String,
    config: RunConfig,
    layout: Layout,
    rng: WardRng,
    state: RunState,
    traits: Vec<TraitKind>,
    stats: PlayerStats,
    weapon: Weapon,
    health: i32,
    insight: u32,
    // Regen carried between ticks, in point-milliseconds per minute.
    insight_progress: u64,
    layer: Layer,
    enemies: SlotMap<EnemyId, LiveEnemy>,
    boss_health: i32,
    transitioning: Option<RoomId>,
    elapsed_ms: u64,
    audit_remaining_ms: Option<u64>,
    next_fire_at_ms: u64,
    outcome: Option<RunSummary>,
    outbox: Vec<OutboundEvent>,
    last_hud: Option<HudUpdate>,
}

impl Run {
    /// Generates the ward, rolls starting traits from the same stream, and enters the start room.
    pub fn start(seed_key: &str, config: &WardConfig) -> Result<Self, GenerationError> {
        let mut rng = WardRng::from_seed_key(seed_key);
        let layout = WardGenerator::new(config.generation).generate_with(seed_key, &mut rng)?;

        let traits = match &config.run.starting_traits {
            Some(keys) => parse_trait_list(keys.iter().map(String::as_str)),
            None => roll_starting_traits(&mut rng),
        };
        let stats = apply_traits_to_stats(&config.run.base_stats, &traits);
        let weapon = create_weapon(config.run.starting_weapon_kind());
        let start = layout.player_start.id;

        let mut run = Self {
            seed: seed_key.to_string(),
            config: config.run.clone(),
            rng,
            state: RunState::new(start),
            traits,
            stats,
            weapon,
            health: stats.max_health,
            insight: 0,
            insight_progress: 0,
            layer: Layer::default(),
            enemies: SlotMap::with_key(),
            boss_health: config.run.boss_health,
            transitioning: None,
            elapsed_ms: 0,
            audit_remaining_ms: None,
            next_fire_at_ms: 0,
            outcome: None,
            outbox: Vec::new(),
            last_hud: None,
            layout,
        };

        if run.shards_required() == 0 {
            run.state.boss_unlocked = true;
        }
        info!(
            seed = seed_key,
            rooms = run.layout.rooms.len(),
            shards = run.shards_required(),
            traits = ?run.traits,
            "run started"
        );
        run.enter_room(start);
        run.emit_hud();
        Ok(run)
    }

    pub fn handle(&mut self, event: InboundEvent) -> EventOutcome {
        if self.outcome.is_some() {
            return EventOutcome::Ignored(IgnoreReason::RunOver);
        }

        let outcome = match event {
            InboundEvent::DoorOverlap { to } => self.on_door_overlap(to),
            InboundEvent::TransitionComplete => self.on_transition_complete(),
            InboundEvent::ShardPickup => self.on_shard_pickup(),
            InboundEvent::LootPickup => self.on_loot_pickup(),
            InboundEvent::EnemyHit { enemy, damage } => self.on_enemy_hit(enemy, damage),
            InboundEvent::EnemyKilled { enemy } => self.on_enemy_killed(enemy),
            InboundEvent::BossHit { damage } => self.on_boss_hit(damage),
            InboundEvent::PlayerHit { damage } => self.on_player_hit(damage),
            InboundEvent::FireWeapon { origin, aim_angle_rad, charge_ratio } => {
                self.on_fire_weapon(origin, aim_angle_rad, charge_ratio)
            }
            InboundEvent::ExitInteract => self.on_exit_interact(),
            InboundEvent::ToggleLayer => self.on_toggle_layer(),
            InboundEvent::Tick { elapsed_ms } => self.on_tick(elapsed_ms),
        };

        if outcome.is_applied() && self.outcome.is_none() {
            self.emit_hud();
        }
        outcome
    }

    pub fn drain_events(&mut self) -> Vec<OutboundEvent> {
        mem::take(&mut self.outbox)
    }

    /// Shards needed to open the boss door: three, or fewer when the ward placed fewer.
    pub fn shards_required(&self) -> u32 {
        self.layout.shard_rooms().len().min(SHARDS_PER_WARD) as u32
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn rng(&self) -> &WardRng {
        &self.rng
    }

    pub fn current_room(&self) -> RoomId {
        self.state.current_room_id
    }

    pub fn traits(&self) -> &[TraitKind] {
        &self.traits
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn insight(&self) -> u32 {
        self.insight
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn boss_health(&self) -> i32 {
        self.boss_health
    }

    pub fn transitioning(&self) -> Option<RoomId> {
        self.transitioning
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn audit_remaining_ms(&self) -> Option<u64> {
        self.audit_remaining_ms
    }

    pub fn outcome(&self) -> Option<&RunSummary> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = (EnemyId, &LiveEnemy)> + '_ {
        self.enemies.iter()
    }

    fn emit(&mut self, event: OutboundEvent) {
        self.outbox.push(event);
    }

    fn end_run(&mut self, result: RunResult) {
        if self.outcome.is_some() {
            return;
        }
        self.emit_hud();
        let summary = RunSummary {
            seed: self.seed.clone(),
            duration_sec: self.elapsed_ms / 1_000,
            traits: self.traits.clone(),
            result,
        };
        info!(seed = %self.seed, ?result, duration_sec = summary.duration_sec, "run ended");
        self.outcome = Some(summary.clone());
        self.emit(OutboundEvent::RunEnded(summary));
    }
}

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod tests;
