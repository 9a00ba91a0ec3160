//! Inbound gameplay events, outbound observer events, and the result of handling one event.
//! Collaborators report discrete facts in and receive state changes out; nothing flows back.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::loadout::{ProjectileSpec, TraitKind, Vec2, WeaponKind};
use crate::mapgen::{LootKind, RoomId, RoomType};

new_key_type! {
    pub struct EnemyId;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    #[default]
    Awake,
    Asleep,
}

impl Layer {
    pub fn toggled(self) -> Self {
        match self {
            Self::Awake => Self::Asleep,
            Self::Asleep => Self::Awake,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InboundEvent {
    /// Player body touched the door leading to `to`.
    DoorOverlap { to: RoomId },
    /// The presentation layer finished the fade for the pending transition.
    TransitionComplete,
    ShardPickup,
    /// Takes the next uncollected non-shard item in the current room.
    LootPickup,
    EnemyHit { enemy: EnemyId, damage: i32 },
    EnemyKilled { enemy: EnemyId },
    BossHit { damage: i32 },
    PlayerHit { damage: i32 },
    FireWeapon { origin: Vec2, aim_angle_rad: f64, charge_ratio: Option<f64> },
    ExitInteract,
    ToggleLayer,
    Tick { elapsed_ms: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorView {
    pub to: RoomId,
    pub to_type: RoomType,
    pub locked: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootReward {
    Weapon(WeaponKind),
    Trait(TraitKind),
    Heal { amount: i32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudUpdate {
    pub health: i32,
    pub max_health: i32,
    pub insight: u32,
    /// Whole seconds left on the audit clock, once it is running.
    pub audit: Option<u64>,
    pub loadout: String,
    pub layer: Layer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunResult {
    Discharged,
    Died,
    Audited,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: String,
    pub duration_sec: u64,
    pub traits: Vec<TraitKind>,
    pub result: RunResult,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OutboundEvent {
    RoomEntered { room: RoomId, room_type: RoomType, first_visit: bool },
    EnemiesSpawned { room: RoomId, enemies: Vec<EnemyId> },
    ShardsPlaced { room: RoomId, count: u32 },
    LootPlaced { room: RoomId, items: Vec<LootKind> },
    BossSpawned { health: i32 },
    DoorsChanged { room: RoomId, doors: Vec<DoorView> },
    TransitionStarted { from: RoomId, to: RoomId },
    ShardCollected { room: RoomId, total: u32, required: u32 },
    BossUnlocked,
    EnemyDied { enemy: EnemyId },
    RoomCleared { room: RoomId },
    BossDamaged { health: i32 },
    BossDefeated,
    ProjectilesFired { projectiles: Vec<ProjectileSpec> },
    LootCollected { room: RoomId, reward: LootReward },
    Hud(HudUpdate),
    RunEnded(RunSummary),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreReason {
    RunOver,
    Transitioning,
    NotTransitioning,
    NoSuchDoor,
    DoorLocked,
    NothingToCollect,
    UnknownEnemy,
    NotInBossRoom,
    BossAlreadyDefeated,
    NotInExitRoom,
    ExitLocked,
    WeaponCooling,
    NegativeAmount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl EventOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}
