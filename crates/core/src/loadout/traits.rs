//! Run traits and the stat fold they drive.

use serde::{Deserialize, Serialize};

use crate::rng::WardRng;

pub const BASE_MOVE_SPEED: f64 = 160.0;
pub const BASE_PROJECTILE_SPEED: f64 = 450.0;
pub const BASE_MAX_HEALTH: i32 = 100;
pub const BASE_AUDIT_TIMER_SEC: i32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TraitKind {
    FleetOfFoot,
    KeenEye,
    IronWill,
    FocusedBreath,
    NightTerrors,
    ShakyHands,
}

impl TraitKind {
    pub const POSITIVE: [Self; 4] =
        [Self::FleetOfFoot, Self::KeenEye, Self::IronWill, Self::FocusedBreath];
    pub const NEGATIVE: [Self; 2] = [Self::NightTerrors, Self::ShakyHands];
    pub const ALL: [Self; 6] = [
        Self::FleetOfFoot,
        Self::KeenEye,
        Self::IronWill,
        Self::FocusedBreath,
        Self::NightTerrors,
        Self::ShakyHands,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::FleetOfFoot => "FleetOfFoot",
            Self::KeenEye => "KeenEye",
            Self::IronWill => "IronWill",
            Self::FocusedBreath => "FocusedBreath",
            Self::NightTerrors => "NightTerrors",
            Self::ShakyHands => "ShakyHands",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn is_negative(self) -> bool {
        Self::NEGATIVE.contains(&self)
    }

    fn apply(self, stats: &mut PlayerStats) {
        match self {
            Self::FleetOfFoot => stats.move_speed *= 1.2,
            Self::KeenEye => stats.projectile_speed *= 1.15,
            Self::IronWill => stats.max_health += 20,
            Self::FocusedBreath => stats.insight_regen_per_min += 1,
            Self::NightTerrors => stats.audit_timer_sec -= 10,
            Self::ShakyHands => stats.weapon_spread_deg += 6.0,
        }
    }
}

/// Keys that name no trait are dropped, which leaves the fold unchanged.
pub fn parse_trait_list<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<TraitKind> {
    keys.into_iter().filter_map(TraitKind::from_key).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub move_speed: f64,
    pub projectile_speed: f64,
    pub max_health: i32,
    pub insight_regen_per_min: u32,
    /// Seconds on the audit clock once the boss falls.
    pub audit_timer_sec: i32,
    pub weapon_spread_deg: f64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            move_speed: BASE_MOVE_SPEED,
            projectile_speed: BASE_PROJECTILE_SPEED,
            max_health: BASE_MAX_HEALTH,
            insight_regen_per_min: 0,
            audit_timer_sec: BASE_AUDIT_TIMER_SEC,
            weapon_spread_deg: 0.0,
        }
    }
}

/// Applies each trait in list order. Float multiplications make the order observable.
pub fn apply_traits_to_stats(base: &PlayerStats, traits: &[TraitKind]) -> PlayerStats {
    traits.iter().fold(*base, |mut stats, kind| {
        kind.apply(&mut stats);
        stats
    })
}

/// Two positives (repeats allowed) then one negative; three draws.
pub fn roll_starting_traits(rng: &mut WardRng) -> Vec<TraitKind> {
    vec![
        TraitKind::POSITIVE[rng.below(TraitKind::POSITIVE.len())],
        TraitKind::POSITIVE[rng.below(TraitKind::POSITIVE.len())],
        TraitKind::NEGATIVE[rng.below(TraitKind::NEGATIVE.len())],
    ]
}

/// Any trait, one draw. Used for trait loot.
pub fn roll_trait(rng: &mut WardRng) -> TraitKind {
    TraitKind::ALL[rng.below(TraitKind::ALL.len())]
}
