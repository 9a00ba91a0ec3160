//! Weapon and trait definitions plus the pure functions that turn them into projectiles and
//! modified stats. Nothing here holds state; randomness comes from the caller's stream.

pub mod traits;
pub mod weapons;

use serde::{Deserialize, Serialize};

pub use traits::{
    PlayerStats, TraitKind, apply_traits_to_stats, parse_trait_list, roll_starting_traits,
    roll_trait,
};
pub use weapons::{
    BeamShape, ProjectileKind, ProjectileSpec, Weapon, WeaponKind, create_weapon,
    generate_projectiles, next_fire_time,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
