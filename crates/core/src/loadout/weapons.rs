//! Weapon table and projectile emission.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::rng::WardRng;

use super::Vec2;
use super::traits::{BASE_PROJECTILE_SPEED, PlayerStats};

const BULLET_RADIUS: f64 = 4.0;
const BULLET_LIFETIME_MS: u64 = 800;
const CHARGE_RADIUS: f64 = 6.0;
const CHARGE_LIFETIME_MS: u64 = 1_000;
const BEAM_WIDTH: f64 = 6.0;
const BEAM_LENGTH: f64 = 520.0;
const BEAM_LIFETIME_MS: u64 = 120;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    MoodStabilizer,
    AnxiolyticSmg,
    BetaBlocker,
    PlaceboScatter,
    LucidityBeam,
    SedativeCannon,
}

impl WeaponKind {
    pub const ALL: [Self; 6] = [
        Self::MoodStabilizer,
        Self::AnxiolyticSmg,
        Self::BetaBlocker,
        Self::PlaceboScatter,
        Self::LucidityBeam,
        Self::SedativeCannon,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::MoodStabilizer => "MoodStabilizer",
            Self::AnxiolyticSmg => "AnxiolyticSMG",
            Self::BetaBlocker => "BetaBlocker",
            Self::PlaceboScatter => "PlaceboScatter",
            Self::LucidityBeam => "LucidityBeam",
            Self::SedativeCannon => "SedativeCannon",
        }
    }

    /// Unknown keys fall back to the default weapon.
    pub fn from_key(key: &str) -> Self {
        Self::ALL.into_iter().find(|kind| kind.key() == key).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    Bullet,
    Beam,
    Charge,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub name: &'static str,
    pub fire_rate_ms: u64,
    pub projectile_speed: f64,
    pub burst: u32,
    pub spread_deg: f64,
    pub projectile_kind: ProjectileKind,
    pub damage: f64,
}

impl Weapon {
    /// Weapon as fired by a player with `stats`: projectile speed scales with the stat's ratio
    /// to the base value and trait spread adds to the weapon's own.
    pub fn with_stats(&self, stats: &PlayerStats) -> Self {
        Self {
            projectile_speed: self.projectile_speed * stats.projectile_speed
                / BASE_PROJECTILE_SPEED,
            spread_deg: self.spread_deg + stats.weapon_spread_deg,
            ..*self
        }
    }
}

pub fn create_weapon(kind: WeaponKind) -> Weapon {
    let (name, fire_rate_ms, projectile_speed, burst, spread_deg, projectile_kind, damage) =
        match kind {
            WeaponKind::MoodStabilizer => {
                ("Mood Stabilizer", 350, 450.0, 1, 0.0, ProjectileKind::Bullet, 10.0)
            }
            WeaponKind::AnxiolyticSmg => {
                ("Anxiolytic SMG", 100, 500.0, 1, 8.0, ProjectileKind::Bullet, 4.0)
            }
            WeaponKind::BetaBlocker => {
                ("Beta Blocker", 650, 700.0, 1, 0.0, ProjectileKind::Bullet, 18.0)
            }
            WeaponKind::PlaceboScatter => {
                ("Placebo Scatter", 800, 420.0, 6, 18.0, ProjectileKind::Bullet, 5.0)
            }
            WeaponKind::LucidityBeam => {
                ("Lucidity Beam", 900, 0.0, 1, 0.0, ProjectileKind::Beam, 25.0)
            }
            WeaponKind::SedativeCannon => {
                ("Sedative Cannon", 1_200, 380.0, 3, 10.0, ProjectileKind::Charge, 20.0)
            }
        };
    Weapon {
        kind,
        name,
        fire_rate_ms,
        projectile_speed,
        burst,
        spread_deg,
        projectile_kind,
        damage,
    }
}

pub fn next_fire_time(now_ms: u64, weapon: &Weapon) -> u64 {
    now_ms + weapon.fire_rate_ms
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeamShape {
    pub width: f64,
    pub length: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub kind: ProjectileKind,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub angle_rad: f64,
    pub radius: f64,
    pub lifetime_ms: u64,
    pub damage: f64,
    pub beam: Option<BeamShape>,
}

/// Emits one spec per projectile. Beams emit a single spec and draw nothing; every other
/// projectile draws exactly once for its spread. `charge_ratio` only affects charge weapons;
/// it is clamped to `[0, 1]` and a missing ratio is an uncharged shot.
pub fn generate_projectiles(
    origin: Vec2,
    aim_angle_rad: f64,
    weapon: &Weapon,
    rng: &mut WardRng,
    charge_ratio: Option<f64>,
) -> Vec<ProjectileSpec> {
    if weapon.projectile_kind == ProjectileKind::Beam {
        return vec![ProjectileSpec {
            kind: ProjectileKind::Beam,
            x: origin.x,
            y: origin.y,
            vx: 0.0,
            vy: 0.0,
            angle_rad: aim_angle_rad,
            radius: 0.0,
            lifetime_ms: BEAM_LIFETIME_MS,
            damage: weapon.damage,
            beam: Some(BeamShape { width: BEAM_WIDTH, length: BEAM_LENGTH }),
        }];
    }

    let charged = weapon.projectile_kind == ProjectileKind::Charge;
    let ratio = if charged { charge_ratio.unwrap_or(0.0).clamp(0.0, 1.0) } else { 0.0 };
    let count = if charged {
        ((f64::from(weapon.burst) * ratio).round() as u32).max(1)
    } else {
        weapon.burst
    };
    let speed = weapon.projectile_speed * (1.0 + ratio);
    let damage = weapon.damage * (1.0 + ratio);
    let (radius, lifetime_ms) = if charged {
        (CHARGE_RADIUS, CHARGE_LIFETIME_MS)
    } else {
        (BULLET_RADIUS, BULLET_LIFETIME_MS)
    };
    let spread_rad = weapon.spread_deg * (PI / 180.0);

    (0..count)
        .map(|_| {
            let angle = aim_angle_rad + spread_rad * (rng.next_f64() * 2.0 - 1.0);
            ProjectileSpec {
                kind: weapon.projectile_kind,
                x: origin.x,
                y: origin.y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                angle_rad: angle,
                radius,
                lifetime_ms,
                damage,
                beam: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Vec2 = Vec2::new(100.0, 50.0);

    #[test]
    fn unknown_weapon_key_falls_back_to_default() {
        assert_eq!(WeaponKind::from_key("banana"), WeaponKind::MoodStabilizer);
        assert_eq!(WeaponKind::from_key("BetaBlocker"), WeaponKind::BetaBlocker);
        for kind in WeaponKind::ALL {
            assert_eq!(WeaponKind::from_key(kind.key()), kind);
        }
    }

    #[test]
    fn beam_emits_one_spec_and_draws_nothing() {
        let beam = create_weapon(WeaponKind::LucidityBeam);
        let mut rng = WardRng::from_seed_key("beam");
        let specs = generate_projectiles(ORIGIN, 0.5, &beam, &mut rng, Some(1.0));
        assert_eq!(specs.len(), 1);
        assert_eq!(rng.draw_count(), 0);
        assert_eq!(specs[0].kind, ProjectileKind::Beam);
        assert_eq!(specs[0].beam, Some(BeamShape { width: BEAM_WIDTH, length: BEAM_LENGTH }));
        assert_eq!(specs[0].angle_rad, 0.5);
    }

    #[test]
    fn six_round_burst_draws_six_times() {
        let scatter = create_weapon(WeaponKind::PlaceboScatter);
        assert_eq!(scatter.burst, 6);
        let mut rng = WardRng::from_seed_key("scatter");
        let specs = generate_projectiles(ORIGIN, 0.0, &scatter, &mut rng, None);
        assert_eq!(specs.len(), 6);
        assert_eq!(rng.draw_count(), 6);
    }

    #[test]
    fn spread_stays_inside_the_weapon_cone() {
        let smg = create_weapon(WeaponKind::AnxiolyticSmg);
        let limit = smg.spread_deg.to_radians() + 1e-12;
        let mut rng = WardRng::from_seed_key("cone");
        for _ in 0..500 {
            let spec = generate_projectiles(ORIGIN, 1.0, &smg, &mut rng, None)[0];
            assert!((spec.angle_rad - 1.0).abs() <= limit);
            let speed = (spec.vx * spec.vx + spec.vy * spec.vy).sqrt();
            assert!((speed - smg.projectile_speed).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_spread_fires_straight_but_still_draws() {
        let stabilizer = create_weapon(WeaponKind::MoodStabilizer);
        let mut rng = WardRng::from_seed_key("straight");
        let spec = generate_projectiles(ORIGIN, 0.0, &stabilizer, &mut rng, None)[0];
        assert_eq!(rng.draw_count(), 1);
        assert_eq!(spec.vy, 0.0);
        assert_eq!(spec.vx, stabilizer.projectile_speed);
        assert_eq!((spec.x, spec.y), (ORIGIN.x, ORIGIN.y));
    }

    #[test]
    fn charge_scales_count_speed_and_damage() {
        let cannon = create_weapon(WeaponKind::SedativeCannon);

        let mut rng = WardRng::from_seed_key("charge");
        let tap = generate_projectiles(ORIGIN, 0.0, &cannon, &mut rng, None);
        assert_eq!(tap.len(), 1, "an uncharged shot still fires once");
        assert_eq!(tap[0].damage, cannon.damage);

        let mut rng = WardRng::from_seed_key("charge");
        let full = generate_projectiles(ORIGIN, 0.0, &cannon, &mut rng, Some(1.0));
        assert_eq!(full.len(), 3);
        assert_eq!(rng.draw_count(), 3);
        assert_eq!(full[0].damage, cannon.damage * 2.0);

        let mut rng = WardRng::from_seed_key("charge");
        let half = generate_projectiles(ORIGIN, 0.0, &cannon, &mut rng, Some(0.5));
        assert_eq!(half.len(), 2, "1.5 rounds to 2");

        let mut rng = WardRng::from_seed_key("charge");
        let over = generate_projectiles(ORIGIN, 0.0, &cannon, &mut rng, Some(7.0));
        assert_eq!(over.len(), 3, "ratio is clamped to 1");
    }

    #[test]
    fn charge_ratio_is_ignored_for_bullets() {
        let blocker = create_weapon(WeaponKind::BetaBlocker);
        let mut rng = WardRng::from_seed_key("ignored");
        let spec = generate_projectiles(ORIGIN, 0.0, &blocker, &mut rng, Some(1.0))[0];
        assert_eq!(spec.damage, blocker.damage);
        assert_eq!(spec.vx, blocker.projectile_speed);
    }

    #[test]
    fn stats_adjust_speed_and_spread() {
        let stats = PlayerStats {
            projectile_speed: BASE_PROJECTILE_SPEED * 2.0,
            weapon_spread_deg: 6.0,
            ..PlayerStats::default()
        };
        let smg = create_weapon(WeaponKind::AnxiolyticSmg).with_stats(&stats);
        assert_eq!(smg.projectile_speed, 1_000.0);
        assert_eq!(smg.spread_deg, 14.0);
    }

    #[test]
    fn fire_time_adds_the_weapon_cooldown() {
        let smg = create_weapon(WeaponKind::AnxiolyticSmg);
        assert_eq!(next_fire_time(1_000, &smg), 1_100);
    }
}
