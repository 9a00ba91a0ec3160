//! Room-type designation plus the loot and enemy rolls attached to each type.

use crate::rng::WardRng;

use super::graph::{Adjacency, reachable_from};
use super::model::{EnemySpawn, LootKind, LootPlacement, RoomId, RoomType};
use super::shards::SHARDS_PER_WARD;

const EVENT_ROLL_THRESHOLD: f64 = 0.20;
const LOOT_ROLL_THRESHOLD: f64 = 0.45;

const COMBAT_CONSUMABLE_CHANCE: f64 = 0.15;
const COMBAT_MAX_EXTRA_ENEMIES: usize = 3;

const LOOT_WEAPON_THRESHOLD: f64 = 0.5;
const LOOT_TRAIT_THRESHOLD: f64 = 0.8;
const LOOT_GUARD_CHANCE: f64 = 0.25;

const EVENT_TRAIT_CHANCE: f64 = 0.5;
const EVENT_ENEMY_CHANCE: f64 = 0.3;
const EVENT_MAX_EXTRA_ENEMIES: usize = 2;

pub(super) struct RoleAssignment {
    /// Parallel to the coordinate list.
    pub(super) room_types: Vec<RoomType>,
    pub(super) boss_index: usize,
    pub(super) exit_index: usize,
    pub(super) loot: Vec<LootPlacement>,
    pub(super) enemies: Vec<EnemySpawn>,
}

/// Start is always the first room. Boss and Exit come from a seeded shuffle of the other rooms:
/// Boss and Exit are the first pair where the exit does not stand between Start and Boss.
/// Needs at least three rooms.
pub(super) fn assign_roles(
    rng: &mut WardRng,
    coords: &[RoomId],
    adjacency: &Adjacency,
) -> RoleAssignment {
    debug_assert!(coords.len() >= 3);
    let mut order: Vec<usize> = (0..coords.len()).collect();
    rng.shuffle(&mut order);
    let designated: Vec<usize> = order.into_iter().filter(|&index| index != 0).collect();
    let (boss_index, exit_index) = pick_boss_and_exit(&designated, coords, adjacency);

    let mut room_types = vec![RoomType::Combat; coords.len()];
    room_types[0] = RoomType::Start;
    room_types[boss_index] = RoomType::Boss;
    room_types[exit_index] = RoomType::Exit;

    let mut loot = Vec::new();
    let mut enemies = Vec::new();
    for (index, &room_id) in coords.iter().enumerate() {
        if index == 0 || index == boss_index || index == exit_index {
            continue;
        }
        let room_type = roll_room_type(rng);
        room_types[index] = room_type;
        roll_contents(rng, room_id, room_type, &mut loot, &mut enemies);
    }

    RoleAssignment { room_types, boss_index, exit_index, loot, enemies }
}

/// First shuffled (boss, exit) pair where the boss is reachable from Start without crossing
/// the exit room and enough rooms stay open for every shard. When no pair leaves room for all
/// shards, the first pair with a reachable boss wins.
fn pick_boss_and_exit(
    designated: &[usize],
    coords: &[RoomId],
    adjacency: &Adjacency,
) -> (usize, usize) {
    let start = coords[0];
    let pairs = || {
        designated.iter().flat_map(move |&boss| {
            designated.iter().filter(move |&&exit| exit != boss).map(move |&exit| (boss, exit))
        })
    };
    let boss_reachable = |&(boss, exit): &(usize, usize)| {
        reachable_from(adjacency, start, &[coords[exit]]).contains(&coords[boss])
    };
    let shard_capacity = |(boss, exit): (usize, usize)| {
        reachable_from(adjacency, start, &[coords[boss], coords[exit]])
            .iter()
            .filter(|&&room| room != start)
            .count()
    };

    pairs()
        .filter(boss_reachable)
        .find(|&pair| shard_capacity(pair) >= SHARDS_PER_WARD)
        .or_else(|| pairs().find(boss_reachable))
        .unwrap_or((
            designated.first().copied().unwrap_or(1),
            designated.get(1).copied().unwrap_or(2),
        ))
}

fn roll_room_type(rng: &mut WardRng) -> RoomType {
    let roll = rng.next_f64();
    if roll < EVENT_ROLL_THRESHOLD {
        RoomType::Event
    } else if roll < LOOT_ROLL_THRESHOLD {
        RoomType::Loot
    } else {
        RoomType::Combat
    }
}

fn roll_contents(
    rng: &mut WardRng,
    room_id: RoomId,
    room_type: RoomType,
    loot: &mut Vec<LootPlacement>,
    enemies: &mut Vec<EnemySpawn>,
) {
    match room_type {
        RoomType::Combat => {
            let count = 1 + rng.below(COMBAT_MAX_EXTRA_ENEMIES) as u32;
            enemies.push(EnemySpawn { room_id, count });
            if rng.next_f64() < COMBAT_CONSUMABLE_CHANCE {
                loot.push(LootPlacement { kind: LootKind::Consumable, room_id });
            }
        }
        RoomType::Loot => {
            let pick = rng.next_f64();
            let kind = if pick < LOOT_WEAPON_THRESHOLD {
                LootKind::Weapon
            } else if pick < LOOT_TRAIT_THRESHOLD {
                LootKind::Trait
            } else {
                LootKind::Consumable
            };
            loot.push(LootPlacement { kind, room_id });
            if rng.next_f64() < LOOT_GUARD_CHANCE {
                enemies.push(EnemySpawn { room_id, count: 1 });
            }
        }
        RoomType::Event => {
            if rng.next_f64() < EVENT_TRAIT_CHANCE {
                loot.push(LootPlacement { kind: LootKind::Trait, room_id });
            }
            if rng.next_f64() < EVENT_ENEMY_CHANCE {
                let count = 1 + rng.below(EVENT_MAX_EXTRA_ENEMIES) as u32;
                enemies.push(EnemySpawn { room_id, count });
            }
        }
        RoomType::Start | RoomType::Boss | RoomType::Exit => {}
    }
}
