use std::collections::BTreeSet;

use super::test_support::*;
use super::*;
use crate::error::GenerationError;
use crate::loadout::Vec2;
use crate::mapgen::GenerationOptions;

fn spawned_in(events: &[OutboundEvent], room: RoomId) -> Option<usize> {
    events.iter().find_map(|event| match event {
        OutboundEvent::EnemiesSpawned { room: spawned, enemies } if *spawned == room => {
            Some(enemies.len())
        }
        _ => None,
    })
}

fn defeat_boss(run: &mut Run) {
    let damage = run.boss_health();
    assert_eq!(run.handle(InboundEvent::BossHit { damage }), EventOutcome::Applied);
}

#[test]
fn run_starts_in_the_start_room() {
    let run = reference_run();
    let start = run.layout().player_start.id;
    assert_eq!(run.current_room(), start);
    assert_eq!(run.state().visited, BTreeSet::from([start]));
    assert!(run.state().room_state(start).is_some());
    assert!(run.state().is_cleared(start), "the start room holds no enemies");
    assert_eq!(run.state().collected_shards_total, 0);
    assert!(!run.state().boss_unlocked);
    assert!(!run.state().boss_defeated);
    assert_eq!(run.traits().len(), 3);
    assert_eq!(run.health(), run.stats().max_health);
}

#[test]
fn gameplay_draws_continue_the_generation_stream() {
    let run = reference_run();
    let mut rng = WardRng::from_seed_key(REFERENCE_SEED);
    let layout = WardGenerator::new(GenerationOptions::default())
        .generate_with(REFERENCE_SEED, &mut rng)
        .expect("generate");
    assert_eq!(run.layout(), &layout);
    assert_eq!(run.traits(), roll_starting_traits(&mut rng).as_slice());
    assert_eq!(run.rng(), &rng);
}

#[test]
fn invalid_generation_options_fail_the_start() {
    let config = WardConfig {
        generation: GenerationOptions { room_count: 2, ..GenerationOptions::default() },
        ..WardConfig::default()
    };
    assert_eq!(
        Run::start("any", &config).err(),
        Some(GenerationError::TooFewRooms { room_count: 2 })
    );
}

#[test]
fn reference_run_reaches_discharge() {
    let mut run = reference_run();

    let mut shard_rooms = run.layout().shard_rooms();
    shard_rooms.reverse();
    assert_eq!(shard_rooms.len(), 3);
    for room in shard_rooms {
        assert!(run.door_locked(run.layout().boss_room.id));
        walk_to(&mut run, room);
        assert_eq!(run.handle(InboundEvent::ShardPickup), EventOutcome::Applied);
    }
    assert!(run.state().boss_unlocked);
    assert!(!run.door_locked(run.layout().boss_room.id));
    assert!(run.door_locked(run.layout().exit_room.id));

    let boss = run.layout().boss_room.id;
    walk_to(&mut run, boss);
    defeat_boss(&mut run);
    assert!(!run.door_locked(run.layout().exit_room.id));

    let exit = run.layout().exit_room.id;
    walk_to(&mut run, exit);
    run.handle(InboundEvent::Tick { elapsed_ms: 2_500 });
    assert_eq!(run.handle(InboundEvent::ExitInteract), EventOutcome::Applied);

    let summary = run.outcome().expect("run is over").clone();
    assert_eq!(summary.result, RunResult::Discharged);
    assert_eq!(summary.seed, REFERENCE_SEED);
    assert_eq!(summary.duration_sec, 2);
    assert_eq!(summary.traits, run.traits());

    let events = run.drain_events();
    assert_eq!(events.last(), Some(&OutboundEvent::RunEnded(summary)));
    assert_eq!(
        run.handle(InboundEvent::Tick { elapsed_ms: 10 }),
        EventOutcome::Ignored(IgnoreReason::RunOver)
    );
    assert!(run.drain_events().is_empty());
}

#[test]
fn exit_interaction_before_the_boss_falls_is_refused() {
    let mut run = run_at_boss();
    let boss_health = run.boss_health();
    run.handle(InboundEvent::BossHit { damage: boss_health / 2 });
    assert_eq!(
        run.handle(InboundEvent::ExitInteract),
        EventOutcome::Ignored(IgnoreReason::NotInExitRoom)
    );
    assert!(run.route_to(run.layout().exit_room.id).is_none());
}

#[test]
fn reentering_a_cleared_room_spawns_nothing() {
    let mut run = reference_run();
    let room = walk_to_first_combat_room(&mut run).expect("reference ward has enemies");
    let ids: Vec<EnemyId> = run.live_enemies().map(|(id, _)| id).collect();
    for enemy in ids {
        run.handle(InboundEvent::EnemyKilled { enemy });
    }
    assert!(run.state().is_cleared(room));

    let start = run.layout().player_start.id;
    walk_to(&mut run, start);
    run.drain_events();
    walk_to(&mut run, room);

    let events = run.drain_events();
    assert_eq!(spawned_in(&events, room), None);
    assert_eq!(run.live_enemies().count(), 0);
    assert!(events.iter().any(|event| matches!(
        event,
        OutboundEvent::RoomEntered { room: entered, first_visit: false, .. } if *entered == room
    )));
}

#[test]
fn leaving_an_uncleared_room_respawns_its_full_count() {
    let mut run = reference_run();
    let room = walk_to_first_combat_room(&mut run).expect("reference ward has enemies");
    let placed = run.layout().enemy_count_in(room) as usize;
    let first = run.live_enemies().map(|(id, _)| id).next().expect("enemy");
    run.handle(InboundEvent::EnemyHit { enemy: first, damage: 1 });

    let start = run.layout().player_start.id;
    walk_to(&mut run, start);
    assert_eq!(run.live_enemies().count(), 0);
    run.drain_events();

    walk_to(&mut run, room);
    let events = run.drain_events();
    assert_eq!(spawned_in(&events, room), Some(placed));
    assert!(run.live_enemies().all(|(_, enemy)| enemy.health == 20 && enemy.room == room));
}

#[test]
fn ward_without_shards_starts_with_the_boss_door_open() {
    let config = WardConfig {
        generation: GenerationOptions { room_count: 3, ..GenerationOptions::default() },
        ..WardConfig::default()
    };
    let mut run = Run::start("tiny", &config).expect("start");
    assert_eq!(run.shards_required(), 0);
    assert!(run.state().boss_unlocked);
    assert!(run.door_locked(run.layout().exit_room.id));

    let boss = run.layout().boss_room.id;
    walk_to(&mut run, boss);
    defeat_boss(&mut run);
    let exit = run.layout().exit_room.id;
    walk_to(&mut run, exit);
    assert_eq!(run.handle(InboundEvent::ExitInteract), EventOutcome::Applied);
    assert_eq!(run.outcome().map(|summary| summary.result), Some(RunResult::Discharged));
}

#[test]
fn identical_inputs_replay_identically() {
    let script = |run: &mut Run| {
        let room = run.layout().shard_rooms()[0];
        walk_to(run, room);
        run.handle(InboundEvent::ShardPickup);
        run.handle(InboundEvent::FireWeapon {
            origin: Vec2::new(10.0, 20.0),
            aim_angle_rad: 1.25,
            charge_ratio: None,
        });
        run.handle(InboundEvent::Tick { elapsed_ms: 400 });
        run.drain_events()
    };

    let mut left = reference_run();
    let mut right = reference_run();
    assert_eq!(script(&mut left), script(&mut right));
    assert_eq!(left.snapshot_hash(), right.snapshot_hash());
}

#[test]
fn door_changes_are_announced_on_every_gate_flip() {
    let mut run = reference_run();
    let rooms = run.layout().shard_rooms();
    let (last, rest) = rooms.split_last().expect("reference ward has shards");
    for &room in rest {
        walk_to(&mut run, room);
        run.handle(InboundEvent::ShardPickup);
    }
    walk_to(&mut run, *last);
    run.drain_events();

    run.handle(InboundEvent::ShardPickup);
    let events = run.drain_events();
    let unlocked = events
        .iter()
        .position(|event| matches!(event, OutboundEvent::BossUnlocked))
        .expect("last shard unlocks the boss");
    let redrawn = events
        .iter()
        .rposition(|event| matches!(event, OutboundEvent::DoorsChanged { .. }))
        .expect("gate flip redraws doors");
    assert!(redrawn > unlocked);
}
