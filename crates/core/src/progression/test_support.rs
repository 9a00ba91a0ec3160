//! Shared fixtures for the `progression` submodule test suites.

use super::*;

pub(super) const REFERENCE_SEED: &str = "abc123";

pub(super) fn reference_run() -> Run {
    Run::start(REFERENCE_SEED, &WardConfig::default()).expect("default options are valid")
}

/// Walks through unlocked doors to `target`, completing every transition.
pub(super) fn walk_to(run: &mut Run, target: RoomId) {
    let route = run.route_to(target).unwrap_or_else(|| panic!("no open route to {target}"));
    for step in route {
        assert_eq!(run.handle(InboundEvent::DoorOverlap { to: step }), EventOutcome::Applied);
        assert_eq!(run.handle(InboundEvent::TransitionComplete), EventOutcome::Applied);
    }
    assert_eq!(run.current_room(), target);
}

pub(super) fn first_open_neighbor(run: &Run) -> RoomId {
    run.layout()
        .neighbors(run.current_room())
        .find(|&room| !run.door_locked(room))
        .expect("start room has an open door")
}

/// Walks to the first reachable room with enemies and returns it.
pub(super) fn walk_to_first_combat_room(run: &mut Run) -> Option<RoomId> {
    let room = run
        .layout()
        .rooms
        .iter()
        .map(|room| room.id)
        .find(|&room| run.layout().enemy_count_in(room) > 0 && run.route_to(room).is_some())?;
    walk_to(run, room);
    Some(room)
}

pub(super) fn collect_all_shards(run: &mut Run) {
    for room in run.layout().shard_rooms() {
        walk_to(run, room);
        assert_eq!(run.handle(InboundEvent::ShardPickup), EventOutcome::Applied);
    }
}

/// Reference run with every shard collected, standing in the boss room.
pub(super) fn run_at_boss() -> Run {
    let mut run = reference_run();
    collect_all_shards(&mut run);
    let boss = run.layout().boss_room.id;
    walk_to(&mut run, boss);
    run
}

pub(super) fn count_matching(
    events: &[OutboundEvent],
    predicate: impl Fn(&OutboundEvent) -> bool,
) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}
