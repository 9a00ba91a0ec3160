use super::*;
use crate::config::WardConfig;
use crate::loadout::Vec2;
use crate::mapgen::{GenerationOptions, RoomId, generate};
use crate::progression::{InboundEvent, RunResult};

/// Feeds events to a live run while recording them, mirroring how a front end journals play.
struct Recorder {
    run: Run,
    journal: InputJournal,
}

impl Recorder {
    fn start(seed: &str) -> Self {
        let config = WardConfig::default();
        let run = Run::start(seed, &config).expect("default config starts a run");
        let fingerprint = run.layout().fingerprint();
        Self { run, journal: InputJournal::new(seed, config, fingerprint) }
    }

    fn feed(&mut self, event: InboundEvent) -> EventOutcome {
        self.journal.append(event.clone());
        self.run.handle(event)
    }

    fn walk_to(&mut self, target: RoomId) {
        let route = self.run.route_to(target).expect("open route");
        for step in route {
            self.feed(InboundEvent::DoorOverlap { to: step });
            self.feed(InboundEvent::TransitionComplete);
        }
    }

    fn discharge(&mut self) {
        for room in self.run.layout().shard_rooms() {
            self.walk_to(room);
            self.feed(InboundEvent::ShardPickup);
        }
        self.walk_to(self.run.layout().boss_room.id);
        self.feed(InboundEvent::BossHit { damage: 400 });
        self.walk_to(self.run.layout().exit_room.id);
        self.feed(InboundEvent::ExitInteract);
    }
}

fn reference_fingerprint() -> u64 {
    generate("abc123", GenerationOptions::default()).expect("default options").fingerprint()
}

#[test]
fn replay_reproduces_a_discharged_run() {
    let mut recorder = Recorder::start("abc123");
    recorder.feed(InboundEvent::Tick { elapsed_ms: 250 });
    recorder.discharge();
    assert!(recorder.run.is_over());

    let result = replay_to_end(&recorder.journal).expect("journal replays");
    assert_eq!(result.final_snapshot_hash, recorder.run.snapshot_hash());
    assert_eq!(result.outcome.as_ref().map(|summary| summary.result), Some(RunResult::Discharged));
    assert_eq!(result.applied + result.ignored, recorder.journal.len());
    assert_eq!(result.ignored, 0);
}

#[test]
fn replay_reproduces_rng_consumed_by_gameplay() {
    let mut recorder = Recorder::start("ward");
    for angle in [0.0, 1.0, 2.0] {
        recorder.feed(InboundEvent::FireWeapon {
            origin: Vec2::new(0.0, 0.0),
            aim_angle_rad: angle,
            charge_ratio: None,
        });
        recorder.feed(InboundEvent::Tick { elapsed_ms: 1_000 });
    }

    let result = replay_to_end(&recorder.journal).expect("journal replays");
    assert_eq!(result.final_snapshot_hash, recorder.run.snapshot_hash());
}

#[test]
fn events_after_the_run_ends_count_as_ignored() {
    let mut recorder = Recorder::start("abc123");
    recorder.feed(InboundEvent::PlayerHit { damage: 10_000 });
    recorder.feed(InboundEvent::ToggleLayer);

    let result = replay_to_end(&recorder.journal).expect("journal replays");
    assert_eq!(result.applied, 1);
    assert_eq!(result.ignored, 1);
    assert_eq!(result.outcome.map(|summary| summary.result), Some(RunResult::Died));
}

#[test]
fn sequence_gap_is_rejected() {
    let fingerprint = reference_fingerprint();
    let mut journal = InputJournal::new("abc123", WardConfig::default(), fingerprint);
    journal.append(InboundEvent::ToggleLayer);
    journal.append(InboundEvent::ToggleLayer);
    journal.inputs.remove(0);

    assert_eq!(
        replay_to_end(&journal),
        Err(ReplayError::SequenceGap { expected: 0, found: 1 })
    );
}

#[test]
fn invalid_generation_options_surface_as_errors() {
    let mut config = WardConfig::default();
    config.generation = GenerationOptions { room_count: 2, ..GenerationOptions::default() };
    let journal = InputJournal::new("abc123", config, 0);

    assert_eq!(
        replay_to_end(&journal),
        Err(ReplayError::Generation(GenerationError::TooFewRooms { room_count: 2 }))
    );
}

#[test]
fn journal_for_a_different_ward_is_refused() {
    let mut recorder = Recorder::start("abc123");
    recorder.feed(InboundEvent::ToggleLayer);
    let generated = recorder.journal.layout_fingerprint;
    recorder.journal.layout_fingerprint ^= 1;

    assert_eq!(
        replay_to_end(&recorder.journal),
        Err(ReplayError::LayoutMismatch { recorded: generated ^ 1, generated })
    );
    assert!(replay_journal_inputs(&recorder.journal).is_err());
}

#[test]
fn changed_generation_options_invalidate_the_journal() {
    let mut recorder = Recorder::start("abc123");
    recorder.feed(InboundEvent::Tick { elapsed_ms: 16 });
    recorder.journal.config.generation.room_count += 2;

    let err = replay_to_end(&recorder.journal).expect_err("layout no longer matches");
    assert!(matches!(err, ReplayError::LayoutMismatch { .. }), "got {err}");
}
