use std::f64::consts::TAU;

use anyhow::{Result, bail};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use ward_core::{EventOutcome, IgnoreReason, InboundEvent, Run, Vec2, WardConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of wards to hammer
    #[arg(short, long, default_value_t = 100)]
    runs: u32,
    /// Events fed to each ward
    #[arg(short, long, default_value_t = 1000)]
    events: u32,
}

fn below(rng: &mut ChaCha8Rng, bound: u64) -> u64 {
    rng.next_u64() % bound
}

fn random_event(rng: &mut ChaCha8Rng, run: &Run) -> InboundEvent {
    match below(rng, 12) {
        0 | 1 => {
            // Bias toward unlocked doors so the walk actually gets somewhere
            let neighbors: Vec<_> = run
                .layout()
                .neighbors(run.current_room())
                .filter(|&room| !run.door_locked(room) || below(rng, 4) == 0)
                .collect();
            match neighbors.get(below(rng, neighbors.len().max(1) as u64) as usize) {
                Some(&to) => InboundEvent::DoorOverlap { to },
                None => InboundEvent::TransitionComplete,
            }
        }
        2 | 3 => InboundEvent::TransitionComplete,
        4 => InboundEvent::ShardPickup,
        5 => InboundEvent::LootPickup,
        6 => match run.live_enemies().next() {
            Some((enemy, _)) => InboundEvent::EnemyKilled { enemy },
            None => InboundEvent::BossHit { damage: below(rng, 200) as i32 },
        },
        7 => InboundEvent::PlayerHit { damage: below(rng, 8) as i32 },
        8 => InboundEvent::FireWeapon {
            origin: Vec2::new(0.0, 0.0),
            aim_angle_rad: (below(rng, 360) as f64 / 360.0) * TAU,
            charge_ratio: (below(rng, 2) == 0).then(|| below(rng, 101) as f64 / 100.0),
        },
        9 => InboundEvent::ExitInteract,
        10 => InboundEvent::ToggleLayer,
        _ => InboundEvent::Tick { elapsed_ms: below(rng, 1_000) },
    }
}

fn check_invariants(run: &Run) -> Result<()> {
    let state = run.state();
    if run.health() > run.stats().max_health {
        bail!("health {} above max {}", run.health(), run.stats().max_health);
    }
    if !state.visited.contains(&state.current_room_id) {
        bail!("current room {} was never entered", state.current_room_id);
    }
    if state.boss_unlocked && state.collected_shards_total < run.shards_required() {
        bail!("boss unlocked with {} shards", state.collected_shards_total);
    }
    if state.boss_defeated && !state.boss_unlocked {
        bail!("boss defeated behind a locked door");
    }
    if run.live_enemies().any(|(_, enemy)| enemy.room != state.current_room_id) {
        bail!("enemy left alive outside room {}", state.current_room_id);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} wards...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut finished = 0;

    for index in 0..args.runs {
        let seed = format!("fuzz-{}-{index}", args.seed);
        let mut run = Run::start(&seed, &WardConfig::default())?;

        for step in 0..args.events {
            let event = random_event(&mut rng, &run);
            let was_over = run.is_over();
            let outcome = run.handle(event.clone());
            run.drain_events();

            if was_over && outcome != EventOutcome::Ignored(IgnoreReason::RunOver) {
                bail!("seed {seed} step {step}: {event:?} applied after the run ended");
            }
            if let Err(error) = check_invariants(&run) {
                bail!("seed {seed} step {step} after {event:?}: {error}");
            }
        }

        if let Some(summary) = run.outcome() {
            finished += 1;
            println!("{seed}: {:?} after {}s", summary.result, summary.duration_sec);
        }
    }

    println!("Fuzz complete: {finished}/{} wards reached an ending.", args.runs);
    Ok(())
}
