use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use ward_core::persistence::{FileStore, RunRecord, SaveSlots};
use ward_core::{
    EventOutcome, InboundEvent, InputJournal, JournalWriter, Layout, LinkStrategy, RoomId, RoomType,
    Run, Vec2, WardConfig, load_journal_from_file, replay_to_end, resolve_seed,
};

#[derive(Parser)]
#[command(author, version, about = "Seeded ward generator and headless run driver")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a ward and print its layout
    Generate {
        #[command(flatten)]
        ward: WardArgs,
        /// Print the full layout as JSON instead of a map
        #[arg(long)]
        json: bool,
    },
    /// Play a scripted run from the start room to discharge
    Play {
        #[command(flatten)]
        ward: WardArgs,
        /// Record every inbound event to this JSONL journal
        #[arg(long)]
        journal: Option<PathBuf>,
        /// Directory for saved seeds and runs
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },
    /// Replay a JSONL journal and print the final state hash
    Replay {
        #[arg(short, long)]
        journal: PathBuf,
    },
    /// Print the seed of the last played run
    LastSeed {
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },
}

#[derive(ClapArgs)]
struct WardArgs {
    /// Seed key; a random one is generated when omitted
    #[arg(short, long)]
    seed: Option<String>,
    /// TOML file with generation and run settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    rooms: Option<usize>,
    #[arg(long)]
    grid: Option<u32>,
    /// Only join orthogonal neighbours with doors
    #[arg(long)]
    grid_adjacent: bool,
}

impl WardArgs {
    fn config(&self) -> Result<WardConfig> {
        let mut config = match &self.config {
            Some(path) => WardConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => WardConfig::default(),
        };
        if let Some(rooms) = self.rooms {
            config.generation.room_count = rooms;
        }
        if let Some(grid) = self.grid {
            config.generation.grid_size = grid;
        }
        if self.grid_adjacent {
            config.generation.link_strategy = LinkStrategy::GridAdjacent;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match Args::parse().command {
        Command::Generate { ward, json } => generate(&ward, json),
        Command::Play { ward, journal, save_dir } => {
            play(&ward, journal.as_deref(), save_dir.as_deref())
        }
        Command::Replay { journal } => replay(&journal),
        Command::LastSeed { save_dir } => last_seed(save_dir.as_deref()),
    }
}

fn generate(ward: &WardArgs, json: bool) -> Result<()> {
    let config = ward.config()?;
    let seed = resolve_seed(ward.seed.as_deref()).into_value();
    let layout = ward_core::mapgen::generate(&seed, config.generation)
        .with_context(|| format!("Failed to generate ward for seed '{seed}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        print_layout(&layout);
    }
    Ok(())
}

fn print_layout(layout: &Layout) {
    println!("Seed: {}", layout.seed);
    println!("Fingerprint: {:016x}", layout.fingerprint());
    let grid = layout.options.grid_size as i32;
    for y in 0..grid {
        let row: String = (0..grid)
            .map(|x| match layout.room_type(RoomId::new(x, y)) {
                Some(RoomType::Start) => 'S',
                Some(RoomType::Combat) => 'C',
                Some(RoomType::Loot) => 'L',
                Some(RoomType::Event) => 'E',
                Some(RoomType::Boss) => 'B',
                Some(RoomType::Exit) => 'X',
                None => '.',
            })
            .collect();
        println!("  {row}");
    }
    for door in &layout.doors {
        println!("Door: {} <-> {}", door.from, door.to);
    }
    for placement in &layout.loot {
        println!("Loot: {:?} in {}", placement.kind, placement.room_id);
    }
    for spawn in &layout.enemies {
        println!("Enemies: {} in {}", spawn.count, spawn.room_id);
    }
}

/// Live run plus the optional journal it is recorded to.
struct Session {
    run: Run,
    writer: Option<JournalWriter>,
}

impl Session {
    fn feed(&mut self, event: InboundEvent) -> Result<EventOutcome> {
        if let Some(writer) = &mut self.writer {
            writer.append(&event).context("Failed to append to journal")?;
        }
        let outcome = self.run.handle(event);
        for emitted in self.run.drain_events() {
            debug!(?emitted, "outbound");
        }
        Ok(outcome)
    }

    fn walk_to(&mut self, target: RoomId) -> Result<()> {
        let route = self
            .run
            .route_to(target)
            .ok_or_else(|| anyhow!("no open route to room {target}"))?;
        for step in route {
            self.feed(InboundEvent::DoorOverlap { to: step })?;
            self.feed(InboundEvent::TransitionComplete)?;
            self.fight()?;
            self.feed(InboundEvent::LootPickup)?;
            self.feed(InboundEvent::Tick { elapsed_ms: 1_500 })?;
        }
        Ok(())
    }

    /// One volley at the room, then every live enemy goes down.
    fn fight(&mut self) -> Result<()> {
        let enemies: Vec<_> = self.run.live_enemies().map(|(id, _)| id).collect();
        if enemies.is_empty() {
            return Ok(());
        }
        self.feed(InboundEvent::FireWeapon {
            origin: Vec2::new(0.0, 0.0),
            aim_angle_rad: 0.0,
            charge_ratio: None,
        })?;
        for enemy in enemies {
            self.feed(InboundEvent::EnemyKilled { enemy })?;
        }
        Ok(())
    }
}

fn play(ward: &WardArgs, journal: Option<&Path>, save_dir: Option<&Path>) -> Result<()> {
    let config = ward.config()?;
    let seed = resolve_seed(ward.seed.as_deref()).into_value();
    let mut slots = SaveSlots::new(file_store(save_dir)?);
    slots.save_seed(&seed);

    let run = Run::start(&seed, &config)
        .with_context(|| format!("Failed to start run for seed '{seed}'"))?;
    let header = InputJournal::new(&seed, config.clone(), run.layout().fingerprint());
    let writer = journal
        .map(|path| {
            JournalWriter::create(path, &header)
                .with_context(|| format!("Failed to create journal: {}", path.display()))
        })
        .transpose()?;
    let mut session = Session { run, writer };
    info!(seed = %seed, "scripted run starting");

    for room in session.run.layout().shard_rooms() {
        session.walk_to(room)?;
        session.feed(InboundEvent::ShardPickup)?;
        slots.save_run_data(&RunRecord::capture(&session.run));
    }
    let boss = session.run.layout().boss_room.id;
    session.walk_to(boss)?;
    let boss_health = session.run.boss_health();
    session.feed(InboundEvent::BossHit { damage: boss_health })?;
    let exit = session.run.layout().exit_room.id;
    session.walk_to(exit)?;
    session.feed(InboundEvent::ExitInteract)?;

    let summary =
        session.run.outcome().ok_or_else(|| anyhow!("scripted run did not finish"))?.clone();
    slots.clear_run();

    println!("Seed: {}", summary.seed);
    println!("Result: {:?}", summary.result);
    println!("Duration: {}s", summary.duration_sec);
    println!("Traits: {:?}", summary.traits);
    println!("Snapshot Hash: 0x{:016x}", session.run.snapshot_hash());
    Ok(())
}

fn replay(path: &Path) -> Result<()> {
    let loaded = load_journal_from_file(path)
        .with_context(|| format!("Failed to load journal file: {}", path.display()))?;
    let result = replay_to_end(&loaded.journal).context("Replay failed during execution")?;

    println!("Replay complete.");
    println!("Seed: {}", loaded.journal.seed);
    println!("Events: {} applied, {} ignored", result.applied, result.ignored);
    match &result.outcome {
        Some(summary) => println!("Outcome: {:?} after {}s", summary.result, summary.duration_sec),
        None => println!("Outcome: run still in progress"),
    }
    println!("Snapshot Hash: 0x{:016x}", result.final_snapshot_hash);
    Ok(())
}

fn last_seed(save_dir: Option<&Path>) -> Result<()> {
    let slots = SaveSlots::new(file_store(save_dir)?);
    match slots.load_last_seed() {
        Some(seed) => println!("{seed}"),
        None => println!("No seed saved yet."),
    }
    if let Some(record) = slots.load_last_run() {
        println!("Unfinished run: seed {} in room {}", record.seed, record.current_room);
    }
    Ok(())
}

fn file_store(save_dir: Option<&Path>) -> Result<FileStore> {
    let dir = match save_dir {
        Some(dir) => dir.to_path_buf(),
        None => FileStore::get_default_dir()
            .context("Could not determine a save directory; pass --save-dir")?,
    };
    Ok(FileStore::new(dir))
}
