pub mod config;
pub mod error;
pub mod journal;
pub mod journal_file;
pub mod loadout;
pub mod mapgen;
pub mod persistence;
pub mod progression;
pub mod replay;
pub mod rng;
pub mod seed;

pub use config::{RunConfig, WardConfig};
pub use error::{ConfigError, GenerationError};
pub use journal::{InputJournal, InputRecord};
pub use journal_file::{
    ChainHead, JournalLoadError, JournalWriter, LoadedJournal, load_journal_from_file,
    save_journal_to_file,
};
pub use loadout::{PlayerStats, TraitKind, Vec2, Weapon, WeaponKind};
pub use mapgen::{GenerationOptions, Layout, LinkStrategy, RoomId, RoomType, WardGenerator};
pub use progression::*;
pub use replay::*;
pub use rng::WardRng;
pub use seed::{SeedChoice, resolve_seed};
