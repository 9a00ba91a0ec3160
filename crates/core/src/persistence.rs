//! Best-effort save slots over an injected key-value store.
//!
//! Stores report failures as `io::Result`; `SaveSlots` logs and swallows them so a broken disk
//! never interrupts a run.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::mapgen::RoomId;
use crate::progression::{Run, RunResult};

pub const LAST_SEED_KEY: &str = "last_seed";
pub const LAST_RUN_KEY: &str = "last_run";
pub const RUN_RECORD_FORMAT_VERSION: u32 = 1;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn delete(&mut self, key: &str) -> io::Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn get_default_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "Ward").map(|proj_dirs| proj_dirs.data_dir().to_path_buf())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
            .collect();
        self.dir.join(format!("{file_stem}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

/// Enough of a run to show a "last run" summary or resume the stream position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub format_version: u32,
    pub seed: String,
    pub rng_state: u32,
    pub rng_draws: u64,
    pub current_room: RoomId,
    pub visited: BTreeSet<RoomId>,
    pub collected_shards_total: u32,
    pub boss_unlocked: bool,
    pub boss_defeated: bool,
    pub elapsed_ms: u64,
    pub result: Option<RunResult>,
    pub snapshot_hash_hex: String,
}

impl RunRecord {
    pub fn capture(run: &Run) -> Self {
        let state = run.state();
        Self {
            format_version: RUN_RECORD_FORMAT_VERSION,
            seed: run.seed().to_string(),
            rng_state: run.rng().state(),
            rng_draws: run.rng().draw_count(),
            current_room: state.current_room_id,
            visited: state.visited.clone(),
            collected_shards_total: state.collected_shards_total,
            boss_unlocked: state.boss_unlocked,
            boss_defeated: state.boss_defeated,
            elapsed_ms: run.elapsed_ms(),
            result: run.outcome().map(|summary| summary.result),
            snapshot_hash_hex: format!("0x{:016x}", run.snapshot_hash()),
        }
    }
}

pub struct SaveSlots<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SaveSlots<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save_seed(&mut self, seed: &str) {
        self.write_json(LAST_SEED_KEY, seed);
    }

    pub fn load_last_seed(&self) -> Option<String> {
        self.read_json(LAST_SEED_KEY)
    }

    pub fn save_run_data(&mut self, record: &RunRecord) {
        self.write_json(LAST_RUN_KEY, record);
    }

    pub fn load_last_run(&self) -> Option<RunRecord> {
        self.read_json(LAST_RUN_KEY)
    }

    pub fn clear_run(&mut self) {
        if let Err(err) = self.store.delete(LAST_RUN_KEY) {
            warn!(key = LAST_RUN_KEY, error = %err, "failed to clear saved run");
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let json = match serde_json::to_string_pretty(value) {
            Ok(json) => json,
            Err(err) => {
                warn!(key, error = %err, "failed to encode save data");
                return;
            }
        };
        if let Err(err) = self.store.set(key, &json) {
            warn!(key, error = %err, "failed to write save data");
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key, error = %err, "failed to read save data");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable save data");
                None
            }
        }
    }
}
