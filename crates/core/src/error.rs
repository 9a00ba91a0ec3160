//! Error types surfaced to callers of the generator and configuration loader.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Generation fails fast on option combinations that can never produce a valid ward.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("room count {room_count} is too small: start, boss and exit need 3 distinct rooms")]
    TooFewRooms { room_count: usize },
    #[error(
        "room count {room_count} exceeds the {cells} cells of a {grid_size}x{grid_size} grid"
    )]
    RoomCountExceedsGrid { room_count: usize, grid_size: u32, cells: u64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
