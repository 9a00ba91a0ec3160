//! Generation knobs and the fail-fast checks that guard them.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

pub const DEFAULT_ROOM_COUNT: usize = 8;
pub const DEFAULT_GRID_SIZE: u32 = 5;
/// Start, Boss and Exit must land in distinct rooms.
pub const MIN_ROOM_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkStrategy {
    /// Greedy spanning tree over squared Euclidean distance; doors may span several cells.
    #[default]
    NearestFrontier,
    /// Doors only join orthogonal neighbours; gaps are bridged with stepping-stone rooms.
    GridAdjacent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub room_count: usize,
    pub grid_size: u32,
    pub link_strategy: LinkStrategy,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            room_count: DEFAULT_ROOM_COUNT,
            grid_size: DEFAULT_GRID_SIZE,
            link_strategy: LinkStrategy::default(),
        }
    }
}

impl GenerationOptions {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.grid_size == 0 {
            return Err(GenerationError::EmptyGrid);
        }
        if self.room_count < MIN_ROOM_COUNT {
            return Err(GenerationError::TooFewRooms { room_count: self.room_count });
        }
        let cells = u64::from(self.grid_size) * u64::from(self.grid_size);
        if self.room_count as u64 > cells {
            return Err(GenerationError::RoomCountExceedsGrid {
                room_count: self.room_count,
                grid_size: self.grid_size,
                cells,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GenerationOptions::default().validate(), Ok(()));
    }

    #[test]
    fn full_grid_is_allowed_but_overflow_is_not() {
        let full = GenerationOptions { room_count: 25, ..GenerationOptions::default() };
        assert_eq!(full.validate(), Ok(()));

        let overflow = GenerationOptions { room_count: 26, ..GenerationOptions::default() };
        assert_eq!(
            overflow.validate(),
            Err(GenerationError::RoomCountExceedsGrid { room_count: 26, grid_size: 5, cells: 25 })
        );
    }

    #[test]
    fn rejects_empty_grid_and_tiny_room_counts() {
        let empty = GenerationOptions { grid_size: 0, ..GenerationOptions::default() };
        assert_eq!(empty.validate(), Err(GenerationError::EmptyGrid));

        let tiny = GenerationOptions { room_count: 2, ..GenerationOptions::default() };
        assert_eq!(tiny.validate(), Err(GenerationError::TooFewRooms { room_count: 2 }));
    }
}
