//! High-level ward generation that composes placement, linking, roles and shard selection.

use tracing::debug;

use crate::error::GenerationError;
use crate::rng::WardRng;

use super::graph::build_adjacency;
use super::linking::{link_grid_adjacent, link_nearest_frontier};
use super::model::{Layout, LootKind, LootPlacement, Room};
use super::options::{GenerationOptions, LinkStrategy};
use super::placement::place_rooms;
use super::roles::assign_roles;
use super::shards::{ShardAnchors, pick_shard_rooms};

pub struct WardGenerator {
    options: GenerationOptions,
}

impl WardGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    pub fn generate(&self, seed_key: &str) -> Result<Layout, GenerationError> {
        let mut rng = WardRng::from_seed_key(seed_key);
        self.generate_with(seed_key, &mut rng)
    }

    /// Generates from an existing stream so gameplay draws can continue where layout stopped.
    pub fn generate_with(
        &self,
        seed_key: &str,
        rng: &mut WardRng,
    ) -> Result<Layout, GenerationError> {
        self.options.validate()?;

        let mut coords = place_rooms(rng, self.options.room_count, self.options.grid_size);
        let doors = match self.options.link_strategy {
            LinkStrategy::NearestFrontier => link_nearest_frontier(rng, &coords),
            LinkStrategy::GridAdjacent => {
                link_grid_adjacent(rng, &mut coords, self.options.grid_size)
            }
        };

        let adjacency = build_adjacency(&coords, &doors);
        let roles = assign_roles(rng, &coords, &adjacency);
        let rooms: Vec<Room> = coords
            .iter()
            .zip(&roles.room_types)
            .map(|(&id, &room_type)| Room::new(id, room_type))
            .collect();

        let player_start = rooms[0];
        let boss_room = rooms[roles.boss_index];
        let exit_room = rooms[roles.exit_index];

        let anchors =
            ShardAnchors { start: player_start.id, boss: boss_room.id, exit: exit_room.id };
        let shard_rooms = pick_shard_rooms(rng, &adjacency, &anchors);

        let mut loot = roles.loot;
        loot.extend(
            shard_rooms.iter().map(|&room_id| LootPlacement { kind: LootKind::Shard, room_id }),
        );

        let room_types = rooms.iter().map(|room| (room.id, room.room_type)).collect();

        let layout = Layout {
            seed: seed_key.to_string(),
            options: self.options,
            rooms,
            doors,
            adjacency,
            loot,
            enemies: roles.enemies,
            room_types,
            player_start,
            boss_room,
            exit_room,
        };
        debug!(
            seed = seed_key,
            rooms = layout.rooms.len(),
            doors = layout.doors.len(),
            shards = shard_rooms.len(),
            start = %layout.player_start.id,
            boss = %layout.boss_room.id,
            exit = %layout.exit_room.id,
            fingerprint = format_args!("{:016x}", layout.fingerprint()),
            "generated ward layout"
        );
        Ok(layout)
    }
}
