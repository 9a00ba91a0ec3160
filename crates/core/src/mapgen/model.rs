//! Public data models for generated wards: rooms, doors, loot and enemy placements.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

use super::options::GenerationOptions;

/// Grid coordinate of a room. Its string form `"x,y"` is the room's id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RoomId {
    pub x: i32,
    pub y: i32,
}

impl RoomId {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn squared_distance(self, other: Self) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn orthogonal_neighbors(self) -> [Self; 4] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y),
        ]
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("room id '{0}' is not of the form \"x,y\"")]
pub struct ParseRoomIdError(String);

impl FromStr for RoomId {
    type Err = ParseRoomIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseRoomIdError(raw.to_string());
        let (x, y) = raw.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Self { x, y })
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for RoomId {
    type Error = ParseRoomIdError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Start,
    Combat,
    Loot,
    Event,
    Boss,
    Exit,
}

impl RoomType {
    fn code(self) -> u8 {
        match self {
            Self::Start => 0,
            Self::Combat => 1,
            Self::Loot => 2,
            Self::Event => 3,
            Self::Boss => 4,
            Self::Exit => 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub x: i32,
    pub y: i32,
    pub room_type: RoomType,
}

impl Room {
    pub fn new(id: RoomId, room_type: RoomType) -> Self {
        Self { id, x: id.x, y: id.y, room_type }
    }
}

/// Undirected connection between two rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub from: RoomId,
    pub to: RoomId,
}

impl Door {
    /// The far side of the door when standing in `room`.
    pub fn other_side(self, room: RoomId) -> Option<RoomId> {
        if self.from == room {
            Some(self.to)
        } else if self.to == room {
            Some(self.from)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LootKind {
    Shard,
    Weapon,
    Trait,
    Consumable,
}

impl LootKind {
    fn code(self) -> u8 {
        match self {
            Self::Shard => 0,
            Self::Weapon => 1,
            Self::Trait => 2,
            Self::Consumable => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootPlacement {
    pub kind: LootKind,
    pub room_id: RoomId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub room_id: RoomId,
    pub count: u32,
}

/// Immutable result of one generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub seed: String,
    pub options: GenerationOptions,
    pub rooms: Vec<Room>,
    pub doors: Vec<Door>,
    pub adjacency: BTreeMap<RoomId, BTreeSet<RoomId>>,
    pub loot: Vec<LootPlacement>,
    pub enemies: Vec<EnemySpawn>,
    pub room_types: BTreeMap<RoomId, RoomType>,
    pub player_start: Room,
    pub boss_room: Room,
    pub exit_room: Room,
}

impl Layout {
    pub fn room_type(&self, id: RoomId) -> Option<RoomType> {
        self.room_types.get(&id).copied()
    }

    pub fn neighbors(&self, id: RoomId) -> impl Iterator<Item = RoomId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    pub fn are_adjacent(&self, a: RoomId, b: RoomId) -> bool {
        self.adjacency.get(&a).is_some_and(|neighbors| neighbors.contains(&b))
    }

    pub fn shard_rooms(&self) -> Vec<RoomId> {
        self.loot
            .iter()
            .filter(|placement| placement.kind == LootKind::Shard)
            .map(|placement| placement.room_id)
            .collect()
    }

    pub fn shards_in(&self, id: RoomId) -> u32 {
        self.loot
            .iter()
            .filter(|placement| placement.kind == LootKind::Shard && placement.room_id == id)
            .count() as u32
    }

    /// Non-shard loot in `id`, in placement order.
    pub fn items_in(&self, id: RoomId) -> Vec<LootKind> {
        self.loot
            .iter()
            .filter(|placement| placement.kind != LootKind::Shard && placement.room_id == id)
            .map(|placement| placement.kind)
            .collect()
    }

    pub fn enemy_count_in(&self, id: RoomId) -> u32 {
        self.enemies.iter().filter(|spawn| spawn.room_id == id).map(|spawn| spawn.count).sum()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.seed.len() as u32).to_le_bytes());
        bytes.extend(self.seed.as_bytes());
        bytes.extend((self.options.room_count as u32).to_le_bytes());
        bytes.extend(self.options.grid_size.to_le_bytes());

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            push_room_id(&mut bytes, room.id);
            bytes.push(room.room_type.code());
        }

        bytes.extend((self.doors.len() as u32).to_le_bytes());
        for door in &self.doors {
            push_room_id(&mut bytes, door.from);
            push_room_id(&mut bytes, door.to);
        }

        bytes.extend((self.loot.len() as u32).to_le_bytes());
        for placement in &self.loot {
            bytes.push(placement.kind.code());
            push_room_id(&mut bytes, placement.room_id);
        }

        bytes.extend((self.enemies.len() as u32).to_le_bytes());
        for spawn in &self.enemies {
            push_room_id(&mut bytes, spawn.room_id);
            bytes.extend(spawn.count.to_le_bytes());
        }

        push_room_id(&mut bytes, self.player_start.id);
        push_room_id(&mut bytes, self.boss_room.id);
        push_room_id(&mut bytes, self.exit_room.id);
        bytes
    }

    /// xxh3 of `canonical_bytes`, short enough to eyeball in logs.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn push_room_id(bytes: &mut Vec<u8>, id: RoomId) {
    bytes.extend(id.x.to_le_bytes());
    bytes.extend(id.y.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_id_string_form_is_bijective() {
        let id = RoomId::new(3, 4);
        assert_eq!(id.to_string(), "3,4");
        assert_eq!("3,4".parse::<RoomId>(), Ok(id));
        assert_eq!(" 0 , 12".parse::<RoomId>(), Ok(RoomId::new(0, 12)));
    }

    #[test]
    fn malformed_room_ids_are_rejected() {
        for raw in ["", "3", "3;4", "a,b", "1,2,3"] {
            assert!(raw.parse::<RoomId>().is_err(), "'{raw}' should not parse");
        }
    }

    #[test]
    fn room_id_serializes_as_its_string_form() {
        let json = serde_json::to_string(&RoomId::new(1, 2)).expect("serialize");
        assert_eq!(json, "\"1,2\"");
        let decoded: RoomId = serde_json::from_str("\"4,0\"").expect("deserialize");
        assert_eq!(decoded, RoomId::new(4, 0));
    }

    #[test]
    fn room_id_works_as_json_map_key() {
        let mut map = BTreeMap::new();
        map.insert(RoomId::new(2, 3), RoomType::Loot);
        let json = serde_json::to_string(&map).expect("serialize");
        assert_eq!(json, "{\"2,3\":\"Loot\"}");
    }

    #[test]
    fn door_other_side_is_symmetric() {
        let door = Door { from: RoomId::new(0, 0), to: RoomId::new(0, 1) };
        assert_eq!(door.other_side(RoomId::new(0, 0)), Some(RoomId::new(0, 1)));
        assert_eq!(door.other_side(RoomId::new(0, 1)), Some(RoomId::new(0, 0)));
        assert_eq!(door.other_side(RoomId::new(5, 5)), None);
    }

    #[test]
    fn room_keeps_coordinates_in_sync_with_id() {
        let room = Room::new(RoomId::new(2, 1), RoomType::Combat);
        assert_eq!((room.x, room.y), (2, 1));
    }
}
