//! Door gating and the two-step room transition protocol.

use std::collections::{BTreeMap, VecDeque};

use super::*;
use crate::mapgen::RoomType;

impl Run {
    /// Only the boss and exit doors are ever locked.
    pub fn door_locked(&self, target: RoomId) -> bool {
        if target == self.layout.boss_room.id {
            !self.state.boss_unlocked
        } else if target == self.layout.exit_room.id {
            !self.state.boss_defeated
        } else {
            false
        }
    }

    /// Doors leaving the current room with their lock state as of now.
    pub fn door_views(&self) -> Vec<DoorView> {
        let room = self.state.current_room_id;
        self.layout
            .neighbors(room)
            .map(|to| DoorView {
                to,
                to_type: self.layout.room_type(to).unwrap_or(RoomType::Combat),
                locked: self.door_locked(to),
            })
            .collect()
    }

    /// Shortest door path from the current room to `target` through unlocked doors, excluding
    /// the current room itself. `None` when no such path exists.
    pub fn route_to(&self, target: RoomId) -> Option<Vec<RoomId>> {
        let start = self.state.current_room_id;
        if start == target {
            return Some(Vec::new());
        }

        let mut came_from = BTreeMap::new();
        let mut queue = VecDeque::from([start]);
        while let Some(room) = queue.pop_front() {
            for next in self.layout.neighbors(room) {
                if next == start || came_from.contains_key(&next) || self.door_locked(next) {
                    continue;
                }
                came_from.insert(next, room);
                if next == target {
                    let mut path = vec![target];
                    let mut cursor = target;
                    while let Some(&previous) = came_from.get(&cursor) {
                        if previous == start {
                            break;
                        }
                        path.push(previous);
                        cursor = previous;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }

    pub(super) fn emit_doors(&mut self) {
        let room = self.state.current_room_id;
        let doors = self.door_views();
        self.emit(OutboundEvent::DoorsChanged { room, doors });
    }

    pub(super) fn on_door_overlap(&mut self, to: RoomId) -> EventOutcome {
        if self.transitioning.is_some() {
            return EventOutcome::Ignored(IgnoreReason::Transitioning);
        }
        let from = self.state.current_room_id;
        if !self.layout.are_adjacent(from, to) {
            return EventOutcome::Ignored(IgnoreReason::NoSuchDoor);
        }
        if self.door_locked(to) {
            return EventOutcome::Ignored(IgnoreReason::DoorLocked);
        }

        self.transitioning = Some(to);
        self.emit(OutboundEvent::TransitionStarted { from, to });
        EventOutcome::Applied
    }

    pub(super) fn on_transition_complete(&mut self) -> EventOutcome {
        let Some(target) = self.transitioning.take() else {
            return EventOutcome::Ignored(IgnoreReason::NotTransitioning);
        };
        self.enter_room(target);
        EventOutcome::Applied
    }
}
