//! World catalog - every room of the game, built once per process.
//!
//! The catalog is validated as a whole on construction. A malformed catalog is
//! a programming error: the shared instance aborts on first access instead of
//! letting a session start on corrupt data.

mod rooms;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::entities::Room;
use crate::error::DomainError;
use crate::ids::RoomId;
use crate::value_objects::{Direction, GridPos, WisdomToken};

pub use rooms::shipped_rooms;

/// Room a fresh session starts in.
pub const START_ROOM: RoomId = RoomId::Entrance;
/// Player position in [`START_ROOM`] for a fresh session.
pub const START_POSITION: GridPos = GridPos::new(7, 5);
/// Initial facing for a fresh session.
pub const START_FACING: Direction = Direction::Down;

static SHARED: Lazy<Arc<WorldCatalog>> = Lazy::new(|| match WorldCatalog::new(shipped_rooms()) {
    Ok(catalog) => Arc::new(catalog),
    Err(e) => panic!("world catalog is malformed: {e}"),
});

/// Read-only set of rooms, indexed by [`RoomId`].
#[derive(Debug, Clone)]
pub struct WorldCatalog {
    /// One entry per `RoomId`, in `RoomId::ALL` order
    rooms: Vec<Room>,
    required_tokens: usize,
}

impl WorldCatalog {
    /// Builds and validates a catalog. Every `RoomId` must appear exactly once.
    pub fn new(rooms: Vec<Room>) -> Result<Self, DomainError> {
        let mut slots: Vec<Option<Room>> = RoomId::ALL.iter().map(|_| None).collect();
        for room in rooms {
            let slot = &mut slots[room.id().index()];
            if slot.is_some() {
                return Err(DomainError::validation(format!(
                    "room {} is defined twice",
                    room.id()
                )));
            }
            *slot = Some(room);
        }

        let mut ordered = Vec::with_capacity(slots.len());
        for (id, slot) in RoomId::ALL.into_iter().zip(slots) {
            match slot {
                Some(room) => ordered.push(room),
                None => {
                    return Err(DomainError::validation(format!("room {id} is missing")));
                }
            }
        }

        let mut catalog = Self {
            rooms: ordered,
            required_tokens: 0,
        };
        catalog.required_tokens = catalog.all_tokens().len();
        catalog.validate()?;
        Ok(catalog)
    }

    /// The process-wide catalog of shipped rooms.
    pub fn shared() -> Arc<WorldCatalog> {
        Arc::clone(&SHARED)
    }

    /// Total over the closed id set.
    pub fn get_room(&self, id: RoomId) -> &Room {
        &self.rooms[id.index()]
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// Number of distinct tokens a player must hold to unlock the Core.
    pub fn required_token_count(&self) -> usize {
        self.required_tokens
    }

    /// Every token some NPC grants, sorted.
    pub fn all_tokens(&self) -> BTreeSet<WisdomToken> {
        self.rooms
            .iter()
            .flat_map(|room| room.npcs())
            .filter_map(|npc| npc.wisdom().cloned())
            .collect()
    }

    /// Cross-room invariants on top of [`Room::validate`].
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut npc_ids = HashSet::new();
        for room in &self.rooms {
            room.validate()?;

            for npc in room.npcs() {
                if !npc_ids.insert(npc.id().clone()) {
                    return Err(DomainError::validation(format!(
                        "NPC id {} is used more than once",
                        npc.id()
                    )));
                }
            }

            for exit in room.exits() {
                let target = self.get_room(exit.target_room);
                if let Some(reason) = target.blocked_reason(exit.target) {
                    return Err(DomainError::not_walkable(exit.target_room, exit.target, reason));
                }
            }
        }

        let start = self.get_room(START_ROOM);
        if let Some(reason) = start.blocked_reason(START_POSITION) {
            return Err(DomainError::not_walkable(START_ROOM, START_POSITION, reason));
        }

        Ok(())
    }
}
