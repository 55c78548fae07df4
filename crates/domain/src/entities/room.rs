//! Rooms (scenes) and the exits connecting them

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entities::{Npc, Tile};
use crate::error::DomainError;
use crate::ids::RoomId;
use crate::value_objects::GridPos;

/// A trigger cell that moves the player to another room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exit {
    pub trigger: GridPos,
    pub target_room: RoomId,
    pub target: GridPos,
}

impl Exit {
    pub fn new(trigger: GridPos, target_room: RoomId, target: GridPos) -> Self {
        Self {
            trigger,
            target_room,
            target,
        }
    }
}

/// One static tile area with its NPCs and exits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    id: RoomId,
    name: String,
    width: u32,
    height: u32,
    /// Row-major, `width * height` cells
    tiles: Vec<Tile>,
    npcs: Vec<Npc>,
    exits: Vec<Exit>,
}

impl Room {
    /// A room of floor surrounded by a one-tile wall border.
    pub fn bordered(id: RoomId, name: impl Into<String>, width: u32, height: u32) -> Self {
        let tiles = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| {
                    if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                        Tile::Wall
                    } else {
                        Tile::Floor
                    }
                })
            })
            .collect();

        Self {
            id,
            name: name.into(),
            width,
            height,
            tiles,
            npcs: Vec::new(),
            exits: Vec::new(),
        }
    }

    /// Reconstruct from raw parts. Call [`Room::validate`] before use.
    pub fn from_parts(
        id: RoomId,
        name: String,
        width: u32,
        height: u32,
        tiles: Vec<Tile>,
        npcs: Vec<Npc>,
        exits: Vec<Exit>,
    ) -> Self {
        Self {
            id,
            name,
            width,
            height,
            tiles,
            npcs,
            exits,
        }
    }

    // Read-only accessors

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn exits(&self) -> &[Exit] {
        &self.exits
    }

    // Builder-style methods

    pub fn with_tile(mut self, pos: GridPos, tile: Tile) -> Self {
        if let Some(index) = self.index_of(pos) {
            self.tiles[index] = tile;
        }
        self
    }

    pub fn with_npc(mut self, npc: Npc) -> Self {
        self.npcs.push(npc);
        self
    }

    /// Adds an exit and marks its trigger cell as a door.
    pub fn with_exit(self, exit: Exit) -> Self {
        let mut room = self.with_tile(exit.trigger, Tile::Door);
        room.exits.push(exit);
        room
    }

    // Grid queries

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index_of(&self, pos: GridPos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Tile at `pos`, `None` outside the grid.
    pub fn tile_at(&self, pos: GridPos) -> Option<Tile> {
        self.index_of(pos).and_then(|i| self.tiles.get(i).copied())
    }

    pub fn npc_at(&self, pos: GridPos) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.position() == pos)
    }

    pub fn exit_at(&self, pos: GridPos) -> Option<&Exit> {
        self.exits.iter().find(|exit| exit.trigger == pos)
    }

    /// In bounds, not a wall, and not occupied by an NPC.
    pub fn is_walkable(&self, pos: GridPos) -> bool {
        match self.tile_at(pos) {
            Some(tile) => tile.is_passable() && self.npc_at(pos).is_none(),
            None => false,
        }
    }

    /// Why `pos` cannot be stood on, if it cannot.
    pub fn blocked_reason(&self, pos: GridPos) -> Option<&'static str> {
        match self.tile_at(pos) {
            None => Some("out of bounds"),
            Some(Tile::Wall) => Some("wall"),
            Some(_) if self.npc_at(pos).is_some() => Some("occupied by NPC"),
            Some(_) => None,
        }
    }

    /// Checks the invariants that only involve this room.
    pub fn validate(&self) -> Result<(), DomainError> {
        let expected = self.width as usize * self.height as usize;
        if self.tiles.len() != expected {
            return Err(DomainError::validation(format!(
                "room {} has {} tiles, expected {}x{} = {}",
                self.id,
                self.tiles.len(),
                self.width,
                self.height,
                expected
            )));
        }

        let mut occupied = HashSet::with_capacity(self.npcs.len());
        for npc in &self.npcs {
            let pos = npc.position();
            if !self.in_bounds(pos) {
                return Err(DomainError::out_of_bounds(self.id, pos));
            }
            if self.tile_at(pos) == Some(Tile::Wall) {
                return Err(DomainError::not_walkable(self.id, pos, "NPC placed on a wall"));
            }
            if npc.dialogue().is_empty() {
                return Err(DomainError::validation(format!(
                    "NPC {} in room {} has no dialogue lines",
                    npc.id(),
                    self.id
                )));
            }
            if !occupied.insert(pos) {
                return Err(DomainError::validation(format!(
                    "room {} has two NPCs at {}",
                    self.id, pos
                )));
            }
        }

        for exit in &self.exits {
            if !self.in_bounds(exit.trigger) {
                return Err(DomainError::out_of_bounds(self.id, exit.trigger));
            }
        }

        Ok(())
    }
}
