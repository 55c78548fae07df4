//! Domain entities - Static catalog objects with identity

mod npc;
mod room;
mod tile;

pub use npc::{Npc, NpcRole};
pub use room::{Exit, Room};
pub use tile::Tile;
