//! Proving Grounds domain.
//!
//! Pure data: the static world catalog (rooms, tiles, NPCs, exits) and the
//! small value objects the engine builds session state from. Nothing in this
//! crate mutates after construction.

pub mod catalog;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use catalog::{WorldCatalog, START_FACING, START_POSITION, START_ROOM};
pub use entities::{Exit, Npc, NpcRole, Room, Tile};
pub use error::DomainError;
pub use ids::{NpcId, RoomId, SessionId};
pub use value_objects::{Direction, GridPos, WisdomToken};
