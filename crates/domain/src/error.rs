//! Unified error types for the domain layer
//!
//! Domain errors only describe malformed static data. Runtime rejections
//! (a blocked step, a locked terminal) are outcome values, not errors.

use thiserror::Error;

use crate::ids::RoomId;
use crate::value_objects::GridPos;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A position lies outside its room
    #[error("Position {pos} is out of bounds in room {room}")]
    OutOfBounds { room: RoomId, pos: GridPos },

    /// A position that must be walkable is not
    #[error("Position {pos} in room {room} is not walkable: {reason}")]
    NotWalkable {
        room: RoomId,
        pos: GridPos,
        reason: &'static str,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for malformed catalog data.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn out_of_bounds(room: RoomId, pos: GridPos) -> Self {
        Self::OutOfBounds { room, pos }
    }

    pub fn not_walkable(room: RoomId, pos: GridPos, reason: &'static str) -> Self {
        Self::NotWalkable { room, pos, reason }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("grid has 3 cells, expected 4");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: grid has 3 cells, expected 4"
        );
    }

    #[test]
    fn test_not_walkable_error_names_room_and_position() {
        let err = DomainError::not_walkable(RoomId::Nexus, GridPos::new(7, 5), "occupied by NPC");
        let message = err.to_string();
        assert!(message.contains("nexus"));
        assert!(message.contains("(7, 5)"));
        assert!(message.contains("occupied by NPC"));
    }

    #[test]
    fn test_out_of_bounds_error() {
        let err = DomainError::out_of_bounds(RoomId::Core, GridPos::new(-1, 3));
        assert_eq!(err.to_string(), "Position (-1, 3) is out of bounds in room core");
    }
}
