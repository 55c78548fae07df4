use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// One playthrough
define_id!(SessionId);

/// Identity of a room in the world catalog.
///
/// The set of rooms is closed: every variant has exactly one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomId {
    Entrance,
    Nexus,
    Archive,
    Refinery,
    Sanctum,
    Core,
}

impl RoomId {
    pub const ALL: [RoomId; 6] = [
        RoomId::Entrance,
        RoomId::Nexus,
        RoomId::Archive,
        RoomId::Refinery,
        RoomId::Sanctum,
        RoomId::Core,
    ];

    /// Position in [`RoomId::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Entrance => 0,
            Self::Nexus => 1,
            Self::Archive => 2,
            Self::Refinery => 3,
            Self::Sanctum => 4,
            Self::Core => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entrance => "entrance",
            Self::Nexus => "nexus",
            Self::Archive => "archive",
            Self::Refinery => "refinery",
            Self::Sanctum => "sanctum",
            Self::Core => "core",
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown room id: {s}")))
    }
}

/// Identity of an NPC, unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NpcId(String);

impl NpcId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
