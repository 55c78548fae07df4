//! Non-player characters placed in rooms

use serde::{Deserialize, Serialize};

use crate::ids::NpcId;
use crate::value_objects::{GridPos, WisdomToken};

/// What kind of conversation an NPC offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcRole {
    /// A master who teaches a wisdom token
    Elder,
    /// The Core terminal that runs the final optimization
    Computer,
    /// Hub guide with directions only
    Guide,
}

/// A static NPC placement. Occupies exactly one tile and blocks movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    id: NpcId,
    position: GridPos,
    name: String,
    sprite: String,
    portrait: Option<String>,
    dialogue: Vec<String>,
    wisdom: Option<WisdomToken>,
    role: NpcRole,
}

impl Npc {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: NpcRole, position: GridPos) -> Self {
        let id = id.into();
        Self {
            sprite: id.clone(),
            id: NpcId::new(id),
            position,
            name: name.into(),
            portrait: None,
            dialogue: Vec::new(),
            wisdom: None,
            role,
        }
    }

    // Read-only accessors

    pub fn id(&self) -> &NpcId {
        &self.id
    }

    pub fn position(&self) -> GridPos {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sprite(&self) -> &str {
        &self.sprite
    }

    pub fn portrait(&self) -> Option<&str> {
        self.portrait.as_deref()
    }

    pub fn dialogue(&self) -> &[String] {
        &self.dialogue
    }

    pub fn wisdom(&self) -> Option<&WisdomToken> {
        self.wisdom.as_ref()
    }

    pub fn role(&self) -> NpcRole {
        self.role
    }

    // Builder-style methods

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = sprite.into();
        self
    }

    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait = Some(portrait.into());
        self
    }

    pub fn with_dialogue<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dialogue = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_wisdom(mut self, token: impl Into<WisdomToken>) -> Self {
        self.wisdom = Some(token.into());
        self
    }
}
