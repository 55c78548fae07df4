//! Held wisdom tokens and narrative flags.

use std::collections::BTreeMap;

use provinggrounds_domain::{NpcId, WisdomToken};

/// Insertion-ordered set of held tokens. Only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    tokens: Vec<WisdomToken>,
}

impl Inventory {
    /// Adds `token` unless already held. Returns whether it was new.
    pub fn insert(&mut self, token: WisdomToken) -> bool {
        if self.contains(&token) {
            return false;
        }
        self.tokens.push(token);
        true
    }

    pub fn contains(&self, token: &WisdomToken) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WisdomToken> {
        self.tokens.iter()
    }

    /// Tokens in acquisition order.
    pub fn to_vec(&self) -> Vec<WisdomToken> {
        self.tokens.clone()
    }
}

/// Boolean narrative gates keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    values: BTreeMap<String, bool>,
}

impl Flags {
    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.values.insert(name.into(), value);
    }

    /// Unset flags read as false.
    pub fn get(&self, name: &str) -> bool {
        self.values.get(name).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Flag recording that the player finished talking to `npc`.
    pub fn spoke_to_key(npc: &NpcId) -> String {
        format!("spoke_to:{npc}")
    }
}
