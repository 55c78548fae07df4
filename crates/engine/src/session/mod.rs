//! One playthrough.
//!
//! [`Session`] is a synchronous state machine. Commands and timer firings go
//! in; an outcome plus a list of [`Effect`]s comes out. The session never
//! sleeps or performs I/O itself, so every transition is testable without a
//! runtime.
//!
//! Multi-field changes (entering a room, completing a dialogue) happen inside
//! a single method call, so a snapshot never observes a half-applied
//! transition.

mod interaction;
mod inventory;
mod movement;
mod optimization;

use std::sync::Arc;
use std::time::Duration;

use provinggrounds_domain::{
    Direction, DomainError, Exit, GridPos, NpcId, Room, RoomId, SessionId, WisdomToken, WorldCatalog,
    START_FACING, START_POSITION, START_ROOM,
};
use provinggrounds_shared::{FrameSnapshot, NpcView};

use crate::config::{GameTiming, DEFAULT_SCORING_TASK};
use crate::dialogue::Dialogue;
use crate::effects::{Effect, Reaction, TimerKey, TimerTable, TimerTicket};
use crate::infrastructure::ports::ClockPort;

pub use interaction::InteractionOutcome;
pub use inventory::{Flags, Inventory};
pub use movement::MoveOutcome;
pub use optimization::{Optimization, OptimizationResult, FALLBACK_SCORE};

/// What closing the active dialogue should trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialoguePurpose {
    /// A full NPC conversation. Finishing it marks the NPC as spoken to and
    /// grants `token`, if any.
    Conversation {
        npc: NpcId,
        token: Option<WisdomToken>,
    },
    /// The terminal's go-ahead. Finishing it submits the score request.
    TerminalReady,
    /// Informational only.
    Notice,
}

#[derive(Debug, Clone)]
pub struct ActiveDialogue {
    pub dialogue: Dialogue,
    pub purpose: DialoguePurpose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Applied,
    /// Superseded or already consumed; nothing changed
    Discarded,
}

pub struct Session {
    id: SessionId,
    catalog: Arc<WorldCatalog>,
    timing: GameTiming,
    scoring_task: String,
    clock: Arc<dyn ClockPort>,

    current_room: RoomId,
    player_position: GridPos,
    facing: Direction,
    movement_locked: bool,
    /// Exit whose room change waits on the transition timer
    pending_exit: Option<Exit>,

    inventory: Inventory,
    flags: Flags,
    active_dialogue: Option<ActiveDialogue>,
    optimization: Optimization,

    timers: TimerTable,
    /// Effects produced by the call in progress
    effects: Vec<Effect>,
}

impl Session {
    /// A fresh session at the catalog's start position.
    pub fn new(catalog: Arc<WorldCatalog>, timing: GameTiming, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            id: SessionId::new(),
            catalog,
            timing,
            scoring_task: DEFAULT_SCORING_TASK.to_string(),
            clock,
            current_room: START_ROOM,
            player_position: START_POSITION,
            facing: START_FACING,
            movement_locked: false,
            pending_exit: None,
            inventory: Inventory::default(),
            flags: Flags::default(),
            active_dialogue: None,
            optimization: Optimization::default(),
            timers: TimerTable::default(),
            effects: Vec::new(),
        }
    }

    // Builder-style methods

    pub fn with_scoring_task(mut self, task: impl Into<String>) -> Self {
        self.scoring_task = task.into();
        self
    }

    /// Places the player, e.g. to resume at a checkpoint. The cell must be
    /// walkable.
    pub fn with_position(
        mut self,
        room: RoomId,
        position: GridPos,
        facing: Direction,
    ) -> Result<Self, DomainError> {
        if let Some(reason) = self.catalog.get_room(room).blocked_reason(position) {
            return Err(DomainError::not_walkable(room, position, reason));
        }
        self.current_room = room;
        self.player_position = position;
        self.facing = facing;
        Ok(self)
    }

    pub fn with_tokens<I>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = WisdomToken>,
    {
        for token in tokens {
            self.inventory.insert(token);
        }
        self
    }

    // Read-only accessors

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn current_room(&self) -> RoomId {
        self.current_room
    }

    pub fn room(&self) -> &Room {
        self.catalog.get_room(self.current_room)
    }

    pub fn player_position(&self) -> GridPos {
        self.player_position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn is_movement_locked(&self) -> bool {
        self.movement_locked
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn active_dialogue(&self) -> Option<&ActiveDialogue> {
        self.active_dialogue.as_ref()
    }

    pub fn optimization(&self) -> &Optimization {
        &self.optimization
    }

    pub fn timing(&self) -> GameTiming {
        self.timing
    }

    /// Why movement and interaction input is currently dropped, if it is.
    fn input_gate(&self) -> Option<&'static str> {
        if self.active_dialogue.is_some() {
            Some("dialogue open")
        } else if self.movement_locked {
            Some("movement locked")
        } else if self.optimization.is_busy() {
            Some("optimization pending")
        } else {
            None
        }
    }

    /// Handles a timer firing handed back by the runtime.
    pub fn on_timer(&mut self, ticket: TimerTicket) -> Reaction<TimerOutcome> {
        if !self.timers.accept(ticket) {
            tracing::debug!(
                key = ?ticket.key,
                generation = ticket.generation,
                "Discarding stale timer"
            );
            return self.react(TimerOutcome::Discarded);
        }

        match ticket.key {
            TimerKey::DialogueReveal => {
                if let Some(active) = self.active_dialogue.as_mut() {
                    active.dialogue.reveal_next();
                }
                self.sync_reveal_timer();
            }
            TimerKey::MovementSettle => self.movement_locked = false,
            TimerKey::RoomTransition => {
                if let Some(exit) = self.pending_exit.take() {
                    self.enter_room(exit);
                }
            }
            TimerKey::ScoringFallback => self.complete_with_fallback(),
        }
        self.react(TimerOutcome::Applied)
    }

    /// Everything a render surface needs for one frame.
    pub fn snapshot(&self) -> FrameSnapshot {
        let room = self.room();
        let npcs = room
            .npcs()
            .iter()
            .map(|npc| NpcView {
                id: npc.id().to_string(),
                name: npc.name().to_string(),
                position: npc.position(),
                sprite: npc.sprite().to_string(),
                role: npc.role(),
                token_held: npc
                    .wisdom()
                    .is_some_and(|token| self.inventory.contains(token)),
            })
            .collect();

        FrameSnapshot {
            room_id: room.id(),
            room_name: room.name().to_string(),
            width: room.width(),
            height: room.height(),
            tiles: room.tiles().to_vec(),
            npcs,
            player_position: self.player_position,
            facing: self.facing,
            movement_locked: self.movement_locked,
            dialogue: self.active_dialogue.as_ref().map(|a| a.dialogue.view()),
            inventory_count: self.inventory.len(),
            required_tokens: self.catalog.required_token_count(),
            optimization: self.optimization.view(),
        }
    }

    // Effect plumbing

    fn schedule(&mut self, key: TimerKey, delay: Duration) {
        let ticket = self.timers.arm(key);
        self.effects.push(Effect::ScheduleTimer { ticket, delay });
    }

    fn cancel(&mut self, key: TimerKey) {
        if self.timers.disarm(key) {
            self.effects.push(Effect::CancelTimer { key });
        }
    }

    fn react<O>(&mut self, outcome: O) -> Reaction<O> {
        Reaction::new(outcome, std::mem::take(&mut self.effects))
    }

    fn open_dialogue(&mut self, dialogue: Dialogue, purpose: DialoguePurpose) {
        self.active_dialogue = Some(ActiveDialogue { dialogue, purpose });
        self.sync_reveal_timer();
    }

    /// Arms a fresh reveal timer while the active dialogue is typing and drops
    /// it otherwise. A zero interval reveals the whole line at once.
    fn sync_reveal_timer(&mut self) {
        let typing = self
            .active_dialogue
            .as_ref()
            .is_some_and(|active| active.dialogue.is_typing());

        if typing && !self.timing.char_interval.is_zero() {
            self.schedule(TimerKey::DialogueReveal, self.timing.char_interval);
            return;
        }
        if typing {
            if let Some(active) = self.active_dialogue.as_mut() {
                active.dialogue.reveal_line();
            }
        }
        self.cancel(TimerKey::DialogueReveal);
    }
}
