//! Grid movement, collision and room exits.

use std::sync::Arc;

use provinggrounds_domain::{Direction, Exit, RoomId};

use super::Session;
use crate::effects::{Reaction, TimerKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing moved. Facing may still have turned.
    Blocked,
    Moved,
    /// An exit was stepped on; the room change lands after the transition
    /// delay.
    RoomChanged { to: RoomId },
}

impl Session {
    /// Tries to take one step in `direction`.
    ///
    /// Input is dropped entirely while a dialogue is open, a previous step is
    /// settling or the optimization is pending. Otherwise the player turns to
    /// face `direction` and then, in order: exits win, walkable cells are
    /// entered, anything else blocks.
    pub fn attempt_move(&mut self, direction: Direction) -> Reaction<MoveOutcome> {
        if let Some(reason) = self.input_gate() {
            tracing::debug!(?direction, reason, "Move rejected");
            return self.react(MoveOutcome::Blocked);
        }

        self.facing = direction;
        let target = self.player_position.step(direction);
        let catalog = Arc::clone(&self.catalog);
        let room = catalog.get_room(self.current_room);

        if let Some(exit) = room.exit_at(target).copied() {
            let to = exit.target_room;
            if self.timing.room_transition.is_zero() {
                self.enter_room(exit);
            } else {
                self.movement_locked = true;
                self.pending_exit = Some(exit);
                self.cancel(TimerKey::MovementSettle);
                self.schedule(TimerKey::RoomTransition, self.timing.room_transition);
            }
            return self.react(MoveOutcome::RoomChanged { to });
        }

        if let Some(reason) = room.blocked_reason(target) {
            tracing::debug!(%target, reason, "Step blocked");
            return self.react(MoveOutcome::Blocked);
        }

        self.player_position = target;
        if !self.timing.move_settle.is_zero() {
            self.movement_locked = true;
            self.schedule(TimerKey::MovementSettle, self.timing.move_settle);
        }
        self.react(MoveOutcome::Moved)
    }

    /// Moves the player through `exit`. Room and position change together.
    pub(super) fn enter_room(&mut self, exit: Exit) {
        let from = self.current_room;
        self.current_room = exit.target_room;
        self.player_position = exit.target;
        self.movement_locked = false;
        self.pending_exit = None;
        self.cancel(TimerKey::MovementSettle);

        tracing::info!(
            from = %from,
            to = %exit.target_room,
            position = %exit.target,
            "Entered room"
        );
    }
}
