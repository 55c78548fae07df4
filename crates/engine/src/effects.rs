//! Effects the session asks its runtime to perform, and the timer table that
//! decides which timer firings are still current.

use std::time::Duration;

use provinggrounds_shared::ScoreRequest;

/// The session's four independent timers. At most one of each is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    DialogueReveal,
    MovementSettle,
    RoomTransition,
    ScoringFallback,
}

impl TimerKey {
    pub const ALL: [TimerKey; 4] = [
        TimerKey::DialogueReveal,
        TimerKey::MovementSettle,
        TimerKey::RoomTransition,
        TimerKey::ScoringFallback,
    ];

    fn slot(self) -> usize {
        match self {
            Self::DialogueReveal => 0,
            Self::MovementSettle => 1,
            Self::RoomTransition => 2,
            Self::ScoringFallback => 3,
        }
    }
}

/// Identifies one scheduled firing. Handed back to the session when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTicket {
    pub key: TimerKey,
    pub generation: u64,
}

/// Instruction for the runtime that owns the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver `ticket` back after `delay`. Replaces any live timer with the
    /// same key.
    ScheduleTimer { ticket: TimerTicket, delay: Duration },
    CancelTimer { key: TimerKey },
    /// Send the collected tokens to the scoring service and report back.
    SubmitScore(ScoreRequest),
}

/// Result of a session call: what happened plus what the runtime must do.
#[derive(Debug)]
pub struct Reaction<O> {
    pub outcome: O,
    pub effects: Vec<Effect>,
}

impl<O> Reaction<O> {
    pub fn new(outcome: O, effects: Vec<Effect>) -> Self {
        Self { outcome, effects }
    }

    pub fn scheduled(&self, key: TimerKey) -> Option<TimerTicket> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::ScheduleTimer { ticket, .. } if ticket.key == key => Some(*ticket),
            _ => None,
        })
    }

    pub fn score_request(&self) -> Option<&ScoreRequest> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::SubmitScore(request) => Some(request),
            _ => None,
        })
    }
}

/// Generation bookkeeping for [`TimerKey`]s.
///
/// Arming a key invalidates every earlier ticket for it. A ticket is accepted
/// at most once.
#[derive(Debug, Default)]
pub struct TimerTable {
    live: [Option<u64>; 4],
    next_generation: u64,
}

impl TimerTable {
    pub fn arm(&mut self, key: TimerKey) -> TimerTicket {
        self.next_generation += 1;
        self.live[key.slot()] = Some(self.next_generation);
        TimerTicket {
            key,
            generation: self.next_generation,
        }
    }

    /// Returns whether a live timer was dropped.
    pub fn disarm(&mut self, key: TimerKey) -> bool {
        self.live[key.slot()].take().is_some()
    }

    pub fn is_armed(&self, key: TimerKey) -> bool {
        self.live[key.slot()].is_some()
    }

    /// Consumes `ticket` if it is the live one for its key.
    pub fn accept(&mut self, ticket: TimerTicket) -> bool {
        let slot = &mut self.live[ticket.key.slot()];
        if *slot == Some(ticket.generation) {
            *slot = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_ticket_is_accepted_once() {
        let mut table = TimerTable::default();
        let ticket = table.arm(TimerKey::MovementSettle);

        assert!(table.accept(ticket));
        assert!(!table.accept(ticket));
        assert!(!table.is_armed(TimerKey::MovementSettle));
    }

    #[test]
    fn rearming_invalidates_older_ticket() {
        let mut table = TimerTable::default();
        let old = table.arm(TimerKey::DialogueReveal);
        let new = table.arm(TimerKey::DialogueReveal);

        assert_ne!(old.generation, new.generation);
        assert!(!table.accept(old));
        assert!(table.accept(new));
    }

    #[test]
    fn disarm_invalidates_ticket() {
        let mut table = TimerTable::default();
        let ticket = table.arm(TimerKey::ScoringFallback);

        assert!(table.disarm(TimerKey::ScoringFallback));
        assert!(!table.disarm(TimerKey::ScoringFallback));
        assert!(!table.accept(ticket));
    }

    #[test]
    fn keys_are_independent() {
        let mut table = TimerTable::default();
        let settle = table.arm(TimerKey::MovementSettle);
        let _transition = table.arm(TimerKey::RoomTransition);

        assert!(table.accept(settle));
        assert!(table.is_armed(TimerKey::RoomTransition));
    }

    #[test]
    fn reaction_finds_scheduled_ticket() {
        let mut table = TimerTable::default();
        let ticket = table.arm(TimerKey::RoomTransition);
        let reaction = Reaction::new(
            (),
            vec![
                Effect::CancelTimer {
                    key: TimerKey::MovementSettle,
                },
                Effect::ScheduleTimer {
                    ticket,
                    delay: Duration::from_millis(250),
                },
            ],
        );

        assert_eq!(reaction.scheduled(TimerKey::RoomTransition), Some(ticket));
        assert!(reaction.scheduled(TimerKey::DialogueReveal).is_none());
        assert!(reaction.score_request().is_none());
    }
}
