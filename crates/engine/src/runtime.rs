//! Async driver for a [`Session`].
//!
//! The runtime owns the session and is the only thing that mutates it. Player
//! commands, timer firings and score settlements all arrive on one inbox and
//! are applied strictly one at a time. After every event the current frame is
//! published on a watch channel for render surfaces.
//!
//! Timer and scoring tasks only hold weak senders, so dropping the
//! [`RuntimeHandle`] closes the inbox and ends the run.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

use provinggrounds_domain::Direction;
use provinggrounds_shared::{FrameSnapshot, ScoreRequest, ScoreResponse};

use crate::effects::{Effect, TimerKey, TimerTicket};
use crate::infrastructure::ports::{ScoringError, ScoringPort};
use crate::session::Session;

const INBOX_CAPACITY: usize = 64;

/// A player intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Interact,
    AdvanceDialogue,
    Quit,
}

/// Maps one line of terminal input to a command.
///
/// `w`/`a`/`s`/`d` move, `e` interacts, an empty line or space advances
/// dialogue and `q` quits. Anything else is ignored.
pub fn parse_command(line: &str) -> Option<Command> {
    if line.trim().is_empty() {
        return Some(Command::AdvanceDialogue);
    }
    match line.trim().to_ascii_lowercase().as_str() {
        "w" | "up" => Some(Command::Move(Direction::Up)),
        "s" | "down" => Some(Command::Move(Direction::Down)),
        "a" | "left" => Some(Command::Move(Direction::Left)),
        "d" | "right" => Some(Command::Move(Direction::Right)),
        "e" | "interact" => Some(Command::Interact),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

#[derive(Debug)]
pub enum GameEvent {
    Command(Command),
    TimerFired(TimerTicket),
    ScoreSettled(Result<ScoreResponse, ScoringError>),
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Game runtime has stopped")]
    Stopped,
}

/// Caller side of a running [`GameRuntime`].
pub struct RuntimeHandle {
    commands: mpsc::Sender<GameEvent>,
    frames: watch::Receiver<FrameSnapshot>,
}

impl RuntimeHandle {
    pub async fn send(&self, command: Command) -> Result<(), RuntimeError> {
        self.commands
            .send(GameEvent::Command(command))
            .await
            .map_err(|_| RuntimeError::Stopped)
    }

    /// A receiver that observes every published frame from now on.
    pub fn frames(&self) -> watch::Receiver<FrameSnapshot> {
        self.frames.clone()
    }

    pub fn current_frame(&self) -> FrameSnapshot {
        self.frames.borrow().clone()
    }
}

pub struct GameRuntime {
    session: Session,
    scoring: Arc<dyn ScoringPort>,
    inbox: mpsc::Receiver<GameEvent>,
    sender: mpsc::WeakSender<GameEvent>,
    frames: watch::Sender<FrameSnapshot>,
    timers: HashMap<TimerKey, JoinHandle<()>>,
    scoring_task: Option<JoinHandle<()>>,
}

impl GameRuntime {
    pub fn new(session: Session, scoring: Arc<dyn ScoringPort>) -> (Self, RuntimeHandle) {
        let (commands, inbox) = mpsc::channel(INBOX_CAPACITY);
        let (frames, frames_rx) = watch::channel(session.snapshot());

        let runtime = Self {
            session,
            scoring,
            inbox,
            sender: commands.downgrade(),
            frames,
            timers: HashMap::new(),
            scoring_task: None,
        };
        let handle = RuntimeHandle {
            commands,
            frames: frames_rx,
        };
        (runtime, handle)
    }

    /// Processes events until `Quit` arrives or every handle is dropped.
    /// Returns the final session.
    pub async fn run(mut self) -> Session {
        let span = tracing::info_span!("session", session_id = %self.session.id());
        async move {
            tracing::info!(room = %self.session.current_room(), "Session started");

            while let Some(event) = self.inbox.recv().await {
                if !self.handle(event) {
                    break;
                }
                self.frames.send_replace(self.session.snapshot());
            }

            self.shutdown();
            tracing::info!(
                tokens = self.session.inventory().len(),
                status = ?self.session.optimization().status(),
                "Session ended"
            );
            self.session
        }
        .instrument(span)
        .await
    }

    /// Applies one event. Returns false when the run should stop.
    fn handle(&mut self, event: GameEvent) -> bool {
        let effects = match event {
            GameEvent::Command(Command::Quit) => return false,
            GameEvent::Command(Command::Move(direction)) => {
                let reaction = self.session.attempt_move(direction);
                tracing::debug!(?direction, outcome = ?reaction.outcome, "Move");
                reaction.effects
            }
            GameEvent::Command(Command::Interact) => {
                let reaction = self.session.interact();
                tracing::debug!(outcome = ?reaction.outcome, "Interact");
                reaction.effects
            }
            GameEvent::Command(Command::AdvanceDialogue) => {
                self.session.advance_dialogue().effects
            }
            GameEvent::TimerFired(ticket) => self.session.on_timer(ticket).effects,
            GameEvent::ScoreSettled(result) => self.session.settle_score(result).effects,
        };

        for effect in effects {
            self.apply(effect);
        }
        true
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleTimer { ticket, delay } => {
                self.abort_timer(ticket.key);
                let sender = self.sender.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(tx) = sender.upgrade() {
                        let _ = tx.send(GameEvent::TimerFired(ticket)).await;
                    }
                });
                self.timers.insert(ticket.key, handle);
            }
            Effect::CancelTimer { key } => self.abort_timer(key),
            Effect::SubmitScore(request) => self.submit_score(request),
        }
    }

    fn submit_score(&mut self, request: ScoreRequest) {
        let scoring = Arc::clone(&self.scoring);
        let sender = self.sender.clone();
        let task = tokio::spawn(
            async move {
                let result = scoring.submit(request).await;
                if let Some(tx) = sender.upgrade() {
                    let _ = tx.send(GameEvent::ScoreSettled(result)).await;
                }
            }
            .in_current_span(),
        );
        if let Some(previous) = self.scoring_task.replace(task) {
            previous.abort();
        }
    }

    fn abort_timer(&mut self, key: TimerKey) {
        if let Some(handle) = self.timers.remove(&key) {
            handle.abort();
        }
    }

    fn shutdown(&mut self) {
        for key in TimerKey::ALL {
            self.abort_timer(key);
        }
        if let Some(task) = self.scoring_task.take() {
            task.abort();
        }
    }
}
