//! Simulation events and the sink they are delivered to
//!
//! The simulation never calls audio or UI code directly. It reports what
//! happened to an `EventSink` synchronously, at the point of occurrence.

use serde::{Deserialize, Serialize};

use super::state::GamePhase;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Seconds survived, every frame while playing
    TimeUpdate(f32),
    /// Emitted on every phase transition
    StateChange(GamePhase),
    PlayerMove { segment: u8 },
    PlayerHit { lives_left: u8 },
    GameStart,
    GameOver { elapsed: f32 },
    /// Difficulty threshold crossed; fires once per run under every gap policy
    DifficultyIncreased,
}

/// Receives simulation events
pub trait EventSink {
    fn notify(&mut self, event: &GameEvent);
}

/// Records every event (tests, replays)
impl EventSink for Vec<GameEvent> {
    fn notify(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&mut self, _event: &GameEvent) {}
}

/// Adapts a closure into a sink
pub struct FnSink<F>(pub F);

impl<F: FnMut(&GameEvent)> EventSink for FnSink<F> {
    fn notify(&mut self, event: &GameEvent) {
        (self.0)(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn notify(&mut self, event: &GameEvent) {
        (**self).notify(event)
    }
}
