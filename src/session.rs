//! A running game bound to its collaborators
//!
//! The session owns the simulation state, fans events out to every sink and
//! checks the leaderboard once when a run ends.

use crate::highscores::Leaderboard;
use crate::persistence::{self, PersistenceError, SaveEnvelope};
use crate::platform::KeyValueStore;
use crate::sim::{
    Command, EventSink, GameEvent, GamePhase, GameState, TickInput, apply_command, tick,
};
use crate::tuning::Tuning;

pub struct Session {
    state: GameState,
    sinks: Vec<Box<dyn EventSink>>,
    leaderboard: Box<dyn Leaderboard>,
    /// Score waiting for a name, set when a run makes the board
    pending_submission: Option<f32>,
    /// Idle/demo mode
    pub autopilot: bool,
}

impl Session {
    pub fn new(state: GameState, leaderboard: Box<dyn Leaderboard>) -> Self {
        Self {
            state,
            sinks: Vec::new(),
            leaderboard,
            pending_submission: None,
            autopilot: false,
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn leaderboard(&self) -> &dyn Leaderboard {
        self.leaderboard.as_ref()
    }

    pub fn leaderboard_mut(&mut self) -> &mut dyn Leaderboard {
        self.leaderboard.as_mut()
    }

    /// Apply a command immediately
    pub fn command(&mut self, command: Command) {
        if command == Command::Start && self.state.phase != GamePhase::Playing {
            // A new run abandons any unsubmitted score
            self.pending_submission = None;
        }
        let mut events = Vec::new();
        apply_command(&mut self.state, command, &mut events);
        self.dispatch(events);
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32) {
        let input = TickInput {
            commands: Vec::new(),
            autopilot: self.autopilot,
        };
        let mut events = Vec::new();
        tick(&mut self.state, &input, dt, &mut events);
        self.dispatch(events);
    }

    fn dispatch(&mut self, events: Vec<GameEvent>) {
        for event in &events {
            for sink in &mut self.sinks {
                sink.notify(event);
            }
            if let GameEvent::GameOver { elapsed } = event {
                let score = crate::highscores::round_score(*elapsed);
                if self.leaderboard.is_high_score(score) {
                    log::info!("New high score: {score:.1}s");
                    self.pending_submission = Some(score);
                }
            }
        }
    }

    /// Score waiting to be named, if the last run made the board
    pub fn pending_submission(&self) -> Option<f32> {
        self.pending_submission
    }

    /// Record the pending score under `name`; returns the rank achieved
    pub fn submit_score(&mut self, name: &str) -> Option<usize> {
        let score = self.pending_submission.take()?;
        self.leaderboard.add_score(name, score)
    }

    pub fn dismiss_submission(&mut self) {
        self.pending_submission = None;
    }

    /// Serialize the current run into a save envelope
    pub fn snapshot(&self, saved_at_ms: f64) -> Result<String, PersistenceError> {
        persistence::encode(&self.state, saved_at_ms)
    }

    /// Replace the current run with a saved one
    pub fn restore(&mut self, json: &str) -> Result<(), PersistenceError> {
        let envelope = persistence::decode(json)?;
        self.resume(envelope);
        Ok(())
    }

    /// Continue from an already decoded save
    pub fn resume(&mut self, envelope: SaveEnvelope) {
        self.state = envelope.state;
        self.pending_submission = None;
        log::info!("Restored run at {:.1}s", self.state.elapsed);
    }

    /// Swap the balance table; refused mid-run
    pub fn set_tuning(&mut self, tuning: Tuning) -> bool {
        if self.state.phase == GamePhase::Playing {
            return false;
        }
        self.state.tuning = tuning;
        self.state.reset_session();
        true
    }

    /// Save the run to a store if one is in progress
    pub fn save_to<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        saved_at_ms: f64,
    ) -> Result<bool, PersistenceError> {
        if self.state.phase != GamePhase::Playing {
            return Ok(false);
        }
        persistence::save(store, &self.state, saved_at_ms)?;
        Ok(true)
    }
}
