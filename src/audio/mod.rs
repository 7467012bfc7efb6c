//! Procedurally generated sound - no external files needed!
//!
//! Sounds are short sequences of square-wave beeps. The tables here are
//! platform independent; `web` plays them through the Web Audio API.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player changed segment
    Move,
    /// Player lost a life
    Hit,
    /// Run started
    Start,
    /// Run ended
    GameOver,
    /// Difficulty threshold crossed
    DifficultyUp,
    /// Score made the leaderboard
    HighScore,
}

/// One beep inside a sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency (Hz)
    pub freq: f32,
    /// Delay from the start of the sound (seconds)
    pub offset: f32,
    /// Length (seconds)
    pub duration: f32,
    /// Peak gain before the volume setting is applied
    pub gain: f32,
}

const fn tone(freq: f32, offset: f32, duration: f32, gain: f32) -> Tone {
    Tone {
        freq,
        offset,
        duration,
        gain,
    }
}

const MOVE_TONES: &[Tone] = &[tone(800.0, 0.0, 0.1, 0.05)];
const HIT_TONES: &[Tone] = &[tone(180.0, 0.0, 0.12, 0.12), tone(90.0, 0.08, 0.25, 0.12)];
// Rising
const START_TONES: &[Tone] = &[
    tone(200.0, 0.0, 0.1, 0.08),
    tone(300.0, 0.1, 0.1, 0.08),
    tone(400.0, 0.2, 0.2, 0.08),
];
// Falling
const GAME_OVER_TONES: &[Tone] = &[
    tone(400.0, 0.0, 0.2, 0.1),
    tone(300.0, 0.2, 0.2, 0.1),
    tone(200.0, 0.4, 0.4, 0.1),
];
const DIFFICULTY_TONES: &[Tone] = &[tone(600.0, 0.0, 0.12, 0.08), tone(900.0, 0.12, 0.2, 0.08)];
const HIGH_SCORE_TONES: &[Tone] = &[
    tone(523.0, 0.0, 0.12, 0.08),
    tone(659.0, 0.12, 0.12, 0.08),
    tone(784.0, 0.24, 0.12, 0.08),
    tone(1047.0, 0.36, 0.3, 0.08),
];

impl SoundEffect {
    /// Beeps making up this effect
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Move => MOVE_TONES,
            SoundEffect::Hit => HIT_TONES,
            SoundEffect::Start => START_TONES,
            SoundEffect::GameOver => GAME_OVER_TONES,
            SoundEffect::DifficultyUp => DIFFICULTY_TONES,
            SoundEffect::HighScore => HIGH_SCORE_TONES,
        }
    }
}

/// Sound for a simulation event, if it has one
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::PlayerMove { .. } => Some(SoundEffect::Move),
        GameEvent::PlayerHit { lives_left } if *lives_left > 0 => Some(SoundEffect::Hit),
        // The final hit is covered by the game over sound
        GameEvent::PlayerHit { .. } => None,
        GameEvent::GameStart => Some(SoundEffect::Start),
        GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        GameEvent::DifficultyIncreased => Some(SoundEffect::DifficultyUp),
        GameEvent::TimeUpdate(_) | GameEvent::StateChange(_) => None,
    }
}

/// Background rhythm: A, C#, E once per bar
pub const BGM_PATTERN: [Tone; 3] = [
    tone(440.0, 0.0, 0.1, 0.02),
    tone(554.0, 0.3, 0.1, 0.02),
    tone(659.0, 0.6, 0.1, 0.02),
];
/// Bar length (seconds)
pub const BGM_BAR_SECS: f32 = 1.0;

/// Counts frame time into background bars
#[derive(Debug, Clone, Default)]
pub struct BgmClock {
    until_next: f32,
    running: bool,
}

impl BgmClock {
    /// Start with a bar due immediately
    pub fn start(&mut self) {
        self.running = true;
        self.until_next = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `dt`; returns true when a new bar should play
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.until_next -= dt;
        if self.until_next <= 0.0 {
            // Never queue up missed bars after a stall
            self.until_next = (self.until_next + BGM_BAR_SECS).max(0.0);
            if self.until_next == 0.0 {
                self.until_next = BGM_BAR_SECS;
            }
            true
        } else {
            false
        }
    }
}
