//! Game state and core simulation types
//!
//! All state that must be persisted for Continue/determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::walls::generate_ring;
use crate::consts::{PALETTE_SIZE, SEGMENTS};
use crate::tuning::Tuning;
use crate::{polar_to_cartesian, segment_mid_angle, wrap_segment};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Prompt shown, nothing advances
    Waiting,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// The player's dot, orbiting the hub at a fixed radius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Segment the player occupies (0..6)
    pub segment: u8,
    /// Distance from the center
    pub radius: f32,
    /// Collision radius
    pub size: f32,
    pub lives: u8,
    /// Frames of invulnerability left
    pub invulnerable: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            segment: 0,
            radius: tuning.player_radius,
            size: tuning.player_size,
            lives: tuning.starting_lives,
            invulnerable: 0,
        }
    }

    /// Step one segment in `direction` (sign only), wrapping around the hexagon
    pub fn shift(&mut self, direction: i32) {
        self.segment = wrap_segment(self.segment as i32 + direction.signum());
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0
    }

    /// Center of the player dot in arena coordinates
    pub fn position(&self) -> Vec2 {
        polar_to_cartesian(self.radius, segment_mid_angle(self.segment))
    }
}

/// One blocked slice of a ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub segment: u8,
    /// Centerline distance from the center (shrinks over time)
    pub radius: f32,
    /// Palette index (0..6)
    pub color: u8,
}

impl Wall {
    #[inline]
    pub fn inner_radius(&self, thickness: f32) -> f32 {
        self.radius - thickness / 2.0
    }

    #[inline]
    pub fn outer_radius(&self, thickness: f32) -> f32 {
        self.radius + thickness / 2.0
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Generator state, serialized so a restored game draws the same gaps
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    /// Active walls, oldest ring first
    pub walls: Vec<Wall>,
    /// Seconds survived this run
    pub elapsed: f32,
    /// Radius lost per frame (or per reference frame in real-time pacing)
    pub wall_speed: f32,
    /// Palette index the next ring will use
    pub palette_cursor: u8,
    pub difficulty_increased: bool,
    /// Frames left on the "difficulty increased" banner
    pub difficulty_message_frames: u32,
    /// Seconds until the next beat-scheduled ring
    pub beat_timer: f32,
    /// Simulation frames run this session
    pub frame: u64,
    /// Rings spawned this session
    pub rings_spawned: u32,
}

impl GameState {
    /// Create a waiting game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning),
            phase: GamePhase::Waiting,
            walls: Vec::new(),
            elapsed: 0.0,
            wall_speed: tuning.base_wall_speed,
            palette_cursor: 0,
            difficulty_increased: false,
            difficulty_message_frames: 0,
            beat_timer: 0.0,
            frame: 0,
            rings_spawned: 0,
            tuning,
        }
    }

    /// Reset everything a new run starts from (the RNG keeps its stream)
    pub fn reset_session(&mut self) {
        self.player = Player::new(&self.tuning);
        self.walls.clear();
        self.elapsed = 0.0;
        self.wall_speed = self.tuning.base_wall_speed;
        self.palette_cursor = 0;
        self.difficulty_increased = false;
        self.difficulty_message_frames = 0;
        self.beat_timer = 0.0;
        self.frame = 0;
        self.rings_spawned = 0;
    }

    /// Generate one ring at the spawn radius and advance the palette
    pub fn spawn_ring(&mut self) -> usize {
        let ring = generate_ring(&mut self.rng, &self.tuning, self.elapsed, self.palette_cursor);
        let count = ring.len();
        log::debug!(
            "Ring {} spawned: {} walls, color {}",
            self.rings_spawned,
            count,
            self.palette_cursor
        );
        self.walls.extend(ring);
        self.palette_cursor = (self.palette_cursor + 1) % PALETTE_SIZE;
        self.rings_spawned += 1;
        count
    }

    /// Radius of the most recently spawned ring, if any walls remain
    pub fn newest_ring_radius(&self) -> Option<f32> {
        self.walls.last().map(|w| w.radius)
    }

    /// Score as shown to the player (seconds, one decimal)
    pub fn score(&self) -> f32 {
        crate::highscores::round_score(self.elapsed)
    }

    /// Check structural invariants (used when loading saves)
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.player.segment >= SEGMENTS {
            return Err("player segment out of range");
        }
        if self.player.lives > self.tuning.starting_lives {
            return Err("player has more lives than a run starts with");
        }
        if self.phase == GamePhase::Playing && self.player.lives == 0 {
            return Err("playing with no lives left");
        }
        if self.walls.iter().any(|w| w.segment >= SEGMENTS || w.color >= PALETTE_SIZE) {
            return Err("wall segment or color out of range");
        }
        if !self.elapsed.is_finite() || !self.wall_speed.is_finite() {
            return Err("non-finite timer");
        }
        Ok(())
    }
}
