//! Hexa Rush - a hexagonal reflex arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (walls, collisions, game state)
//! - `session`: Binds the simulation to event sinks and the leaderboard
//! - `driver`: Per-frame update/render driver
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedural sound effects
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Save/load with version checks
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod driver;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{Leaderboard, LocalLeaderboard};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Number of angular segments in the play field
    pub const SEGMENTS: u8 = 6;
    /// Angular width of one segment (60 degrees)
    pub const SEGMENT_ANGLE: f32 = std::f32::consts::PI / 3.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 45.0;
    pub const PLAYER_SIZE: f32 = 8.0;
    pub const STARTING_LIVES: u8 = 2;
    /// Frames of invulnerability after a hit
    pub const INVULNERABLE_FRAMES: u32 = 120;

    /// Wall defaults
    pub const WALL_THICKNESS: f32 = 15.0;
    pub const SPAWN_RADIUS: f32 = 500.0;
    /// A new ring spawns once the newest ring has moved inside this radius
    pub const RESPAWN_RADIUS: f32 = 350.0;
    pub const DESPAWN_RADIUS: f32 = 30.0;
    /// Number of colors walls cycle through
    pub const PALETTE_SIZE: u8 = 6;

    /// Difficulty ramp
    pub const BASE_WALL_SPEED: f32 = 1.5;
    pub const WALL_SPEED_INCREMENT: f32 = 0.001;
    pub const DIFFICULTY_THRESHOLD_SECS: f32 = 10.0;
    /// "Difficulty increased" banner duration (frames)
    pub const DIFFICULTY_MESSAGE_FRAMES: u32 = 180;
    /// Gap placement gives up on the adjacency rule after this many samples
    pub const MAX_GAP_ATTEMPTS: u32 = 50;

    /// Beat-scheduled spawning (seconds)
    pub const BEAT_BASE_INTERVAL: f32 = 1.2;
    pub const BEAT_MIN_INTERVAL: f32 = 0.4;

    /// Refresh rate the per-frame constants were balanced at
    pub const REFERENCE_HZ: f32 = 60.0;
    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Central hub hexagon
    pub const HUB_RADIUS: f32 = 30.0;
    /// Radius of the play field that must fit on screen
    pub const VIEW_RADIUS: f32 = 320.0;
}

use consts::{SEGMENTS, SEGMENT_ANGLE};

/// Wrap any signed segment index into `0..SEGMENTS`
#[inline]
pub fn wrap_segment(index: i32) -> u8 {
    index.rem_euclid(SEGMENTS as i32) as u8
}

/// Angle where a segment begins (radians)
#[inline]
pub fn segment_start_angle(segment: u8) -> f32 {
    segment as f32 * SEGMENT_ANGLE
}

/// Angle at the middle of a segment (radians)
#[inline]
pub fn segment_mid_angle(segment: u8) -> f32 {
    segment_start_angle(segment) + SEGMENT_ANGLE / 2.0
}

/// Shortest signed step count from one segment to another (-3..=3, ties go positive)
pub fn segment_delta(from: u8, to: u8) -> i32 {
    let n = SEGMENTS as i32;
    let raw = (to as i32 - from as i32).rem_euclid(n);
    if raw > n / 2 { raw - n } else { raw }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Corners of a regular hexagon whose vertices sit on segment boundaries
pub fn hexagon_vertices(radius: f32) -> [Vec2; SEGMENTS as usize] {
    std::array::from_fn(|i| polar_to_cartesian(radius, segment_start_angle(i as u8)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_segment() {
        assert_eq!(wrap_segment(-1), 5);
        assert_eq!(wrap_segment(6), 0);
        assert_eq!(wrap_segment(13), 1);
        assert_eq!(wrap_segment(-7), 5);
    }

    #[test]
    fn test_segment_delta() {
        assert_eq!(segment_delta(0, 1), 1);
        assert_eq!(segment_delta(0, 5), -1);
        assert_eq!(segment_delta(4, 1), 3);
        assert_eq!(segment_delta(2, 2), 0);
        assert_eq!(segment_delta(5, 1), 2);
    }

    #[test]
    fn test_segment_angles() {
        assert!((segment_mid_angle(0) - SEGMENT_ANGLE / 2.0).abs() < 1e-6);
        assert!((segment_start_angle(3) - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_hexagon_vertices_on_radius() {
        for v in hexagon_vertices(30.0) {
            assert!((v.length() - 30.0).abs() < 1e-4);
        }
        let first = hexagon_vertices(10.0)[0];
        assert!((first.x - 10.0).abs() < 1e-5 && first.y.abs() < 1e-5);
    }
}
