//! Data-driven game balance
//!
//! Every number the simulation uses lives here so variants (hard mode,
//! rhythm mode, refresh-rate independent pacing) are just different tables.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How many gaps a new ring gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GapPolicy {
    /// 2-3 gaps until the difficulty threshold, then 1-2
    #[default]
    TimeGated,
    /// Always 1-2 gaps
    FixedHard,
}

/// When the wall generator runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnPolicy {
    /// Spawn when the field is empty or the newest ring crosses `respawn_radius`
    #[default]
    Proximity,
    /// Spawn on a countdown that shortens as walls speed up
    Beat,
}

/// How wall motion and the speed ramp relate to real time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Pacing {
    /// Fixed amount per frame, so difficulty depends on refresh rate
    #[default]
    PerFrame,
    /// Scaled by `dt * reference_hz`
    RealTime { reference_hz: f32 },
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player_radius: f32,
    pub player_size: f32,
    pub starting_lives: u8,
    pub invulnerable_frames: u32,
    pub wall_thickness: f32,
    pub spawn_radius: f32,
    pub respawn_radius: f32,
    pub despawn_radius: f32,
    pub base_wall_speed: f32,
    pub speed_increment: f32,
    pub difficulty_threshold_secs: f32,
    pub difficulty_message_frames: u32,
    pub max_gap_attempts: u32,
    pub beat_base_interval: f32,
    pub beat_min_interval: f32,
    pub gap_policy: GapPolicy,
    pub spawn_policy: SpawnPolicy,
    pub pacing: Pacing,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: PLAYER_RADIUS,
            player_size: PLAYER_SIZE,
            starting_lives: STARTING_LIVES,
            invulnerable_frames: INVULNERABLE_FRAMES,
            wall_thickness: WALL_THICKNESS,
            spawn_radius: SPAWN_RADIUS,
            respawn_radius: RESPAWN_RADIUS,
            despawn_radius: DESPAWN_RADIUS,
            base_wall_speed: BASE_WALL_SPEED,
            speed_increment: WALL_SPEED_INCREMENT,
            difficulty_threshold_secs: DIFFICULTY_THRESHOLD_SECS,
            difficulty_message_frames: DIFFICULTY_MESSAGE_FRAMES,
            max_gap_attempts: MAX_GAP_ATTEMPTS,
            beat_base_interval: BEAT_BASE_INTERVAL,
            beat_min_interval: BEAT_MIN_INTERVAL,
            gap_policy: GapPolicy::default(),
            spawn_policy: SpawnPolicy::default(),
            pacing: Pacing::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Multiplier for per-frame quantities this step
    pub fn pace(&self, dt: f32) -> f32 {
        match self.pacing {
            Pacing::PerFrame => 1.0,
            Pacing::RealTime { reference_hz } => dt * reference_hz,
        }
    }

    /// Inclusive range the gap count is drawn from at `elapsed` seconds
    pub fn gap_range(&self, elapsed: f32) -> (usize, usize) {
        match self.gap_policy {
            GapPolicy::TimeGated if elapsed < self.difficulty_threshold_secs => (2, 3),
            _ => (1, 2),
        }
    }

    /// Seconds between beat-scheduled rings at the given wall speed
    pub fn beat_interval(&self, wall_speed: f32) -> f32 {
        let speed = wall_speed.max(f32::EPSILON);
        (self.beat_base_interval * self.base_wall_speed / speed).max(self.beat_min_interval)
    }

    /// Radial distance below which a wall touches the player
    pub fn hit_distance(&self) -> f32 {
        self.wall_thickness / 2.0 + self.player_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_range_time_gated() {
        let tuning = Tuning::default();
        assert_eq!(tuning.gap_range(5.0), (2, 3));
        assert_eq!(tuning.gap_range(10.0), (1, 2));
        assert_eq!(tuning.gap_range(15.0), (1, 2));
    }

    #[test]
    fn test_gap_range_fixed_hard() {
        let tuning = Tuning {
            gap_policy: GapPolicy::FixedHard,
            ..Default::default()
        };
        assert_eq!(tuning.gap_range(0.0), (1, 2));
    }

    #[test]
    fn test_beat_interval_shrinks_with_speed_and_floors() {
        let tuning = Tuning::default();
        let base = tuning.beat_interval(tuning.base_wall_speed);
        assert!((base - BEAT_BASE_INTERVAL).abs() < 1e-6);
        assert!(tuning.beat_interval(3.0) < base);
        assert_eq!(tuning.beat_interval(100.0), BEAT_MIN_INTERVAL);
    }

    #[test]
    fn test_pace() {
        let mut tuning = Tuning::default();
        assert_eq!(tuning.pace(0.5), 1.0);
        tuning.pacing = Pacing::RealTime { reference_hz: 60.0 };
        assert!((tuning.pace(1.0 / 30.0) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn_radius": 420.0, "gap_policy": "FixedHard" }"#)
            .expect("valid tuning");
        assert_eq!(tuning.spawn_radius, 420.0);
        assert_eq!(tuning.gap_policy, GapPolicy::FixedHard);
        assert_eq!(tuning.player_radius, PLAYER_RADIUS);
    }

    #[test]
    fn test_hit_distance() {
        assert_eq!(Tuning::default().hit_distance(), 15.5);
    }
}
