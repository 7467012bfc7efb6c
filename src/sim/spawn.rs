//! Ring spawn scheduling

use super::state::GameState;
use crate::tuning::SpawnPolicy;

/// Spawn the first ring of a run and prime the beat timer
pub fn prime(state: &mut GameState) {
    state.spawn_ring();
    state.beat_timer = state.tuning.beat_interval(state.wall_speed);
}

/// Spawn rings that are due this frame; returns how many were spawned
pub fn advance(state: &mut GameState, dt: f32) -> u32 {
    match state.tuning.spawn_policy {
        SpawnPolicy::Proximity => {
            let due = state
                .newest_ring_radius()
                .is_none_or(|r| r < state.tuning.respawn_radius);
            if due {
                state.spawn_ring();
                1
            } else {
                0
            }
        }
        SpawnPolicy::Beat => {
            state.beat_timer -= dt;
            let mut spawned = 0;
            // A long frame can owe more than one beat; cap it so a stall
            // never floods the field.
            while state.beat_timer <= 0.0 && spawned < 2 {
                state.spawn_ring();
                state.beat_timer += state.tuning.beat_interval(state.wall_speed);
                spawned += 1;
            }
            if state.beat_timer <= 0.0 {
                state.beat_timer = state.tuning.beat_interval(state.wall_speed);
            }
            spawned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn beat_state() -> GameState {
        GameState::with_tuning(
            11,
            Tuning {
                spawn_policy: SpawnPolicy::Beat,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_proximity_spawns_when_empty() {
        let mut state = GameState::new(1);
        assert_eq!(advance(&mut state, 1.0 / 60.0), 1);
        assert!(!state.walls.is_empty());
        // Newest ring still at the spawn radius
        assert_eq!(advance(&mut state, 1.0 / 60.0), 0);
    }

    #[test]
    fn test_proximity_spawns_past_threshold() {
        let mut state = GameState::new(1);
        state.spawn_ring();
        for wall in &mut state.walls {
            wall.radius = 349.0;
        }
        assert_eq!(advance(&mut state, 1.0 / 60.0), 1);
        assert_eq!(state.newest_ring_radius(), Some(state.tuning.spawn_radius));
    }

    #[test]
    fn test_beat_waits_for_timer() {
        let mut state = beat_state();
        prime(&mut state);
        let rings = state.rings_spawned;
        let interval = state.tuning.beat_interval(state.wall_speed);
        assert!((state.beat_timer - interval).abs() < 1e-6);

        assert_eq!(advance(&mut state, interval / 2.0), 0);
        assert_eq!(advance(&mut state, interval / 2.0 + 0.01), 1);
        assert_eq!(state.rings_spawned, rings + 1);
    }

    #[test]
    fn test_beat_rearms_with_current_speed() {
        let mut state = beat_state();
        prime(&mut state);
        state.wall_speed = 3.0;
        advance(&mut state, 10.0);
        assert!(state.beat_timer > 0.0);
        assert!(state.beat_timer <= state.tuning.beat_interval(3.0) + 1e-6);
    }
}
