//! Idle/demo mode - the sim steers itself toward the nearest open segment

use super::state::GameState;
use super::tick::Command;
use crate::consts::SEGMENTS;
use crate::segment_delta;

/// Pick at most one move for this frame
pub fn steer(state: &GameState) -> Option<Command> {
    let player = &state.player;
    let behind = player.radius - state.tuning.hit_distance();

    // Closest ring the player has not fully passed yet
    let threat = state
        .walls
        .iter()
        .map(|w| w.radius)
        .filter(|&r| r > behind)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;

    let mut blocked = [false; SEGMENTS as usize];
    for wall in state.walls.iter().filter(|w| (w.radius - threat).abs() < 0.5) {
        blocked[wall.segment as usize] = true;
    }

    if !blocked[player.segment as usize] {
        return None;
    }

    let target = (0..SEGMENTS)
        .filter(|&s| !blocked[s as usize])
        .min_by_key(|&s| segment_delta(player.segment, s).abs())?;

    if segment_delta(player.segment, target) > 0 {
        Some(Command::MoveRight)
    } else {
        Some(Command::MoveLeft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GamePhase, Wall};

    fn ring(radius: f32, gaps: &[u8]) -> Vec<Wall> {
        (0..SEGMENTS)
            .filter(|s| !gaps.contains(s))
            .map(|segment| Wall {
                segment,
                radius,
                color: 0,
            })
            .collect()
    }

    #[test]
    fn test_stays_put_when_aligned_with_gap() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::Playing;
        state.walls = ring(200.0, &[0]);
        assert_eq!(steer(&state), None);
    }

    #[test]
    fn test_moves_toward_nearest_gap() {
        let mut state = GameState::new(1);
        state.walls = ring(200.0, &[5]);
        assert_eq!(steer(&state), Some(Command::MoveLeft));
        state.walls = ring(200.0, &[2]);
        assert_eq!(steer(&state), Some(Command::MoveRight));
    }

    #[test]
    fn test_ignores_rings_already_passed() {
        let mut state = GameState::new(1);
        let mut walls = ring(20.0, &[3]);
        walls.extend(ring(300.0, &[0]));
        state.walls = walls;
        assert_eq!(steer(&state), None);
    }

    #[test]
    fn test_no_walls_no_move() {
        assert_eq!(steer(&GameState::new(1)), None);
    }
}
