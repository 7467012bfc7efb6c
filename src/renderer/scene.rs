//! Scene assembly: game state in, triangles out

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::HUB_RADIUS;
use crate::sim::{GamePhase, GameState, Player};

const PLAYER_SEGMENTS: u32 = 16;
const HUB_LINE_WIDTH: f32 = 2.0;
const GUIDE_WIDTH: f32 = 1.0;
/// Invulnerability frames per blink half-period
const BLINK_FRAMES: u32 = 10;

/// Whether the player is in the dim half of its hit blink
pub fn player_blinking(player: &Player) -> bool {
    player.is_invulnerable() && (player.invulnerable / BLINK_FRAMES) % 2 == 0
}

/// Full-health color until the first hit of the run
fn player_color(player: &Player, starting_lives: u8, effects_enabled: bool) -> [f32; 4] {
    let base = if player.lives >= starting_lives {
        colors::PLAYER
    } else {
        colors::PLAYER_LOW
    };
    if effects_enabled && player_blinking(player) {
        colors::with_alpha(base, 0.5)
    } else {
        base
    }
}

/// Build the frame's vertices from game state (arena coordinates)
pub fn build_scene(state: &GameState, effects_enabled: bool) -> Vec<Vertex> {
    let thickness = state.tuning.wall_thickness;
    let mut vertices = Vec::with_capacity(128 + state.walls.len() * 6);

    // Background guides first so everything else draws over them
    vertices.extend(shapes::spokes(HUB_RADIUS, state.tuning.spawn_radius, GUIDE_WIDTH, colors::GUIDE));

    for wall in &state.walls {
        vertices.extend(shapes::wall_band(
            wall.segment,
            wall.inner_radius(thickness),
            wall.outer_radius(thickness),
            colors::wall(wall.color),
        ));
    }

    vertices.extend(shapes::hexagon_outline(HUB_RADIUS, HUB_LINE_WIDTH, colors::HUB));

    if state.phase == GamePhase::Playing {
        let player = &state.player;
        vertices.extend(shapes::circle(
            player.position(),
            player.size,
            player_color(player, state.tuning.starting_lives, effects_enabled),
            PLAYER_SEGMENTS,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Command, NullSink, apply_command};
    use crate::tuning::Tuning;

    fn has_color(vertices: &[Vertex], color: [f32; 4]) -> bool {
        vertices.iter().any(|v| v.color == color)
    }

    fn playing() -> GameState {
        let mut state = GameState::new(3);
        apply_command(&mut state, Command::Start, &mut NullSink);
        state
    }

    #[test]
    fn test_player_hidden_outside_play() {
        let state = GameState::new(3);
        let verts = build_scene(&state, true);
        assert!(!has_color(&verts, colors::PLAYER));
        assert!(has_color(&verts, colors::HUB));
    }

    #[test]
    fn test_player_color_tracks_lives() {
        let mut state = playing();
        assert!(has_color(&build_scene(&state, true), colors::PLAYER));
        state.player.lives = 1;
        let verts = build_scene(&state, true);
        assert!(has_color(&verts, colors::PLAYER_LOW));
        assert!(!has_color(&verts, colors::PLAYER));
    }

    #[test]
    fn test_player_color_follows_tuned_lives() {
        let tuning = Tuning {
            starting_lives: 3,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(3, tuning);
        apply_command(&mut state, Command::Start, &mut NullSink);
        assert_eq!(state.player.lives, 3);
        assert!(has_color(&build_scene(&state, true), colors::PLAYER));

        // One hit of three already reads as damaged
        state.player.lives = 2;
        let verts = build_scene(&state, true);
        assert!(has_color(&verts, colors::PLAYER_LOW));
        assert!(!has_color(&verts, colors::PLAYER));
    }

    #[test]
    fn test_blink_halves_alpha() {
        let mut state = playing();
        state.player.lives = 1;
        state.player.invulnerable = 120;
        assert!(player_blinking(&state.player));
        let dim = colors::with_alpha(colors::PLAYER_LOW, 0.5);
        assert!(has_color(&build_scene(&state, true), dim));
        // Reduced motion draws solid
        assert!(!has_color(&build_scene(&state, false), dim));

        state.player.invulnerable = 115;
        assert!(!player_blinking(&state.player));
        state.player.invulnerable = 0;
        assert!(!player_blinking(&state.player));
    }

    #[test]
    fn test_one_band_per_wall() {
        let state = playing();
        let color = colors::wall(state.walls[0].color);
        let count = build_scene(&state, true)
            .iter()
            .filter(|v| v.color == color)
            .count();
        assert_eq!(count, state.walls.len() * 6);
    }
}
