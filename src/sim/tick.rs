//! Per-frame simulation step
//!
//! Core game loop that advances the state machine. Commands are applied the
//! moment they arrive; `tick` advances time, walls, collisions and difficulty.

use super::autopilot;
use super::collision::check_collision;
use super::events::{EventSink, GameEvent};
use super::spawn;
use super::state::{GamePhase, GameState};
use crate::consts::MAX_FRAME_DT;

/// Player commands from the input boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    /// Start (or restart) a run; ignored while playing
    Start,
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Commands applied before the step, in order
    pub commands: Vec<Command>,
    /// Idle/demo mode - the sim steers itself
    pub autopilot: bool,
}

/// Apply one command immediately
pub fn apply_command(state: &mut GameState, command: Command, sink: &mut dyn EventSink) {
    match command {
        Command::MoveLeft => {
            move_player(state, -1, sink);
        }
        Command::MoveRight => {
            move_player(state, 1, sink);
        }
        Command::Start => start_game(state, sink),
    }
}

/// Move one segment clockwise (+1) or counter-clockwise (-1). No-op outside play.
pub fn move_player(state: &mut GameState, direction: i32, sink: &mut dyn EventSink) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    state.player.shift(direction);
    sink.notify(&GameEvent::PlayerMove {
        segment: state.player.segment,
    });
    true
}

/// Enter `Playing` from `Waiting` or `GameOver`, resetting the run
pub fn start_game(state: &mut GameState, sink: &mut dyn EventSink) {
    if state.phase == GamePhase::Playing {
        return;
    }

    state.reset_session();
    state.phase = GamePhase::Playing;
    log::info!("Run started (seed {})", state.seed);

    sink.notify(&GameEvent::StateChange(GamePhase::Playing));
    sink.notify(&GameEvent::GameStart);

    spawn::prime(state);
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, sink: &mut dyn EventSink) {
    for &command in &input.commands {
        apply_command(state, command, sink);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    if input.autopilot {
        if let Some(command) = autopilot::steer(state) {
            apply_command(state, command, sink);
        }
    }

    state.frame += 1;
    state.elapsed += dt;
    sink.notify(&GameEvent::TimeUpdate(state.elapsed));

    if state.elapsed >= state.tuning.difficulty_threshold_secs && !state.difficulty_increased {
        state.difficulty_increased = true;
        state.difficulty_message_frames = state.tuning.difficulty_message_frames;
        log::info!("Difficulty increased at {:.1}s", state.elapsed);
        sink.notify(&GameEvent::DifficultyIncreased);
    }

    // Elapsed time is wall clock; motion and the beat clock never jump more
    // than one long frame
    let motion_dt = dt.min(MAX_FRAME_DT);
    let pace = state.tuning.pace(motion_dt);

    // Move walls inward and drop the ones that reached the hub
    let step = state.wall_speed * pace;
    let despawn = state.tuning.despawn_radius;
    for wall in &mut state.walls {
        wall.radius -= step;
    }
    state.walls.retain(|w| w.radius >= despawn);

    spawn::advance(state, motion_dt);

    if check_collision(&state.player, &state.walls, state.tuning.wall_thickness).is_some() {
        take_damage(state, sink);
        if state.phase == GamePhase::GameOver {
            return;
        }
    }

    state.wall_speed += state.tuning.speed_increment * pace;

    state.difficulty_message_frames = state.difficulty_message_frames.saturating_sub(1);
    state.player.invulnerable = state.player.invulnerable.saturating_sub(1);
}

/// Lose a life and start the invulnerability window
fn take_damage(state: &mut GameState, sink: &mut dyn EventSink) {
    let player = &mut state.player;
    player.lives = player.lives.saturating_sub(1);
    player.invulnerable = state.tuning.invulnerable_frames;
    log::info!("Player hit, {} lives left", player.lives);
    sink.notify(&GameEvent::PlayerHit {
        lives_left: player.lives,
    });

    if player.lives == 0 {
        game_over(state, sink);
    }
}

fn game_over(state: &mut GameState, sink: &mut dyn EventSink) {
    state.phase = GamePhase::GameOver;
    log::info!(
        "Game over after {:.1}s ({} rings)",
        state.elapsed,
        state.rings_spawned
    );
    sink.notify(&GameEvent::StateChange(GamePhase::GameOver));
    sink.notify(&GameEvent::GameOver {
        elapsed: state.elapsed,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::NullSink;
    use crate::sim::state::Wall;
    use crate::tuning::{GapPolicy, Pacing, Tuning};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn started(seed: u64) -> (GameState, Vec<GameEvent>) {
        let mut state = GameState::new(seed);
        let mut events = Vec::new();
        apply_command(&mut state, Command::Start, &mut events);
        (state, events)
    }

    /// Replace the field with a single wall sitting on the player
    fn wall_on_player(state: &mut GameState, segment: u8) {
        state.walls = vec![Wall {
            segment,
            radius: state.player.radius + state.wall_speed,
            color: 0,
        }];
    }

    #[test]
    fn test_start_from_waiting() {
        let (state, events) = started(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.walls.is_empty());
        assert_eq!(
            events,
            vec![GameEvent::StateChange(GamePhase::Playing), GameEvent::GameStart]
        );
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let (mut state, _) = started(1);
        state.player.segment = 3;
        let mut events = Vec::new();
        apply_command(&mut state, Command::Start, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.player.segment, 3);
    }

    #[test]
    fn test_move_wraps_left_from_zero() {
        let (mut state, _) = started(1);
        let mut events = Vec::new();
        apply_command(&mut state, Command::MoveLeft, &mut events);
        assert_eq!(state.player.segment, 5);
        assert_eq!(events, vec![GameEvent::PlayerMove { segment: 5 }]);
    }

    #[test]
    fn test_move_ignored_outside_play() {
        let mut state = GameState::new(1);
        let mut events = Vec::new();
        apply_command(&mut state, Command::MoveRight, &mut events);
        assert_eq!(state.player.segment, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_waiting_tick_changes_nothing() {
        let mut state = GameState::new(1);
        let mut events = Vec::new();
        tick(&mut state, &TickInput::default(), DT, &mut events);
        assert_eq!(state.frame, 0);
        assert_eq!(state.elapsed, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_tick_reports_time_and_ramps_speed() {
        let (mut state, _) = started(1);
        let mut events = Vec::new();
        tick(&mut state, &TickInput::default(), DT, &mut events);
        assert_eq!(events.first(), Some(&GameEvent::TimeUpdate(DT)));
        assert!((state.wall_speed - 1.501).abs() < 1e-6);
        assert_eq!(state.walls[0].radius, state.tuning.spawn_radius - 1.5);
    }

    #[test]
    fn test_walls_despawn_below_threshold() {
        let (mut state, _) = started(1);
        state.walls = vec![Wall {
            segment: 3,
            radius: 31.0,
            color: 0,
        }];
        tick(&mut state, &TickInput::default(), DT, &mut NullSink);
        assert!(state.walls.iter().all(|w| w.radius >= 30.0));
        // The emptied field immediately gets a fresh ring
        assert_eq!(state.newest_ring_radius(), Some(state.tuning.spawn_radius));
    }

    #[test]
    fn test_hit_sets_invulnerability() {
        let (mut state, _) = started(1);
        wall_on_player(&mut state, 0);
        let mut events = Vec::new();
        tick(&mut state, &TickInput::default(), DT, &mut events);
        assert_eq!(state.player.lives, 1);
        // Set to 120 on hit, then this frame's countdown runs
        assert_eq!(state.player.invulnerable, 119);
        assert!(events.contains(&GameEvent::PlayerHit { lives_left: 1 }));
    }

    #[test]
    fn test_no_second_hit_during_invulnerability() {
        let (mut state, _) = started(1);
        state.tuning.speed_increment = 0.0;
        wall_on_player(&mut state, 0);
        tick(&mut state, &TickInput::default(), DT, &mut NullSink);
        assert_eq!(state.player.lives, 1);

        // Keep an overlapping wall parked on the player
        for _ in 0..118 {
            wall_on_player(&mut state, 0);
            tick(&mut state, &TickInput::default(), DT, &mut NullSink);
            assert_eq!(state.player.lives, 1);
        }
        assert_eq!(state.player.invulnerable, 1);
        wall_on_player(&mut state, 0);
        tick(&mut state, &TickInput::default(), DT, &mut NullSink);
        assert_eq!(state.player.invulnerable, 0);
        assert_eq!(state.player.lives, 1);

        wall_on_player(&mut state, 0);
        tick(&mut state, &TickInput::default(), DT, &mut NullSink);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_two_hits_end_the_run() {
        let (mut state, _) = started(42);
        let mut events = Vec::new();
        let mut hits = 0;
        let mut frames = 0;
        while state.phase == GamePhase::Playing && frames < 100_000 {
            tick(&mut state, &TickInput::default(), DT, &mut events);
            let now_hits = events
                .iter()
                .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
                .count();
            if now_hits != hits {
                hits = now_hits;
                if hits == 1 {
                    assert_eq!(state.phase, GamePhase::Playing);
                }
            }
            frames += 1;
        }
        assert_eq!(hits, 2);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.lives, 0);

        let tail: Vec<_> = events.iter().rev().take(3).rev().copied().collect();
        assert_eq!(
            tail,
            vec![
                GameEvent::PlayerHit { lives_left: 0 },
                GameEvent::StateChange(GamePhase::GameOver),
                GameEvent::GameOver {
                    elapsed: state.elapsed
                },
            ]
        );
        assert!(state.elapsed > 0.0);
    }

    #[test]
    fn test_game_over_is_frozen() {
        let (mut state, _) = started(5);
        state.player.lives = 1;
        wall_on_player(&mut state, 0);
        tick(&mut state, &TickInput::default(), DT, &mut NullSink);
        assert_eq!(state.phase, GamePhase::GameOver);

        let player = state.player.clone();
        let walls = state.walls.clone();
        let mut events = Vec::new();
        let input = TickInput {
            commands: vec![Command::MoveLeft],
            autopilot: true,
        };
        for _ in 0..10 {
            tick(&mut state, &input, DT, &mut events);
        }
        assert_eq!(state.player, player);
        assert_eq!(state.walls, walls);
        assert!(events.is_empty());
    }

    #[test]
    fn test_long_frame_counts_full_time_but_clamps_motion() {
        let tuning = Tuning {
            pacing: Pacing::RealTime { reference_hz: 60.0 },
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(21, tuning);
        apply_command(&mut state, Command::Start, &mut NullSink);
        let before = state.walls[0].radius;
        let speed = state.wall_speed;

        tick(&mut state, &TickInput::default(), 0.4, &mut NullSink);
        assert!((state.elapsed - 0.4).abs() < 1e-6);
        let moved = before - state.walls[0].radius;
        assert!((moved - speed * MAX_FRAME_DT * 60.0).abs() < 1e-3, "moved {moved}");
    }

    #[test]
    fn test_restart_resets_run() {
        let (mut state, _) = started(8);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT, &mut NullSink);
        }
        state.player.lives = 1;
        state.player.segment = 4;
        state.player.invulnerable = 0;
        wall_on_player(&mut state, 4);
        tick(&mut state, &TickInput::default(), DT, &mut NullSink);
        assert_eq!(state.phase, GamePhase::GameOver);

        apply_command(&mut state, Command::Start, &mut NullSink);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.lives, 2);
        assert_eq!(state.player.segment, 0);
        assert_eq!(state.player.invulnerable, 0);
        assert_eq!(state.wall_speed, state.tuning.base_wall_speed);
        assert_eq!(state.elapsed, 0.0);
        // Only the freshly spawned first ring remains
        assert!(state.walls.iter().all(|w| w.radius == state.tuning.spawn_radius));
        assert_eq!(state.rings_spawned, 1);
    }

    #[test]
    fn test_difficulty_banner_fires_once() {
        let (mut state, _) = started(9);
        state.player.invulnerable = u32::MAX;
        let mut events = Vec::new();
        tick(&mut state, &TickInput::default(), 9.99, &mut events);
        assert!(!events.contains(&GameEvent::DifficultyIncreased));
        tick(&mut state, &TickInput::default(), 0.02, &mut events);
        tick(&mut state, &TickInput::default(), 0.02, &mut events);
        let fired = events
            .iter()
            .filter(|e| **e == GameEvent::DifficultyIncreased)
            .count();
        assert_eq!(fired, 1);
        assert_eq!(state.difficulty_message_frames, 178);
    }

    #[test]
    fn test_difficulty_fires_under_fixed_hard_gaps() {
        let tuning = Tuning {
            gap_policy: GapPolicy::FixedHard,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(9, tuning);
        start_game(&mut state, &mut NullSink);
        state.player.invulnerable = u32::MAX;
        let mut events = Vec::new();
        tick(&mut state, &TickInput::default(), 9.99, &mut events);
        assert!(!events.contains(&GameEvent::DifficultyIncreased));
        tick(&mut state, &TickInput::default(), 0.02, &mut events);
        tick(&mut state, &TickInput::default(), 0.02, &mut events);
        let fired = events
            .iter()
            .filter(|e| **e == GameEvent::DifficultyIncreased)
            .count();
        assert_eq!(fired, 1);
        assert!(state.difficulty_increased);
    }

    #[test]
    fn test_real_time_pacing_scales_motion() {
        let tuning = Tuning {
            pacing: Pacing::RealTime { reference_hz: 60.0 },
            ..Default::default()
        };
        let mut state = GameState::with_tuning(1, tuning);
        start_game(&mut state, &mut NullSink);
        tick(&mut state, &TickInput::default(), 2.0 / 60.0, &mut NullSink);
        let spawn = state.tuning.spawn_radius;
        assert!((state.walls[0].radius - (spawn - 3.0)).abs() < 1e-4);
        assert!((state.wall_speed - 1.502).abs() < 1e-5);
    }

    #[test]
    fn test_autopilot_survives_longer_than_idle() {
        let run = |autopilot: bool| {
            let (mut state, _) = started(77);
            let input = TickInput {
                commands: Vec::new(),
                autopilot,
            };
            while state.phase == GamePhase::Playing && state.frame < 20_000 {
                tick(&mut state, &input, DT, &mut NullSink);
            }
            state.frame
        };
        assert!(run(true) > run(false));
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let (mut a, _) = started(99_999);
        let (mut b, _) = started(99_999);
        let inputs = [
            TickInput {
                commands: vec![Command::MoveRight],
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                commands: vec![Command::MoveLeft, Command::MoveLeft],
                ..Default::default()
            },
        ];
        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input, DT, &mut NullSink);
            tick(&mut b, input, DT, &mut NullSink);
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.walls, b.walls);
        assert_eq!(a.phase, b.phase);
    }

    #[test]
    fn test_serialized_state_resumes_identically() {
        let (mut original, _) = started(1234);
        let script = |frame: u64| TickInput {
            commands: match frame % 37 {
                0 => vec![Command::MoveRight],
                11 => vec![Command::MoveLeft],
                _ => Vec::new(),
            },
            autopilot: frame % 5 == 0,
        };
        for _ in 0..400 {
            let input = script(original.frame);
            tick(&mut original, &input, DT, &mut NullSink);
        }

        let json = serde_json::to_string(&original).expect("serialize");
        let mut restored: GameState = serde_json::from_str(&json).expect("deserialize");

        let mut events_a = Vec::new();
        let mut events_b = Vec::new();
        for _ in 0..2_000 {
            let input = script(original.frame);
            tick(&mut original, &input, DT, &mut events_a);
            tick(&mut restored, &input, DT, &mut events_b);
        }
        assert_eq!(original.player, restored.player);
        assert_eq!(original.walls, restored.walls);
        assert_eq!(original.phase, restored.phase);
        assert_eq!(original.elapsed, restored.elapsed);
        assert_eq!(events_a, events_b);
    }

    proptest! {
        #[test]
        fn prop_segment_stays_in_range(moves in proptest::collection::vec(any::<bool>(), 0..200)) {
            let (mut state, _) = started(3);
            for right in moves {
                let command = if right { Command::MoveRight } else { Command::MoveLeft };
                apply_command(&mut state, command, &mut NullSink);
                tick(&mut state, &TickInput::default(), DT, &mut NullSink);
                prop_assert!(state.player.segment < 6);
            }
        }

        #[test]
        fn prop_speed_and_lives_monotonic(seed in any::<u64>(), frames in 1usize..2_000) {
            let (mut state, _) = started(seed);
            let mut speed = state.wall_speed;
            let mut lives = state.player.lives;
            for _ in 0..frames {
                tick(&mut state, &TickInput::default(), DT, &mut NullSink);
                prop_assert!(state.wall_speed >= speed);
                prop_assert!(state.player.lives <= lives);
                speed = state.wall_speed;
                lives = state.player.lives;
                if state.player.lives == 0 {
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                }
            }
        }
    }
}
