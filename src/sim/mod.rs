//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the `dt` passed to `tick`
//! - Seeded RNG only, carried inside the state
//! - Stable iteration order (walls oldest first)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod events;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod walls;

pub use collision::{check_collision, overlaps_radially};
pub use events::{EventSink, FnSink, GameEvent, NullSink};
pub use state::{GamePhase, GameState, Player, Wall};
pub use tick::{Command, TickInput, apply_command, move_player, start_game, tick};
pub use walls::{choose_gaps, gap_count, generate_ring};
