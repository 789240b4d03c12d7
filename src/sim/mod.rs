//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Velocities in units per tick
//! - Stable iteration order (by ball ID)
//! - No rendering, timers or platform dependencies

pub mod collision;
pub mod physics;
pub mod pocket;
pub mod rules;
pub mod shot;
pub mod state;
pub mod table;
pub mod tick;

pub use collision::{kinetic_energy, resolve_ball_pairs, resolve_pair, resolve_walls};
pub use physics::{all_at_rest, contain, integrate};
pub use pocket::{Capture, detect_captures, is_captured};
pub use rules::{Ruling, apply_capture};
pub use shot::ShotState;
pub use state::{Ball, BallKind, GameEvent, GamePhase, GameState, Group, RoundState, Winner};
pub use table::{Pocket, Table, rack_balls, rack_positions};
pub use tick::tick;
