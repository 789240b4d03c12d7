//! Billiards Engine - turn-based 2D pool physics and rules
//!
//! Core modules:
//! - `sim`: Deterministic simulation (table, physics, collisions, pockets, shot, rules)
//! - `engine`: Facade owning the game, command queue and tick schedulers
//! - `scheduler`: Phase-gated fixed-interval tickers
//! - `snapshot`: Read-only per-tick view for renderers
//! - `config`: Data-driven table, shot and scoring tuning

pub mod config;
pub mod engine;
pub mod scheduler;
pub mod sim;
pub mod snapshot;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Command, Engine};
pub use snapshot::{RoundRecord, Snapshot};

use glam::Vec2;

/// Engine-wide constants
pub mod consts {
    /// Physics tick rate while balls are moving (Hz)
    pub const PHYSICS_HZ: f32 = 60.0;
    /// Charge accumulator tick rate while charging (Hz)
    pub const CHARGE_HZ: f32 = 50.0;
    /// Maximum substeps per update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by `Engine::update` (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Table defaults (world units, origin at top-left)
    pub const TABLE_WIDTH: f32 = 800.0;
    pub const TABLE_HEIGHT: f32 = 400.0;
    pub const RAIL_INSET: f32 = 30.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Extra spacing between racked balls
    pub const RACK_GAP: f32 = 0.5;

    /// Pocket capture radius (strictly larger than the ball for forgiving play)
    pub const POCKET_RADIUS: f32 = 22.0;
    /// Extra ring around a pocket where rails stop bouncing balls
    pub const NEAR_POCKET_MARGIN: f32 = 4.0;
    /// Slack added to the capture threshold
    pub const CAPTURE_TOLERANCE: f32 = 4.0;
    /// Balls slower than this (units/tick) drop when over a pocket
    pub const CAPTURE_SPEED: f32 = 12.0;
    /// How far inside the capture threshold a ball drops at any speed
    pub const DEEP_CAPTURE_MARGIN: f32 = 6.0;

    /// Felt friction, applied multiplicatively per tick
    pub const FRICTION: f32 = 0.985;
    /// Velocity retained off a rail
    pub const RESTITUTION: f32 = 0.8;
    /// Velocity components below this snap to rest
    pub const REST_EPSILON: f32 = 0.05;

    /// Ticks between the round being decided and GameOver
    pub const GAME_OVER_DELAY_TICKS: u32 = 30;
}

/// Wrap an angle into (-π, π]
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Unit direction for an angle
#[inline]
pub fn direction(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_direction_unit() {
        let d = direction(1.234);
        assert!((d.length() - 1.0).abs() < 1e-6);
    }
}
