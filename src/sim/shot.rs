//! Shot controller: aiming, power charging and release
//!
//! Aiming -> Charging -> Moving -> Aiming, or GameOver once the rules decide
//! the round. Every transition checks the current phase; calls made in the
//! wrong phase do nothing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GamePhase;
use crate::config::ShotConfig;
use crate::{direction, wrap_angle};

/// Shot state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotState {
    pub phase: GamePhase,
    /// Radians, in (-π, π]
    pub aim_angle: f32,
    /// 0..=max_power, meaningful while Charging
    pub power: f32,
    /// Engine clock (seconds) when charging began
    pub charge_started_at: Option<f64>,
}

impl Default for ShotState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Aiming,
            aim_angle: std::f32::consts::PI,
            power: 0.0,
            charge_started_at: None,
        }
    }
}

impl ShotState {
    /// Steer the aim toward a pointer position
    ///
    /// Pointers within `min_aim_distance` of the cue ball are ignored. The
    /// blend factor ramps from `near_sensitivity` at the ball to
    /// `far_sensitivity` at `near_aim_distance` and beyond.
    pub fn aim(&mut self, cue_pos: Vec2, target: Vec2, config: &ShotConfig) -> bool {
        if self.phase != GamePhase::Aiming {
            return false;
        }

        let to_target = target - cue_pos;
        let dist = to_target.length();
        if !dist.is_finite() || dist < config.min_aim_distance {
            return false;
        }

        let target_angle = to_target.y.atan2(to_target.x);
        let diff = wrap_angle(target_angle - self.aim_angle);
        let t = (dist / config.near_aim_distance.max(f32::EPSILON)).clamp(0.0, 1.0);
        let sensitivity = config.near_sensitivity + (config.far_sensitivity - config.near_sensitivity) * t;

        self.aim_angle = wrap_angle(self.aim_angle + diff * sensitivity);
        true
    }

    /// Start building power (Aiming only)
    pub fn begin_charge(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Aiming {
            return false;
        }
        self.phase = GamePhase::Charging;
        self.power = 0.0;
        self.charge_started_at = Some(now);
        true
    }

    /// Recompute power from time spent charging; linear and capped
    pub fn accumulate(&mut self, now: f64, config: &ShotConfig) {
        if self.phase != GamePhase::Charging {
            return;
        }
        let Some(start) = self.charge_started_at else {
            return;
        };
        let held = (now - start).max(0.0) as f32;
        self.power = (held * config.charge_rate).clamp(0.0, config.max_power);
    }

    /// Current power as a fraction of the maximum
    pub fn power_fraction(&self, config: &ShotConfig) -> f32 {
        (self.power / config.max_power).clamp(0.0, 1.0)
    }

    /// Fire the shot (Charging only), returning the cue ball's new velocity
    pub fn release(&mut self, config: &ShotConfig) -> Option<Vec2> {
        if self.phase != GamePhase::Charging {
            return None;
        }

        let fraction = self.power_fraction(config);
        let force = config.min_force + (config.max_force - config.min_force) * fraction;

        self.phase = GamePhase::Moving;
        self.power = 0.0;
        self.charge_started_at = None;
        Some(direction(self.aim_angle) * force)
    }

    /// Balls stopped; back to aiming
    pub fn settle(&mut self) {
        if self.phase == GamePhase::Moving {
            self.phase = GamePhase::Aiming;
        }
    }

    /// Terminal
    pub fn finish(&mut self) {
        self.phase = GamePhase::GameOver;
        self.power = 0.0;
        self.charge_started_at = None;
    }
}
