//! Engine configuration and tuning
//!
//! Every tunable the simulation reads lives here. Loaded from JSON where a
//! host wants to override defaults; missing fields fall back to `Default`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Static table geometry and surface properties
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub width: f32,
    pub height: f32,
    /// Distance from the table edge to the rail line
    pub rail_inset: f32,
    pub ball_radius: f32,
    /// Extra spacing between racked balls
    pub rack_gap: f32,
    pub pocket_radius: f32,
    /// Per-tick velocity multiplier (< 1)
    pub friction: f32,
    /// Velocity retained off a rail (< 1)
    pub restitution: f32,
    /// Components below this snap to zero
    pub rest_epsilon: f32,
    pub near_pocket_margin: f32,
    pub capture_tolerance: f32,
    /// Units per tick
    pub capture_speed: f32,
    pub deep_capture_margin: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: TABLE_WIDTH,
            height: TABLE_HEIGHT,
            rail_inset: RAIL_INSET,
            ball_radius: BALL_RADIUS,
            rack_gap: RACK_GAP,
            pocket_radius: POCKET_RADIUS,
            friction: FRICTION,
            restitution: RESTITUTION,
            rest_epsilon: REST_EPSILON,
            near_pocket_margin: NEAR_POCKET_MARGIN,
            capture_tolerance: CAPTURE_TOLERANCE,
            capture_speed: CAPTURE_SPEED,
            deep_capture_margin: DEEP_CAPTURE_MARGIN,
        }
    }
}

impl TableConfig {
    /// Center distance between adjacent racked balls
    pub fn rack_spacing(&self) -> f32 {
        2.0 * self.ball_radius + self.rack_gap
    }

    /// Width of the area inside the rails
    pub fn playfield_width(&self) -> f32 {
        self.width - 2.0 * self.rail_inset
    }

    /// Height of the area inside the rails
    pub fn playfield_height(&self) -> f32 {
        self.height - 2.0 * self.rail_inset
    }

    /// Radius around a pocket inside which rails do not bounce
    pub fn near_pocket_radius(&self) -> f32 {
        self.pocket_radius + self.ball_radius + self.near_pocket_margin
    }

    /// Center distance under which a ball is over a pocket
    pub fn capture_threshold(&self) -> f32 {
        self.pocket_radius - self.ball_radius + self.capture_tolerance
    }
}

/// Aiming and power tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    pub max_power: f32,
    /// Power gained per second of charging
    pub charge_rate: f32,
    /// Launch speed at zero power (units/tick)
    pub min_force: f32,
    /// Launch speed at full power (units/tick)
    pub max_force: f32,
    /// Pointer closer than this to the cue ball is ignored
    pub min_aim_distance: f32,
    /// Below this pointer distance the near sensitivity applies
    pub near_aim_distance: f32,
    pub near_sensitivity: f32,
    pub far_sensitivity: f32,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            max_power: 100.0,
            charge_rate: 80.0,
            min_force: 2.0,
            max_force: 24.0,
            min_aim_distance: 5.0,
            near_aim_distance: 120.0,
            near_sensitivity: 0.35,
            far_sensitivity: 0.85,
        }
    }
}

/// Score deltas per rule event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub own_group: i32,
    pub opponent_group: i32,
    pub scratch: i32,
    pub win_bonus: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            own_group: 10,
            opponent_group: -3,
            scratch: -5,
            win_bonus: 50,
        }
    }
}

/// Scheduler rates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub physics_hz: f32,
    pub charge_hz: f32,
    pub max_substeps: u32,
    pub game_over_delay_ticks: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            physics_hz: PHYSICS_HZ,
            charge_hz: CHARGE_HZ,
            max_substeps: MAX_SUBSTEPS,
            game_over_delay_ticks: GAME_OVER_DELAY_TICKS,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub table: TableConfig,
    pub shot: ShotConfig,
    pub scoring: ScoringConfig,
    pub timing: TimingConfig,
    /// Return a scratched cue ball to the head spot once the table settles
    pub respot_cue_ball: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            shot: ShotConfig::default(),
            scoring: ScoringConfig::default(),
            timing: TimingConfig::default(),
            respot_cue_ball: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON config document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check physical and geometric sanity
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.table;
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(t.width > 0.0 && t.height > 0.0 && t.ball_radius > 0.0) {
            return invalid("table dimensions and ball radius must be positive".into());
        }
        if t.rail_inset < 0.0 || t.rack_gap < 0.0 {
            return invalid("rail inset and rack gap must not be negative".into());
        }
        if !(t.friction > 0.0 && t.friction < 1.0) {
            return invalid(format!("friction {} must be in (0, 1)", t.friction));
        }
        if !(t.restitution > 0.0 && t.restitution < 1.0) {
            return invalid(format!("restitution {} must be in (0, 1)", t.restitution));
        }
        if t.pocket_radius <= t.ball_radius {
            return invalid(format!(
                "pocket radius {} must exceed ball radius {}",
                t.pocket_radius, t.ball_radius
            ));
        }
        if t.capture_tolerance < 0.0 || t.deep_capture_margin < 0.0 || t.near_pocket_margin < 0.0 {
            return invalid("pocket margins must not be negative".into());
        }

        // Rack sits in the foot quarter, five balls tall
        let spacing = t.rack_spacing();
        let rack_depth = 4.0 * spacing * RACK_ROW_FACTOR + t.ball_radius;
        if t.playfield_height() < 5.0 * spacing + 2.0 * t.ball_radius
            || t.playfield_width() * 0.25 <= rack_depth + t.ball_radius
        {
            return invalid("playfield too small to hold the rack".into());
        }

        let s = &self.shot;
        if s.max_power <= 0.0 || s.charge_rate <= 0.0 {
            return invalid("max power and charge rate must be positive".into());
        }
        if s.min_force < 0.0 || s.min_force > s.max_force {
            return invalid(format!(
                "min force {} must be in [0, max force {}]",
                s.min_force, s.max_force
            ));
        }
        if s.min_aim_distance <= 0.0 {
            return invalid("minimum aim distance must be positive".into());
        }
        for sensitivity in [s.near_sensitivity, s.far_sensitivity] {
            if !(sensitivity > 0.0 && sensitivity <= 1.0) {
                return invalid(format!("aim sensitivity {sensitivity} must be in (0, 1]"));
            }
        }

        let tm = &self.timing;
        if tm.physics_hz <= 0.0 || tm.charge_hz <= 0.0 || tm.max_substeps == 0 {
            return invalid("tick rates and substep cap must be positive".into());
        }

        Ok(())
    }
}

/// Row advance of an equilateral rack, as a fraction of ball spacing (√3/2)
pub const RACK_ROW_FACTOR: f32 = 0.866_025_4;
