//! Game state and core simulation types
//!
//! All state needed to resume a round lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shot::ShotState;
use super::table::{Table, rack_balls};
use crate::config::TableConfig;
use crate::snapshot::RoundRecord;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to line up a shot
    Aiming,
    /// Power building while the shot button is held
    Charging,
    /// Balls in motion, physics running
    Moving,
    /// Round decided
    GameOver,
}

/// Ball category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallKind {
    Cue,
    Solid,
    Stripe,
    Eight,
}

impl BallKind {
    /// Canonical kind for a numbered ball (1-7 solid, 8 eight, 9-15 stripe)
    pub fn for_number(number: u8) -> Self {
        match number {
            1..=7 => BallKind::Solid,
            8 => BallKind::Eight,
            _ => BallKind::Stripe,
        }
    }

    /// The group this kind belongs to, if any
    pub fn group(&self) -> Option<Group> {
        match self {
            BallKind::Solid => Some(Group::Solid),
            BallKind::Stripe => Some(Group::Stripe),
            BallKind::Cue | BallKind::Eight => None,
        }
    }
}

/// Ball group a player is shooting at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Solid,
    Stripe,
}

impl Group {
    pub fn complement(&self) -> Self {
        match self {
            Group::Solid => Group::Stripe,
            Group::Stripe => Group::Solid,
        }
    }
}

/// Who took the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Opponent,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub kind: BallKind,
    /// 1-15, `None` for the cue ball
    pub number: Option<u8>,
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub radius: f32,
    pub pocketed: bool,
}

impl Ball {
    pub fn cue(pos: Vec2, radius: f32) -> Self {
        Self {
            id: 0,
            kind: BallKind::Cue,
            number: None,
            pos,
            vel: Vec2::ZERO,
            radius,
            pocketed: false,
        }
    }

    pub fn numbered(number: u8, pos: Vec2, radius: f32) -> Self {
        Self {
            id: number as u32,
            kind: BallKind::for_number(number),
            number: Some(number),
            pos,
            vel: Vec2::ZERO,
            radius,
            pocketed: false,
        }
    }

    pub fn is_cue(&self) -> bool {
        self.kind == BallKind::Cue
    }

    /// Still on the table
    pub fn in_play(&self) -> bool {
        !self.pocketed
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn is_at_rest(&self) -> bool {
        self.vel == Vec2::ZERO
    }

    /// Drop into a pocket; a pocketed ball never moves again this round
    pub fn sink(&mut self) {
        self.pocketed = true;
        self.vel = Vec2::ZERO;
    }
}

/// Per-round bookkeeping owned by the rule engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundState {
    pub shot_count: u32,
    pub score: u32,
    /// Ball ids in capture order
    pub pocketed: Vec<u32>,
    pub player_group: Option<Group>,
    pub opponent_group: Option<Group>,
    pub winner: Option<Winner>,
}

impl RoundState {
    /// Apply a score delta; the score never drops below zero
    pub fn add_score(&mut self, delta: i32) {
        let next = self.score as i64 + delta as i64;
        self.score = next.clamp(0, u32::MAX as i64) as u32;
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn record(&self) -> Option<RoundRecord> {
        self.winner.map(|winner| RoundRecord {
            final_score: self.score,
            shots_taken: self.shot_count,
            winner,
        })
    }
}

/// Engine notifications, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { angle: f32, speed: f32 },
    BallPocketed { id: u32, number: Option<u8>, kind: BallKind, pocket: usize },
    Scratch,
    GroupsAssigned { player: Group, opponent: Group },
    Foul { id: u32 },
    CueBallRespotted { pos: Vec2 },
    BallsSettled,
    RoundComplete(RoundRecord),
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub table: Table,
    /// Sorted by id; the cue ball is id 0
    pub balls: Vec<Ball>,
    pub shot: ShotState,
    pub round: RoundState,
    /// Physics ticks simulated this round
    pub time_ticks: u64,
    /// Ticks left before GameOver once the round is decided
    pub game_over_countdown: Option<u32>,
}

impl GameState {
    /// Fresh racked table
    pub fn new(config: &TableConfig) -> Self {
        let table = Table::new(config);
        let balls = rack_balls(&table);
        Self {
            table,
            balls,
            shot: ShotState::default(),
            round: RoundState::default(),
            time_ticks: 0,
            game_over_countdown: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.shot.phase
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.is_cue())
    }

    pub fn cue_ball_mut(&mut self) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.is_cue())
    }

    pub fn ball(&self, id: u32) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    /// Balls of a group still on the table
    pub fn remaining_in_group(&self, group: Group) -> usize {
        self.balls
            .iter()
            .filter(|b| b.in_play() && b.kind.group() == Some(group))
            .count()
    }

    pub fn all_at_rest(&self) -> bool {
        super::physics::all_at_rest(&self.balls)
    }

    /// Ensure balls are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_by_number() {
        assert_eq!(BallKind::for_number(1), BallKind::Solid);
        assert_eq!(BallKind::for_number(7), BallKind::Solid);
        assert_eq!(BallKind::for_number(8), BallKind::Eight);
        assert_eq!(BallKind::for_number(9), BallKind::Stripe);
        assert_eq!(BallKind::for_number(15), BallKind::Stripe);
        assert_eq!(BallKind::Eight.group(), None);
        assert_eq!(Group::Solid.complement(), Group::Stripe);
    }

    #[test]
    fn test_score_clamps_at_zero() {
        let mut round = RoundState::default();
        round.add_score(10);
        round.add_score(-25);
        assert_eq!(round.score, 0);
    }

    #[test]
    fn test_new_game_has_one_cue_ball() {
        let state = GameState::new(&TableConfig::default());
        assert_eq!(state.balls.len(), 16);
        assert_eq!(state.balls.iter().filter(|b| b.is_cue()).count(), 1);
        assert_eq!(state.phase(), GamePhase::Aiming);
        assert_eq!(state.remaining_in_group(Group::Solid), 7);
        assert_eq!(state.remaining_in_group(Group::Stripe), 7);
        assert!(state.all_at_rest());
    }

    #[test]
    fn test_sink_zeroes_velocity() {
        let mut ball = Ball::numbered(3, Vec2::new(100.0, 100.0), 10.0);
        ball.vel = Vec2::new(4.0, -2.0);
        ball.sink();
        assert!(ball.pocketed);
        assert!(ball.is_at_rest());
    }
}
