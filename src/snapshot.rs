//! Read-only views handed to the renderer and the reward collaborator

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Ball, BallKind, GamePhase, GameState, Winner};

/// Outcome of a finished round, reported once on GameOver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub final_score: u32,
    pub shots_taken: u32,
    pub winner: Winner,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BallView {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: BallKind,
    pub number: Option<u8>,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub pocketed: bool,
}

impl From<&Ball> for BallView {
    fn from(ball: &Ball) -> Self {
        Self {
            id: ball.id,
            kind: ball.kind,
            number: ball.number,
            x: ball.pos.x,
            y: ball.pos.y,
            radius: ball.radius,
            pocketed: ball.pocketed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PocketView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub balls: Vec<BallView>,
    pub pockets: Vec<PocketView>,
    pub phase: GamePhase,
    pub aim_angle: f32,
    pub power: f32,
    pub cue_position: Option<Vec2>,
    pub score: u32,
    pub shot_count: u32,
    /// In capture order
    pub pocketed_balls: Vec<BallView>,
    pub winner: Option<Winner>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let pocketed_balls = state
            .round
            .pocketed
            .iter()
            .filter_map(|&id| state.ball(id))
            .map(BallView::from)
            .collect();

        Self {
            balls: state.balls.iter().map(BallView::from).collect(),
            pockets: state
                .table
                .pockets
                .iter()
                .map(|p| PocketView {
                    x: p.pos.x,
                    y: p.pos.y,
                    radius: p.radius,
                })
                .collect(),
            phase: state.phase(),
            aim_angle: state.shot.aim_angle,
            power: state.shot.power,
            cue_position: state.cue_ball().filter(|b| b.in_play()).map(|b| b.pos),
            score: state.round.score,
            shot_count: state.round.shot_count,
            pocketed_balls,
            winner: state.round.winner,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;

    #[test]
    fn test_snapshot_of_new_game() {
        let state = GameState::new(&TableConfig::default());
        let snap = Snapshot::capture(&state);
        assert_eq!(snap.balls.len(), 16);
        assert_eq!(snap.pockets.len(), 6);
        assert_eq!(snap.phase, GamePhase::Aiming);
        assert_eq!(snap.cue_position, Some(state.table.head_spot()));
        assert!(snap.pocketed_balls.is_empty());
        assert_eq!(snap.winner, None);
    }

    #[test]
    fn test_snapshot_json_field_names() {
        let state = GameState::new(&TableConfig::default());
        let json = Snapshot::capture(&state).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("aimAngle").is_some());
        assert!(value.get("pocketedBalls").is_some());
        assert_eq!(value["balls"][0]["type"], "cue");
        assert_eq!(value["balls"][8]["type"], "eight");
        assert_eq!(value["phase"], "Aiming");
    }

    #[test]
    fn test_round_record_json() {
        let record = RoundRecord {
            final_score: 120,
            shots_taken: 9,
            winner: Winner::Player,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"finalScore":120,"shotsTaken":9,"winner":"player"}"#);
    }
}
