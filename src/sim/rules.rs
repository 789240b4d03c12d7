//! Rule engine: group assignment, scoring, fouls and the win condition
//!
//! Captures are judged in this order: scratch, eight ball, group assignment,
//! own group, opponent group. The player shoots every turn; the opponent
//! exists only as the complementary group.

use serde::{Deserialize, Serialize};

use super::pocket::Capture;
use super::state::{BallKind, GameState, Group, Winner};
use crate::config::ScoringConfig;

/// How a single capture was judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ruling {
    /// Cue ball went down
    Scratch,
    /// First object ball decided the groups
    GroupsAssigned { player: Group, opponent: Group },
    OwnBall,
    /// Opponent's ball went down
    Foul,
    /// Eight ball down with the player's group cleared
    Won,
    /// Eight ball down too early
    Lost,
    /// Round already decided; recorded but not scored
    Ignored,
}

/// Judge one capture and update the round
///
/// The captured ball must already be sunk in `state.balls`.
pub fn apply_capture(state: &mut GameState, capture: &Capture, scoring: &ScoringConfig) -> Ruling {
    state.round.pocketed.push(capture.ball_id);

    if state.round.is_decided() {
        return Ruling::Ignored;
    }

    match capture.kind {
        BallKind::Cue => {
            state.round.add_score(scoring.scratch);
            log::info!("Scratch! score now {}", state.round.score);
            Ruling::Scratch
        }
        BallKind::Eight => {
            let cleared = state
                .round
                .player_group
                .is_some_and(|group| state.remaining_in_group(group) == 0);

            if cleared {
                state.round.winner = Some(Winner::Player);
                state.round.add_score(scoring.win_bonus);
                log::info!("Eight ball sunk on a cleared table: player wins");
                Ruling::Won
            } else {
                state.round.winner = Some(Winner::Opponent);
                log::info!("Eight ball sunk early: player loses");
                Ruling::Lost
            }
        }
        BallKind::Solid | BallKind::Stripe => {
            let Some(ball_group) = capture.kind.group() else {
                return Ruling::Ignored;
            };

            match state.round.player_group {
                None => {
                    let opponent = ball_group.complement();
                    state.round.player_group = Some(ball_group);
                    state.round.opponent_group = Some(opponent);
                    state.round.add_score(scoring.own_group);
                    log::info!("Groups assigned: player {:?}, opponent {:?}", ball_group, opponent);
                    Ruling::GroupsAssigned {
                        player: ball_group,
                        opponent,
                    }
                }
                Some(group) if group == ball_group => {
                    state.round.add_score(scoring.own_group);
                    Ruling::OwnBall
                }
                Some(_) => {
                    state.round.add_score(scoring.opponent_group);
                    log::debug!("Foul: pocketed opponent ball {}", capture.ball_id);
                    Ruling::Foul
                }
            }
        }
    }
}
