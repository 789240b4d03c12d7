//! Fixed timestep physics tick
//!
//! One tick runs to completion: integrate, rails, ball pairs, containment,
//! pocket captures, rule reactions, then the settle check.

use super::collision::{resolve_ball_pairs, resolve_walls};
use super::physics::{all_at_rest, contain, integrate};
use super::pocket::detect_captures;
use super::rules::{Ruling, apply_capture};
use super::state::{GameEvent, GamePhase, GameState};
use crate::config::EngineConfig;

/// Advance the table by one physics tick
///
/// Does nothing unless balls are moving. Returns the events raised.
pub fn tick(state: &mut GameState, config: &EngineConfig) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase() != GamePhase::Moving {
        return events;
    }

    state.time_ticks += 1;

    integrate(&mut state.balls, &state.table);
    resolve_walls(&mut state.balls, &state.table);
    resolve_ball_pairs(&mut state.balls);
    contain(&mut state.balls, &state.table);

    let captures = detect_captures(&mut state.balls, &state.table);
    for capture in &captures {
        events.push(GameEvent::BallPocketed {
            id: capture.ball_id,
            number: capture.number,
            kind: capture.kind,
            pocket: capture.pocket,
        });

        match apply_capture(state, capture, &config.scoring) {
            Ruling::Scratch => events.push(GameEvent::Scratch),
            Ruling::GroupsAssigned { player, opponent } => {
                events.push(GameEvent::GroupsAssigned { player, opponent })
            }
            Ruling::Foul => events.push(GameEvent::Foul { id: capture.ball_id }),
            Ruling::Won | Ruling::Lost => {
                state.game_over_countdown = Some(config.timing.game_over_delay_ticks);
            }
            Ruling::OwnBall | Ruling::Ignored => {}
        }
    }

    let at_rest = all_at_rest(&state.balls);

    if let Some(remaining) = state.game_over_countdown {
        let remaining = remaining.saturating_sub(1);
        state.game_over_countdown = Some(remaining);
        if remaining == 0 || at_rest {
            finish_round(state, &mut events);
        }
    } else if at_rest {
        settle(state, config, &mut events);
    }

    events
}

/// Balls stopped with the round still open
fn settle(state: &mut GameState, config: &EngineConfig, events: &mut Vec<GameEvent>) {
    if config.respot_cue_ball {
        let spot = state.table.respot_position(&state.balls);
        if let Some(cue) = state.cue_ball_mut().filter(|b| b.pocketed) {
            cue.pocketed = false;
            cue.pos = spot;
            let id = cue.id;
            // Back on the table, so no longer among the pocketed balls
            state.round.pocketed.retain(|&pocketed| pocketed != id);
            log::debug!("Cue ball respotted at ({:.1}, {:.1})", spot.x, spot.y);
            events.push(GameEvent::CueBallRespotted { pos: spot });
        }
    }

    state.shot.settle();
    log::debug!("Balls settled after {} ticks", state.time_ticks);
    events.push(GameEvent::BallsSettled);
}

fn finish_round(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.game_over_countdown = None;
    for ball in state.balls.iter_mut() {
        ball.vel = glam::Vec2::ZERO;
    }
    state.shot.finish();

    if let Some(record) = state.round.record() {
        log::info!(
            "Game over: {:?} wins, score {} in {} shots",
            record.winner,
            record.final_score,
            record.shots_taken
        );
        events.push(GameEvent::RoundComplete(record));
    }
}
