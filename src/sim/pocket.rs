//! Pocket capture detection
//!
//! A ball drops when its center is over a pocket (within
//! `pocket_radius - ball_radius + tolerance`) and it is either slow enough
//! to fall or deep enough that speed no longer matters. A ball whose center
//! has crossed the rail line inside a pocket mouth (closer than the pocket
//! radius) always drops. Beside the mouth the jaw reflects it instead.

use serde::{Deserialize, Serialize};

use super::state::{Ball, BallKind};
use super::table::Table;

/// A ball dropping into a pocket this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub ball_id: u32,
    pub number: Option<u8>,
    pub kind: BallKind,
    /// Index into `Table::pockets`
    pub pocket: usize,
}

/// Whether `ball` should drop into pocket `index`
pub fn is_captured(ball: &Ball, table: &Table, index: usize) -> bool {
    let pocket = &table.pockets[index];
    let dist = ball.pos.distance(pocket.pos);

    if dist < pocket.radius && table.beyond_rail(ball.pos) {
        return true;
    }

    let threshold = table.capture_threshold;
    let over = dist < threshold;
    let slow = ball.speed() < table.capture_speed;
    let deep = dist < threshold - table.deep_capture_margin;
    over && (slow || deep)
}

/// Test every ball on the table against every pocket
///
/// Captured balls are sunk immediately and reported in id order. A ball is
/// captured at most once.
pub fn detect_captures(balls: &mut [Ball], table: &Table) -> Vec<Capture> {
    let mut captures = Vec::new();

    for ball in balls.iter_mut().filter(|b| b.in_play()) {
        let Some(pocket) = (0..table.pockets.len()).find(|&i| is_captured(&*ball, table, i)) else {
            continue;
        };

        log::debug!(
            "Ball {} ({:?}) captured by pocket {} at speed {:.2}",
            ball.id,
            ball.kind,
            pocket,
            ball.speed()
        );
        ball.sink();
        captures.push(Capture {
            ball_id: ball.id,
            number: ball.number,
            kind: ball.kind,
            pocket,
        });
    }

    captures
}
