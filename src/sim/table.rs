//! Table geometry: rails, pockets and the opening rack
//!
//! Coordinates have the origin at the table's top-left corner, x to the
//! right and y down. The rail line sits `rail_inset` in from each edge; ball
//! centers normally stay a radius inside it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Ball;
use crate::config::{RACK_ROW_FACTOR, TableConfig};

/// A pocket on the rail line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub pos: Vec2,
    pub radius: f32,
}

/// Static table geometry, created once per game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub width: f32,
    pub height: f32,
    pub rail_inset: f32,
    pub ball_radius: f32,
    pub rack_gap: f32,
    pub friction: f32,
    pub restitution: f32,
    pub rest_epsilon: f32,
    /// Four corners, then the two long-rail midpoints
    pub pockets: [Pocket; 6],
    pub near_pocket_radius: f32,
    pub capture_threshold: f32,
    pub capture_speed: f32,
    pub deep_capture_margin: f32,
}

impl Table {
    pub fn new(config: &TableConfig) -> Self {
        let inset = config.rail_inset;
        let (w, h) = (config.width, config.height);
        let pocket = |x: f32, y: f32| Pocket {
            pos: Vec2::new(x, y),
            radius: config.pocket_radius,
        };

        Self {
            width: w,
            height: h,
            rail_inset: inset,
            ball_radius: config.ball_radius,
            rack_gap: config.rack_gap,
            friction: config.friction,
            restitution: config.restitution,
            rest_epsilon: config.rest_epsilon,
            pockets: [
                pocket(inset, inset),
                pocket(w - inset, inset),
                pocket(inset, h - inset),
                pocket(w - inset, h - inset),
                pocket(w / 2.0, inset),
                pocket(w / 2.0, h - inset),
            ],
            near_pocket_radius: config.near_pocket_radius(),
            capture_threshold: config.capture_threshold(),
            capture_speed: config.capture_speed,
            deep_capture_margin: config.deep_capture_margin,
        }
    }

    /// Lowest and highest center position a ball may take against the rails
    pub fn rail_bounds(&self, radius: f32) -> (Vec2, Vec2) {
        let min = Vec2::splat(self.rail_inset + radius);
        let max = Vec2::new(
            self.width - self.rail_inset - radius,
            self.height - self.rail_inset - radius,
        );
        (min, max)
    }

    /// Center past the rail line (only reachable through a pocket mouth)
    pub fn beyond_rail(&self, pos: Vec2) -> bool {
        pos.x < self.rail_inset
            || pos.y < self.rail_inset
            || pos.x > self.width - self.rail_inset
            || pos.y > self.height - self.rail_inset
    }

    /// Whether a point lies on the table surface, rails included
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= self.width && pos.y <= self.height
    }

    /// Index of the pocket whose rail-suppression zone contains `pos`
    pub fn near_pocket(&self, pos: Vec2) -> Option<usize> {
        self.pockets
            .iter()
            .position(|p| p.pos.distance(pos) < self.near_pocket_radius)
    }

    /// Whether `pos` lies inside the mouth of pocket `index`
    pub fn in_mouth(&self, pos: Vec2, index: usize) -> bool {
        let pocket = &self.pockets[index];
        pocket.pos.distance(pos) < pocket.radius
    }

    /// Cue ball break position, a quarter of the way up the playfield
    pub fn head_spot(&self) -> Vec2 {
        let play_w = self.width - 2.0 * self.rail_inset;
        Vec2::new(self.rail_inset + play_w * 0.25, self.height / 2.0)
    }

    /// Apex of the rack, three quarters of the way up the playfield
    pub fn foot_spot(&self) -> Vec2 {
        let play_w = self.width - 2.0 * self.rail_inset;
        Vec2::new(self.rail_inset + play_w * 0.75, self.height / 2.0)
    }

    /// Closest free spot to the head spot for a respotted cue ball
    ///
    /// Walks outward along the head string, then back toward the head rail.
    pub fn respot_position(&self, balls: &[Ball]) -> Vec2 {
        let r = self.ball_radius;
        let step = 2.0 * r + self.rack_gap.max(1.0);
        let (min, max) = self.rail_bounds(r);
        let is_free = |pos: Vec2| {
            balls
                .iter()
                .filter(|b| b.in_play() && !b.is_cue())
                .all(|b| b.pos.distance(pos) >= b.radius + r)
        };

        let head = self.head_spot();
        for column in 0..8 {
            let x = head.x - column as f32 * step;
            if x < min.x {
                break;
            }
            for k in 0..16 {
                // 0, +1, -1, +2, -2, ...
                let offset = ((k + 1) / 2) as f32 * if k % 2 == 1 { 1.0 } else { -1.0 };
                let candidate = Vec2::new(x, head.y + offset * step);
                if candidate.y < min.y || candidate.y > max.y {
                    continue;
                }
                if is_free(candidate) && self.near_pocket(candidate).is_none() {
                    return candidate;
                }
            }
        }

        log::warn!("No free respot position found; using head spot");
        head
    }
}

/// Standard 8-ball rack layout: (ball number, row, offset across the row)
///
/// ```text
///  1
///  9  2
///  3  8 10
/// 11  4  5 12
///  6 13 14  7 15
/// ```
const RACK_LAYOUT: [(u8, usize, f32); 15] = [
    (1, 0, 0.0),
    (9, 1, -0.5),
    (2, 1, 0.5),
    (3, 2, -1.0),
    (8, 2, 0.0),
    (10, 2, 1.0),
    (11, 3, -1.5),
    (4, 3, -0.5),
    (5, 3, 0.5),
    (12, 3, 1.5),
    (6, 4, -2.0),
    (13, 4, -1.0),
    (14, 4, 0.0),
    (7, 4, 1.0),
    (15, 4, 2.0),
];

/// Rack positions for balls 1-15, indexed by `number - 1`
///
/// The apex points toward the cue ball; rows advance away from it.
pub fn rack_positions(apex: Vec2, spacing: f32) -> [Vec2; 15] {
    let row_advance = spacing * RACK_ROW_FACTOR;
    let mut positions = [Vec2::ZERO; 15];
    for (number, row, offset) in RACK_LAYOUT {
        positions[(number - 1) as usize] =
            Vec2::new(apex.x + row as f32 * row_advance, apex.y + offset * spacing);
    }
    positions
}

/// Cue ball on the head spot plus the 15 racked balls, sorted by id
pub fn rack_balls(table: &Table) -> Vec<Ball> {
    let r = table.ball_radius;
    let spacing = 2.0 * r + table.rack_gap;
    let positions = rack_positions(table.foot_spot(), spacing);

    let mut balls = Vec::with_capacity(16);
    balls.push(Ball::cue(table.head_spot(), r));
    for (i, pos) in positions.iter().enumerate() {
        balls.push(Ball::numbered(i as u8 + 1, *pos, r));
    }
    balls
}
