//! Collision detection and response
//!
//! Rails reflect with restitution except around pocket mouths, where balls
//! must be free to roll in. Ball pairs exchange momentum as equal-mass
//! perfectly elastic spheres.

use glam::Vec2;

use super::state::Ball;
use super::table::Table;

/// Separation axis used when two centers coincide exactly
const DEGENERATE_AXIS: Vec2 = Vec2::X;

/// Reflect balls off any rail they have penetrated
///
/// Inside a pocket's suppression zone the ball may roll up to the rail line
/// itself. Past the rail line it is either in the pocket mouth, where it is
/// left to drop, or against the pocket jaw, which reflects it back onto the
/// rail line. Returns the number of rail contacts.
pub fn resolve_walls(balls: &mut [Ball], table: &Table) -> usize {
    let mut contacts = 0;

    for ball in balls.iter_mut().filter(|b| b.in_play()) {
        let (min, max) = match table.near_pocket(ball.pos) {
            Some(index) if table.in_mouth(ball.pos, index) => continue,
            Some(_) => table.rail_bounds(0.0),
            None => table.rail_bounds(ball.radius),
        };

        if reflect_into(ball, min, max, table.restitution) {
            contacts += 1;
        }
    }

    contacts
}

/// Clamp a ball center into `[min, max]`, reflecting each offending component
fn reflect_into(ball: &mut Ball, min: Vec2, max: Vec2, restitution: f32) -> bool {
    let mut hit = false;

    if ball.pos.x < min.x {
        ball.pos.x = min.x;
        ball.vel.x = ball.vel.x.abs() * restitution;
        hit = true;
    } else if ball.pos.x > max.x {
        ball.pos.x = max.x;
        ball.vel.x = -ball.vel.x.abs() * restitution;
        hit = true;
    }

    if ball.pos.y < min.y {
        ball.pos.y = min.y;
        ball.vel.y = ball.vel.y.abs() * restitution;
        hit = true;
    } else if ball.pos.y > max.y {
        ball.pos.y = max.y;
        ball.vel.y = -ball.vel.y.abs() * restitution;
        hit = true;
    }

    hit
}

/// Resolve one overlapping pair in place
///
/// Velocities are rotated into the contact frame, their normal components
/// swapped, and rotated back. Each ball then moves out by half the
/// penetration. Returns `false` if the pair was not touching.
pub fn resolve_pair(a: &mut Ball, b: &mut Ball) -> bool {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;
    if dist >= min_dist {
        return false;
    }

    let normal = if dist > 0.0 {
        delta / dist
    } else {
        log::warn!(
            "Balls {} and {} share a center; separating along x",
            a.id,
            b.id
        );
        DEGENERATE_AXIS
    };
    let tangent = normal.perp();

    let (a_n, a_t) = (a.vel.dot(normal), a.vel.dot(tangent));
    let (b_n, b_t) = (b.vel.dot(normal), b.vel.dot(tangent));

    a.vel = normal * b_n + tangent * a_t;
    b.vel = normal * a_n + tangent * b_t;

    let push = normal * ((min_dist - dist) * 0.5);
    a.pos -= push;
    b.pos += push;

    true
}

/// Resolve every overlapping pair of balls on the table
///
/// Pairs are visited in id order, so results are deterministic. Returns the
/// number of contacts.
pub fn resolve_ball_pairs(balls: &mut [Ball]) -> usize {
    let mut contacts = 0;
    for i in 0..balls.len() {
        let (head, tail) = balls.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.in_play() {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.in_play()) {
            if resolve_pair(a, b) {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Kinetic energy of a ball set with unit masses (½·m·v² with m = 1)
pub fn kinetic_energy<'a>(balls: impl IntoIterator<Item = &'a Ball>) -> f32 {
    balls
        .into_iter()
        .map(|b| 0.5 * b.vel.length_squared())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;

    fn ball(id: u8, x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        let mut b = Ball::numbered(id, Vec2::new(x, y), 10.0);
        b.vel = Vec2::new(vx, vy);
        b
    }

    #[test]
    fn test_head_on_swaps_velocities() {
        let mut a = ball(1, 100.0, 100.0, 5.0, 0.0);
        let mut b = ball(2, 118.0, 100.0, 0.0, 0.0);
        assert!(resolve_pair(&mut a, &mut b));
        assert!(a.vel.length() < 1e-5);
        assert!((b.vel.x - 5.0).abs() < 1e-5);
        // Fully separated afterwards
        assert!(a.pos.distance(b.pos) >= 20.0 - 1e-4);
    }

    #[test]
    fn test_glancing_keeps_tangential() {
        let mut a = ball(1, 100.0, 100.0, 3.0, 4.0);
        let mut b = ball(2, 100.0, 119.0, 0.0, 0.0);
        let before = kinetic_energy([&a, &b]);
        resolve_pair(&mut a, &mut b);
        // Normal is +y: a keeps its x motion, b takes the y motion
        assert!((a.vel.x - 3.0).abs() < 1e-5);
        assert!(a.vel.y.abs() < 1e-5);
        assert!((b.vel.y - 4.0).abs() < 1e-5);
        let after = kinetic_energy([&a, &b]);
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_centers_resolve_along_x() {
        let mut a = ball(1, 100.0, 100.0, 1.0, 0.0);
        let mut b = ball(2, 100.0, 100.0, 0.0, 0.0);
        assert!(resolve_pair(&mut a, &mut b));
        assert!(a.pos.x < b.pos.x);
        assert_eq!(a.pos.y, b.pos.y);
        assert!(a.vel.is_finite() && b.vel.is_finite());
    }

    #[test]
    fn test_no_contact_when_apart() {
        let mut a = ball(1, 100.0, 100.0, 1.0, 0.0);
        let mut b = ball(2, 121.0, 100.0, 0.0, 0.0);
        assert!(!resolve_pair(&mut a, &mut b));
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_pocketed_balls_ignored() {
        let mut balls = vec![ball(1, 100.0, 100.0, 5.0, 0.0), ball(2, 110.0, 100.0, 0.0, 0.0)];
        balls[1].pocketed = true;
        assert_eq!(resolve_ball_pairs(&mut balls), 0);
    }

    #[test]
    fn test_wall_reflects_with_restitution() {
        let table = Table::new(&TableConfig::default());
        let y = table.height / 2.0;
        let mut balls = vec![ball(1, table.rail_inset + 5.0, y, -6.0, 1.0)];
        assert_eq!(resolve_walls(&mut balls, &table), 1);
        assert_eq!(balls[0].pos.x, table.rail_inset + table.ball_radius);
        assert!((balls[0].vel.x - 6.0 * table.restitution).abs() < 1e-5);
        assert_eq!(balls[0].vel.y, 1.0);
    }

    #[test]
    fn test_wall_suppressed_near_pocket() {
        let table = Table::new(&TableConfig::default());
        let side = table.pockets[4].pos;
        // Just inside the rail line, right in the side pocket's mouth
        let mut balls = vec![ball(1, side.x, side.y + 5.0, 0.0, -3.0)];
        assert_eq!(resolve_walls(&mut balls, &table), 0);
        assert_eq!(balls[0].vel, Vec2::new(0.0, -3.0));
    }

    #[test]
    fn test_jaw_beside_pocket_mouth_reflects() {
        let table = Table::new(&TableConfig::default());
        let side = table.pockets[4].pos;
        // Crossed the rail line 30 units along from the side pocket center
        let mut balls = vec![ball(3, side.x + 30.0, side.y - 6.0, 0.0, -20.0)];
        assert_eq!(resolve_walls(&mut balls, &table), 1);
        assert_eq!(balls[0].pos.y, table.rail_inset);
        assert!((balls[0].vel.y - 20.0 * table.restitution).abs() < 1e-5);
    }

    #[test]
    fn test_pocket_mouth_never_reflects() {
        let table = Table::new(&TableConfig::default());
        let side = table.pockets[4].pos;
        let mut balls = vec![ball(3, side.x + 10.0, side.y - 6.0, 0.0, -20.0)];
        assert_eq!(resolve_walls(&mut balls, &table), 0);
        assert_eq!(balls[0].vel, Vec2::new(0.0, -20.0));
    }
}
