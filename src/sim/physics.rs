//! Fixed-tick motion integration
//!
//! One tick moves every ball by its velocity, then bleeds speed through felt
//! friction. Velocities are in units per tick, so no `dt` appears here.

use glam::Vec2;

use super::state::Ball;
use super::table::Table;

/// Advance every ball still on the table by one tick
pub fn integrate(balls: &mut [Ball], table: &Table) {
    for ball in balls.iter_mut().filter(|b| b.in_play()) {
        ball.pos += ball.vel;
        ball.vel *= table.friction;

        // Snap creeping balls to rest
        if ball.vel.x.abs() < table.rest_epsilon && ball.vel.y.abs() < table.rest_epsilon {
            ball.vel = Vec2::ZERO;
        }
    }
}

/// Pull balls that overshot the table edge back onto it
///
/// Returns the number of balls corrected. Each offending velocity component
/// is halved.
pub fn contain(balls: &mut [Ball], table: &Table) -> usize {
    let max = Vec2::new(table.width, table.height);
    let mut corrected = 0;

    for ball in balls.iter_mut().filter(|b| b.in_play()) {
        if table.contains(ball.pos) {
            continue;
        }

        log::warn!(
            "Ball {} overshot table at ({:.1}, {:.1}) vel ({:.2}, {:.2}); clamping",
            ball.id,
            ball.pos.x,
            ball.pos.y,
            ball.vel.x,
            ball.vel.y
        );
        if ball.pos.x < 0.0 || ball.pos.x > max.x {
            ball.vel.x *= 0.5;
        }
        if ball.pos.y < 0.0 || ball.pos.y > max.y {
            ball.vel.y *= 0.5;
        }
        ball.pos = ball.pos.clamp(Vec2::ZERO, max);
        if !ball.vel.is_finite() {
            ball.vel = Vec2::ZERO;
        }
        corrected += 1;
    }

    corrected
}

/// Whether every ball on the table has stopped
pub fn all_at_rest(balls: &[Ball]) -> bool {
    balls.iter().filter(|b| b.in_play()).all(Ball::is_at_rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;

    fn table() -> Table {
        Table::new(&TableConfig::default())
    }

    #[test]
    fn test_integrate_moves_then_applies_friction() {
        let table = table();
        let mut balls = vec![Ball::numbered(1, Vec2::new(100.0, 100.0), 10.0)];
        balls[0].vel = Vec2::new(10.0, 0.0);
        integrate(&mut balls, &table);
        assert_eq!(balls[0].pos, Vec2::new(110.0, 100.0));
        assert!((balls[0].vel.x - 10.0 * table.friction).abs() < 1e-5);
    }

    #[test]
    fn test_integrate_snaps_to_rest() {
        let table = table();
        let mut balls = vec![Ball::numbered(1, Vec2::new(100.0, 100.0), 10.0)];
        balls[0].vel = Vec2::new(0.04, -0.03);
        integrate(&mut balls, &table);
        assert_eq!(balls[0].vel, Vec2::ZERO);
        assert!(all_at_rest(&balls));
    }

    #[test]
    fn test_integrate_skips_pocketed() {
        let table = table();
        let mut balls = vec![Ball::numbered(1, Vec2::new(100.0, 100.0), 10.0)];
        balls[0].vel = Vec2::new(5.0, 5.0);
        balls[0].pocketed = true;
        integrate(&mut balls, &table);
        assert_eq!(balls[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_contain_clamps_and_halves() {
        let table = table();
        let mut balls = vec![Ball::numbered(1, Vec2::new(-5.0, 100.0), 10.0)];
        balls[0].vel = Vec2::new(-8.0, 2.0);
        assert_eq!(contain(&mut balls, &table), 1);
        assert_eq!(balls[0].pos.x, 0.0);
        assert_eq!(balls[0].vel, Vec2::new(-4.0, 2.0));

        let mut inside = vec![Ball::numbered(2, Vec2::new(50.0, 50.0), 10.0)];
        assert_eq!(contain(&mut inside, &table), 0);
    }
}
