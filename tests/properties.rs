//! Property tests for the physics invariants

use glam::Vec2;
use proptest::prelude::*;

use billiards_engine::EngineConfig;
use billiards_engine::config::TableConfig;
use billiards_engine::sim::{
    Ball, GamePhase, GameState, Table, integrate, kinetic_energy, rack_balls, resolve_pair, tick,
};

/// Positions stay this close to the table edge at worst
const BOUNDS_EPSILON: f32 = 1e-3;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn balls_stay_on_table(angle in -3.14f32..3.14, speed in 0.5f32..60.0) {
        let config = EngineConfig::default();
        let mut state = GameState::new(&config.table);
        state.shot.phase = GamePhase::Moving;
        state.balls[0].vel = Vec2::new(angle.cos(), angle.sin()) * speed;

        for _ in 0..3000 {
            tick(&mut state, &config);
            for ball in state.balls.iter().filter(|b| !b.pocketed) {
                prop_assert!(ball.pos.x >= -BOUNDS_EPSILON && ball.pos.x <= state.table.width + BOUNDS_EPSILON);
                prop_assert!(ball.pos.y >= -BOUNDS_EPSILON && ball.pos.y <= state.table.height + BOUNDS_EPSILON);
            }
            if state.phase() != GamePhase::Moving {
                break;
            }
        }
        prop_assert!(state.phase() != GamePhase::Moving);
    }

    #[test]
    fn pair_collisions_conserve_energy(
        ax in -20.0f32..20.0, ay in -20.0f32..20.0,
        bx in -20.0f32..20.0, by in -20.0f32..20.0,
        offset_angle in -3.14f32..3.14, overlap in 0.0f32..19.0,
    ) {
        let mut a = Ball::numbered(1, Vec2::new(300.0, 200.0), 10.0);
        let dist = 20.0 - overlap;
        let mut b = Ball::numbered(2, a.pos + Vec2::new(offset_angle.cos(), offset_angle.sin()) * dist, 10.0);
        a.vel = Vec2::new(ax, ay);
        b.vel = Vec2::new(bx, by);

        let before = kinetic_energy([&a, &b]);
        resolve_pair(&mut a, &mut b);
        let after = kinetic_energy([&a, &b]);
        prop_assert!((before - after).abs() <= 1e-3 * before.max(1.0));
        prop_assert!(a.pos.distance(b.pos) >= 20.0 - 1e-3);
    }

    #[test]
    fn rack_never_overlaps(
        radius in 4.0f32..16.0,
        gap in 0.0f32..3.0,
        width in 600.0f32..1400.0,
        aspect in 0.45f32..0.6,
    ) {
        let table_config = TableConfig {
            width,
            height: width * aspect,
            ball_radius: radius,
            rack_gap: gap,
            pocket_radius: radius * 2.2,
            ..TableConfig::default()
        };
        let config = EngineConfig { table: table_config.clone(), ..EngineConfig::default() };
        prop_assume!(config.validate().is_ok());

        let balls = rack_balls(&Table::new(&table_config));
        prop_assert_eq!(balls.len(), 16);
        for (i, a) in balls.iter().enumerate() {
            for b in &balls[i + 1..] {
                prop_assert!(a.pos.distance(b.pos) >= a.radius + b.radius - 1e-3);
            }
        }
    }

    #[test]
    fn lone_ball_speed_decays_to_rest(angle in -3.14f32..3.14, speed in 0.1f32..8.0) {
        let table = Table::new(&TableConfig::default());
        let mut balls = vec![Ball::numbered(1, Vec2::new(400.0, 200.0), 10.0)];
        balls[0].vel = Vec2::new(angle.cos(), angle.sin()) * speed;

        let mut last = balls[0].speed();
        let mut stopped_at = None;
        for t in 0..2000 {
            integrate(&mut balls, &table);
            let now = balls[0].speed();
            prop_assert!(now < last || (now == 0.0 && last == 0.0));
            if stopped_at.is_none() && now == 0.0 {
                stopped_at = Some(t);
            }
            last = now;
        }
        prop_assert!(stopped_at.is_some());
        prop_assert_eq!(balls[0].vel, Vec2::ZERO);
    }
}
