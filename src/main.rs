//! Billiards Engine headless runner
//!
//! Plays complete rounds with a seeded autoplayer and prints each round
//! record as JSON.
//!
//! Usage: billiards-engine [SEED] [ROUNDS] [CONFIG.json]

use std::error::Error;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use billiards_engine::sim::{GameEvent, GamePhase};
use billiards_engine::{Command, Engine, EngineConfig, RoundRecord};

/// Host frame rate the runner simulates
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up on a round after this many shots
const MAX_SHOTS: u32 = 200;
/// Hard frame cap per round
const MAX_FRAMES: u32 = 600_000;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 12345,
    };
    let rounds: u32 = match args.next() {
        Some(s) => s.parse()?,
        None => 1,
    };
    let config = match args.next() {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    log::info!("Billiards Engine (native) starting: seed {seed}, {rounds} round(s)");

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut engine = Engine::new(config)?;

    for round in 0..rounds {
        if round > 0 {
            engine.submit(Command::Restart);
        }
        match play_round(&mut engine, &mut rng) {
            Some(record) => println!("{}", serde_json::to_string(&record)?),
            None => {
                log::warn!("Round {} abandoned", round + 1);
                engine.submit(Command::Exit);
            }
        }
    }

    Ok(())
}

/// Drive one round to completion with random shots
fn play_round(engine: &mut Engine, rng: &mut Pcg32) -> Option<RoundRecord> {
    let mut charge_frames_left: Option<u32> = None;

    for _ in 0..MAX_FRAMES {
        let snapshot = engine.snapshot()?;
        if snapshot.shot_count >= MAX_SHOTS {
            return None;
        }

        match snapshot.phase {
            GamePhase::Aiming => {
                // Pick a random object ball still on the table
                let targets: Vec<_> = snapshot
                    .balls
                    .iter()
                    .filter(|b| !b.pocketed && b.number.is_some())
                    .collect();
                let cue = snapshot.cue_position?;
                if let Some(target) = targets.get(rng.random_range(0..targets.len().max(1))) {
                    let jitter = glam::Vec2::new(
                        rng.random_range(-4.0..4.0),
                        rng.random_range(-4.0..4.0),
                    );
                    // Aim repeatedly so the smoothed angle converges
                    let point = glam::Vec2::new(target.x, target.y) + jitter;
                    let point = cue + (point - cue).normalize_or_zero() * 400.0;
                    for _ in 0..12 {
                        engine.submit(Command::Aim(point));
                    }
                }
                engine.submit(Command::BeginCharge);
                charge_frames_left = Some(rng.random_range(5..90));
            }
            GamePhase::Charging => match charge_frames_left {
                Some(0) | None => {
                    engine.submit(Command::Release);
                    charge_frames_left = None;
                }
                Some(n) => charge_frames_left = Some(n - 1),
            },
            GamePhase::Moving | GamePhase::GameOver => {}
        }

        engine.update(FRAME_DT);

        for event in engine.drain_events() {
            match event {
                GameEvent::RoundComplete(record) => return Some(record),
                GameEvent::BallPocketed { id, .. } => log::debug!("Ball {id} down"),
                _ => {}
            }
        }
    }

    None
}
