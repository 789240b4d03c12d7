//! Engine facade
//!
//! Owns the game state, the command queue and both tick schedulers. Hosts
//! push commands, call `update` once per frame, and read snapshots and
//! events back. Nothing outside the engine holds a reference into its state.

use std::collections::VecDeque;

use glam::Vec2;

use crate::config::{ConfigError, EngineConfig};
use crate::consts::MAX_FRAME_DT;
use crate::scheduler::FixedTicker;
use crate::sim::{GameEvent, GamePhase, GameState, tick};
use crate::snapshot::Snapshot;

/// Commands from the UI collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Pointer position in table coordinates
    Aim(Vec2),
    BeginCharge,
    Release,
    /// Stop everything and drop the current game
    Exit,
    /// Exit, then rack a fresh game
    Restart,
}

pub struct Engine {
    config: EngineConfig,
    game: Option<GameState>,
    commands: VecDeque<Command>,
    events: Vec<GameEvent>,
    charge_ticker: FixedTicker,
    physics_ticker: FixedTicker,
    /// Seconds of host time seen by `update`
    clock: f64,
}

impl Engine {
    /// Validate `config` and create an engine with a freshly racked game
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let timing = &config.timing;
        let charge_ticker = FixedTicker::new(timing.charge_hz, timing.max_substeps);
        let physics_ticker = FixedTicker::new(timing.physics_hz, timing.max_substeps);

        let mut engine = Self {
            config,
            game: None,
            commands: VecDeque::with_capacity(16),
            events: Vec::new(),
            charge_ticker,
            physics_ticker,
            clock: 0.0,
        };
        engine.start_game();
        Ok(engine)
    }

    fn start_game(&mut self) {
        let state = GameState::new(&self.config.table);
        log::info!(
            "New game: {} balls racked on {}x{} table",
            state.balls.len(),
            state.table.width,
            state.table.height
        );
        self.game = Some(state);
        self.sync_schedulers();
    }

    /// Replace the current game with a prepared or saved one
    pub fn load_state(&mut self, mut state: GameState) {
        self.shutdown();
        state.normalize_order();
        log::info!("Loaded game in phase {:?}", state.phase());
        self.game = Some(state);
        self.sync_schedulers();
    }

    /// Queue a command; Exit and Restart take effect immediately
    pub fn submit(&mut self, command: Command) {
        match command {
            Command::Exit => self.exit(),
            Command::Restart => self.restart(),
            _ => self.commands.push_back(command),
        }
    }

    /// Cancel all schedulers and drop in-flight state
    pub fn exit(&mut self) {
        if self.game.is_some() {
            log::info!("Exiting game");
        }
        self.shutdown();
    }

    pub fn restart(&mut self) {
        self.shutdown();
        self.start_game();
    }

    fn shutdown(&mut self) {
        self.charge_ticker.cancel();
        self.physics_ticker.cancel();
        self.commands.clear();
        self.events.clear();
        self.game = None;
    }

    /// Advance host time by `dt` seconds
    ///
    /// Applies queued commands, then runs whichever scheduler the phase
    /// allows. Each tick completes before the next starts, and the phase is
    /// re-checked between ticks.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.clock += dt as f64;

        while let Some(command) = self.commands.pop_front() {
            self.apply(command);
        }

        let charge_steps = self.charge_ticker.advance(dt);
        for _ in 0..charge_steps {
            let Some(game) = self.game.as_mut() else { break };
            if game.phase() != GamePhase::Charging {
                break;
            }
            game.shot.accumulate(self.clock, &self.config.shot);
        }

        let physics_steps = self.physics_ticker.advance(dt);
        for _ in 0..physics_steps {
            let Some(game) = self.game.as_mut() else { break };
            if game.phase() != GamePhase::Moving {
                break;
            }
            let events = tick(game, &self.config);
            self.events.extend(events);
            self.sync_schedulers();
        }
    }

    fn apply(&mut self, command: Command) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let cue_in_play = game.cue_ball().is_some_and(|b| b.in_play());

        match command {
            Command::Aim(target) => {
                if let Some(cue_pos) = game.cue_ball().filter(|b| b.in_play()).map(|b| b.pos) {
                    game.shot.aim(cue_pos, target, &self.config.shot);
                }
            }
            Command::BeginCharge => {
                if cue_in_play {
                    game.shot.begin_charge(self.clock);
                }
            }
            Command::Release => {
                if !cue_in_play {
                    return;
                }
                // Fold in time held since the last charge tick
                game.shot.accumulate(self.clock, &self.config.shot);
                let power = game.shot.power;
                let Some(velocity) = game.shot.release(&self.config.shot) else {
                    return;
                };
                if let Some(cue) = game.cue_ball_mut() {
                    cue.vel = velocity;
                }
                game.round.shot_count += 1;
                let angle = game.shot.aim_angle;
                let speed = velocity.length();
                log::info!(
                    "Shot {} released: angle {:.3} power {:.1} speed {:.2}",
                    game.round.shot_count,
                    angle,
                    power,
                    speed
                );
                self.events.push(GameEvent::ShotFired { angle, speed });
            }
            Command::Exit | Command::Restart => {}
        }

        self.sync_schedulers();
    }

    /// Start the ticker for the current phase, cancel the other
    fn sync_schedulers(&mut self) {
        let phase = self.game.as_ref().map(GameState::phase);

        match (phase == Some(GamePhase::Charging), self.charge_ticker.is_running()) {
            (true, false) => self.charge_ticker.start(),
            (false, true) => self.charge_ticker.cancel(),
            _ => {}
        }
        match (phase == Some(GamePhase::Moving), self.physics_ticker.is_running()) {
            (true, false) => self.physics_ticker.start(),
            (false, true) => self.physics_ticker.cancel(),
            _ => {}
        }
    }

    /// Current view for rendering, `None` after Exit
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.game.as_ref().map(Snapshot::capture)
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.game.as_ref().map(GameState::phase)
    }

    pub fn is_active(&self) -> bool {
        self.game.is_some()
    }

    /// Read-only access to the simulation state
    pub fn state(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    pub fn charge_running(&self) -> bool {
        self.charge_ticker.is_running()
    }

    pub fn physics_running(&self) -> bool {
        self.physics_ticker.is_running()
    }
}
