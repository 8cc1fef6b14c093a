//! Session lifecycle and frame pacing
//!
//! `Session` owns the game state, the seeded RNG, the balance tuning, the
//! held input and the run history. It drives the phase machine
//! (Idle -> Running -> GameOver -> Running ...) and throttles host frames to
//! at most one tick per `TICK_MS`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::difficulty::power_up_interval_ms;
use super::snapshot::{Hud, Snapshot};
use super::state::{GameEvent, GamePhase, GameState};
use super::tick::{TickInput, tick};
use crate::consts::TICK_MS;
use crate::highscores::{HighScores, RunRecord};
use crate::tuning::Tuning;

/// Horizontal input direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// What a host frame did
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Not running; nothing advanced
    Halted,
    /// Too soon after the previous tick; deferred, not accumulated
    Deferred,
    /// One tick ran
    Ticked(Vec<GameEvent>),
}

/// A play session
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    tuning: Tuning,
    rng: Pcg32,
    seed: u64,
    input: TickInput,
    high_scores: HighScores,
    /// Host timestamp of the last executed tick
    last_frame_ms: Option<f64>,
}

impl Session {
    /// Create an idle session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let interval = power_up_interval_ms(rng.random(), &tuning);
        Self {
            state: GameState::new(interval),
            tuning,
            rng,
            seed,
            input: TickInput::default(),
            high_scores: HighScores::new(),
            last_frame_ms: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for hosts and tests that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn input(&self) -> TickInput {
        self.input
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Best score this process
    pub fn high_score(&self) -> u64 {
        self.high_scores.best()
    }

    /// Record a held or released direction
    pub fn set_intent(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Left => self.input.left = pressed,
            Direction::Right => self.input.right = pressed,
        }
    }

    /// Replace the whole held input at once
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Layout measurement from the renderer. Collisions stay disabled until
    /// a positive width is known.
    pub fn set_playfield_width(&mut self, width_px: f32) {
        self.state.playfield_width = (width_px.is_finite() && width_px > 0.0).then_some(width_px);
    }

    /// Start trigger: starts from Idle, restarts from GameOver, ignored while running
    pub fn trigger_start(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Idle => self.start(),
            GamePhase::GameOver => self.restart(),
            GamePhase::Running => false,
        }
    }

    /// Idle -> Running. Returns false from any other phase.
    pub fn start(&mut self) -> bool {
        if self.state.phase != GamePhase::Idle {
            return false;
        }
        self.begin_run();
        log::info!("Session started (seed {})", self.seed);
        true
    }

    /// GameOver -> Running with everything reset. Returns false from any other phase.
    pub fn restart(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver {
            return false;
        }
        self.begin_run();
        log::info!("Session restarted (high score {})", self.high_score());
        true
    }

    fn begin_run(&mut self) {
        let interval = power_up_interval_ms(self.rng.random(), &self.tuning);
        self.state.reset_run(interval);
        self.state.phase = GamePhase::Running;
        self.last_frame_ms = None;
    }

    /// Host frame callback. Runs at most one tick, and only when at least
    /// `TICK_MS` passed since the last executed tick. A long stall advances
    /// game time by the real delta of the one tick that follows it.
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameOutcome {
        if self.state.phase != GamePhase::Running {
            return FrameOutcome::Halted;
        }

        let dt = match self.last_frame_ms {
            None => TICK_MS,
            Some(last) => {
                let dt = timestamp_ms - last;
                if dt < 0.0 {
                    // Host clock went backwards; re-anchor
                    self.last_frame_ms = Some(timestamp_ms);
                    return FrameOutcome::Deferred;
                }
                if dt < TICK_MS {
                    return FrameOutcome::Deferred;
                }
                dt
            }
        };
        self.last_frame_ms = Some(timestamp_ms);

        FrameOutcome::Ticked(self.step(dt))
    }

    /// Run exactly one tick covering `dt_ms`, bypassing the frame throttle.
    /// Transitions to GameOver when health runs out.
    pub fn step(&mut self, dt_ms: f64) -> Vec<GameEvent> {
        let events = tick(
            &mut self.state,
            &self.input,
            dt_ms,
            &self.tuning,
            &mut self.rng,
        );

        if self.state.phase == GamePhase::Running && self.state.health.is_depleted() {
            self.game_over();
        }

        events
    }

    /// End a running game immediately, as if health ran out. The run is
    /// still recorded. Returns false when not running.
    pub fn forfeit(&mut self) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        self.game_over();
        true
    }

    fn game_over(&mut self) {
        self.state.phase = GamePhase::GameOver;
        self.last_frame_ms = None;

        let run = RunRecord {
            score: self.state.score,
            level: self.state.level,
            survived_ms: self.state.elapsed_ms,
        };
        let rank = self.high_scores.record(run);
        log::info!(
            "Game over: score {} at level {} after {:.1}s (rank {:?}, high score {})",
            self.state.score,
            self.state.level,
            self.state.elapsed_ms / 1000.0,
            rank,
            self.high_score()
        );
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(&self.state, self.high_score())
    }

    pub fn hud(&self) -> Hud {
        Hud::from_state(&self.state)
    }
}
