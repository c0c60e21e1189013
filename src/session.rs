//! Session state machine
//!
//! Owns the simulation state and wires it to the collaborators: input queue,
//! stepper, high score store and feedback sink. `Idle` shows the start line;
//! `Running` ticks. Deaths reset inside the tick and keep the session running.

use serde::{Deserialize, Serialize};

use crate::audio::{Feedback, NullFeedback, SoundEffect};
use crate::clock::{StepMode, Stepper};
use crate::error::ConfigError;
use crate::highscores::{HighScoreStore, MemoryHighScores};
use crate::sim::{
    GameEvent, GameState, InputEvent, InputQueue, Scoreboard, Snapshot, TickResult, tick,
};
use crate::tuning::SessionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    Running,
}

pub struct Session<S = MemoryHighScores, F = NullFeedback> {
    state: GameState,
    phase: SessionPhase,
    input: InputQueue,
    stepper: Stepper,
    store: S,
    feedback: F,
    autopilot: bool,
}

impl<S: HighScoreStore, F: Feedback> Session<S, F> {
    /// Validate the config, load the stored high score and enter `Idle`
    pub fn new(config: SessionConfig, mut store: S, feedback: F) -> Result<Self, ConfigError> {
        let mut state = GameState::from_config(&config)?;
        state.scoreboard = Scoreboard::with_high_score(store.load_high_score());
        log::info!(
            "Session created: seed {}, viewport {}x{}, high score {}",
            config.seed,
            config.viewport.width,
            config.viewport.height,
            state.scoreboard.high_score
        );
        Ok(Self {
            state,
            phase: SessionPhase::Idle,
            input: InputQueue::default(),
            stepper: Stepper::default(),
            store,
            feedback,
            autopilot: false,
        })
    }

    pub fn with_step_mode(mut self, mode: StepMode) -> Result<Self, ConfigError> {
        self.stepper = Stepper::new(mode)?;
        Ok(self)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    /// Let the autopilot decide jumps (demo mode)
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Queue a UI event for the next tick; `false` if the queue is full
    pub fn push_input(&mut self, event: InputEvent) -> bool {
        self.input.push(event)
    }

    /// `Idle -> Running` with a freshly generated course
    pub fn start(&mut self) {
        if self.phase == SessionPhase::Running {
            return;
        }
        self.state.respawn();
        self.phase = SessionPhase::Running;
        log::info!("Run started (high score {})", self.state.scoreboard.high_score);
    }

    /// Finalize the current run and return to `Idle` with the course cleared
    pub fn stop(&mut self) {
        if self.phase == SessionPhase::Idle {
            return;
        }
        let score = self.state.scoreboard.score;
        if let Some(best) = self.state.scoreboard.finalize() {
            self.record_high_score(best);
        }
        self.state.clear();
        self.input.clear();
        self.stepper.reset();
        self.phase = SessionPhase::Idle;
        log::info!("Session stopped at score {}", score);
    }

    /// Drain input and run one tick
    ///
    /// While idle only `Start` is honoured; other events are consumed and the
    /// simulation does not advance.
    pub fn step(&mut self) -> TickResult {
        let drained = self.input.drain();
        if drained.start {
            self.start();
        }
        if self.phase == SessionPhase::Idle {
            return TickResult::default();
        }

        let mut input = drained.input;
        input.autopilot = self.autopilot;
        let result = tick(&mut self.state, &input);
        self.dispatch(&result);
        result
    }

    /// Frame callback: run every tick due at `now_ms`, returning how many ran
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let ticks = self.stepper.frame(now_ms);
        for _ in 0..ticks {
            self.step();
        }
        ticks
    }

    fn dispatch(&mut self, result: &TickResult) {
        for event in &result.events {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.feedback.play(effect);
            }
            if let GameEvent::NewHighScore { score } = event {
                self.record_high_score(*score);
            }
        }
    }

    fn record_high_score(&mut self, score: u64) {
        log::info!("New high score: {}", score);
        self.store.save_high_score(score);
    }
}
