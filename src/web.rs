//! Browser bindings
//!
//! The page owns the canvas, the menus and the animation frame loop. It calls
//! into [`WebGame`] from its handlers and draws from the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::audio::WebAudioFeedback;
use crate::clock::StepMode;
use crate::consts::DEFAULT_TICK_HZ;
use crate::highscores::LocalStorageHighScores;
use crate::session::{Session, SessionPhase};
use crate::settings::Settings;
use crate::sim::InputEvent;
use crate::tuning::{SessionConfig, Tuning};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Jump Runner starting...");
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One game session bound to the page
#[wasm_bindgen]
pub struct WebGame {
    session: Session<LocalStorageHighScores, WebAudioFeedback>,
    settings: Settings,
}

#[wasm_bindgen]
impl WebGame {
    /// Size the world from the canvas; `tuning_json` may be empty
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, tuning_json: &str) -> Result<WebGame, JsValue> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(js_error)?
        };
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let config = SessionConfig::new(seed, width, height).with_tuning(tuning);
        let session = Session::new(
            config,
            LocalStorageHighScores,
            WebAudioFeedback::new(settings.sfx),
        )
        .map_err(js_error)?
        // Keep game speed independent of the display refresh rate
        .with_step_mode(StepMode::FixedRate {
            hz: DEFAULT_TICK_HZ,
        })
        .map_err(js_error)?;
        log::info!("Game initialized with seed: {}", seed);
        Ok(WebGame { session, settings })
    }

    /// Animation frame callback; returns the number of ticks run
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        self.session.frame(now_ms)
    }

    pub fn start(&mut self) {
        self.session.feedback().resume();
        self.session.push_input(InputEvent::Start);
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    pub fn jump(&mut self) {
        // Browsers only allow audio after a user gesture
        self.session.feedback().resume();
        self.session.push_input(InputEvent::Jump);
    }

    pub fn move_left(&mut self, held: bool) {
        self.session.push_input(InputEvent::MoveLeft(held));
    }

    pub fn move_right(&mut self, held: bool) {
        self.session.push_input(InputEvent::MoveRight(held));
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.session.set_autopilot(enabled);
    }

    pub fn is_running(&self) -> bool {
        self.session.phase() == SessionPhase::Running
    }

    pub fn score(&self) -> u64 {
        self.session.state().scoreboard.score
    }

    pub fn high_score(&self) -> u64 {
        self.session.state().scoreboard.high_score
    }

    /// Render snapshot as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.session.snapshot().to_json().map_err(js_error)
    }

    pub fn music(&self) -> bool {
        self.settings.music
    }

    pub fn sfx(&self) -> bool {
        self.settings.sfx
    }

    pub fn toggle_music(&mut self) -> bool {
        let music = self.settings.toggle_music();
        self.settings.save();
        music
    }

    pub fn toggle_sfx(&mut self) -> bool {
        let sfx = self.settings.toggle_sfx();
        self.session.feedback_mut().set_sfx(sfx);
        self.settings.save();
        sfx
    }
}
