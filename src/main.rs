//! Jump Runner headless entry point
//!
//! Runs the autopilot for a number of ticks and persists the high score.
//! Usage: `jump-runner [seed] [ticks]`. Set `JUMP_RUNNER_TUNING` to a JSON
//! file to override gameplay constants.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;
    use std::process::ExitCode;

    use jump_runner::audio::{Feedback, LogFeedback, NullFeedback};
    use jump_runner::consts::{DEFAULT_VIEW_HEIGHT, DEFAULT_VIEW_WIDTH};
    use jump_runner::highscores::JsonFileHighScores;
    use jump_runner::sim::GameEvent;
    use jump_runner::{Session, SessionConfig, Settings, Tuning};

    const HIGH_SCORE_FILE: &str = "jump-runner-highscore.json";
    const SETTINGS_FILE: &str = "jump-runner-settings.json";
    const TUNING_ENV: &str = "JUMP_RUNNER_TUNING";
    const DEFAULT_TICKS: u64 = 36_000;

    fn parse_arg(arg: Option<String>, name: &str) -> Result<Option<u64>, String> {
        arg.map(|a| a.parse::<u64>().map_err(|e| format!("invalid {} {:?}: {}", name, a, e)))
            .transpose()
    }

    fn time_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }

    fn load_tuning() -> Result<Tuning, String> {
        let Ok(path) = std::env::var(TUNING_ENV) else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
        let tuning = Tuning::from_json(&json).map_err(|e| format!("{}: {}", path, e))?;
        log::info!("Loaded tuning from {}", path);
        Ok(tuning)
    }

    pub fn run() -> ExitCode {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let parsed = parse_arg(args.next(), "seed")
            .and_then(|seed| Ok((seed, parse_arg(args.next(), "ticks")?)))
            .and_then(|(seed, ticks)| Ok((seed, ticks, load_tuning()?)));
        let (seed, ticks, tuning) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                log::error!("{}", e);
                eprintln!("usage: jump-runner [seed] [ticks]");
                return ExitCode::from(2);
            }
        };
        let seed = seed.unwrap_or_else(time_seed);
        let ticks = ticks.unwrap_or(DEFAULT_TICKS);

        let settings_path = Path::new(SETTINGS_FILE);
        let settings = Settings::load_from(settings_path).unwrap_or_else(|e| {
            log::warn!("Using default settings: {}", e);
            Settings::default()
        });
        // Leave an editable file behind on first run
        if !settings_path.exists() {
            if let Err(e) = settings.save_to(settings_path) {
                log::warn!("Could not write {}: {}", SETTINGS_FILE, e);
            }
        }
        let feedback: Box<dyn Feedback> = if settings.sfx {
            Box::new(LogFeedback::default())
        } else {
            Box::new(NullFeedback)
        };

        let config = SessionConfig::new(seed, DEFAULT_VIEW_WIDTH, DEFAULT_VIEW_HEIGHT)
            .with_tuning(tuning);
        let store = JsonFileHighScores::new(HIGH_SCORE_FILE);
        let mut session = match Session::new(config, store, feedback) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid configuration: {}", e);
                return ExitCode::FAILURE;
            }
        };

        log::info!("Jump Runner (headless) seed {} for {} ticks", seed, ticks);
        session.set_autopilot(true);
        session.start();

        let mut deaths = 0u32;
        let mut best_run = 0u64;
        for _ in 0..ticks {
            for event in session.step().events {
                if let GameEvent::Died { cause, score } = event {
                    deaths += 1;
                    best_run = best_run.max(score);
                    log::debug!("Run {} ended by {:?} at {}", deaths, cause, score);
                }
            }
        }
        best_run = best_run.max(session.state().scoreboard.score);
        session.stop();

        let high_score = session.state().scoreboard.high_score;
        log::info!(
            "Done: {} deaths, best run {}, high score {} ({})",
            deaths,
            best_run,
            high_score,
            session.store().path().display()
        );
        println!(
            "seed={} ticks={} deaths={} best_run={} high_score={}",
            seed, ticks, deaths, best_run, high_score
        );
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is jump_runner::web::start, this is just to satisfy the compiler
}
