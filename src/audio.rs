//! Sound feedback collaborator
//!
//! The session fires effects and never waits on them. On the web they are
//! procedurally generated with the Web Audio API, no sound files needed.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Jump impulse applied
    Jump,
    /// Touched down after a jump or fall
    Land,
    /// Run ended
    Death,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Effect for a tick event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Landed { .. } => Some(SoundEffect::Land),
            GameEvent::Died { .. } => Some(SoundEffect::Death),
            GameEvent::NewHighScore { .. } => Some(SoundEffect::HighScore),
            GameEvent::SpeedUp { .. } => None,
        }
    }
}

/// Fire-and-forget feedback sink
pub trait Feedback {
    fn play(&mut self, effect: SoundEffect);
}

impl<F: Feedback + ?Sized> Feedback for Box<F> {
    fn play(&mut self, effect: SoundEffect) {
        (**self).play(effect);
    }
}

/// Discards every effect
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl Feedback for NullFeedback {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Logs effects instead of playing them (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback {
    pub played: u64,
}

impl Feedback for LogFeedback {
    fn play(&mut self, effect: SoundEffect) {
        self.played += 1;
        log::debug!("sfx: {:?}", effect);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudioFeedback;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Feedback, SoundEffect};

    /// Web Audio beeps, gated by the `sfx` setting
    pub struct WebAudioFeedback {
        ctx: Option<AudioContext>,
        sfx: bool,
    }

    impl WebAudioFeedback {
        pub fn new(sfx: bool) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, sfx }
        }

        pub fn set_sfx(&mut self, sfx: bool) {
            self.sfx = sfx;
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Jump - flat 440 Hz beep
        fn play_beep(&self, ctx: &AudioContext) {
            let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(440.0, t).ok();
            gain.gain().set_value_at_time(0.1, t).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Land - soft thump
        fn play_land(&self, ctx: &AudioContext) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(0.08, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(80.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Death - short descending run
        fn play_death(&self, ctx: &AudioContext) {
            for (i, freq) in [400.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.12;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(0.1, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.25).ok();
                }
            }
        }

        /// High score - celebratory
        fn play_high_score(&self, ctx: &AudioContext) {
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(0.1, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }
    }

    impl Feedback for WebAudioFeedback {
        fn play(&mut self, effect: SoundEffect) {
            if !self.sfx {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Jump => self.play_beep(ctx),
                SoundEffect::Land => self.play_land(ctx),
                SoundEffect::Death => self.play_death(ctx),
                SoundEffect::HighScore => self.play_high_score(ctx),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{DeathCause, Support};

    #[test]
    fn test_event_mapping() {
        assert_eq!(SoundEffect::for_event(&GameEvent::Jumped), Some(SoundEffect::Jump));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Landed {
                support: Support::Block
            }),
            Some(SoundEffect::Land)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Died {
                cause: DeathCause::FellOffWorld,
                score: 3
            }),
            Some(SoundEffect::Death)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::SpeedUp { speed: 6.0 }), None);
    }

    #[test]
    fn test_log_feedback_counts() {
        let mut feedback = LogFeedback::default();
        feedback.play(SoundEffect::Jump);
        feedback.play(SoundEffect::Land);
        assert_eq!(feedback.played, 2);
    }
}
