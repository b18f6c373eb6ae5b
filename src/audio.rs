//! Audio
//!
//! The game only ever asks for two effects and a background pad. Backends
//! are fire-and-forget: a missing or failing backend simply stays silent.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Primary or double jump
    Jump,
    /// Fell out of the world
    Death,
}

/// Anything that can make the game's sounds
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    fn start_music(&mut self);
    fn stop_music(&mut self);
    /// Suspend output without losing the music state
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    /// Release the backend; the sink is silent afterwards
    fn dispose(&mut self);
    /// Pick up volume and mute changes
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// No-op sink for native builds and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _effect: SoundEffect) {}
    fn start_music(&mut self) {}
    fn stop_music(&mut self) {}
    fn pause_music(&mut self) {}
    fn resume_music(&mut self) {}
    fn dispose(&mut self) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};
    use crate::settings::Settings;

    /// Pad voices: (frequency, waveform)
    const PAD_VOICES: [(f32, OscillatorType); 2] =
        [(110.0, OscillatorType::Sine), (164.81, OscillatorType::Triangle)];
    /// Pad level relative to the music gain
    const PAD_LEVEL: f32 = 0.12;

    struct Music {
        voices: Vec<OscillatorNode>,
        gain: GainNode,
    }

    /// Web Audio backend with procedurally generated sounds
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        music: Option<Music>,
        sfx_gain: f32,
        music_gain: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        /// Gains start at the defaults until settings are applied
        pub fn new() -> Self {
            let settings = Settings::default();
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                music: None,
                sfx_gain: settings.sfx_gain(),
                music_gain: settings.music_gain(),
            }
        }

        /// Resume a suspended context (browsers require a user gesture)
        fn wake(ctx: &AudioContext) {
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator routed through its own gain node
        fn create_osc(
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

        /// Exponential pitch sweep over `ramp` seconds, fading out by `duration`
        fn sweep(ctx: &AudioContext, from: f32, to: f32, ramp: f64, duration: f64, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(vol * 0.01, t + duration)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + ramp)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + duration).ok();
        }

        fn build_pad(ctx: &AudioContext, level: f32) -> Option<Music> {
            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value(level * PAD_LEVEL);
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let mut voices = Vec::with_capacity(PAD_VOICES.len());
            for (freq, osc_type) in PAD_VOICES {
                let osc = ctx.create_oscillator().ok()?;
                osc.set_type(osc_type);
                osc.frequency().set_value(freq);
                osc.connect_with_audio_node(&gain).ok()?;
                osc.start().ok()?;
                voices.push(osc);
            }
            Some(Music { voices, gain })
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            if self.sfx_gain <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            Self::wake(ctx);

            match effect {
                SoundEffect::Jump => Self::sweep(ctx, 220.0, 440.0, 0.1, 0.2, self.sfx_gain),
                SoundEffect::Death => Self::sweep(ctx, 440.0, 220.0, 0.5, 0.5, self.sfx_gain),
            }
        }

        fn start_music(&mut self) {
            if self.music.is_some() || self.music_gain <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            Self::wake(ctx);
            self.music = Self::build_pad(ctx, self.music_gain);
            if self.music.is_none() {
                log::warn!("Failed to start background music");
            }
        }

        fn stop_music(&mut self) {
            if let Some(music) = self.music.take() {
                for osc in &music.voices {
                    osc.stop().ok();
                }
                music.gain.disconnect().ok();
            }
        }

        fn pause_music(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.suspend();
            }
        }

        fn resume_music(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn dispose(&mut self) {
            self.stop_music();
            if let Some(ctx) = self.ctx.take() {
                let _ = ctx.close();
                log::info!("Audio disposed");
            }
        }

        fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_gain = settings.sfx_gain();
            self.music_gain = settings.music_gain();
            if self.music_gain <= 0.0 {
                self.stop_music();
            } else if let Some(music) = &self.music {
                music.gain.gain().set_value(self.music_gain * PAD_LEVEL);
            }
        }
    }
}
