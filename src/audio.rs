//! Sound cues
//!
//! The simulation raises [`GameEvent`]s; the frame driver maps them to
//! [`SoundEffect`]s and hands them to an [`AudioSink`]. Playback is
//! fire-and-forget: a sink that cannot play simply drops the cue.
//!
//! On wasm32, [`AudioManager`] synthesizes every cue with the Web Audio API -
//! no external files needed.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Overtook an oncoming car
    Overtake,
    /// Nitro engaged
    Nitro,
    /// Shield picked up
    ShieldPickup,
    /// Disaster triggered, meteors incoming
    Meteor,
    /// Meteor impact or shield absorbing a hit
    Blast,
    /// Crash, run over
    GameOver,
    /// Run ended above the previous best
    HighScore,
}

impl SoundEffect {
    /// Cue for a simulation event
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            GameEvent::Overtake => SoundEffect::Overtake,
            GameEvent::NitroEngaged => SoundEffect::Nitro,
            GameEvent::ShieldPickup => SoundEffect::ShieldPickup,
            GameEvent::DisasterTriggered { .. } => SoundEffect::Meteor,
            GameEvent::ShieldAbsorb | GameEvent::MeteorImpact => SoundEffect::Blast,
            GameEvent::Crash => SoundEffect::GameOver,
        }
    }
}

/// Anything that can play sound cues
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Sink that discards every cue (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::trace!("(muted) {:?}", effect);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};
    use crate::settings::Settings;

    /// Music sits well under the effects
    const MUSIC_GAIN: f32 = 0.3;

    /// Looping background music: a root/fifth drone pulsed by a slow LFO
    struct Music {
        voices: Vec<OscillatorNode>,
        lfo: OscillatorNode,
        gain: GainNode,
    }

    impl Music {
        fn stop(self) {
            for osc in &self.voices {
                osc.stop().ok();
            }
            self.lfo.stop().ok();
            let _ = self.gain.disconnect();
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
        music: Option<Music>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
                music: None,
            }
        }

        /// Take volume, mute and music preferences from settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.muted = settings.muted;
            self.set_music(settings);
        }

        /// Start, retune or stop the background music to match settings
        pub fn set_music(&mut self, settings: &Settings) {
            let volume = settings.effective_music_volume();
            if volume <= 0.0 {
                if let Some(music) = self.music.take() {
                    music.stop();
                    log::info!("Music off");
                }
                return;
            }

            if let Some(music) = &self.music {
                music.gain.gain().set_value(volume * MUSIC_GAIN);
                return;
            }

            let Some(ctx) = &self.ctx else { return };
            self.music = Self::start_music(ctx, volume);
            if self.music.is_some() {
                log::info!("Music on");
            }
        }

        fn start_music(ctx: &AudioContext, volume: f32) -> Option<Music> {
            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value(volume * MUSIC_GAIN);
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let mut voices = Vec::new();
            for (freq, osc_type) in [
                (55.0, OscillatorType::Sawtooth),
                (82.4, OscillatorType::Triangle),
                (110.0, OscillatorType::Triangle),
            ] {
                let osc = ctx.create_oscillator().ok()?;
                osc.set_type(osc_type);
                osc.frequency().set_value(freq);
                osc.connect_with_audio_node(&gain).ok()?;
                osc.start().ok()?;
                voices.push(osc);
            }

            // Pulse the drone at two beats per second
            let lfo = ctx.create_oscillator().ok()?;
            let depth = ctx.create_gain().ok()?;
            lfo.frequency().set_value(2.0);
            depth.gain().set_value(volume * MUSIC_GAIN * 0.5);
            lfo.connect_with_audio_node(&depth).ok()?;
            depth.connect_with_audio_param(&gain.gain()).ok()?;
            lfo.start().ok()?;

            Some(Music { voices, lfo, gain })
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Get effective volume
        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Create an oscillator with gain envelope
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

        /// Overtake - short plucked C4
        fn play_overtake(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 261.6, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Nitro - rising exhaust roar
        fn play_nitro(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.frequency().set_value_at_time(80.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(400.0, t + 0.3)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.45).ok();
            }

            // Hiss on top
            if let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.08, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.frequency().set_value_at_time(1800.0, t).ok();
                osc.frequency().set_value_at_time(2200.0, t + 0.03).ok();
                osc.frequency().set_value_at_time(1600.0, t + 0.06).ok();
                osc.frequency().set_value_at_time(2000.0, t + 0.09).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.22).ok();
            }
        }

        /// Shield pickup - bright rising chime
        fn play_shield(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        /// Meteor warning - metallic clang
        fn play_meteor(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.frequency().set_value_at_time(200.0, t).ok();
                osc.frequency().set_value_at_time(1020.0, t + 0.01).ok();
                osc.frequency().set_value_at_time(300.0, t + 0.05).ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.25).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 4000.0, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.1, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.12).ok();
            }
        }

        /// Blast - boom!
        fn play_blast(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.5)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.6).ok();

            // High frequency crack
            if let Some((osc2, gain2)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
                gain2.gain().set_value_at_time(vol * 0.2, t).ok();
                gain2
                    .gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc2.start().ok();
                osc2.stop_with_when(t + 0.15).ok();
            }
        }

        /// Game over - low membrane thud
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 130.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.7, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.2)
                .ok();
            osc.frequency().set_value_at_time(130.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(65.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 1.3).ok();
        }

        /// High score - celebratory
        fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                let delay = 0.6 + i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Overtake => self.play_overtake(ctx, vol),
                SoundEffect::Nitro => self.play_nitro(ctx, vol),
                SoundEffect::ShieldPickup => self.play_shield(ctx, vol),
                SoundEffect::Meteor => self.play_meteor(ctx, vol),
                SoundEffect::Blast => self.play_blast(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::HighScore => self.play_high_score(ctx, vol),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cues() {
        assert_eq!(SoundEffect::for_event(GameEvent::Overtake), SoundEffect::Overtake);
        assert_eq!(
            SoundEffect::for_event(GameEvent::DisasterTriggered { meteors: 3 }),
            SoundEffect::Meteor
        );
        assert_eq!(SoundEffect::for_event(GameEvent::ShieldAbsorb), SoundEffect::Blast);
        assert_eq!(SoundEffect::for_event(GameEvent::MeteorImpact), SoundEffect::Blast);
        assert_eq!(SoundEffect::for_event(GameEvent::Crash), SoundEffect::GameOver);
    }
}
