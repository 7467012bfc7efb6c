//! Audio playback using the Web Audio API

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{BGM_PATTERN, BgmClock, SoundEffect, Tone, sound_for};
use crate::settings::Settings;
use crate::sim::{EventSink, GameEvent, GamePhase};

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    bgm: BgmClock,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Creating a context fails outside secure contexts; play silently then
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            bgm: BgmClock::default(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Silence everything until the next `resume`
    pub fn suspend(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.suspend();
        }
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        self.play_tones(effect.tones(), self.sfx_volume);
    }

    /// Advance the background rhythm by one frame
    pub fn update_music(&mut self, dt: f32) {
        if self.bgm.advance(dt) {
            self.play_tones(&BGM_PATTERN, self.music_volume);
        }
    }

    pub fn start_music(&mut self) {
        self.bgm.start();
    }

    pub fn stop_music(&mut self) {
        self.bgm.stop();
    }

    fn play_tones(&self, tones: &[Tone], vol: f32) {
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let now = ctx.current_time();
        for tone in tones {
            self.play_beep(ctx, tone, vol, now + tone.offset as f64);
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

    /// Square beep with a short attack and exponential decay
    fn play_beep(&self, ctx: &AudioContext, tone: &Tone, vol: f32, t: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, tone.freq, OscillatorType::Square) else {
            return;
        };
        let end = t + tone.duration as f64;

        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(tone.gain * vol, t + 0.01)
            .ok();
        gain.gain().exponential_ramp_to_value_at_time(0.001, end).ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(end).ok();
    }
}

/// Event sink that plays sounds and drives the music
pub struct AudioSink(pub Rc<RefCell<AudioManager>>);

impl EventSink for AudioSink {
    fn notify(&mut self, event: &GameEvent) {
        let mut audio = self.0.borrow_mut();
        match event {
            GameEvent::StateChange(GamePhase::Playing) => audio.start_music(),
            GameEvent::StateChange(_) => audio.stop_music(),
            _ => {}
        }
        if let Some(effect) = sound_for(event) {
            audio.play(effect);
        }
    }
}
