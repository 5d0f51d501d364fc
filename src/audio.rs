//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The context is created lazily on the first user gesture; until then (or if
//! creation fails) every cue is silently dropped.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::platform::SoundSink;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Minimum spacing between pops (seconds). Late in a round hundreds of clones
/// spawn per second and would otherwise stack into noise.
const POP_SPACING: f64 = 0.03;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Set once `unlock` has run, whether or not it succeeded
    unlocked: bool,
    settings: Settings,
    last_pop: f64,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        Self {
            ctx: None,
            unlocked: false,
            settings: settings.clone(),
            last_pop: f64::NEG_INFINITY,
        }
    }

    /// Create and resume the context. Must run inside a user gesture handler;
    /// repeated calls are no-ops.
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;

        // May fail if not in secure context
        self.ctx = AudioContext::new().ok();
        match &self.ctx {
            Some(ctx) => {
                let _ = ctx.resume();
                log::info!("Audio unlocked");
            }
            None => log::warn!("Failed to create AudioContext - audio disabled"),
        }
    }

    /// Play the cue for a game event
    pub fn play(&mut self, event: GameEvent) {
        let vol = self.settings.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = self.ctx.clone() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match event {
            GameEvent::Pop => {
                let now = ctx.current_time();
                if now - self.last_pop < POP_SPACING {
                    return;
                }
                self.last_pop = now;
                self.play_pop(&ctx, vol);
            }
            GameEvent::RoundWin => self.play_round_win(&ctx, vol),
            GameEvent::MatchWin => self.play_match_win(&ctx, vol),
        }
    }

    // === Sound generators ===

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

    /// Pop - short rising blip
    fn play_pop(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();
        osc.frequency().set_value_at_time(500.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(900.0, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Round win - short arpeggio
    fn play_round_win(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }
    }

    /// Match win - longer celebratory run
    fn play_match_win(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0, 1200.0].iter().enumerate() {
            let delay = i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.6).ok();
            }
        }
    }
}

impl SoundSink for AudioManager {
    fn on_event(&mut self, event: GameEvent) {
        self.play(event);
    }
}
