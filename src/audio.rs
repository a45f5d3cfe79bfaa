//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Correct answer
    Correct,
    /// Combo reached 5 or 10
    ComboMilestone,
    /// Wrong answer button
    Wrong,
    /// Problem hit the floor
    Miss,
    /// Session started
    Start,
    /// Game over
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Sound for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Correct { combo: 5 | 10, .. } => Some(SoundEffect::ComboMilestone),
            GameEvent::Correct { .. } => Some(SoundEffect::Correct),
            GameEvent::Wrong { .. } => Some(SoundEffect::Wrong),
            GameEvent::Missed { .. } => Some(SoundEffect::Miss),
            GameEvent::Ending => Some(SoundEffect::GameOver),
            GameEvent::Spawned { .. } | GameEvent::GameOver => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
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
        Self { ctx, volume: 0.8 }
    }

    /// Set effective volume (0.0 - 1.0), see `Settings::effective_volume`
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Correct => self.play_correct(ctx, vol),
            SoundEffect::ComboMilestone => self.play_combo(ctx, vol),
            SoundEffect::Wrong => self.play_wrong(ctx, vol),
            SoundEffect::Miss => self.play_miss(ctx, vol),
            SoundEffect::Start => self.play_start(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
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

    /// Note sequence, one oscillator per note, `spacing` seconds apart
    fn play_notes(&self, ctx: &AudioContext, vol: f32, notes: &[f32], spacing: f64, length: f64, osc_type: OscillatorType) {
        let start = ctx.current_time();
        for (i, &freq) in notes.iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                continue;
            };
            let t = start + i as f64 * spacing;
            let envelope = gain.gain();
            envelope.set_value_at_time(vol, t).ok();
            envelope.exponential_ramp_to_value_at_time(0.01, t + length).ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }
    }

    /// Correct - bright two-note ding
    fn play_correct(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(ctx, vol * 0.25, &[660.0, 880.0], 0.06, 0.15, OscillatorType::Sine);
    }

    /// Combo milestone - little fanfare
    fn play_combo(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(ctx, vol * 0.3, &[523.0, 659.0, 784.0, 1047.0], 0.08, 0.25, OscillatorType::Triangle);
    }

    /// Single oscillator gliding from `from` to `to` Hz
    fn play_sweep(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32, length: f64, osc_type: OscillatorType) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time();
        let envelope = gain.gain();
        envelope.set_value_at_time(vol, t).ok();
        envelope.exponential_ramp_to_value_at_time(0.01, t + length).ok();
        let pitch = osc.frequency();
        pitch.set_value_at_time(from, t).ok();
        pitch.exponential_ramp_to_value_at_time(to, t + length * 0.8).ok();

        osc.start().ok();
        osc.stop_with_when(t + length + 0.05).ok();
    }

    /// Wrong - low buzz
    fn play_wrong(&self, ctx: &AudioContext, vol: f32) {
        self.play_sweep(ctx, vol * 0.2, 180.0, 120.0, 0.25, OscillatorType::Square);
    }

    /// Miss - problem splashes on the floor
    fn play_miss(&self, ctx: &AudioContext, vol: f32) {
        self.play_sweep(ctx, vol * 0.4, 300.0, 60.0, 0.4, OscillatorType::Sine);
    }

    /// Start - whoosh up
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        self.play_sweep(ctx, vol * 0.3, 200.0, 600.0, 0.2, OscillatorType::Triangle);
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(ctx, vol * 0.3, &[400.0, 350.0, 300.0, 200.0], 0.2, 0.3, OscillatorType::Sine);
    }

    /// High score - celebratory
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        self.play_notes(ctx, vol * 0.25, &[500.0, 600.0, 700.0, 800.0, 1000.0], 0.08, 0.25, OscillatorType::Triangle);
    }
}
