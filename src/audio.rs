//! Spin audio cues using the Web Audio API
//!
//! Procedurally generated, no sample files. A mechanical click for every
//! segment crossing and a short 8-bit fanfare for the winner.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::feedback::{FeedbackSink, SpinEvent};
use crate::settings::Settings;

/// Winner arpeggio: (frequency Hz, onset seconds). C5 E5 G5 C6 C6.
const WIN_MELODY: [(f32, f64); 5] = [
    (523.25, 0.0),
    (659.25, 0.12),
    (783.99, 0.24),
    (1046.5, 0.36),
    (1046.5, 0.48),
];

/// Length of the tick noise burst (seconds)
const NOISE_SECONDS: f32 = 0.02;

/// Audio sink for spin events
pub struct AudioFeedback {
    ctx: Option<AudioContext>,
    enabled: bool,
    master_volume: f32,
    noise_rng: Pcg32,
}

impl AudioFeedback {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            enabled: settings.audio_enabled,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            noise_rng: Pcg32::seed_from_u64(js_sys::Date::now() as u64),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Live context with a non-zero volume, resumed if the browser suspended it
    fn active_context(&self) -> Option<(AudioContext, f32)> {
        if !self.enabled || self.master_volume <= 0.0 {
            return None;
        }
        let ctx = self.ctx.clone()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some((ctx, self.master_volume))
    }

    /// Create an oscillator routed through its own gain node
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

    /// Segment crossing - short mechanical click
    pub fn play_tick(&mut self) {
        let Some((ctx, vol)) = self.active_context() else {
            return;
        };
        let t = ctx.current_time();

        // Bright metallic attack
        if let Some((osc, gain)) = self.create_osc(&ctx, 1200.0, OscillatorType::Square) {
            osc.frequency().set_value_at_time(1200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(400.0, t + 0.02)
                .ok();
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.02)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.02).ok();
        }

        // Body
        if let Some((osc, gain)) = self.create_osc(&ctx, 150.0, OscillatorType::Triangle) {
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(50.0, t + 0.03)
                .ok();
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.03)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.03).ok();
        }

        self.play_noise_burst(&ctx, vol, t);
    }

    /// Decaying white noise for click texture
    fn play_noise_burst(&mut self, ctx: &AudioContext, vol: f32, t: f64) {
        let sample_rate = ctx.sample_rate();
        let len = (sample_rate * NOISE_SECONDS) as u32;
        if len == 0 {
            return;
        }

        let mut samples: Vec<f32> = (0..len)
            .map(|i| {
                let decay = (-(i as f32) / (len as f32 * 0.3)).exp();
                self.noise_rng.random_range(-1.0..1.0) * decay
            })
            .collect();

        let Ok(buffer) = ctx.create_buffer(1, len, sample_rate) else {
            return;
        };
        if buffer.copy_to_channel(&mut samples, 0).is_err() {
            return;
        }
        let Ok(source) = ctx.create_buffer_source() else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else {
            return;
        };

        source.set_buffer(Some(&buffer));
        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + NOISE_SECONDS as f64)
            .ok();
        if source.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(&ctx.destination()).is_err()
        {
            return;
        }
        source.start_with_when(t).ok();
    }

    /// Winner - arpeggio then a rising sparkle
    pub fn play_win(&self) {
        let Some((ctx, vol)) = self.active_context() else {
            return;
        };
        let now = ctx.current_time();

        for (freq, offset) in WIN_MELODY {
            let t = now + offset;

            // Square lead plus a soft triangle an octave up
            for (osc_type, note, level) in [
                (OscillatorType::Square, freq, 0.15),
                (OscillatorType::Triangle, freq * 2.0, 0.05),
            ] {
                if let Some((osc, gain)) = self.create_osc(&ctx, note, osc_type) {
                    osc.frequency().set_value_at_time(note, t).ok();
                    gain.gain().set_value_at_time(vol * level, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }

        // Sparkle sweep C6 -> C7
        if let Some((osc, gain)) = self.create_osc(&ctx, 1046.5, OscillatorType::Sine) {
            let t = now + 0.6;
            osc.frequency().set_value_at_time(1046.5, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(2093.0, t + 0.25)
                .ok();
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.25).ok();
        }
    }
}

impl FeedbackSink for AudioFeedback {
    fn notify(&mut self, event: &SpinEvent) {
        match event {
            SpinEvent::SegmentCrossed { .. } => self.play_tick(),
            SpinEvent::Completed { .. } => self.play_win(),
        }
    }
}
