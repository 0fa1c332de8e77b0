//! Modulation-family variation algorithms.

use xgfx_core::math::{mono_sum, ms_to_samples, wet_dry_mix};
use xgfx_core::{DelayLine, Lfo, Waveform};

use crate::FxProcessor;

/// LFO-driven amplitude modulation. p1 rate (0.1 to 10.1 Hz),
/// p2 depth, p3 waveform selector, p4 phase offset in turns.
pub struct Tremolo {
    lfo: Lfo,
}

impl Tremolo {
    /// Create at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            lfo: Lfo::new(sample_rate, 1.0),
        }
    }
}

impl FxProcessor for Tremolo {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [rate, depth, waveform, phase] = params;
        self.lfo.set_frequency(0.1 + rate * 10.0);
        self.lfo.set_waveform(Waveform::from_normalized(waveform));
        self.lfo.set_phase_offset(phase);
        let gain = 1.0 - depth + self.lfo.tick_unipolar() * depth;
        (left * gain, right * gain)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.lfo.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.lfo.reset();
    }
}

/// LFO-driven stereo panner. p1 rate (0.1 to 5.1 Hz), p2 depth,
/// p3 waveform selector.
pub struct AutoPan {
    lfo: Lfo,
}

impl AutoPan {
    /// Create at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            lfo: Lfo::new(sample_rate, 1.0),
        }
    }
}

impl FxProcessor for AutoPan {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [rate, depth, waveform, _] = params;
        self.lfo.set_frequency(0.1 + rate * 5.0);
        self.lfo.set_waveform(Waveform::from_normalized(waveform));
        // Pan rides around center; depth 0 leaves the image untouched.
        let pan = 0.5 + (self.lfo.tick_unipolar() - 0.5) * depth;
        (left * (1.0 - pan) * 2.0, right * pan * 2.0)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.lfo.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.lfo.reset();
    }
}

/// Swept short delay with feedback. p1 rate (0.1 to 5.1 Hz),
/// p2 sweep depth (0 to 5 ms), p3 feedback, p4 mix.
pub struct Flanger {
    sample_rate: f32,
    delay: DelayLine,
    lfo: Lfo,
}

impl Flanger {
    /// Create at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            delay: DelayLine::from_ms(sample_rate, 10.0),
            lfo: Lfo::new(sample_rate, 1.0),
        }
    }
}

impl FxProcessor for Flanger {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [rate, depth, feedback, mix] = params;
        self.lfo.set_frequency(0.1 + rate * 5.0);
        let sweep = ms_to_samples(depth * 5.0, self.sample_rate) * self.lfo.tick_unipolar();
        let delayed = self.delay.read(1.0 + sweep);
        self.delay.write(mono_sum(left, right) + delayed * feedback);
        (
            wet_dry_mix(left, delayed, mix),
            wet_dry_mix(right, delayed, mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        self.delay.clear();
        self.lfo.reset();
    }
}

#[derive(Clone, Copy, Default)]
struct AllpassStage {
    x1: f32,
    y1: f32,
}

impl AllpassStage {
    fn process(&mut self, input: f32, coeff: f32) -> f32 {
        let output = coeff * input + self.x1 - coeff * self.y1;
        self.x1 = input;
        self.y1 = xgfx_core::math::flush_denormal(output);
        output
    }
}

const MAX_PHASER_STAGES: usize = 12;

/// Cascade of first-order allpass stages swept between 100 Hz and
/// 2 kHz. p1 rate (0.1 to 10.1 Hz), p2 sweep depth, p3 feedback,
/// p4 stage count (2 to 12). Wet blend fixed at one half.
pub struct Phaser {
    sample_rate: f32,
    lfo: Lfo,
    stages: [AllpassStage; MAX_PHASER_STAGES],
    feedback_sample: f32,
}

impl Phaser {
    /// Create at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            lfo: Lfo::new(sample_rate, 1.0),
            stages: [AllpassStage::default(); MAX_PHASER_STAGES],
            feedback_sample: 0.0,
        }
    }
}

impl FxProcessor for Phaser {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [rate, depth, feedback, stages] = params;
        self.lfo.set_frequency(0.1 + rate * 10.0);
        let count = (2 + (stages * 10.0) as usize).min(MAX_PHASER_STAGES);

        let freq = 100.0 + self.lfo.tick_unipolar() * depth * 1900.0;
        let t = libm::tanf(core::f32::consts::PI * freq / self.sample_rate);
        let coeff = (t - 1.0) / (t + 1.0);

        let input = mono_sum(left, right);
        let mut signal = input + self.feedback_sample * feedback;
        for stage in self.stages.iter_mut().take(count) {
            signal = stage.process(signal, coeff);
        }
        self.feedback_sample = signal;

        (
            wet_dry_mix(left, signal, 0.5),
            wet_dry_mix(right, signal, 0.5),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        self.stages = [AllpassStage::default(); MAX_PHASER_STAGES];
        self.feedback_sample = 0.0;
        self.lfo.reset();
    }
}

/// Multiplies the input by a low-frequency carrier. p1 carrier
/// frequency (100 to 1000 Hz), p2 depth, p3 waveform selector, p4 mix.
pub struct RingModulator {
    lfo: Lfo,
}

impl RingModulator {
    /// Create at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            lfo: Lfo::new(sample_rate, 440.0),
        }
    }
}

impl FxProcessor for RingModulator {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [freq, depth, waveform, mix] = params;
        self.lfo.set_frequency(100.0 + freq * 900.0);
        self.lfo.set_waveform(Waveform::from_normalized(waveform));
        let carrier = self.lfo.tick();
        let ring = 1.0 - depth + depth * carrier;
        (
            wet_dry_mix(left, left * ring, mix),
            wet_dry_mix(right, right * ring, mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.lfo.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.lfo.reset();
    }
}

/// Pitch wobble via an LFO-swept fractional delay, fully wet.
/// p1 rate (0.1 to 10.1 Hz), p2 sweep depth (0 to 4 ms).
pub struct Vibrato {
    sample_rate: f32,
    delays: [DelayLine; 2],
    lfo: Lfo,
}

/// Center delay the sweep rides on, in milliseconds.
const VIBRATO_BASE_MS: f32 = 5.0;

impl Vibrato {
    /// Create at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            delays: core::array::from_fn(|_| DelayLine::from_ms(sample_rate, 25.0)),
            lfo: Lfo::new(sample_rate, 1.0),
        }
    }
}

impl FxProcessor for Vibrato {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [rate, depth, _, _] = params;
        self.lfo.set_frequency(0.1 + rate * 10.0);
        let sweep = ms_to_samples(depth * 4.0, self.sample_rate) * self.lfo.tick_unipolar();
        let delay = ms_to_samples(VIBRATO_BASE_MS, self.sample_rate) + sweep;

        let out_l = self.delays[0].read_write(delay, left);
        let out_r = self.delays[1].read_write(delay, right);
        (out_l, out_r)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        for delay in &mut self.delays {
            delay.clear();
        }
        self.lfo.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tremolo_zero_depth_is_identity() {
        let mut fx = Tremolo::new(48000.0);
        for _ in 0..100 {
            let (l, r) = fx.process([0.5, 0.0, 0.0, 0.0], 0.7, -0.3);
            assert_eq!((l, r), (0.7, -0.3));
        }
    }

    #[test]
    fn tremolo_gain_stays_within_depth_bounds() {
        let mut fx = Tremolo::new(1000.0);
        for _ in 0..5000 {
            let (l, _) = fx.process([0.3, 0.8, 0.0, 0.0], 1.0, 1.0);
            assert!((0.2 - 1e-5..=1.0 + 1e-5).contains(&l), "gain {l}");
        }
    }

    #[test]
    fn autopan_zero_depth_keeps_unity_gains() {
        let mut fx = AutoPan::new(48000.0);
        let (l, r) = fx.process([0.5, 0.0, 0.0, 0.0], 0.6, 0.6);
        assert!((l - 0.6).abs() < 1e-6);
        assert!((r - 0.6).abs() < 1e-6);
    }

    #[test]
    fn autopan_fully_left_silences_right() {
        let mut fx = AutoPan::new(1000.0);
        let mut min_r = f32::MAX;
        for _ in 0..2000 {
            let (_, r) = fx.process([0.5, 1.0, 0.0, 0.0], 1.0, 1.0);
            min_r = min_r.min(r.abs());
        }
        assert!(min_r < 0.05, "right never approached silence: {min_r}");
    }

    #[test]
    fn flanger_dry_mix_passes_input() {
        let mut fx = Flanger::new(48000.0);
        let (l, r) = fx.process([0.5, 0.5, 0.3, 0.0], 0.25, -0.25);
        assert_eq!((l, r), (0.25, -0.25));
    }

    #[test]
    fn phaser_output_is_bounded() {
        let mut fx = Phaser::new(8000.0);
        for n in 0..16000 {
            let x = libm::sinf(n as f32 * 0.05);
            let (l, r) = fx.process([0.5, 0.8, 0.4, 1.0], x, x);
            assert!(l.abs() < 10.0 && r.abs() < 10.0);
        }
    }

    #[test]
    fn ring_mod_full_depth_follows_carrier_sign() {
        let mut fx = RingModulator::new(8000.0);
        let mut saw_negative = false;
        for _ in 0..200 {
            let (l, _) = fx.process([0.0, 1.0, 0.0, 1.0], 1.0, 1.0);
            if l < -0.1 {
                saw_negative = true;
            }
        }
        assert!(saw_negative, "carrier never inverted the signal");
    }

    #[test]
    fn vibrato_is_delayed_but_unity_gain() {
        let mut fx = Vibrato::new(1000.0);
        // Depth 0 makes it a pure 5 ms delay.
        fx.process([0.0, 0.0, 0.0, 0.0], 1.0, 1.0);
        let mut hit = None;
        for n in 1..50 {
            let (l, _) = fx.process([0.0, 0.0, 0.0, 0.0], 0.0, 0.0);
            if l.abs() > 0.5 {
                hit = Some(n);
                break;
            }
        }
        assert!(hit.is_some(), "signal never emerged");
    }
}
