//! Dual-voice modulated-delay chorus.

use xgfx_core::math::ms_to_samples;
use xgfx_core::{DelayLine, Lfo};
use xgfx_params::ChorusParams;

/// Delay buffer length in milliseconds. Covers the 12.7 ms base delay
/// plus the widest modulation sweep.
const BUFFER_MS: f32 = 20.0;

/// Per-voice modulation sweep width in milliseconds; the right voice
/// runs shallower and at half rate for stereo spread.
const VOICE_DEPTH_MS: [f32; 2] = [0.5, 0.3];
const VOICE_RATE_SCALE: [f32; 2] = [1.0, 0.5];

/// The shared system chorus block.
///
/// One independently modulated delay line per side. Feedback mixes
/// each voice's own delayed signal with the opposite voice's previous
/// feedback sample (`cross_feedback`), which widens the image.
pub struct ChorusUnit {
    sample_rate: f32,
    delays: [DelayLine; 2],
    lfos: [Lfo; 2],
    feedback: [f32; 2],
}

impl ChorusUnit {
    /// Create a chorus for the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            delays: core::array::from_fn(|_| DelayLine::from_ms(sample_rate, BUFFER_MS)),
            lfos: core::array::from_fn(|i| Lfo::new(sample_rate, VOICE_RATE_SCALE[i])),
            feedback: [0.0; 2],
        }
    }

    /// Process one stereo frame.
    pub fn process(&mut self, params: &ChorusParams, left: f32, right: f32) -> (f32, f32) {
        let base = ms_to_samples(params.delay, self.sample_rate) + 1.0;
        let prev_feedback = self.feedback;
        let mut out = [0.0f32; 2];

        for (i, input) in [left, right].into_iter().enumerate() {
            self.lfos[i].set_frequency(params.rate * VOICE_RATE_SCALE[i]);
            let sweep = ms_to_samples(VOICE_DEPTH_MS[i] * params.depth, self.sample_rate);
            let delayed = self.delays[i].read(base + sweep * self.lfos[i].tick_unipolar());

            let fb = delayed * params.feedback + prev_feedback[1 - i] * params.cross_feedback;
            self.delays[i].write(input + fb);
            self.feedback[i] = fb;

            out[i] = input * (1.0 - params.output) + delayed * params.output * params.level;
        }
        (out[0], out[1])
    }

    /// Update the sample rate. Buffered audio is discarded.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    /// Clear delay lines, LFO phases, and feedback memory.
    pub fn reset(&mut self) {
        for delay in &mut self.delays {
            delay.clear();
        }
        for lfo in &mut self.lfos {
            lfo.reset();
        }
        self.feedback = [0.0; 2];
    }
}
