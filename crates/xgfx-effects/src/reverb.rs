//! Schroeder reverb: predelay, parallel combs, allpass diffusion.

use xgfx_core::math::{mono_sum, ms_to_samples};
use xgfx_core::{AllpassFilter, CombFilter, DelayLine};
use xgfx_params::ReverbParams;

/// Longest decay time a parameter can request, in seconds.
const MAX_TIME_SECS: f32 = 8.3;
/// Predelay buffer length in milliseconds.
const MAX_PREDELAY_MS: f32 = 50.0;
const NUM_COMBS: usize = 8;
const NUM_ALLPASSES: usize = 4;

/// The shared system reverb block.
///
/// A mono-summed input passes through a predelay line into a bank of
/// parallel comb filters whose count scales with `density` and whose
/// delays scale with `time` and filter index, followed by a fixed
/// cascade of four allpass diffusers. Buffers are sized for the full
/// parameter range at construction and persist across calls.
pub struct ReverbUnit {
    sample_rate: f32,
    predelay: DelayLine,
    combs: [CombFilter; NUM_COMBS],
    allpasses: [AllpassFilter; NUM_ALLPASSES],
}

impl ReverbUnit {
    /// Create a reverb for the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let comb_capacity =
            |i: usize| (MAX_TIME_SECS * sample_rate * (i + 1) as f32 / 8.0).ceil() as usize + 1;
        let allpass_capacity =
            |i: usize| (MAX_TIME_SECS * sample_rate * (i + 1) as f32 / 16.0).ceil() as usize + 1;
        let mut allpasses =
            core::array::from_fn::<_, NUM_ALLPASSES, _>(|i| AllpassFilter::new(allpass_capacity(i)));
        for ap in &mut allpasses {
            ap.set_gain(0.7);
        }
        Self {
            sample_rate,
            predelay: DelayLine::from_ms(sample_rate, MAX_PREDELAY_MS),
            combs: core::array::from_fn(|i| CombFilter::new(comb_capacity(i))),
            allpasses,
        }
    }

    /// Number of active comb filters for a density setting.
    fn comb_count(density: f32) -> usize {
        (4 + (density.clamp(0.0, 1.0) * 4.0) as usize).min(NUM_COMBS)
    }

    /// Process one stereo frame. The output is the diffused tail plus
    /// early reflection, equal on both sides, scaled by `level`.
    pub fn process(&mut self, params: &ReverbParams, left: f32, right: f32) -> (f32, f32) {
        let input = mono_sum(left, right);

        self.predelay.write(input);
        let pre = self
            .predelay
            .read(ms_to_samples(params.pre_delay, self.sample_rate));
        let early = pre * params.early_level;

        let time = params.time.clamp(0.1, MAX_TIME_SECS);
        let count = Self::comb_count(params.density);
        let mut comb_sum = 0.0;
        for (i, comb) in self.combs.iter_mut().take(count).enumerate() {
            comb.set_delay_samples(time * self.sample_rate * (i + 1) as f32 / 8.0);
            // Feedback grows per filter and is attenuated by damping;
            // capped below unity so the tail always decays.
            let feedback = ((0.7 + 0.05 * i as f32) * (1.0 - params.hf_damping)).min(0.98);
            comb.set_feedback(feedback);
            comb.set_damping(params.hf_damping * 0.5);
            comb_sum += comb.process(pre) * params.tail_level;
        }
        comb_sum /= count as f32;

        let mut diffused = comb_sum;
        for (i, allpass) in self.allpasses.iter_mut().enumerate() {
            allpass.set_delay_samples(time * self.sample_rate * (i + 1) as f32 / 16.0);
            diffused = allpass.process(diffused);
        }

        let out = (early + diffused) * params.level * 0.7;
        (out, out)
    }

    /// Update the sample rate. Buffered audio is discarded.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    /// Clear all delay and filter state.
    pub fn reset(&mut self) {
        self.predelay.clear();
        for comb in &mut self.combs {
            comb.clear();
        }
        for allpass in &mut self.allpasses {
            allpass.clear();
        }
    }
}
