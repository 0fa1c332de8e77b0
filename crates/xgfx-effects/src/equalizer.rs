//! Master three-band equalizer: low shelf, mid peaking, high shelf.

use xgfx_core::{
    Biquad, high_shelf_coefficients, low_shelf_coefficients, peaking_eq_coefficients,
};
use xgfx_params::EqualizerParams;

/// Low shelf corner frequency in Hz.
const LOW_SHELF_HZ: f32 = 200.0;
/// High shelf corner frequency in Hz.
const HIGH_SHELF_HZ: f32 = 4000.0;
const SHELF_Q: f32 = 0.707;

/// Stereo three-band EQ applied to the system-bus output.
///
/// Coefficients are recomputed only when the parameter block changes,
/// so the per-sample cost is three biquads per side.
pub struct EqualizerUnit {
    sample_rate: f32,
    cached: EqualizerParams,
    low: [Biquad; 2],
    mid: [Biquad; 2],
    high: [Biquad; 2],
}

impl EqualizerUnit {
    /// Create an EQ for the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let mut eq = Self {
            sample_rate,
            cached: EqualizerParams::default(),
            low: [Biquad::new(), Biquad::new()],
            mid: [Biquad::new(), Biquad::new()],
            high: [Biquad::new(), Biquad::new()],
        };
        eq.update_coefficients();
        eq
    }

    fn update_coefficients(&mut self) {
        let p = &self.cached;
        let low = low_shelf_coefficients(self.sample_rate, LOW_SHELF_HZ, SHELF_Q, p.low_gain);
        let mid = peaking_eq_coefficients(
            self.sample_rate,
            p.mid_freq.clamp(20.0, self.sample_rate * 0.45),
            p.q_factor.max(0.1),
            p.mid_gain,
        );
        // The shelf corner must stay below Nyquist or the pole lands
        // on the unit circle and rings forever.
        let high = high_shelf_coefficients(
            self.sample_rate,
            HIGH_SHELF_HZ.min(self.sample_rate * 0.45),
            SHELF_Q,
            p.high_gain,
        );
        for side in 0..2 {
            self.low[side].set_coefficients(low);
            self.mid[side].set_coefficients(mid);
            self.high[side].set_coefficients(high);
        }
    }

    /// Process one stereo frame.
    pub fn process(&mut self, params: &EqualizerParams, left: f32, right: f32) -> (f32, f32) {
        if *params != self.cached {
            self.cached = params.clone();
            self.update_coefficients();
        }
        let l = self.high[0].process(self.mid[0].process(self.low[0].process(left)));
        let r = self.high[1].process(self.mid[1].process(self.low[1].process(right)));
        (l, r)
    }

    /// Update the sample rate and recompute coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
        self.reset();
    }

    /// Clear all filter memory.
    pub fn reset(&mut self) {
        for side in 0..2 {
            self.low[side].clear();
            self.mid[side].clear();
            self.high[side].clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steady_peak(eq: &mut EqualizerUnit, params: &EqualizerParams, freq: f32, sr: f32) -> f32 {
        let mut peak = 0.0f32;
        let samples = (sr / freq * 40.0) as usize;
        for n in 0..samples {
            let x = libm::sinf(core::f32::consts::TAU * freq * n as f32 / sr);
            let (l, _) = eq.process(params, x, x);
            if n > samples / 2 {
                peak = peak.max(l.abs());
            }
        }
        peak
    }

    #[test]
    fn flat_settings_pass_signal_unchanged() {
        let mut eq = EqualizerUnit::new(48000.0);
        let params = EqualizerParams::default();
        let peak = steady_peak(&mut eq, &params, 1000.0, 48000.0);
        assert!((peak - 1.0).abs() < 0.05, "flat gain {peak}");
    }

    #[test]
    fn mid_boost_raises_the_center_band() {
        let mut eq = EqualizerUnit::new(48000.0);
        let params = EqualizerParams {
            mid_gain: 12.0,
            mid_freq: 1000.0,
            q_factor: 1.0,
            ..EqualizerParams::default()
        };
        let peak = steady_peak(&mut eq, &params, 1000.0, 48000.0);
        assert!(peak > 3.0, "mid not boosted: {peak}");
    }

    #[test]
    fn transient_decays_at_low_sample_rates() {
        // At 8 kHz the 4 kHz shelf corner sits on Nyquist; the clamped
        // corner must leave every band stable.
        let mut eq = EqualizerUnit::new(8000.0);
        let params = EqualizerParams::default();
        eq.process(&params, 1.0, 1.0);
        let mut tail = 0.0f32;
        for i in 0..4000 {
            let (l, r) = eq.process(&params, 0.0, 0.0);
            if i > 3000 {
                tail = tail.max(l.abs()).max(r.abs());
            }
        }
        assert!(tail < 1e-6, "eq transient did not decay: {tail}");
    }

    #[test]
    fn low_cut_attenuates_bass_only() {
        let mut eq = EqualizerUnit::new(48000.0);
        let params = EqualizerParams {
            low_gain: -12.0,
            ..EqualizerParams::default()
        };
        let bass = steady_peak(&mut eq, &params, 50.0, 48000.0);
        eq.reset();
        let treble = steady_peak(&mut eq, &params, 8000.0, 48000.0);
        assert!(bass < 0.4, "bass not cut: {bass}");
        // The shelf transition still droops slightly at 8 kHz.
        assert!((treble - 1.0).abs() < 0.15, "treble changed: {treble}");
    }
}
