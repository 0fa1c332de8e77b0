//! Dynamics-family algorithms built on an envelope follower.

use xgfx_core::EnvelopeFollower;
use xgfx_core::math::{db_to_linear, mono_sum, ms_to_samples};

use crate::FxProcessor;

/// Downward compressor. p1 threshold (-60 to 0 dB), p2 ratio (1:1 to
/// 20:1), p3 attack (1 to 100 ms), p4 release (10 to 300 ms).
pub struct Compressor {
    follower: EnvelopeFollower,
}

impl Compressor {
    /// Create at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            follower: EnvelopeFollower::new(sample_rate, 10.0, 100.0),
        }
    }
}

impl FxProcessor for Compressor {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [threshold, ratio, attack, release] = params;
        self.follower.set_attack_ms(1.0 + attack * 99.0);
        self.follower.set_release_ms(10.0 + release * 290.0);

        let threshold_lin = db_to_linear(-60.0 + threshold * 60.0);
        let ratio = 1.0 + ratio * 19.0;

        let envelope = self.follower.process(mono_sum(left, right));
        let gain = if envelope > threshold_lin {
            libm::powf(threshold_lin / envelope, 1.0 - 1.0 / ratio)
        } else {
            1.0
        };
        (left * gain, right * gain)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.follower.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.follower.reset();
    }
}

/// Noise gate with hold. p1 threshold (-80 to -10 dB), p2 closed
/// attenuation (0 to 60 dB), p3 attack (1 to 10 ms), p4 hold
/// (0 to 1000 ms).
pub struct Gate {
    sample_rate: f32,
    follower: EnvelopeFollower,
    gain: f32,
    hold_remaining: u32,
}

impl Gate {
    /// Create at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            follower: EnvelopeFollower::new(sample_rate, 1.0, 20.0),
            gain: 1.0,
            hold_remaining: 0,
        }
    }
}

impl FxProcessor for Gate {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [threshold, reduction, attack, hold] = params;
        let threshold_lin = db_to_linear(-80.0 + threshold * 70.0);
        let floor = db_to_linear(-reduction * 60.0);

        let envelope = self.follower.process(mono_sum(left, right));
        if envelope > threshold_lin {
            self.hold_remaining =
                ms_to_samples(hold * 1000.0, self.sample_rate) as u32;
            let attack_samples = ms_to_samples(1.0 + attack * 9.0, self.sample_rate).max(1.0);
            self.gain = (self.gain + 1.0 / attack_samples).min(1.0);
        } else if self.hold_remaining > 0 {
            self.hold_remaining -= 1;
        } else {
            self.gain *= 0.99;
        }

        let effective = floor + (1.0 - floor) * self.gain;
        (left * effective, right * effective)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.follower.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.follower.reset();
        self.gain = 1.0;
        self.hold_remaining = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressor_attenuates_loud_signal() {
        let mut fx = Compressor::new(8000.0);
        // Threshold -30 dB, ratio 10:1, fast attack.
        let params = [0.5, 0.5, 0.0, 0.0];
        let mut last = 0.0;
        for _ in 0..8000 {
            (last, _) = fx.process(params, 0.9, 0.9);
        }
        assert!(last < 0.5, "no gain reduction applied: {last}");
    }

    #[test]
    fn compressor_passes_quiet_signal() {
        let mut fx = Compressor::new(8000.0);
        let params = [0.5, 1.0, 0.0, 0.0];
        let mut last = 0.0;
        for _ in 0..8000 {
            (last, _) = fx.process(params, 0.001, 0.001);
        }
        assert!((last - 0.001).abs() < 1e-4);
    }

    #[test]
    fn unity_ratio_never_reduces() {
        let mut fx = Compressor::new(8000.0);
        let params = [0.0, 0.0, 0.0, 0.0];
        for _ in 0..4000 {
            let (l, _) = fx.process(params, 0.8, 0.8);
            assert!((l - 0.8).abs() < 1e-4);
        }
    }

    #[test]
    fn gate_closes_on_silence_and_reopens() {
        let mut fx = Gate::new(8000.0);
        // Threshold -45 dB, full attenuation, fast attack, no hold.
        let params = [0.5, 1.0, 0.0, 0.0];
        for _ in 0..2000 {
            fx.process(params, 0.5, 0.5);
        }
        // Long silence closes the gate.
        let mut closed = 0.0;
        for _ in 0..16000 {
            (closed, _) = fx.process(params, 1e-5, 1e-5);
        }
        assert!(closed.abs() < 1e-6, "gate stayed open: {closed}");

        // Signal reopens it within the attack window.
        let mut open = 0.0;
        for _ in 0..2000 {
            (open, _) = fx.process(params, 0.5, 0.5);
        }
        assert!(open > 0.4, "gate failed to reopen: {open}");
    }

    #[test]
    fn gate_hold_keeps_it_open_briefly() {
        let mut fx = Gate::new(1000.0);
        // Hold 500 ms.
        let params = [0.5, 1.0, 0.0, 0.5];
        for _ in 0..500 {
            fx.process(params, 0.5, 0.5);
        }
        // 100 ms of silence is well inside the hold window.
        let mut out = 0.0;
        for _ in 0..100 {
            (out, _) = fx.process(params, 1e-5, 1e-5);
        }
        assert!(out.abs() < 1e-4, "silence should output near zero");
        // The gain itself must still be open.
        assert!(fx.gain > 0.9);
    }
}
