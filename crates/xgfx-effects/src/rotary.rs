//! Rotary speaker simulation: a horn and a rotor with inertia.

use xgfx_core::DelayLine;
use xgfx_core::math::{mono_sum, ms_to_samples};

use crate::FxProcessor;

/// Doppler delay center in milliseconds.
const DOPPLER_BASE_MS: f32 = 1.0;

/// Rotary speaker. p1 horn speed (0.5 to 2 Hz), p2 horn inertia,
/// p3 rotor speed (0.2 to 1 Hz), p4 rotor inertia. Inertia slows how
/// fast each rotor reaches a new target speed.
pub struct RotarySpeaker {
    sample_rate: f32,
    doppler: DelayLine,
    horn_phase: f32,
    rotor_phase: f32,
    horn_speed: f32,
    rotor_speed: f32,
}

impl RotarySpeaker {
    /// Create at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            doppler: DelayLine::from_ms(sample_rate, 5.0),
            horn_phase: 0.0,
            rotor_phase: 0.0,
            horn_speed: 0.0,
            rotor_speed: 0.0,
        }
    }

    fn advance(phase: &mut f32, speed: f32, sample_rate: f32) -> f32 {
        *phase += core::f32::consts::TAU * speed / sample_rate;
        if *phase >= core::f32::consts::TAU {
            *phase -= core::f32::consts::TAU;
        }
        libm::sinf(*phase)
    }
}

impl FxProcessor for RotarySpeaker {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [horn, horn_inertia, rotor, rotor_inertia] = params;
        let horn_target = 0.5 + horn * 1.5;
        let rotor_target = 0.2 + rotor * 0.8;

        // Speeds glide toward their targets; more inertia, slower glide.
        let horn_accel = 0.001 + (1.0 - horn_inertia) * 0.01;
        let rotor_accel = 0.001 + (1.0 - rotor_inertia) * 0.01;
        self.horn_speed += (horn_target - self.horn_speed) * horn_accel;
        self.rotor_speed += (rotor_target - self.rotor_speed) * rotor_accel;

        let horn_sin = Self::advance(&mut self.horn_phase, self.horn_speed, self.sample_rate);
        let rotor_sin = Self::advance(&mut self.rotor_phase, self.rotor_speed, self.sample_rate);

        // Horn doppler as delay modulation, rotor as slow tremolo.
        let delay =
            ms_to_samples(DOPPLER_BASE_MS, self.sample_rate) * (1.0 + horn_sin * 0.5) + 1.0;
        let delayed = self.doppler.read_write(delay, mono_sum(left, right));
        let amplitude = 0.85 + 0.15 * rotor_sin;

        let pan = 0.5 + horn_sin * 0.4;
        (
            delayed * amplitude * (1.0 - pan) * 2.0,
            delayed * amplitude * pan * 2.0,
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        self.doppler.clear();
        self.horn_phase = 0.0;
        self.rotor_phase = 0.0;
        self.horn_speed = 0.0;
        self.rotor_speed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speeds_glide_toward_targets() {
        let mut fx = RotarySpeaker::new(8000.0);
        for _ in 0..8000 {
            fx.process([1.0, 0.0, 1.0, 0.0], 0.1, 0.1);
        }
        assert!((fx.horn_speed - 2.0).abs() < 0.05);
        assert!((fx.rotor_speed - 1.0).abs() < 0.05);
    }

    #[test]
    fn output_pans_back_and_forth() {
        let mut fx = RotarySpeaker::new(4000.0);
        let mut max_l = 0.0f32;
        let mut max_r = 0.0f32;
        for _ in 0..40_000 {
            let (l, r) = fx.process([1.0, 0.0, 0.5, 0.0], 0.5, 0.5);
            max_l = max_l.max(l);
            max_r = max_r.max(r);
        }
        assert!(max_l > 0.5 && max_r > 0.5, "l {max_l} r {max_r}");
    }

    #[test]
    fn output_is_finite_under_full_inertia() {
        let mut fx = RotarySpeaker::new(8000.0);
        for _ in 0..4000 {
            let (l, r) = fx.process([1.0, 1.0, 1.0, 1.0], 1.0, -1.0);
            assert!(l.is_finite() && r.is_finite());
        }
    }
}
