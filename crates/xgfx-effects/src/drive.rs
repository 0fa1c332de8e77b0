//! Drive-family algorithms: nonlinear waveshaping with a tone tilt.

use crate::FxProcessor;

/// One-pole lowpass used as the tone control; tone 0 is dark, 1 open.
#[derive(Default, Clone, Copy)]
struct ToneFilter {
    state: f32,
}

impl ToneFilter {
    fn process(&mut self, input: f32, tone: f32) -> f32 {
        self.state += (input - self.state) * (0.1 + 0.9 * tone);
        self.state = xgfx_core::math::flush_denormal(self.state);
        self.state
    }
}

fn shape(x: f32, gain: f32, curve: u32) -> f32 {
    match curve {
        // Arctangent soft clip.
        0 => libm::atanf(x * gain) / core::f32::consts::FRAC_PI_2,
        // Hard clip.
        1 => (x * gain).clamp(-1.0, 1.0),
        // Asymmetric exponential: positive lobe saturates faster.
        2 => {
            if x >= 0.0 {
                1.0 - libm::expf(-x * gain)
            } else {
                -(1.0 - libm::expf(x * gain * 0.7))
            }
        }
        // Hyperbolic tangent.
        _ => libm::tanhf(x * gain),
    }
}

/// Waveshaping distortion. p1 drive, p2 tone, p3 output level,
/// p4 curve selector (arctangent, hard, asymmetric, tanh).
pub struct Distortion {
    tone: [ToneFilter; 2],
}

impl Distortion {
    /// Create a distortion; no sample-rate-dependent state.
    pub fn new(_sample_rate: f32) -> Self {
        Self {
            tone: [ToneFilter::default(); 2],
        }
    }
}

impl FxProcessor for Distortion {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [drive, tone, level, curve] = params;
        let gain = 1.0 + drive * 5.0;
        let curve = (curve.clamp(0.0, 1.0) * 3.0) as u32;
        (
            self.tone[0].process(shape(left, gain, curve), tone) * level,
            self.tone[1].process(shape(right, gain, curve), tone) * level,
        )
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {
        self.tone = [ToneFilter::default(); 2];
    }
}

/// Soft-knee overdrive: biased tanh saturation with the same tone
/// tilt. p1 drive, p2 tone, p3 output level.
pub struct Overdrive {
    tone: [ToneFilter; 2],
}

/// Small DC bias pushed into the curve for asymmetric harmonics; the
/// resulting offset is subtracted back out.
const BIAS: f32 = 0.02;

impl Overdrive {
    /// Create an overdrive; no sample-rate-dependent state.
    pub fn new(_sample_rate: f32) -> Self {
        Self {
            tone: [ToneFilter::default(); 2],
        }
    }

    fn drive(x: f32, gain: f32) -> f32 {
        libm::tanhf((x + BIAS) * gain) - libm::tanhf(BIAS * gain)
    }
}

impl FxProcessor for Overdrive {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [drive, tone, level, _] = params;
        let gain = 1.0 + drive * 9.0;
        (
            self.tone[0].process(Self::drive(left, gain), tone) * level,
            self.tone[1].process(Self::drive(right, gain), tone) * level,
        )
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {
        self.tone = [ToneFilter::default(); 2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_curves_stay_bounded() {
        for curve in [0.0, 0.34, 0.67, 1.0] {
            let mut fx = Distortion::new(48000.0);
            for n in 0..1000 {
                let x = libm::sinf(n as f32 * 0.1) * 2.0;
                let (l, r) = fx.process([1.0, 1.0, 1.0, curve], x, x);
                assert!(l.abs() <= 1.5 && r.abs() <= 1.5, "curve {curve}: {l}");
            }
        }
    }

    #[test]
    fn hard_clip_flattens_peaks() {
        let mut fx = Distortion::new(48000.0);
        // Tone fully open so the filter settles fast.
        let mut last = 0.0;
        for _ in 0..100 {
            (last, _) = fx.process([1.0, 1.0, 1.0, 0.4], 2.0, 2.0);
        }
        assert!((last - 1.0).abs() < 0.01);
    }

    #[test]
    fn zero_level_is_silent() {
        let mut fx = Overdrive::new(48000.0);
        let (l, r) = fx.process([0.8, 0.5, 0.0, 0.0], 0.9, -0.9);
        assert_eq!((l, r), (0.0, 0.0));
    }

    #[test]
    fn overdrive_quiet_signals_pass_nearly_linear() {
        let mut fx = Overdrive::new(48000.0);
        let mut last = 0.0;
        for _ in 0..200 {
            (last, _) = fx.process([0.0, 1.0, 1.0, 0.0], 0.01, 0.01);
        }
        assert!((last - 0.01).abs() < 0.005, "got {last}");
    }
}
