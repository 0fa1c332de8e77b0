//! Direct Form I biquad filter with RBJ cookbook coefficient helpers.

/// Normalized biquad coefficients (a0 already divided out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficients.
    pub b0: f32,
    /// Feedforward, one sample back.
    pub b1: f32,
    /// Feedforward, two samples back.
    pub b2: f32,
    /// Feedback, one sample back.
    pub a1: f32,
    /// Feedback, two samples back.
    pub a2: f32,
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        // Identity filter.
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }
}

/// A second-order IIR filter in Direct Form I.
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coeffs: BiquadCoefficients,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Create an identity filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the coefficients, keeping the filter state.
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    /// Process one sample.
    pub fn process(&mut self, input: f32) -> f32 {
        let c = self.coeffs;
        let output =
            c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = crate::math::flush_denormal(output);
        output
    }

    /// Zero the filter memory.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

fn normalize(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> BiquadCoefficients {
    BiquadCoefficients {
        b0: b0 / a0,
        b1: b1 / a0,
        b2: b2 / a0,
        a1: a1 / a0,
        a2: a2 / a0,
    }
}

/// Peaking EQ coefficients (RBJ cookbook).
pub fn peaking_eq_coefficients(
    sample_rate: f32,
    frequency: f32,
    q: f32,
    gain_db: f32,
) -> BiquadCoefficients {
    let a = libm::powf(10.0, gain_db / 40.0);
    let w0 = core::f32::consts::TAU * frequency / sample_rate;
    let cos_w0 = libm::cosf(w0);
    let alpha = libm::sinf(w0) / (2.0 * q);

    normalize(
        1.0 + alpha * a,
        -2.0 * cos_w0,
        1.0 - alpha * a,
        1.0 + alpha / a,
        -2.0 * cos_w0,
        1.0 - alpha / a,
    )
}

/// Low-shelf coefficients (RBJ cookbook).
pub fn low_shelf_coefficients(
    sample_rate: f32,
    frequency: f32,
    q: f32,
    gain_db: f32,
) -> BiquadCoefficients {
    let a = libm::powf(10.0, gain_db / 40.0);
    let w0 = core::f32::consts::TAU * frequency / sample_rate;
    let cos_w0 = libm::cosf(w0);
    let alpha = libm::sinf(w0) / (2.0 * q);
    let two_sqrt_a_alpha = 2.0 * libm::sqrtf(a) * alpha;

    normalize(
        a * ((a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
        2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
        a * ((a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
        (a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
        -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
        (a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
    )
}

/// High-shelf coefficients (RBJ cookbook).
pub fn high_shelf_coefficients(
    sample_rate: f32,
    frequency: f32,
    q: f32,
    gain_db: f32,
) -> BiquadCoefficients {
    let a = libm::powf(10.0, gain_db / 40.0);
    let w0 = core::f32::consts::TAU * frequency / sample_rate;
    let cos_w0 = libm::cosf(w0);
    let alpha = libm::sinf(w0) / (2.0 * q);
    let two_sqrt_a_alpha = 2.0 * libm::sqrtf(a) * alpha;

    normalize(
        a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
        -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
        a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
        (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
        2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
        (a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_at(coeffs: BiquadCoefficients, freq: f32, sample_rate: f32) -> f32 {
        // Drive a sine through the filter and measure steady-state peak.
        let mut filter = Biquad::new();
        filter.set_coefficients(coeffs);
        let mut peak = 0.0f32;
        let samples = (sample_rate / freq * 50.0) as usize;
        for n in 0..samples {
            let x = libm::sinf(core::f32::consts::TAU * freq * n as f32 / sample_rate);
            let y = filter.process(x);
            if n > samples / 2 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn identity_passes_signal() {
        let mut filter = Biquad::new();
        for x in [0.5, -0.2, 1.0, 0.0] {
            assert_eq!(filter.process(x), x);
        }
    }

    #[test]
    fn peaking_boost_raises_center_frequency() {
        let coeffs = peaking_eq_coefficients(48000.0, 1000.0, 1.0, 12.0);
        let gain = response_at(coeffs, 1000.0, 48000.0);
        assert!(gain > 3.0, "expected ~12 dB boost, got {gain}");
    }

    #[test]
    fn peaking_zero_gain_is_flat() {
        let coeffs = peaking_eq_coefficients(48000.0, 1000.0, 1.0, 0.0);
        let gain = response_at(coeffs, 1000.0, 48000.0);
        assert!((gain - 1.0).abs() < 0.05);
    }

    #[test]
    fn low_shelf_cut_attenuates_bass() {
        let coeffs = low_shelf_coefficients(48000.0, 200.0, 0.707, -12.0);
        let low = response_at(coeffs, 50.0, 48000.0);
        let high = response_at(coeffs, 5000.0, 48000.0);
        assert!(low < 0.4, "bass not cut: {low}");
        assert!((high - 1.0).abs() < 0.1, "treble altered: {high}");
    }

    #[test]
    fn high_shelf_boost_raises_treble() {
        let coeffs = high_shelf_coefficients(48000.0, 4000.0, 0.707, 12.0);
        let high = response_at(coeffs, 12000.0, 48000.0);
        let low = response_at(coeffs, 100.0, 48000.0);
        assert!(high > 3.0, "treble not boosted: {high}");
        assert!((low - 1.0).abs() < 0.1, "bass altered: {low}");
    }

    #[test]
    fn clear_zeroes_memory() {
        let mut filter = Biquad::new();
        filter.set_coefficients(peaking_eq_coefficients(48000.0, 500.0, 2.0, 6.0));
        for _ in 0..16 {
            filter.process(1.0);
        }
        filter.clear();
        assert_eq!(filter.process(0.0), 0.0);
    }
}
