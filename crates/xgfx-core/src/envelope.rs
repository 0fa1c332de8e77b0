/// A rectifying envelope follower with separate attack and release.
///
/// Used by the dynamics processors to track signal level. Time
/// constants are one-pole smoothers, so the envelope reaches ~63%
/// of a step within the configured time.
pub struct EnvelopeFollower {
    sample_rate: f32,
    attack_ms: f32,
    release_ms: f32,
    attack_coeff: f32,
    release_coeff: f32,
    envelope: f32,
}

impl EnvelopeFollower {
    /// Create a follower with the given time constants in milliseconds.
    pub fn new(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut f = Self {
            sample_rate,
            attack_ms,
            release_ms,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            envelope: 0.0,
        };
        f.update_coefficients();
        f
    }

    fn coeff(ms: f32, sample_rate: f32) -> f32 {
        let samples = (ms * sample_rate / 1000.0).max(1.0);
        libm::expf(-1.0 / samples)
    }

    fn update_coefficients(&mut self) {
        self.attack_coeff = Self::coeff(self.attack_ms, self.sample_rate);
        self.release_coeff = Self::coeff(self.release_ms, self.sample_rate);
    }

    /// Set the attack time in milliseconds.
    pub fn set_attack_ms(&mut self, ms: f32) {
        self.attack_ms = ms.max(0.01);
        self.update_coefficients();
    }

    /// Set the release time in milliseconds.
    pub fn set_release_ms(&mut self, ms: f32) {
        self.release_ms = ms.max(0.01);
        self.update_coefficients();
    }

    /// Update the sample rate, preserving the time constants.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficients();
    }

    /// Track one sample and return the current envelope level.
    pub fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        let coeff = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = crate::math::flush_denormal(level + coeff * (self.envelope - level));
        self.envelope
    }

    /// Current envelope level without advancing.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to silence.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_rises_on_attack() {
        let mut f = EnvelopeFollower::new(48000.0, 1.0, 100.0);
        let mut last = 0.0;
        for _ in 0..200 {
            last = f.process(1.0);
        }
        assert!(last > 0.9);
    }

    #[test]
    fn release_is_slower_than_attack() {
        let mut f = EnvelopeFollower::new(48000.0, 1.0, 200.0);
        for _ in 0..500 {
            f.process(1.0);
        }
        for _ in 0..100 {
            f.process(0.0);
        }
        // 100 samples is ~2 ms, far shorter than the 200 ms release.
        assert!(f.level() > 0.5);
    }

    #[test]
    fn rectifies_negative_input() {
        let mut f = EnvelopeFollower::new(48000.0, 0.1, 0.1);
        for _ in 0..100 {
            f.process(-0.8);
        }
        assert!(f.level() > 0.7);
    }
}
