use crate::delay::DelayLine;
use crate::math::flush_denormal;

/// A feedback comb filter with a one-pole lowpass in the loop.
///
/// The damping control rolls off high frequencies in the feedback
/// path, shaping how quickly the tail darkens.
pub struct CombFilter {
    delay: DelayLine,
    delay_samples: f32,
    feedback: f32,
    damping: f32,
    filter_store: f32,
}

impl CombFilter {
    /// Create a comb filter with room for `capacity` samples of delay.
    pub fn new(capacity: usize) -> Self {
        Self {
            delay: DelayLine::new(capacity),
            delay_samples: capacity as f32 - 1.0,
            feedback: 0.5,
            damping: 0.0,
            filter_store: 0.0,
        }
    }

    /// Set the loop delay in samples, clamped to capacity.
    pub fn set_delay_samples(&mut self, samples: f32) {
        self.delay_samples = samples.clamp(1.0, (self.delay.capacity() - 1) as f32);
    }

    /// Set the feedback gain. Values at or above 1.0 will not decay.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    /// Set damping in `[0, 1]`; 0 leaves the loop bright.
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
    }

    /// Process one sample.
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read(self.delay_samples);
        self.filter_store =
            flush_denormal(delayed * (1.0 - self.damping) + self.filter_store * self.damping);
        self.delay
            .write(flush_denormal(input + self.filter_store * self.feedback));
        delayed
    }

    /// Clear the loop state.
    pub fn clear(&mut self) {
        self.delay.clear();
        self.filter_store = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_recirculates_at_feedback_gain() {
        let mut comb = CombFilter::new(5);
        comb.set_delay_samples(4.0);
        comb.set_feedback(0.5);
        comb.set_damping(0.0);

        let mut outputs = Vec::new();
        outputs.push(comb.process(1.0));
        for _ in 0..10 {
            outputs.push(comb.process(0.0));
        }
        // The impulse first appears after the loop delay, then at
        // half amplitude one loop later.
        assert_eq!(outputs[0], 0.0);
        let first = outputs.iter().position(|&x| x != 0.0).unwrap();
        let second = outputs[first + 1..]
            .iter()
            .position(|&x| x != 0.0)
            .unwrap()
            + first
            + 1;
        assert!((outputs[second] - outputs[first] * 0.5).abs() < 1e-6);
    }

    #[test]
    fn full_damping_kills_feedback_brightness() {
        let mut comb = CombFilter::new(8);
        comb.set_feedback(0.9);
        comb.set_damping(1.0);
        comb.process(1.0);
        // With damping 1 the filter store never picks up the signal.
        for _ in 0..32 {
            comb.process(0.0);
        }
        assert_eq!(comb.filter_store, 0.0);
    }

    #[test]
    fn clear_resets_state() {
        let mut comb = CombFilter::new(4);
        comb.process(1.0);
        comb.clear();
        for _ in 0..8 {
            assert_eq!(comb.process(0.0), 0.0);
        }
    }
}
