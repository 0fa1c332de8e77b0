use crate::delay::DelayLine;
use crate::math::flush_denormal;

/// A Schroeder allpass filter used to diffuse reverb tails.
///
/// Passes all frequencies at equal magnitude while smearing phase,
/// which thickens echo density without coloring the tone.
pub struct AllpassFilter {
    delay: DelayLine,
    delay_samples: f32,
    gain: f32,
}

impl AllpassFilter {
    /// Create an allpass with room for `capacity` samples of delay.
    pub fn new(capacity: usize) -> Self {
        Self {
            delay: DelayLine::new(capacity),
            delay_samples: capacity as f32 - 1.0,
            gain: 0.5,
        }
    }

    /// Set the loop delay in samples, clamped to capacity.
    pub fn set_delay_samples(&mut self, samples: f32) {
        self.delay_samples = samples.clamp(1.0, (self.delay.capacity() - 1) as f32);
    }

    /// Set the diffusion gain, typically around 0.5 to 0.7.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    /// Process one sample.
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay.read(self.delay_samples);
        let output = -self.gain * input + delayed;
        self.delay
            .write(flush_denormal(input + output * self.gain));
        output
    }

    /// Clear the loop state.
    pub fn clear(&mut self) {
        self.delay.clear();
    }
}
