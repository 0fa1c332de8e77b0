use alloc::{vec, vec::Vec};

use crate::math::flush_denormal;

/// A circular delay line with linear-interpolated fractional reads.
///
/// The write position advances once per [`write`](Self::write);
/// reads are relative to the most recently written sample.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Create a delay line holding `capacity` samples.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "delay line capacity must be non-zero");
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    /// Create a delay line holding `max_ms` milliseconds at `sample_rate`.
    pub fn from_ms(sample_rate: f32, max_ms: f32) -> Self {
        let capacity = (max_ms * sample_rate / 1000.0).ceil() as usize;
        Self::new(capacity.max(1))
    }

    /// Maximum delay in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Read `delay_samples` behind the write head with linear
    /// interpolation. The delay is clamped to the buffer capacity.
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let max_delay = (len - 1) as f32;
        let delay = delay_samples.clamp(0.0, max_delay);
        let delay_int = delay as usize;
        let frac = delay - delay_int as f32;

        let idx0 = (self.write_pos + len - 1 - delay_int) % len;
        let idx1 = (idx0 + len - 1) % len;
        let s0 = self.buffer[idx0];
        let s1 = self.buffer[idx1];
        s0 + (s1 - s0) * frac
    }

    /// Push a sample and advance the write head.
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = flush_denormal(sample);
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Read at `delay_samples`, then write `sample`.
    pub fn read_write(&mut self, delay_samples: f32, sample: f32) -> f32 {
        let out = self.read(delay_samples);
        self.write(sample);
        out
    }

    /// Zero the buffer without reallocating.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_delay_reproduces_input() {
        let mut dl = DelayLine::new(16);
        for i in 0..8 {
            dl.write(i as f32);
        }
        // Delay 0 reads the most recent write.
        assert_eq!(dl.read(0.0), 7.0);
        assert_eq!(dl.read(3.0), 4.0);
    }

    #[test]
    fn fractional_delay_interpolates() {
        let mut dl = DelayLine::new(16);
        dl.write(0.0);
        dl.write(1.0);
        // Halfway between the last two samples.
        assert!((dl.read(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn delay_is_clamped_to_capacity() {
        let mut dl = DelayLine::new(4);
        for s in [1.0, 2.0, 3.0, 4.0] {
            dl.write(s);
        }
        // Requesting more delay than fits reads the oldest sample.
        assert_eq!(dl.read(100.0), dl.read(3.0));
    }

    #[test]
    fn clear_silences() {
        let mut dl = DelayLine::new(8);
        dl.write(1.0);
        dl.clear();
        assert_eq!(dl.read(0.0), 0.0);
    }

    #[test]
    fn from_ms_sizes_by_sample_rate() {
        let dl = DelayLine::from_ms(48000.0, 100.0);
        assert_eq!(dl.capacity(), 4800);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_panics() {
        let _ = DelayLine::new(0);
    }
}
