/// LFO waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    /// Sine wave.
    #[default]
    Sine,
    /// Triangle wave.
    Triangle,
    /// Square wave.
    Square,
    /// Rising sawtooth.
    Saw,
}

impl Waveform {
    /// Map a normalized selector in `[0, 1]` onto the four shapes,
    /// matching the parameter convention of the modulation effects.
    pub fn from_normalized(value: f32) -> Self {
        match (value.clamp(0.0, 1.0) * 3.0) as u32 {
            0 => Self::Sine,
            1 => Self::Triangle,
            2 => Self::Square,
            _ => Self::Saw,
        }
    }
}

/// A low-frequency oscillator with phase in `[0, 1)` turns.
pub struct Lfo {
    sample_rate: f32,
    frequency: f32,
    phase: f32,
    phase_offset: f32,
    phase_inc: f32,
    waveform: Waveform,
}

impl Lfo {
    /// Create an LFO at `frequency` Hz.
    pub fn new(sample_rate: f32, frequency: f32) -> Self {
        let mut lfo = Self {
            sample_rate,
            frequency,
            phase: 0.0,
            phase_offset: 0.0,
            phase_inc: 0.0,
            waveform: Waveform::Sine,
        };
        lfo.update_increment();
        lfo
    }

    fn update_increment(&mut self) {
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Set the oscillation frequency in Hz.
    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = hz.max(0.0);
        self.update_increment();
    }

    /// Set the waveform shape.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Set a constant phase offset in turns (1.0 is a full cycle).
    pub fn set_phase_offset(&mut self, turns: f32) {
        self.phase_offset = turns;
    }

    /// Update the sample rate, preserving frequency and phase.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    /// Rewind the phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Advance one sample and return the bipolar output in `[-1, 1]`.
    pub fn tick(&mut self) -> f32 {
        let p = (self.phase + self.phase_offset).rem_euclid(1.0);
        let out = match self.waveform {
            Waveform::Sine => libm::sinf(p * core::f32::consts::TAU),
            Waveform::Triangle => {
                if p < 0.5 {
                    4.0 * p - 1.0
                } else {
                    3.0 - 4.0 * p
                }
            }
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * p - 1.0,
        };
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    /// Advance one sample and return the unipolar output in `[0, 1]`.
    pub fn tick_unipolar(&mut self) -> f32 {
        (self.tick() + 1.0) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_starts_at_zero() {
        let mut lfo = Lfo::new(1000.0, 1.0);
        assert!(lfo.tick().abs() < 1e-6);
    }

    #[test]
    fn square_flips_mid_cycle() {
        // Power-of-two rate ratio keeps the phase sums exact in f32.
        let mut lfo = Lfo::new(128.0, 1.0);
        lfo.set_waveform(Waveform::Square);
        assert_eq!(lfo.tick(), 1.0);
        for _ in 0..63 {
            lfo.tick();
        }
        assert_eq!(lfo.tick(), -1.0);
    }

    #[test]
    fn unipolar_stays_in_range() {
        let mut lfo = Lfo::new(480.0, 7.3);
        lfo.set_waveform(Waveform::Triangle);
        for _ in 0..2000 {
            let v = lfo.tick_unipolar();
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn phase_offset_shifts_output() {
        let mut a = Lfo::new(1000.0, 1.0);
        let mut b = Lfo::new(1000.0, 1.0);
        b.set_phase_offset(0.25);
        // A quarter turn into a sine is its peak.
        assert!(a.tick().abs() < 1e-6);
        assert!((b.tick() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn waveform_selector_covers_all_shapes() {
        assert_eq!(Waveform::from_normalized(0.0), Waveform::Sine);
        assert_eq!(Waveform::from_normalized(0.34), Waveform::Triangle);
        assert_eq!(Waveform::from_normalized(0.67), Waveform::Square);
        assert_eq!(Waveform::from_normalized(1.0), Waveform::Saw);
    }
}
