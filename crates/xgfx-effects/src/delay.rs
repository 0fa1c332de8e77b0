//! Delay-family variation algorithms.
//!
//! Parameter mapping is per algorithm; all four inputs arrive
//! normalized to `[0, 1]`.

use xgfx_core::math::{mono_sum, ms_to_samples, wet_dry_mix};
use xgfx_core::{DelayLine, Lfo};

use crate::FxProcessor;

fn clamp_delay(delay: &DelayLine, samples: f32) -> f32 {
    samples.clamp(1.0, (delay.capacity() - 1) as f32)
}

/// Plain mono delay. p1 time (0 to 1000 ms), p2 feedback, p3 mix.
pub struct MonoDelay {
    sample_rate: f32,
    buffer: DelayLine,
}

impl MonoDelay {
    /// Create with a one second buffer.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            buffer: DelayLine::from_ms(sample_rate, 1000.0),
        }
    }
}

impl FxProcessor for MonoDelay {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [time, feedback, mix, _] = params;
        let samples = clamp_delay(&self.buffer, ms_to_samples(time * 1000.0, self.sample_rate));
        let delayed = self.buffer.read(samples);
        self.buffer.write(mono_sum(left, right) + delayed * feedback);
        (
            wet_dry_mix(left, delayed, mix),
            wet_dry_mix(right, delayed, mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// Independent left/right delays. p1 left time and p2 right time
/// (0 to 500 ms each), p3 feedback, p4 mix.
pub struct DualDelay {
    sample_rate: f32,
    buffers: [DelayLine; 2],
}

impl DualDelay {
    /// Create with half-second buffers per side.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            buffers: core::array::from_fn(|_| DelayLine::from_ms(sample_rate, 500.0)),
        }
    }
}

impl FxProcessor for DualDelay {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [time_l, time_r, feedback, mix] = params;
        let mut out = [0.0f32; 2];
        for (i, (input, time)) in [(left, time_l), (right, time_r)].into_iter().enumerate() {
            let samples = clamp_delay(
                &self.buffers[i],
                ms_to_samples(time * 500.0, self.sample_rate),
            );
            let delayed = self.buffers[i].read(samples);
            self.buffers[i].write(input + delayed * feedback);
            out[i] = wet_dry_mix(input, delayed, mix);
        }
        (out[0], out[1])
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }
}

/// Multi-repeat echo. p1 time (0 to 1000 ms), p2 per-repeat decay,
/// p3 repeat count (1 to 10), p4 mix.
pub struct Echo {
    sample_rate: f32,
    buffer: DelayLine,
}

impl Echo {
    /// Create with a one second buffer.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            buffer: DelayLine::from_ms(sample_rate, 1000.0),
        }
    }
}

impl FxProcessor for Echo {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [time, decay, repeats, mix] = params;
        let count = 1 + (repeats * 9.0) as usize;
        let base = ms_to_samples(time * 1000.0, self.sample_rate).max(1.0);

        let mut sum = 0.0;
        let mut gain = 1.0;
        for i in 1..=count {
            gain *= decay;
            sum += self.buffer.read(clamp_delay(&self.buffer, base * i as f32)) * gain;
        }
        self.buffer.write(mono_sum(left, right));
        (wet_dry_mix(left, sum, mix), wet_dry_mix(right, sum, mix))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// Delay whose wet return sweeps across the stereo field. p1 time
/// (0 to 500 ms), p2 sweep rate (0.1 to 5.1 Hz), p3 sweep depth,
/// p4 mix.
pub struct PanDelay {
    sample_rate: f32,
    buffer: DelayLine,
    lfo: Lfo,
}

impl PanDelay {
    /// Create with a half-second buffer.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            buffer: DelayLine::from_ms(sample_rate, 500.0),
            lfo: Lfo::new(sample_rate, 1.0),
        }
    }
}

impl FxProcessor for PanDelay {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [time, rate, depth, mix] = params;
        self.lfo.set_frequency(0.1 + rate * 5.0);
        let pan = 0.5 + 0.5 * self.lfo.tick() * depth;

        let samples = clamp_delay(&self.buffer, ms_to_samples(time * 500.0, self.sample_rate));
        let delayed = self.buffer.read(samples);
        self.buffer.write(mono_sum(left, right));

        (
            wet_dry_mix(left, delayed * (1.0 - pan) * 2.0, mix),
            wet_dry_mix(right, delayed * pan * 2.0, mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.lfo.reset();
    }
}

/// Ping-pong delay with feedback crossed between sides. p1 time
/// (0 to 500 ms), p2 self feedback, p3 cross feedback, p4 mix.
pub struct CrossDelay {
    sample_rate: f32,
    buffers: [DelayLine; 2],
}

impl CrossDelay {
    /// Create with half-second buffers per side.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            buffers: core::array::from_fn(|_| DelayLine::from_ms(sample_rate, 500.0)),
        }
    }
}

impl FxProcessor for CrossDelay {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [time, feedback, cross, mix] = params;
        let samples = clamp_delay(
            &self.buffers[0],
            ms_to_samples(time * 500.0, self.sample_rate),
        );
        let delayed_l = self.buffers[0].read(samples);
        let delayed_r = self.buffers[1].read(samples);
        self.buffers[0].write(left + delayed_l * feedback + delayed_r * cross);
        self.buffers[1].write(right + delayed_r * feedback + delayed_l * cross);
        (
            wet_dry_mix(left, delayed_l, mix),
            wet_dry_mix(right, delayed_r, mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }
}

/// Several evenly spaced taps over one span. p1 span (0 to 1000 ms),
/// p2 tap count (2 to 10), p3 and p4 levels for the first two taps;
/// remaining taps sit at half level, wet blend fixed at one half.
pub struct MultiTap {
    sample_rate: f32,
    buffer: DelayLine,
}

impl MultiTap {
    /// Create with a one second buffer.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            buffer: DelayLine::from_ms(sample_rate, 1000.0),
        }
    }
}

impl FxProcessor for MultiTap {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [span, taps, level1, level2] = params;
        let count = 2 + (taps * 8.0) as usize;
        let total = ms_to_samples(span * 1000.0, self.sample_rate).max(1.0);

        let mut sum = 0.0;
        for i in 0..count {
            let tap_delay = total * (i + 1) as f32 / count as f32;
            let level = match i {
                0 => level1,
                1 => level2,
                _ => 0.5,
            };
            sum += self.buffer.read(clamp_delay(&self.buffer, tap_delay)) * level;
        }
        self.buffer.write(mono_sum(left, right));
        (
            wet_dry_mix(left, sum, 0.5),
            wet_dry_mix(right, sum, 0.5),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// Delay read backwards: the read pointer walks against the write
/// direction and bounces at the span boundaries. p1 span (0 to
/// 1000 ms), p2 feedback, p3 mix.
pub struct ReverseDelay {
    sample_rate: f32,
    buffer: Vec<f32>,
    write_pos: usize,
    read_pos: usize,
    reading_forward: bool,
}

impl ReverseDelay {
    /// Create with a one second buffer.
    pub fn new(sample_rate: f32) -> Self {
        let capacity = (sample_rate as usize).max(1);
        Self {
            sample_rate,
            buffer: vec![0.0; capacity],
            write_pos: 0,
            read_pos: 0,
            reading_forward: false,
        }
    }
}

impl FxProcessor for ReverseDelay {
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        let [span, feedback, mix, _] = params;
        let len = (ms_to_samples(span * 1000.0, self.sample_rate) as usize)
            .clamp(2, self.buffer.len());

        self.write_pos = (self.write_pos + 1) % len;
        let slot = &mut self.buffer[self.write_pos];
        *slot = mono_sum(left, right) + *slot * feedback;

        self.read_pos = self.read_pos.min(len - 1);
        let delayed = self.buffer[self.read_pos];
        if self.reading_forward {
            self.read_pos += 1;
            if self.read_pos >= len - 1 {
                self.reading_forward = false;
            }
        } else if self.read_pos == 0 {
            self.reading_forward = true;
        } else {
            self.read_pos -= 1;
        }

        (
            wet_dry_mix(left, delayed, mix),
            wet_dry_mix(right, delayed, mix),
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self::new(sample_rate);
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.read_pos = 0;
        self.reading_forward = false;
    }
}
