//! Maps wire type ids onto effect processor instances.
//!
//! Type ids not yet backed by an algorithm construct [`Passthrough`],
//! which keeps the dispatch contract total: every id in range yields a
//! working processor and selecting it never fails.

use crate::FxProcessor;
use crate::delay::{CrossDelay, DualDelay, Echo, MonoDelay, MultiTap, PanDelay, ReverseDelay};
use crate::drive::{Distortion, Overdrive};
use crate::dynamics::{Compressor, Gate};
use crate::modulation::{AutoPan, Flanger, Phaser, RingModulator, Tremolo, Vibrato};
use crate::rotary::RotarySpeaker;

/// A boxed effect processor.
pub type BoxedFx = Box<dyn FxProcessor>;

/// Identity processor standing in for unimplemented type ids and the
/// insertion "Off" slot.
pub struct Passthrough;

impl FxProcessor for Passthrough {
    fn process(&mut self, _params: [f32; 4], left: f32, right: f32) -> (f32, f32) {
        (left, right)
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}

/// Build the processor for a variation type id (0 to 63).
pub fn create_variation(kind: u8, sample_rate: f32) -> BoxedFx {
    match kind {
        0 => Box::new(MonoDelay::new(sample_rate)),
        1 => Box::new(DualDelay::new(sample_rate)),
        2 => Box::new(Echo::new(sample_rate)),
        3 => Box::new(PanDelay::new(sample_rate)),
        4 => Box::new(CrossDelay::new(sample_rate)),
        5 => Box::new(MultiTap::new(sample_rate)),
        6 => Box::new(ReverseDelay::new(sample_rate)),
        7 => Box::new(Tremolo::new(sample_rate)),
        8 => Box::new(AutoPan::new(sample_rate)),
        9 => Box::new(Phaser::new(sample_rate)),
        10 => Box::new(Flanger::new(sample_rate)),
        12 => Box::new(RingModulator::new(sample_rate)),
        14 => Box::new(Distortion::new(sample_rate)),
        15 => Box::new(Overdrive::new(sample_rate)),
        16 => Box::new(Compressor::new(sample_rate)),
        18 => Box::new(Gate::new(sample_rate)),
        20 | 21 => Box::new(RotarySpeaker::new(sample_rate)),
        22 => Box::new(Vibrato::new(sample_rate)),
        _ => Box::new(Passthrough),
    }
}

/// Build the processor for an insertion type id (0 to 15). Id 0 is
/// the "Off" slot, which passes the signal through untouched.
pub fn create_insertion(kind: u8, sample_rate: f32) -> BoxedFx {
    match kind {
        1 => Box::new(Distortion::new(sample_rate)),
        2 => Box::new(Overdrive::new(sample_rate)),
        3 => Box::new(Compressor::new(sample_rate)),
        4 => Box::new(Gate::new(sample_rate)),
        7 | 8 => Box::new(RotarySpeaker::new(sample_rate)),
        _ => Box::new(Passthrough),
    }
}
