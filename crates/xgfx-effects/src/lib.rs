//! Effect algorithms for the xgfx engine.
//!
//! The system blocks (reverb, chorus, equalizer) have dedicated units
//! driven by their typed parameter structs. Variation and insertion
//! algorithms share the [`FxProcessor`] contract: four normalized
//! parameters in, one stereo frame out, with all runtime state private
//! to the instance. [`registry`] maps wire type ids onto processors.

mod chorus;
mod delay;
mod drive;
mod dynamics;
mod equalizer;
mod modulation;
pub mod registry;
mod reverb;
mod rotary;

pub use chorus::ChorusUnit;
pub use delay::{CrossDelay, DualDelay, Echo, MonoDelay, MultiTap, PanDelay, ReverseDelay};
pub use drive::{Distortion, Overdrive};
pub use dynamics::{Compressor, Gate};
pub use equalizer::EqualizerUnit;
pub use modulation::{AutoPan, Flanger, Phaser, RingModulator, Tremolo, Vibrato};
pub use registry::{BoxedFx, Passthrough, create_insertion, create_variation};
pub use reverb::ReverbUnit;
pub use rotary::RotarySpeaker;

/// A variation or insertion effect algorithm.
///
/// The four parameters arrive normalized to `[0, 1]`; each algorithm
/// documents its own mapping to engineering units. Parameters are
/// passed per frame rather than stored, so a processor never observes
/// a half-updated parameter set.
pub trait FxProcessor: Send {
    /// Process one stereo frame under the given parameter snapshot.
    fn process(&mut self, params: [f32; 4], left: f32, right: f32) -> (f32, f32);

    /// Update the sample rate, discarding buffered audio.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear all runtime state.
    fn reset(&mut self);
}
