//! DSP primitives shared by the xgfx effect processors.
//!
//! Everything here is sample-rate aware, allocation-free after
//! construction, and usable without `std` (math goes through `libm`).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod allpass;
mod biquad;
mod comb;
mod delay;
mod envelope;
mod lfo;
pub mod math;

pub use allpass::AllpassFilter;
pub use biquad::{
    Biquad, BiquadCoefficients, high_shelf_coefficients, low_shelf_coefficients,
    peaking_eq_coefficients,
};
pub use comb::CombFilter;
pub use delay::DelayLine;
pub use envelope::EnvelopeFollower;
pub use lfo::{Lfo, Waveform};
