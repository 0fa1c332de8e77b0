//! Parameter model for the xgfx tone-generator effect section.
//!
//! This crate defines the typed parameter state (system effects,
//! per-channel strips, routing, master section), the address table
//! that maps 14-bit controller addresses onto that state, and the
//! value codecs between wire values and engineering units.

mod channel;
mod descriptor;
mod names;
mod snapshot;
mod system;

pub use channel::{ChannelParams, InsertionParams, NUM_CHANNELS};
pub use descriptor::{
    DESCRIPTORS, ParamDescriptor, ParamRange, ParamScope, WIRE_MAX, lookup,
};
pub use names::{
    CHORUS_TYPE_NAMES, INSERTION_TYPE_NAMES, REVERB_TYPE_NAMES, VARIATION_TYPE_NAMES,
    chorus_type_name, insertion_type_name, reverb_type_name, variation_type_name,
};
pub use snapshot::EffectSnapshot;
pub use system::{
    ChorusParams, EqualizerParams, GlobalParams, ReverbParams, RoutingParams, SystemSlot,
    VariationParams,
};
