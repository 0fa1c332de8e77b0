//! The complete owned parameter state.

use serde::{Deserialize, Serialize};

use crate::channel::{ChannelParams, NUM_CHANNELS};
use crate::system::{
    ChorusParams, EqualizerParams, GlobalParams, ReverbParams, RoutingParams, VariationParams,
};

/// Every effect parameter of the tone generator, in one owned value.
///
/// Snapshots are plain data: cloning one captures the full state and
/// assigning one restores it. The engine reads a snapshot during audio
/// processing and never mutates it mid-block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectSnapshot {
    /// Master three-band equalizer.
    pub equalizer: EqualizerParams,
    /// The system reverb block.
    pub reverb: ReverbParams,
    /// The system chorus block.
    pub chorus: ChorusParams,
    /// The system variation block.
    pub variation: VariationParams,
    /// Effect chain routing.
    pub routing: RoutingParams,
    /// Master section and global sends.
    pub global: GlobalParams,
    /// The sixteen channel strips.
    pub channels: [ChannelParams; NUM_CHANNELS],
}
