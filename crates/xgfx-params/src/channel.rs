//! Per-channel mixer strip parameters.

use serde::{Deserialize, Serialize};

/// Number of MIDI channels in a part.
pub const NUM_CHANNELS: usize = 16;

/// Insertion effect slot owned by one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertionParams {
    /// Algorithm selector, 0 (Off) to 15.
    pub kind: u8,
    /// The four normalized algorithm parameters.
    pub params: [f32; 4],
    /// Output level, 0 to 1.
    pub level: f32,
    /// When set, the dry signal passes through the slot unprocessed.
    pub bypass: bool,
}

impl Default for InsertionParams {
    fn default() -> Self {
        Self {
            kind: 0,
            params: [0.5; 4],
            level: 1.0,
            bypass: false,
        }
    }
}

/// Mixer strip for one MIDI channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelParams {
    /// Send into the reverb bus, 0 to 1. Also weights the system
    /// effect return for this channel.
    pub reverb_send: f32,
    /// Send into the chorus bus, 0 to 1.
    pub chorus_send: f32,
    /// Send into the variation bus, 0 to 1.
    pub variation_send: f32,
    /// Portion routed through the insertion slot, 0 to 1.
    pub insertion_send: f32,
    /// Channel is muted.
    pub muted: bool,
    /// Channel is soloed. Any solo overrides all mutes.
    pub soloed: bool,
    /// Pan position, 0 (left) to 1 (right), 0.5 center.
    pub pan: f32,
    /// Channel volume, 0 to 1.
    pub volume: f32,
    /// The channel's insertion effect slot.
    pub insertion: InsertionParams,
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            reverb_send: 0.5,
            chorus_send: 0.3,
            variation_send: 0.2,
            insertion_send: 1.0,
            muted: false,
            soloed: false,
            pan: 0.5,
            volume: 1.0,
            insertion: InsertionParams::default(),
        }
    }
}
