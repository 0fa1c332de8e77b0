//! System-wide effect parameter blocks.

use serde::{Deserialize, Serialize};

/// Reverb block parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverbParams {
    /// Algorithm variant, 0 to 7 (Hall 1 through Plate).
    pub kind: u8,
    /// Decay time in seconds, 0.1 to 8.3.
    pub time: f32,
    /// Return level, 0 to 1.
    pub level: f32,
    /// Pre-delay before the first reflection, in milliseconds.
    pub pre_delay: f32,
    /// High-frequency damping inside the tail, 0 to 1.
    pub hf_damping: f32,
    /// Echo density; scales the number of comb filters, 0 to 1.
    pub density: f32,
    /// Early reflection level, 0 to 1.
    pub early_level: f32,
    /// Late tail level, 0 to 1.
    pub tail_level: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            kind: 0,
            time: 2.5,
            level: 0.6,
            pre_delay: 20.0,
            hf_damping: 0.5,
            density: 0.8,
            early_level: 0.7,
            tail_level: 0.9,
        }
    }
}

/// Chorus block parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChorusParams {
    /// Algorithm variant, 0 to 7 (Chorus 1 through Off).
    pub kind: u8,
    /// Modulation rate in Hz, 0.1 to 6.5.
    pub rate: f32,
    /// Modulation depth, 0 to 1.
    pub depth: f32,
    /// Per-side feedback, 0 to 1.
    pub feedback: f32,
    /// Return level, 0 to 1.
    pub level: f32,
    /// Base delay in milliseconds, 0 to 12.7.
    pub delay: f32,
    /// Wet/dry output blend, 0 to 1.
    pub output: f32,
    /// Feedback bled between the left and right voices, 0 to 1.
    pub cross_feedback: f32,
}

impl Default for ChorusParams {
    fn default() -> Self {
        Self {
            kind: 0,
            rate: 1.0,
            depth: 0.5,
            feedback: 0.3,
            level: 0.4,
            delay: 0.0,
            output: 0.8,
            cross_feedback: 0.2,
        }
    }
}

/// Variation block parameters.
///
/// The four algorithm parameters are normalized; each variation
/// algorithm documents its own mapping to engineering units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationParams {
    /// Algorithm selector, 0 to 63.
    pub kind: u8,
    /// The four normalized algorithm parameters.
    pub params: [f32; 4],
    /// Return level, 0 to 1.
    pub level: f32,
    /// When set, the block contributes nothing to the system bus.
    pub bypass: bool,
}

impl Default for VariationParams {
    fn default() -> Self {
        Self {
            kind: 0,
            params: [0.5; 4],
            level: 0.5,
            bypass: false,
        }
    }
}

/// Master three-band equalizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizerParams {
    /// Low-shelf gain in dB.
    pub low_gain: f32,
    /// Mid-peaking gain in dB.
    pub mid_gain: f32,
    /// High-shelf gain in dB.
    pub high_gain: f32,
    /// Mid band center frequency in Hz.
    pub mid_freq: f32,
    /// Mid band Q factor.
    pub q_factor: f32,
}

impl Default for EqualizerParams {
    fn default() -> Self {
        Self {
            low_gain: 0.0,
            mid_gain: 0.0,
            high_gain: 0.0,
            mid_freq: 1000.0,
            q_factor: 1.0,
        }
    }
}

/// One stage of the system effect chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemSlot {
    /// The reverb block.
    Reverb,
    /// The chorus block.
    Chorus,
    /// The variation block.
    Variation,
}

impl SystemSlot {
    /// Wire nibble for this slot.
    pub fn to_nibble(self) -> u16 {
        match self {
            Self::Reverb => 0,
            Self::Chorus => 1,
            Self::Variation => 2,
        }
    }

    /// Decode a wire nibble; values above 2 are invalid.
    pub fn from_nibble(nibble: u16) -> Option<Self> {
        match nibble {
            0 => Some(Self::Reverb),
            1 => Some(Self::Chorus),
            2 => Some(Self::Variation),
            _ => None,
        }
    }
}

/// Effect chain routing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingParams {
    /// Processing order of the three system blocks.
    pub system_order: [SystemSlot; 3],
    /// Raw insertion-order word. Accepted and echoed back in dumps,
    /// but each channel owns exactly one insertion slot so the order
    /// has no audible effect.
    pub insertion_order: u16,
    /// Run the system blocks in parallel instead of in series.
    pub parallel: bool,
    /// Portion of the reverb input diverted into the chorus, 0 to 1.
    pub reverb_to_chorus: f32,
    /// Portion of the chorus input diverted into the variation, 0 to 1.
    pub chorus_to_variation: f32,
}

impl RoutingParams {
    /// Pack the system order into one nibble per stage, slot 0 in the
    /// low nibble. This packing is lossy against arbitrary wire words:
    /// nibbles above 2 are ignored on decode.
    pub fn system_order_packed(&self) -> u16 {
        let mut word = 0u16;
        for (i, slot) in self.system_order.iter().enumerate() {
            word |= slot.to_nibble() << (i * 4);
        }
        word
    }

    /// Unpack a wire word into the system order. Invalid nibbles leave
    /// the corresponding stage unchanged.
    pub fn set_system_order_packed(&mut self, word: u16) {
        for i in 0..3 {
            if let Some(slot) = SystemSlot::from_nibble((word >> (i * 4)) & 0xF) {
                self.system_order[i] = slot;
            }
        }
    }
}

impl Default for RoutingParams {
    fn default() -> Self {
        Self {
            system_order: [SystemSlot::Reverb, SystemSlot::Chorus, SystemSlot::Variation],
            insertion_order: 0,
            parallel: false,
            reverb_to_chorus: 0.0,
            chorus_to_variation: 0.0,
        }
    }
}

/// Master section parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalParams {
    /// Global reverb send trim, 0 to 1.
    pub reverb_send: f32,
    /// Global chorus send trim, 0 to 1.
    pub chorus_send: f32,
    /// Global variation send trim, 0 to 1.
    pub variation_send: f32,
    /// Stereo width, 0 (mono) to 1 (full).
    pub stereo_width: f32,
    /// Master output level, 0 to 1.
    pub master_level: f32,
    /// Bypass the whole system effect chain.
    pub bypass_all: bool,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            reverb_send: 0.5,
            chorus_send: 0.3,
            variation_send: 0.2,
            stereo_width: 0.5,
            master_level: 0.8,
            bypass_all: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_order_packs_low_nibble_first() {
        let routing = RoutingParams::default();
        // reverb=0, chorus=1, variation=2 packs to 0x210.
        assert_eq!(routing.system_order_packed(), 0x210);
    }

    #[test]
    fn system_order_round_trips() {
        let mut routing = RoutingParams::default();
        routing.set_system_order_packed(0x012);
        assert_eq!(
            routing.system_order,
            [SystemSlot::Variation, SystemSlot::Chorus, SystemSlot::Reverb]
        );
        assert_eq!(routing.system_order_packed(), 0x012);
    }

    #[test]
    fn invalid_nibbles_keep_previous_order() {
        let mut routing = RoutingParams::default();
        routing.set_system_order_packed(0xFF1);
        assert_eq!(
            routing.system_order,
            [SystemSlot::Chorus, SystemSlot::Chorus, SystemSlot::Variation]
        );
    }
}
