//! The controller address table.
//!
//! Each addressable parameter is described once: its two-byte address,
//! the codec between 14-bit wire values and engineering units, and the
//! accessors that bind it to a field of [`EffectSnapshot`]. The
//! protocol layer drives everything through this table, so adding a
//! parameter is one new entry here.

use crate::snapshot::EffectSnapshot;

/// Largest encodable wire value (14 bits).
pub const WIRE_MAX: u16 = 16383;

/// Value codec between wire words and engineering units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamRange {
    /// Affine map of the full wire span onto `[min, max]`.
    Linear {
        /// Value decoded from wire 0.
        min: f32,
        /// Value decoded from wire 16383.
        max: f32,
    },
    /// Boolean: the upper half of the wire span is "on".
    Switch,
    /// Integer selector 0 to `max`, spread evenly over the wire span.
    Stepped {
        /// Largest selectable step.
        max: u8,
    },
    /// Raw bit-packed word passed through untouched.
    Packed,
}

impl ParamRange {
    /// Decode a wire word into engineering units. Total: every wire
    /// value in 0..=16383 maps to some in-range value.
    pub fn decode(self, wire: u16) -> f32 {
        let wire = wire.min(WIRE_MAX);
        match self {
            Self::Linear { min, max } => min + f32::from(wire) / f32::from(WIRE_MAX) * (max - min),
            Self::Switch => {
                if wire >= 8192 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Stepped { max } => {
                (f32::from(wire) / f32::from(WIRE_MAX) * f32::from(max)).round()
            }
            Self::Packed => f32::from(wire),
        }
    }

    /// Encode engineering units back to a wire word, the rounded
    /// inverse of [`decode`](Self::decode). Out-of-range values clamp.
    pub fn encode(self, value: f32) -> u16 {
        let wire = match self {
            Self::Linear { min, max } => {
                if max == min {
                    0.0
                } else {
                    (value - min) / (max - min) * f32::from(WIRE_MAX)
                }
            }
            Self::Switch => {
                if value >= 0.5 {
                    return WIRE_MAX;
                }
                return 0;
            }
            Self::Stepped { max } => {
                if max == 0 {
                    0.0
                } else {
                    value / f32::from(max) * f32::from(WIRE_MAX)
                }
            }
            Self::Packed => value,
        };
        wire.round().clamp(0.0, f32::from(WIRE_MAX)) as u16
    }
}

/// Whether a parameter is global or owned by one channel strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamScope {
    /// One instance shared by the whole engine.
    System,
    /// One instance per MIDI channel.
    Channel,
}

/// One row of the address table.
pub struct ParamDescriptor {
    /// Two-byte address `(hi, lo)`.
    pub address: (u8, u8),
    /// Short machine-readable name.
    pub name: &'static str,
    /// System-wide or per-channel.
    pub scope: ParamScope,
    /// Wire codec for this parameter.
    pub range: ParamRange,
    /// Store a decoded value into a snapshot. The channel index is
    /// ignored for system-scope parameters.
    pub apply: fn(&mut EffectSnapshot, usize, f32),
    /// Read the current value back out of a snapshot.
    pub read: fn(&EffectSnapshot, usize) -> f32,
}

fn bit(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

const UNIT: ParamRange = ParamRange::Linear { min: 0.0, max: 1.0 };

/// The full address table.
///
/// Addresses use hi byte 0; lo bytes group by section: 100s equalizer,
/// 110s stereo and global sends, 120s reverb, 130s chorus, 140s
/// variation, 150s insertion, 160s channel strip, 170s routing.
pub static DESCRIPTORS: [ParamDescriptor; 52] = [
    // Equalizer
    ParamDescriptor {
        address: (0, 100),
        name: "eq_low_gain",
        scope: ParamScope::System,
        range: ParamRange::Linear { min: -12.0, max: 12.0 },
        apply: |s, _, v| s.equalizer.low_gain = v,
        read: |s, _| s.equalizer.low_gain,
    },
    ParamDescriptor {
        address: (0, 101),
        name: "eq_mid_gain",
        scope: ParamScope::System,
        range: ParamRange::Linear { min: -12.0, max: 12.0 },
        apply: |s, _, v| s.equalizer.mid_gain = v,
        read: |s, _| s.equalizer.mid_gain,
    },
    ParamDescriptor {
        address: (0, 102),
        name: "eq_high_gain",
        scope: ParamScope::System,
        range: ParamRange::Linear { min: -12.0, max: 12.0 },
        apply: |s, _, v| s.equalizer.high_gain = v,
        read: |s, _| s.equalizer.high_gain,
    },
    ParamDescriptor {
        address: (0, 103),
        name: "eq_mid_freq",
        scope: ParamScope::System,
        range: ParamRange::Linear { min: 100.0, max: 5000.0 },
        apply: |s, _, v| s.equalizer.mid_freq = v,
        read: |s, _| s.equalizer.mid_freq,
    },
    ParamDescriptor {
        address: (0, 104),
        name: "eq_mid_q",
        scope: ParamScope::System,
        range: ParamRange::Linear { min: 0.5, max: 2.5 },
        apply: |s, _, v| s.equalizer.q_factor = v,
        read: |s, _| s.equalizer.q_factor,
    },
    // Stereo and global sends
    ParamDescriptor {
        address: (0, 110),
        name: "stereo_width",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.global.stereo_width = v,
        read: |s, _| s.global.stereo_width,
    },
    ParamDescriptor {
        address: (0, 112),
        name: "global_reverb_send",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.global.reverb_send = v,
        read: |s, _| s.global.reverb_send,
    },
    ParamDescriptor {
        address: (0, 113),
        name: "global_chorus_send",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.global.chorus_send = v,
        read: |s, _| s.global.chorus_send,
    },
    ParamDescriptor {
        address: (0, 114),
        name: "global_variation_send",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.global.variation_send = v,
        read: |s, _| s.global.variation_send,
    },
    // Reverb
    ParamDescriptor {
        address: (0, 120),
        name: "reverb_type",
        scope: ParamScope::System,
        range: ParamRange::Stepped { max: 7 },
        apply: |s, _, v| s.reverb.kind = v as u8,
        read: |s, _| f32::from(s.reverb.kind),
    },
    ParamDescriptor {
        address: (0, 121),
        name: "reverb_time",
        scope: ParamScope::System,
        range: ParamRange::Linear { min: 0.1, max: 8.3 },
        apply: |s, _, v| s.reverb.time = v,
        read: |s, _| s.reverb.time,
    },
    ParamDescriptor {
        address: (0, 122),
        name: "reverb_level",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.reverb.level = v,
        read: |s, _| s.reverb.level,
    },
    ParamDescriptor {
        address: (0, 123),
        name: "reverb_pre_delay",
        scope: ParamScope::System,
        range: ParamRange::Linear { min: 0.0, max: 12.7 },
        apply: |s, _, v| s.reverb.pre_delay = v,
        read: |s, _| s.reverb.pre_delay,
    },
    ParamDescriptor {
        address: (0, 124),
        name: "reverb_hf_damping",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.reverb.hf_damping = v,
        read: |s, _| s.reverb.hf_damping,
    },
    ParamDescriptor {
        address: (0, 125),
        name: "reverb_density",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.reverb.density = v,
        read: |s, _| s.reverb.density,
    },
    ParamDescriptor {
        address: (0, 126),
        name: "reverb_early_level",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.reverb.early_level = v,
        read: |s, _| s.reverb.early_level,
    },
    ParamDescriptor {
        address: (0, 127),
        name: "reverb_tail_level",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.reverb.tail_level = v,
        read: |s, _| s.reverb.tail_level,
    },
    // Chorus
    ParamDescriptor {
        address: (0, 130),
        name: "chorus_type",
        scope: ParamScope::System,
        range: ParamRange::Stepped { max: 7 },
        apply: |s, _, v| s.chorus.kind = v as u8,
        read: |s, _| f32::from(s.chorus.kind),
    },
    ParamDescriptor {
        address: (0, 131),
        name: "chorus_rate",
        scope: ParamScope::System,
        range: ParamRange::Linear { min: 0.1, max: 6.5 },
        apply: |s, _, v| s.chorus.rate = v,
        read: |s, _| s.chorus.rate,
    },
    ParamDescriptor {
        address: (0, 132),
        name: "chorus_depth",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.chorus.depth = v,
        read: |s, _| s.chorus.depth,
    },
    ParamDescriptor {
        address: (0, 133),
        name: "chorus_feedback",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.chorus.feedback = v,
        read: |s, _| s.chorus.feedback,
    },
    ParamDescriptor {
        address: (0, 134),
        name: "chorus_level",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.chorus.level = v,
        read: |s, _| s.chorus.level,
    },
    ParamDescriptor {
        address: (0, 135),
        name: "chorus_delay",
        scope: ParamScope::System,
        range: ParamRange::Linear { min: 0.0, max: 12.7 },
        apply: |s, _, v| s.chorus.delay = v,
        read: |s, _| s.chorus.delay,
    },
    ParamDescriptor {
        address: (0, 136),
        name: "chorus_output",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.chorus.output = v,
        read: |s, _| s.chorus.output,
    },
    ParamDescriptor {
        address: (0, 137),
        name: "chorus_cross_feedback",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.chorus.cross_feedback = v,
        read: |s, _| s.chorus.cross_feedback,
    },
    // Variation
    ParamDescriptor {
        address: (0, 140),
        name: "variation_type",
        scope: ParamScope::System,
        range: ParamRange::Stepped { max: 63 },
        apply: |s, _, v| s.variation.kind = v as u8,
        read: |s, _| f32::from(s.variation.kind),
    },
    ParamDescriptor {
        address: (0, 141),
        name: "variation_param1",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.variation.params[0] = v,
        read: |s, _| s.variation.params[0],
    },
    ParamDescriptor {
        address: (0, 142),
        name: "variation_param2",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.variation.params[1] = v,
        read: |s, _| s.variation.params[1],
    },
    ParamDescriptor {
        address: (0, 143),
        name: "variation_param3",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.variation.params[2] = v,
        read: |s, _| s.variation.params[2],
    },
    ParamDescriptor {
        address: (0, 144),
        name: "variation_param4",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.variation.params[3] = v,
        read: |s, _| s.variation.params[3],
    },
    ParamDescriptor {
        address: (0, 145),
        name: "variation_level",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.variation.level = v,
        read: |s, _| s.variation.level,
    },
    ParamDescriptor {
        address: (0, 146),
        name: "variation_bypass",
        scope: ParamScope::System,
        range: ParamRange::Switch,
        apply: |s, _, v| s.variation.bypass = v >= 0.5,
        read: |s, _| bit(s.variation.bypass),
    },
    // Insertion (channel scope)
    ParamDescriptor {
        address: (0, 150),
        name: "insertion_type",
        scope: ParamScope::Channel,
        range: ParamRange::Stepped { max: 15 },
        apply: |s, ch, v| s.channels[ch].insertion.kind = v as u8,
        read: |s, ch| f32::from(s.channels[ch].insertion.kind),
    },
    ParamDescriptor {
        address: (0, 151),
        name: "insertion_param1",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].insertion.params[0] = v,
        read: |s, ch| s.channels[ch].insertion.params[0],
    },
    ParamDescriptor {
        address: (0, 152),
        name: "insertion_param2",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].insertion.params[1] = v,
        read: |s, ch| s.channels[ch].insertion.params[1],
    },
    ParamDescriptor {
        address: (0, 153),
        name: "insertion_param3",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].insertion.params[2] = v,
        read: |s, ch| s.channels[ch].insertion.params[2],
    },
    ParamDescriptor {
        address: (0, 154),
        name: "insertion_param4",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].insertion.params[3] = v,
        read: |s, ch| s.channels[ch].insertion.params[3],
    },
    ParamDescriptor {
        address: (0, 155),
        name: "insertion_level",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].insertion.level = v,
        read: |s, ch| s.channels[ch].insertion.level,
    },
    ParamDescriptor {
        address: (0, 156),
        name: "insertion_bypass",
        scope: ParamScope::Channel,
        range: ParamRange::Switch,
        apply: |s, ch, v| s.channels[ch].insertion.bypass = v >= 0.5,
        read: |s, ch| bit(s.channels[ch].insertion.bypass),
    },
    // Channel strip
    ParamDescriptor {
        address: (0, 160),
        name: "channel_reverb_send",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].reverb_send = v,
        read: |s, ch| s.channels[ch].reverb_send,
    },
    ParamDescriptor {
        address: (0, 161),
        name: "channel_chorus_send",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].chorus_send = v,
        read: |s, ch| s.channels[ch].chorus_send,
    },
    ParamDescriptor {
        address: (0, 162),
        name: "channel_variation_send",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].variation_send = v,
        read: |s, ch| s.channels[ch].variation_send,
    },
    ParamDescriptor {
        address: (0, 163),
        name: "channel_insertion_send",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].insertion_send = v,
        read: |s, ch| s.channels[ch].insertion_send,
    },
    ParamDescriptor {
        address: (0, 164),
        name: "channel_mute",
        scope: ParamScope::Channel,
        range: ParamRange::Switch,
        apply: |s, ch, v| s.channels[ch].muted = v >= 0.5,
        read: |s, ch| bit(s.channels[ch].muted),
    },
    ParamDescriptor {
        address: (0, 165),
        name: "channel_solo",
        scope: ParamScope::Channel,
        range: ParamRange::Switch,
        apply: |s, ch, v| s.channels[ch].soloed = v >= 0.5,
        read: |s, ch| bit(s.channels[ch].soloed),
    },
    ParamDescriptor {
        address: (0, 166),
        name: "channel_pan",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].pan = v,
        read: |s, ch| s.channels[ch].pan,
    },
    ParamDescriptor {
        address: (0, 167),
        name: "channel_volume",
        scope: ParamScope::Channel,
        range: UNIT,
        apply: |s, ch, v| s.channels[ch].volume = v,
        read: |s, ch| s.channels[ch].volume,
    },
    // Routing
    ParamDescriptor {
        address: (0, 170),
        name: "routing_system_order",
        scope: ParamScope::System,
        range: ParamRange::Packed,
        apply: |s, _, v| s.routing.set_system_order_packed(v as u16),
        read: |s, _| f32::from(s.routing.system_order_packed()),
    },
    ParamDescriptor {
        address: (0, 171),
        name: "routing_insertion_order",
        scope: ParamScope::System,
        range: ParamRange::Packed,
        apply: |s, _, v| s.routing.insertion_order = v as u16,
        read: |s, _| f32::from(s.routing.insertion_order),
    },
    ParamDescriptor {
        address: (0, 172),
        name: "routing_parallel",
        scope: ParamScope::System,
        range: ParamRange::Switch,
        apply: |s, _, v| s.routing.parallel = v >= 0.5,
        read: |s, _| bit(s.routing.parallel),
    },
    ParamDescriptor {
        address: (0, 173),
        name: "routing_reverb_to_chorus",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.routing.reverb_to_chorus = v,
        read: |s, _| s.routing.reverb_to_chorus,
    },
    ParamDescriptor {
        address: (0, 174),
        name: "routing_chorus_to_variation",
        scope: ParamScope::System,
        range: UNIT,
        apply: |s, _, v| s.routing.chorus_to_variation = v,
        read: |s, _| s.routing.chorus_to_variation,
    },
];

/// Find the descriptor for an address, if one exists.
pub fn lookup(addr_hi: u8, addr_lo: u8) -> Option<&'static ParamDescriptor> {
    DESCRIPTORS.iter().find(|d| d.address == (addr_hi, addr_lo))
}
