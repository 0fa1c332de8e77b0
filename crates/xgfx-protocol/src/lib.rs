//! XG effect-control protocol codec.
//!
//! Translates between the wire protocol (14-bit parameter updates and
//! SysEx-framed bulk dumps) and the [`EffectSnapshot`] data model.
//! The control link is treated as noisy: malformed or unknown input is
//! skipped, never an error. Only the address table in `xgfx-params`
//! knows individual parameters; this crate only frames and routes.

use tracing::trace;
use xgfx_params::{EffectSnapshot, NUM_CHANNELS, ParamScope, lookup};

/// Yamaha manufacturer id.
pub const MANUFACTURER_ID: u8 = 0x43;

/// Device id used in dumps we generate.
pub const DEVICE_ID: u8 = 0x00;

/// Sub-status for a single parameter change.
pub const PARAMETER_CHANGE: u8 = 0x04;

/// Sub-status for a bulk parameter dump.
pub const BULK_DUMP: u8 = 0x7F;

/// Bulk dump type byte for system-scope parameters.
pub const BULK_SYSTEM: u8 = 0x03;

/// Bulk dump type byte for per-channel parameters.
pub const BULK_CHANNEL: u8 = 0x04;

/// Apply one 14-bit parameter update to the snapshot.
///
/// `channel` resolves channel-scoped addresses; system-scope addresses
/// ignore it. Returns whether the address was known. Unknown addresses
/// and out-of-range channels are dropped silently.
pub fn apply_parameter(
    snapshot: &mut EffectSnapshot,
    addr_hi: u8,
    addr_lo: u8,
    value_hi: u8,
    value_lo: u8,
    channel: usize,
) -> bool {
    let Some(desc) = lookup(addr_hi, addr_lo) else {
        trace!(addr_hi, addr_lo, "ignoring unknown parameter address");
        return false;
    };
    if desc.scope == ParamScope::Channel && channel >= NUM_CHANNELS {
        trace!(channel, name = desc.name, "ignoring out-of-range channel");
        return false;
    }
    let wire = u16::from(value_hi & 0x7F) << 7 | u16::from(value_lo & 0x7F);
    let value = desc.range.decode(wire);
    (desc.apply)(snapshot, channel, value);
    true
}

/// Decode one SysEx message (the bytes between F0 and F7).
///
/// Layout: `[manufacturer, deviceId, subStatus, command, ...]`. The
/// manufacturer byte must match [`MANUFACTURER_ID`]; anything else is
/// ignored. `current_channel` resolves channel-scoped parameter
/// changes that carry no channel of their own.
///
/// Returns whether the message mutated the snapshot.
pub fn decode_sysex(snapshot: &mut EffectSnapshot, message: &[u8], current_channel: usize) -> bool {
    let [manufacturer, rest @ ..] = message else {
        return false;
    };
    if *manufacturer != MANUFACTURER_ID {
        trace!(manufacturer, "ignoring foreign sysex");
        return false;
    }
    if rest.len() < 3 {
        return false;
    }
    let sub_status = rest[1];
    let body = &rest[2..];

    match sub_status {
        PARAMETER_CHANGE => {
            // Three payload bytes after the command byte: address
            // pair and an 8-bit value that lands in the high byte.
            if let [_, addr_hi, addr_lo, value, ..] = *body {
                apply_parameter(snapshot, addr_hi, addr_lo, value, 0, current_channel)
            } else {
                false
            }
        }
        BULK_DUMP => {
            let [_, dump_type, records @ ..] = body else {
                return false;
            };
            match *dump_type {
                BULK_SYSTEM => decode_system_records(snapshot, records),
                BULK_CHANNEL => decode_channel_records(snapshot, records),
                other => {
                    trace!(dump_type = other, "ignoring unknown bulk dump type");
                    false
                }
            }
        }
        other => {
            trace!(sub_status = other, "ignoring unknown sysex sub-status");
            false
        }
    }
}

/// Parse 4-byte system records `[hi, lo, valueHi, valueLo]`. An
/// unrecognized address resynchronizes by skipping a single byte.
fn decode_system_records(snapshot: &mut EffectSnapshot, data: &[u8]) -> bool {
    let mut applied = false;
    let mut offset = 0;
    while offset + 2 <= data.len() {
        let (hi, lo) = (data[offset], data[offset + 1]);
        if lookup(hi, lo).is_some() {
            if offset + 4 > data.len() {
                break;
            }
            applied |= apply_parameter(snapshot, hi, lo, data[offset + 2], data[offset + 3], 0);
            offset += 4;
        } else {
            offset += 1;
        }
    }
    applied
}

/// Parse 5-byte channel records `[channel, hi, lo, valueHi, valueLo]`.
/// Records with an unknown address or invalid channel resynchronize by
/// skipping a single byte.
fn decode_channel_records(snapshot: &mut EffectSnapshot, data: &[u8]) -> bool {
    let mut applied = false;
    let mut offset = 0;
    while offset + 5 <= data.len() {
        let channel = usize::from(data[offset]);
        let (hi, lo) = (data[offset + 1], data[offset + 2]);
        if channel < NUM_CHANNELS && lookup(hi, lo).is_some() {
            applied |= apply_parameter(
                snapshot,
                hi,
                lo,
                data[offset + 3],
                data[offset + 4],
                channel,
            );
            offset += 5;
        } else {
            offset += 1;
        }
    }
    applied
}

/// Serialize the current snapshot into a bulk dump, ready to frame
/// between F0 and F7.
///
/// `channel_scoped` selects the per-channel record format covering
/// each channel's insertion and strip fields; otherwise every
/// system-scope field is emitted. The result decodes back through
/// [`decode_sysex`].
pub fn encode_bulk_dump(snapshot: &EffectSnapshot, channel_scoped: bool) -> Vec<u8> {
    let dump_type = if channel_scoped { BULK_CHANNEL } else { BULK_SYSTEM };
    let mut dump = vec![MANUFACTURER_ID, DEVICE_ID, BULK_DUMP, 0x00, dump_type];

    if channel_scoped {
        for channel in 0..NUM_CHANNELS {
            for desc in xgfx_params::DESCRIPTORS
                .iter()
                .filter(|d| d.scope == ParamScope::Channel)
            {
                let wire = desc.range.encode((desc.read)(snapshot, channel));
                dump.push(channel as u8);
                dump.push(desc.address.0);
                dump.push(desc.address.1);
                dump.push((wire >> 7) as u8 & 0x7F);
                dump.push(wire as u8 & 0x7F);
            }
        }
    } else {
        for desc in xgfx_params::DESCRIPTORS
            .iter()
            .filter(|d| d.scope == ParamScope::System)
        {
            let wire = desc.range.encode((desc.read)(snapshot, 0));
            dump.push(desc.address.0);
            dump.push(desc.address.1);
            dump.push((wire >> 7) as u8 & 0x7F);
            dump.push(wire as u8 & 0x7F);
        }
    }
    dump
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_update_writes_decoded_value() {
        let mut snap = EffectSnapshot::default();
        // reverb time: full-scale wire decodes to the documented max.
        assert!(apply_parameter(&mut snap, 0, 121, 0x7F, 0x7F, 0));
        assert!((snap.reverb.time - 8.3).abs() < 1e-3);
    }

    #[test]
    fn unknown_address_is_ignored() {
        let mut snap = EffectSnapshot::default();
        let before = snap.clone();
        assert!(!apply_parameter(&mut snap, 0, 99, 0x40, 0x00, 0));
        assert!(!apply_parameter(&mut snap, 3, 121, 0x40, 0x00, 0));
        assert_eq!(snap, before);
    }

    #[test]
    fn channel_scoped_update_targets_resolved_channel() {
        let mut snap = EffectSnapshot::default();
        assert!(apply_parameter(&mut snap, 0, 164, 0x7F, 0x7F, 7));
        assert!(snap.channels[7].muted);
        assert!(!snap.channels[0].muted);
    }

    #[test]
    fn out_of_range_channel_is_dropped() {
        let mut snap = EffectSnapshot::default();
        assert!(!apply_parameter(&mut snap, 0, 164, 0x7F, 0x7F, 16));
    }

    #[test]
    fn sysex_parameter_change_uses_high_byte_value() {
        let mut snap = EffectSnapshot::default();
        // reverb level at address (0, 122), 8-bit value 0x7F.
        let msg = [MANUFACTURER_ID, 0x00, PARAMETER_CHANGE, 0x00, 0, 122, 0x7F];
        assert!(decode_sysex(&mut snap, &msg, 0));
        // (0x7F << 7) of 16383 is just below full scale.
        assert!(snap.reverb.level > 0.99);
    }

    #[test]
    fn foreign_vendor_is_ignored() {
        let mut snap = EffectSnapshot::default();
        let before = snap.clone();
        let msg = [0x41, 0x00, PARAMETER_CHANGE, 0x00, 0, 122, 0x7F];
        assert!(!decode_sysex(&mut snap, &msg, 0));
        assert_eq!(snap, before);
    }

    #[test]
    fn truncated_messages_never_panic() {
        let mut snap = EffectSnapshot::default();
        for len in 0..7 {
            let msg = vec![MANUFACTURER_ID; len];
            decode_sysex(&mut snap, &msg, 0);
        }
        assert!(!decode_sysex(&mut snap, &[], 0));
    }

    #[test]
    fn bulk_records_resync_after_garbage() {
        let mut snap = EffectSnapshot::default();
        let mut msg = vec![MANUFACTURER_ID, DEVICE_ID, BULK_DUMP, 0x00, BULK_SYSTEM];
        // Garbage bytes, then a valid reverb level record.
        msg.extend_from_slice(&[9, 9, 9]);
        msg.extend_from_slice(&[0, 122, 0x7F, 0x7F]);
        assert!(decode_sysex(&mut snap, &msg, 0));
        assert!((snap.reverb.level - 1.0).abs() < 1e-4);
    }

    #[test]
    fn system_dump_round_trips_within_quantization() {
        let mut snap = EffectSnapshot::default();
        snap.reverb.time = 4.2;
        snap.chorus.cross_feedback = 0.7;
        snap.equalizer.mid_gain = -6.0;
        snap.routing.reverb_to_chorus = 0.25;
        snap.global.stereo_width = 0.9;

        let dump = encode_bulk_dump(&snap, false);
        let mut restored = EffectSnapshot::default();
        assert!(decode_sysex(&mut restored, &dump, 0));

        assert!((restored.reverb.time - 4.2).abs() < 1e-3);
        assert!((restored.chorus.cross_feedback - 0.7).abs() < 1e-4);
        assert!((restored.equalizer.mid_gain - -6.0).abs() < 1e-2);
        assert!((restored.routing.reverb_to_chorus - 0.25).abs() < 1e-4);
        assert!((restored.global.stereo_width - 0.9).abs() < 1e-4);
    }

    #[test]
    fn channel_dump_round_trips_every_strip() {
        let mut snap = EffectSnapshot::default();
        for (i, ch) in snap.channels.iter_mut().enumerate() {
            ch.pan = i as f32 / 15.0;
            ch.muted = i % 2 == 0;
            ch.insertion.kind = (i % 16) as u8;
            ch.insertion.params[2] = 0.25;
        }

        let dump = encode_bulk_dump(&snap, true);
        let mut restored = EffectSnapshot::default();
        assert!(decode_sysex(&mut restored, &dump, 0));

        for i in 0..NUM_CHANNELS {
            assert!((restored.channels[i].pan - snap.channels[i].pan).abs() < 1e-4);
            assert_eq!(restored.channels[i].muted, snap.channels[i].muted);
            assert_eq!(restored.channels[i].insertion.kind, snap.channels[i].insertion.kind);
            assert!((restored.channels[i].insertion.params[2] - 0.25).abs() < 1e-4);
        }
    }

    #[test]
    fn routing_order_survives_a_dump() {
        use xgfx_params::SystemSlot;
        let mut snap = EffectSnapshot::default();
        snap.routing.system_order =
            [SystemSlot::Variation, SystemSlot::Reverb, SystemSlot::Chorus];

        let dump = encode_bulk_dump(&snap, false);
        let mut restored = EffectSnapshot::default();
        decode_sysex(&mut restored, &dump, 0);
        assert_eq!(restored.routing.system_order, snap.routing.system_order);
    }
}
