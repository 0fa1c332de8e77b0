//! The engine aggregate and its mixing pipeline.

use tracing::{debug, trace};
use xgfx_core::math::mono_sum;
use xgfx_effects::{BoxedFx, ChorusUnit, EqualizerUnit, ReverbUnit};
use xgfx_params::{EffectSnapshot, NUM_CHANNELS, SystemSlot};

use crate::error::EngineError;

/// One channel's insertion processor plus the kind it was built for.
struct InsertionSlot {
    kind: u8,
    processor: BoxedFx,
}

/// The complete effect section of the tone generator.
///
/// Owns the parameter snapshot, every effect instance's runtime state,
/// and the protocol entry points that mutate the snapshot. Audio flows
/// through [`process`](Self::process) one 16-channel stereo frame at a
/// time.
pub struct EffectEngine {
    sample_rate: f32,
    snapshot: EffectSnapshot,
    current_channel: usize,
    reverb: ReverbUnit,
    chorus: ChorusUnit,
    equalizer: EqualizerUnit,
    variation: BoxedFx,
    variation_kind: u8,
    insertions: [InsertionSlot; NUM_CHANNELS],
}

impl EffectEngine {
    /// Create an engine with power-on defaults at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        let snapshot = EffectSnapshot::default();
        Self {
            sample_rate,
            current_channel: 0,
            reverb: ReverbUnit::new(sample_rate),
            chorus: ChorusUnit::new(sample_rate),
            equalizer: EqualizerUnit::new(sample_rate),
            variation: xgfx_effects::create_variation(snapshot.variation.kind, sample_rate),
            variation_kind: snapshot.variation.kind,
            insertions: core::array::from_fn(|ch| InsertionSlot {
                kind: snapshot.channels[ch].insertion.kind,
                processor: xgfx_effects::create_insertion(
                    snapshot.channels[ch].insertion.kind,
                    sample_rate,
                ),
            }),
            snapshot,
        }
    }

    /// The current parameter snapshot.
    pub fn snapshot(&self) -> &EffectSnapshot {
        &self.snapshot
    }

    /// Replace the full parameter snapshot. Effect processors whose
    /// type id changed are rebuilt with fresh runtime state.
    pub fn set_snapshot(&mut self, snapshot: EffectSnapshot) {
        self.snapshot = snapshot;
        self.sync_processors();
    }

    /// Set the channel cursor used to resolve channel-scoped updates
    /// that carry no explicit channel. Clamped to the channel count.
    pub fn set_current_channel(&mut self, channel: usize) {
        self.current_channel = channel.min(NUM_CHANNELS - 1);
    }

    /// Bypass the whole system effect chain.
    pub fn set_bypass_all(&mut self, bypass: bool) {
        self.snapshot.global.bypass_all = bypass;
    }

    /// Apply one 14-bit parameter update. Channel-scoped addresses use
    /// `channel` when given, else the current-channel cursor. Returns
    /// whether the address was known.
    pub fn apply_parameter(
        &mut self,
        addr_hi: u8,
        addr_lo: u8,
        value_hi: u8,
        value_lo: u8,
        channel: Option<usize>,
    ) -> bool {
        let channel = channel.unwrap_or(self.current_channel);
        xgfx_protocol::apply_parameter(
            &mut self.snapshot,
            addr_hi,
            addr_lo,
            value_hi,
            value_lo,
            channel,
        )
    }

    /// Decode one SysEx message (bytes between F0 and F7). Foreign or
    /// malformed messages are ignored.
    pub fn handle_sysex(&mut self, message: &[u8]) -> bool {
        xgfx_protocol::decode_sysex(&mut self.snapshot, message, self.current_channel)
    }

    /// Serialize the current parameters as a bulk dump.
    pub fn bulk_dump(&self, channel_scoped: bool) -> Vec<u8> {
        xgfx_protocol::encode_bulk_dump(&self.snapshot, channel_scoped)
    }

    /// Restore power-on defaults and clear every runtime buffer.
    pub fn reset(&mut self) {
        debug!("resetting effect engine to defaults");
        self.snapshot = EffectSnapshot::default();
        self.current_channel = 0;
        self.reverb.reset();
        self.chorus.reset();
        self.equalizer.reset();
        self.sync_processors();
        self.variation.reset();
        for slot in &mut self.insertions {
            slot.processor.reset();
        }
    }

    /// Change the sample rate. Parameters persist; all effect runtime
    /// state is rebuilt.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        debug!(sample_rate, "rebuilding effect state for new sample rate");
        self.sample_rate = sample_rate;
        self.reverb.set_sample_rate(sample_rate);
        self.chorus.set_sample_rate(sample_rate);
        self.equalizer.set_sample_rate(sample_rate);
        self.variation = xgfx_effects::create_variation(self.variation_kind, sample_rate);
        for slot in &mut self.insertions {
            slot.processor = xgfx_effects::create_insertion(slot.kind, sample_rate);
        }
    }

    /// The channels that currently produce output: the soloed set if
    /// any channel is soloed, otherwise the non-muted set.
    pub fn active_channels(&self) -> [bool; NUM_CHANNELS] {
        let any_solo = self.snapshot.channels.iter().any(|ch| ch.soloed);
        core::array::from_fn(|i| {
            let ch = &self.snapshot.channels[i];
            if any_solo { ch.soloed } else { !ch.muted }
        })
    }

    /// Rebuild any processor whose type id no longer matches the
    /// snapshot.
    fn sync_processors(&mut self) {
        if self.variation_kind != self.snapshot.variation.kind {
            trace!(kind = self.snapshot.variation.kind, "rebuilding variation processor");
            self.variation_kind = self.snapshot.variation.kind;
            self.variation =
                xgfx_effects::create_variation(self.variation_kind, self.sample_rate);
        }
        for (ch, slot) in self.insertions.iter_mut().enumerate() {
            let kind = self.snapshot.channels[ch].insertion.kind;
            if slot.kind != kind {
                trace!(channel = ch, kind, "rebuilding insertion processor");
                slot.kind = kind;
                slot.processor = xgfx_effects::create_insertion(kind, self.sample_rate);
            }
        }
    }

    /// Process one stereo frame for all 16 channels.
    ///
    /// `inputs` must hold exactly one stereo frame per channel;
    /// `levels` optionally scales each channel's contribution to the
    /// system bus. Returns one output frame per channel.
    pub fn process(
        &mut self,
        inputs: &[(f32, f32)],
        levels: Option<&[f32; NUM_CHANNELS]>,
    ) -> Result<[(f32, f32); NUM_CHANNELS], EngineError> {
        if inputs.len() != NUM_CHANNELS {
            return Err(EngineError::ChannelCountMismatch {
                expected: NUM_CHANNELS,
                got: inputs.len(),
            });
        }
        self.sync_processors();

        let active = self.active_channels();
        let any_active = active.iter().any(|&a| a);

        // Insertion stage and system-bus accumulation.
        let mut insertion_out = [(0.0f32, 0.0f32); NUM_CHANNELS];
        let mut bus = 0.0f32;
        for ch in 0..NUM_CHANNELS {
            if !active[ch] {
                continue;
            }
            let (in_l, in_r) = inputs[ch];
            let level = levels.map_or(1.0, |l| l[ch]);
            let strip = &self.snapshot.channels[ch];

            if strip.insertion_send > 0.0 {
                let (fx_l, fx_r) = if strip.insertion.bypass || strip.insertion.kind == 0 {
                    (in_l, in_r)
                } else {
                    let out = self.insertions[ch].processor.process(
                        strip.insertion.params,
                        in_l,
                        in_r,
                    );
                    (out.0 * strip.insertion.level, out.1 * strip.insertion.level)
                };
                insertion_out[ch] = (fx_l * strip.insertion_send, fx_r * strip.insertion_send);
            }

            bus += mono_sum(in_l, in_r)
                * (1.0 - strip.insertion_send)
                * level
                * strip.reverb_send;
        }

        // Shared system effect chain.
        let system = if !self.snapshot.global.bypass_all && any_active {
            self.process_system_bus(bus)
        } else {
            (0.0, 0.0)
        };

        // Return, pan, and master stage.
        let master = self.snapshot.global.master_level;
        let mut outputs = [(0.0f32, 0.0f32); NUM_CHANNELS];
        for ch in 0..NUM_CHANNELS {
            if !active[ch] {
                continue;
            }
            let strip = &self.snapshot.channels[ch];
            let (ins_l, ins_r) = insertion_out[ch];
            // The reverb send doubles as this channel's return weight
            // out of the system bus.
            let l = ins_l + system.0 * strip.reverb_send;
            let r = ins_r + system.1 * strip.reverb_send;
            outputs[ch] = (
                l * strip.volume * (1.0 - strip.pan) * master,
                r * strip.volume * strip.pan * master,
            );
        }
        Ok(outputs)
    }

    /// Run the mono system bus through the configured effect order,
    /// then the master EQ.
    fn process_system_bus(&mut self, bus: f32) -> (f32, f32) {
        let order = self.snapshot.routing.system_order;
        let routing = self.snapshot.routing.clone();
        let parallel = routing.parallel;

        let mut current = (bus, bus);
        // The dry bus signal passes through the chain; each stage adds
        // its wet output on top.
        let mut acc = (bus, bus);

        for slot in order {
            if parallel {
                current = (bus, bus);
            }
            match slot {
                SystemSlot::Reverb => {
                    // A positive cross-send diverts that fraction of the
                    // raw reverb output into the next stage instead of
                    // the accumulated mix.
                    let cross = if order.contains(&SystemSlot::Chorus) {
                        routing.reverb_to_chorus
                    } else {
                        0.0
                    };
                    let scale = 1.0 - cross;
                    let (l, r) = self.reverb.process(
                        &self.snapshot.reverb,
                        current.0 * scale,
                        current.1 * scale,
                    );
                    acc.0 += l;
                    acc.1 += r;
                    current = if cross > 0.0 { (l * cross, r * cross) } else { acc };
                }
                SystemSlot::Chorus => {
                    let cross = if order.contains(&SystemSlot::Variation) {
                        routing.chorus_to_variation
                    } else {
                        0.0
                    };
                    let scale = 1.0 - cross;
                    let (l, r) = self.chorus.process(
                        &self.snapshot.chorus,
                        current.0 * scale,
                        current.1 * scale,
                    );
                    acc.0 += l;
                    acc.1 += r;
                    current = if cross > 0.0 { (l * cross, r * cross) } else { acc };
                }
                SystemSlot::Variation => {
                    if !self.snapshot.variation.bypass {
                        let (l, r) = self.variation.process(
                            self.snapshot.variation.params,
                            current.0,
                            current.1,
                        );
                        acc.0 += l * self.snapshot.variation.level;
                        acc.1 += r * self.snapshot.variation.level;
                    }
                    current = acc;
                }
            }
        }

        self.equalizer
            .process(&self.snapshot.equalizer, acc.0, acc.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SILENCE: [(f32, f32); NUM_CHANNELS] = [(0.0, 0.0); NUM_CHANNELS];

    #[test]
    fn wrong_frame_count_is_a_contract_error() {
        let mut engine = EffectEngine::new(48000.0);
        let err = engine.process(&[(0.0, 0.0); 15], None).unwrap_err();
        assert_eq!(
            err,
            EngineError::ChannelCountMismatch {
                expected: 16,
                got: 15
            }
        );
    }

    #[test]
    fn current_channel_cursor_resolves_updates() {
        let mut engine = EffectEngine::new(48000.0);
        engine.set_current_channel(4);
        // Mute without an explicit channel lands on the cursor.
        assert!(engine.apply_parameter(0, 164, 0x7F, 0x7F, None));
        assert!(engine.snapshot().channels[4].muted);
        // An explicit channel overrides the cursor.
        assert!(engine.apply_parameter(0, 164, 0x7F, 0x7F, Some(9)));
        assert!(engine.snapshot().channels[9].muted);
        assert!(!engine.snapshot().channels[0].muted);
    }

    #[test]
    fn variation_kind_change_rebuilds_the_processor() {
        let mut engine = EffectEngine::new(48000.0);
        assert_eq!(engine.variation_kind, 0);
        let mut snap = engine.snapshot().clone();
        snap.variation.kind = 7;
        engine.set_snapshot(snap);
        assert_eq!(engine.variation_kind, 7);
    }

    #[test]
    fn reset_restores_defaults_and_state() {
        let mut engine = EffectEngine::new(48000.0);
        engine.apply_parameter(0, 121, 0x7F, 0x7F, None);
        engine.set_current_channel(3);
        for _ in 0..64 {
            let _ = engine.process(&[(1.0, 1.0); NUM_CHANNELS], None);
        }
        engine.reset();
        assert_eq!(*engine.snapshot(), EffectSnapshot::default());
        // First frame after reset carries no residue from before.
        let out = engine.process(&SILENCE, None).unwrap();
        assert_eq!(out[0], (0.0, 0.0));
    }

    #[test]
    fn level_multiplier_scales_bus_contribution() {
        let mut engine = EffectEngine::new(8000.0);
        // Route everything to the bus so the level is audible.
        let mut snap = engine.snapshot().clone();
        for ch in &mut snap.channels {
            ch.insertion_send = 0.0;
        }
        engine.set_snapshot(snap.clone());

        let inputs = [(1.0, 1.0); NUM_CHANNELS];
        let mut full_energy = 0.0f32;
        let _ = engine.process(&inputs, None);
        for _ in 0..4000 {
            let out = engine.process(&SILENCE, None).unwrap();
            full_energy += out[0].0.abs();
        }

        let mut quiet = EffectEngine::new(8000.0);
        quiet.set_snapshot(snap);
        let levels = [0.1f32; NUM_CHANNELS];
        let _ = quiet.process(&inputs, Some(&levels));
        let mut quiet_energy = 0.0f32;
        for _ in 0..4000 {
            let out = quiet.process(&SILENCE, None).unwrap();
            quiet_energy += out[0].0.abs();
        }
        assert!(quiet_energy < full_energy * 0.5);
    }
}
