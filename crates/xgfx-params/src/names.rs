//! Display names for the selectable effect algorithms.

/// Reverb algorithm names, indexed by kind.
pub const REVERB_TYPE_NAMES: [&str; 8] = [
    "Hall 1", "Hall 2", "Hall 3", "Room 1", "Room 2", "Room 3", "Stage", "Plate",
];

/// Chorus algorithm names, indexed by kind.
pub const CHORUS_TYPE_NAMES: [&str; 8] = [
    "Chorus 1",
    "Chorus 2",
    "Chorus 3",
    "Ensemble 1",
    "Ensemble 2",
    "Flanger",
    "Flanger 2",
    "Off",
];

/// Variation algorithm names, indexed by kind.
pub const VARIATION_TYPE_NAMES: [&str; 63] = [
    "Delay",
    "Dual Delay",
    "Echo",
    "Pan Delay",
    "Cross Delay",
    "Multi Tap",
    "Reverse Delay",
    "Tremolo",
    "Auto Pan",
    "Phaser",
    "Flanger",
    "Auto Wah",
    "Ring Mod",
    "Pitch Shifter",
    "Distortion",
    "Overdrive",
    "Compressor",
    "Limiter",
    "Gate",
    "Expander",
    "Rotary Speaker",
    "Leslie",
    "Vibrato",
    "Acoustic Simulator",
    "Guitar Amp Sim",
    "Enhancer",
    "Slicer",
    "Step Phaser",
    "Step Flanger",
    "Step Tremolo",
    "Step Pan",
    "Step Filter",
    "Auto Filter",
    "Vocoder",
    "Talk Wah",
    "Harmonizer",
    "Octave",
    "Detune",
    "Chorus/Reverb",
    "Stereo Imager",
    "Ambience",
    "Doubler",
    "Enhancer/Reverb",
    "Spectral",
    "Resonator",
    "Degrader",
    "Vinyl",
    "Looper",
    "Step Delay",
    "Step Echo",
    "Step Pan Delay",
    "Step Cross Delay",
    "Step Multi Tap",
    "Step Reverse Delay",
    "Step Ring Mod",
    "Step Pitch Shifter",
    "Step Distortion",
    "Step Overdrive",
    "Step Compressor",
    "Step Limiter",
    "Step Gate",
    "Step Expander",
    "Step Rotary Speaker",
];

/// Insertion algorithm names, indexed by kind.
pub const INSERTION_TYPE_NAMES: [&str; 16] = [
    "Off",
    "Distortion",
    "Overdrive",
    "Compressor",
    "Gate",
    "Envelope Filter",
    "Guitar Amp Sim",
    "Rotary Speaker",
    "Leslie",
    "Enhancer",
    "Slicer",
    "Vocoder",
    "Talk Wah",
    "Harmonizer",
    "Octave",
    "Detune",
];

/// Name for a reverb kind, or `"Unknown"` out of range.
pub fn reverb_type_name(kind: u8) -> &'static str {
    REVERB_TYPE_NAMES.get(kind as usize).copied().unwrap_or("Unknown")
}

/// Name for a chorus kind, or `"Unknown"` out of range.
pub fn chorus_type_name(kind: u8) -> &'static str {
    CHORUS_TYPE_NAMES.get(kind as usize).copied().unwrap_or("Unknown")
}

/// Name for a variation kind, or `"Unknown"` out of range.
pub fn variation_type_name(kind: u8) -> &'static str {
    VARIATION_TYPE_NAMES
        .get(kind as usize)
        .copied()
        .unwrap_or("Unknown")
}

/// Name for an insertion kind, or `"Unknown"` out of range.
pub fn insertion_type_name(kind: u8) -> &'static str {
    INSERTION_TYPE_NAMES
        .get(kind as usize)
        .copied()
        .unwrap_or("Unknown")
}
