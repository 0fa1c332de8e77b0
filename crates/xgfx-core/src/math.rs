//! Small math helpers used across the effect processors.

/// Convert decibels to a linear gain factor.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    libm::expf(db * core::f32::consts::LN_10 / 20.0)
}

/// Convert a linear gain factor to decibels. Values at or below
/// `1e-10` are floored to avoid `-inf`.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    20.0 * libm::log10f(linear.max(1e-10))
}

/// Linear interpolation between `a` and `b` by `t` in `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert a time in milliseconds to a sample count at `sample_rate`.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Equal-sum wet/dry blend: `mix` of 0 is fully dry, 1 fully wet.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

/// Sum a stereo pair to mono at equal power.
#[inline]
pub fn mono_sum(left: f32, right: f32) -> f32 {
    (left + right) * 0.5
}

/// Flush denormal values to zero so feedback paths never slow down.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_round_trip() {
        for db in [-24.0, -6.0, 0.0, 6.0, 12.0] {
            assert!((linear_to_db(db_to_linear(db)) - db).abs() < 1e-3);
        }
    }

    #[test]
    fn zero_db_is_unity() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn linear_to_db_floors_silence() {
        assert!(linear_to_db(0.0) <= -200.0 + 1e-3);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn ms_conversion() {
        assert_eq!(ms_to_samples(1000.0, 48000.0), 48000.0);
        assert_eq!(ms_to_samples(10.0, 44100.0), 441.0);
    }

    #[test]
    fn wet_dry_extremes() {
        assert_eq!(wet_dry_mix(0.2, 0.9, 0.0), 0.2);
        assert_eq!(wet_dry_mix(0.2, 0.9, 1.0), 0.9);
    }

    #[test]
    fn denormals_flushed() {
        assert_eq!(flush_denormal(1e-30), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }
}
