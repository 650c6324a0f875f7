//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor a f64 and clamp it to the u32 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).floor();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Convert a millisecond count into fractional seconds.
#[must_use]
pub fn millis_to_secs(millis: u32) -> f64 {
    f64::from(millis) / 1_000.0
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert usize to u32, saturating at `u32::MAX`.
#[must_use]
pub fn usize_to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_clamps_and_handles_non_finite() {
        assert_eq!(floor_f64_to_u32(230.9), 230);
        assert_eq!(floor_f64_to_u32(-4.0), 0);
        assert_eq!(floor_f64_to_u32(f64::NAN), 0);
        assert_eq!(floor_f64_to_u32(f64::from(u32::MAX) * 2.0), u32::MAX);
    }

    #[test]
    fn millis_convert_to_seconds() {
        assert!((millis_to_secs(1_500) - 1.5).abs() < f64::EPSILON);
        assert!(millis_to_secs(0).abs() < f64::EPSILON);
    }

    #[test]
    fn usize_helpers_saturate() {
        assert_eq!(usize_to_u32(7), 7);
        assert!((usize_to_f64(12) - 12.0).abs() < f64::EPSILON);
    }
}
