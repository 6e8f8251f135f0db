//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert seconds reported by a player into whole milliseconds, clamping
/// negatives and non-finite values to zero.
#[must_use]
pub fn secs_to_millis(secs: f64) -> u64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    let millis = (secs * 1000.0).floor();
    if millis >= cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX) {
        return u64::MAX;
    }
    cast::<f64, u64>(millis).unwrap_or(0)
}

/// Convert milliseconds into seconds, allowing precision loss in one place.
#[must_use]
pub fn millis_to_secs(millis: u64) -> f64 {
    cast::<u64, f64>(millis).unwrap_or(0.0) / 1000.0
}

/// Fraction `part / whole` clamped to `0.0..=1.0`; zero when `whole` is zero.
#[must_use]
pub fn fraction(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let part = cast::<u64, f64>(part).unwrap_or(0.0);
    let whole = cast::<u64, f64>(whole).unwrap_or(1.0);
    (part / whole).clamp(0.0, 1.0)
}

/// Percentage rounded down to a whole number.
#[must_use]
pub fn percent(part: u64, whole: u64) -> u64 {
    cast::<f64, u64>((fraction(part, whole) * 100.0).floor()).unwrap_or(0)
}
