/// Round half-up to an integer pixel, matching browser `Math.round`.
///
/// `f64::round` rounds half away from zero, which disagrees with `Math.round` for negative
/// halves (`-2.5` becomes `-3` instead of `-2`). Every pixel quantization in the engine goes
/// through here so server and client agree.
pub(crate) fn round_px(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Clamp `v` into `[lo, hi]`, preferring `lo` when the range is inverted.
pub(crate) fn clamp_prefer_low(v: i64, lo: i64, hi: i64) -> i64 {
    if lo > hi {
        return lo;
    }
    v.clamp(lo, hi)
}

/// Format a number the way a JS runtime's `String(n)` would for the values we hash.
///
/// Integers print without a fractional part, other finite values use the shortest
/// round-trip representation. Negative zero prints as `0`.
pub(crate) fn canonical_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}
