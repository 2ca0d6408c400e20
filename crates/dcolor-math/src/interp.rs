//! Scalar interpolation helpers.

/// Linear interpolation: `a + (b - a) * t`.
///
/// `t` is not clamped, so values outside `[0, 1]` extrapolate.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps to `[0, 1]`, mapping NaN to 0.
#[inline]
pub fn saturate(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
