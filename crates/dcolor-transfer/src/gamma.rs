//! Pure power-law transfer functions.
//!
//! The sign is preserved, so negative (out of gamut) components mirror the
//! positive curve instead of turning into NaN.

/// Exponent of the gamma 2.2 curve.
pub const GAMMA_22: f32 = 2.2;

/// Signal to linear with an arbitrary exponent.
#[inline]
pub fn gamma_eotf(v: f32, gamma: f32) -> f32 {
    v.signum() * v.abs().powf(gamma)
}

/// Linear to signal with an arbitrary exponent.
#[inline]
pub fn gamma_oetf(l: f32, gamma: f32) -> f32 {
    l.signum() * l.abs().powf(1.0 / gamma)
}

/// Gamma 2.2 signal to linear.
#[inline]
pub fn gamma22_eotf(v: f32) -> f32 {
    gamma_eotf(v, GAMMA_22)
}

/// Linear to gamma 2.2 signal.
#[inline]
pub fn gamma22_oetf(l: f32) -> f32 {
    gamma_oetf(l, GAMMA_22)
}
