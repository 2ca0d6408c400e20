//! Fuzzy float comparison.
//!
//! Pipeline construction multiplies many matrices together; the results
//! carry float noise that must still be recognized as identity, diagonal
//! or equal-to-another-value. Every such check in the workspace goes
//! through the helpers here so they agree on one tolerance.

/// Absolute tolerance for matrix identity and structural checks.
pub const FUZZY_EPSILON: f32 = 1e-5;

/// Returns true if `a` and `b` differ by at most [`FUZZY_EPSILON`].
#[inline]
pub fn fuzzy_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= FUZZY_EPSILON
}

/// Returns true if `x` is within [`FUZZY_EPSILON`] of zero.
#[inline]
pub fn fuzzy_is_zero(x: f32) -> bool {
    x.abs() <= FUZZY_EPSILON
}

/// Relative comparison for quantities with large magnitudes (nits).
///
/// `tolerance` is relative to the larger magnitude, with [`FUZZY_EPSILON`]
/// as an absolute floor so values near zero still compare equal.
#[inline]
pub fn fuzzy_eq_relative(a: f32, b: f32, tolerance: f32) -> bool {
    let diff = (a - b).abs();
    diff <= FUZZY_EPSILON || diff <= tolerance * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_eq() {
        assert!(fuzzy_eq(1.0, 1.000_005));
        assert!(!fuzzy_eq(1.0, 1.001));
        assert!(!fuzzy_eq(f32::NAN, f32::NAN));
    }

    #[test]
    fn test_fuzzy_relative() {
        assert!(fuzzy_eq_relative(10000.0, 10000.5, 1e-4));
        assert!(!fuzzy_eq_relative(10000.0, 10010.0, 1e-4));
        assert!(fuzzy_eq_relative(0.0, 1e-6, 1e-4));
    }
}
