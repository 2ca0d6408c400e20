//! SMPTE ST 2084 Perceptual Quantizer (PQ).
//!
//! # Range
//!
//! - Encoded: [0, 1]
//! - Linear: [0, 10000] cd/m2
//!
//! Inputs outside these ranges are clamped, as the standard defines no
//! extension.

/// Peak luminance of the PQ curve in cd/m2.
pub const L_MAX: f32 = 10000.0;

// ST 2084 constants
const M1: f32 = 2610.0 / 16384.0;
const M2: f32 = 2523.0 / 4096.0 * 128.0;
const C1: f32 = 3424.0 / 4096.0;
const C2: f32 = 2413.0 / 4096.0 * 32.0;
const C3: f32 = 2392.0 / 4096.0 * 32.0;

/// PQ signal to absolute luminance (cd/m2).
///
/// ```rust
/// use dcolor_transfer::pq::eotf;
///
/// assert!((eotf(0.508) - 100.0).abs() < 1.0);
/// ```
#[inline]
pub fn eotf(v: f32) -> f32 {
    L_MAX * eotf_normalized(v)
}

/// Absolute luminance (cd/m2) to PQ signal.
#[inline]
pub fn oetf(nits: f32) -> f32 {
    oetf_normalized(nits / L_MAX)
}

/// PQ signal to luminance normalized to [0, 1] (1.0 = 10000 nits).
#[inline]
pub fn eotf_normalized(v: f32) -> f32 {
    if v <= 0.0 {
        return 0.0;
    }
    let vp = v.min(1.0).powf(1.0 / M2);
    let num = (vp - C1).max(0.0);
    let den = C2 - C3 * vp;
    (num / den).powf(1.0 / M1)
}

/// Normalized luminance [0, 1] to PQ signal.
#[inline]
pub fn oetf_normalized(y: f32) -> f32 {
    if y <= 0.0 {
        return 0.0;
    }
    let yp = y.min(1.0).powf(M1);
    ((C1 + C2 * yp) / (1.0 + C3 * yp)).powf(M2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for l in [0.0, 0.1, 0.5, 1.0, 10.0, 100.0, 203.0, 1000.0, 10000.0] {
            let decoded = eotf(oetf(l));
            assert!((l - decoded).abs() < l * 0.001 + 0.001, "l={l}, decoded={decoded}");
        }
    }

    #[test]
    fn test_reference_levels() {
        assert!((oetf(100.0) - 0.508).abs() < 0.01);
        assert!((oetf(203.0) - 0.58).abs() < 0.01);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(eotf(-0.5), 0.0);
        assert_eq!(oetf(-10.0), 0.0);
        assert!((eotf(1.5) - L_MAX).abs() < 1.0);
        assert!((oetf(20000.0) - 1.0).abs() < 1e-5);
    }
}
