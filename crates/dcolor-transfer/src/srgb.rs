//! sRGB piecewise transfer function (IEC 61966-2-1).
//!
//! Negative values stay on the linear toe and values above 1 continue the
//! power segment, so extended-range signals survive a round trip.

/// sRGB signal to linear.
///
/// ```text
/// if V <= 0.04045:  L = V / 12.92
/// else:             L = ((V + 0.055) / 1.055)^2.4
/// ```
#[inline]
pub fn eotf(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear to sRGB signal.
#[inline]
pub fn oetf(l: f32) -> f32 {
    if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for v in [-0.2, 0.0, 0.02, 0.04045, 0.2, 0.5, 0.8, 1.0, 1.5] {
            let rt = oetf(eotf(v));
            assert!((v - rt).abs() < 1e-5, "v={v}, rt={rt}");
        }
    }

    #[test]
    fn test_midgray() {
        assert!((eotf(0.5) - 0.214).abs() < 0.001);
    }
}
