//! Hybrid Log-Gamma (ITU-R BT.2100).
//!
//! Only the OETF and its inverse are provided; the display OOTF (system
//! gamma) is not applied, so decoded values are relative scene light.

const A: f32 = 0.17883277;
const B: f32 = 0.28466892; // 1 - 4*A
const C: f32 = 0.55991073; // 0.5 - A*ln(4*A)

/// HLG OETF: relative scene light [0, 1] to signal.
#[inline]
pub fn oetf(e: f32) -> f32 {
    if e <= 0.0 {
        0.0
    } else if e <= 1.0 / 12.0 {
        (3.0 * e).sqrt()
    } else {
        A * (12.0 * e - B).ln() + C
    }
}

/// HLG inverse OETF: signal to relative scene light.
#[inline]
pub fn eotf(ep: f32) -> f32 {
    if ep <= 0.0 {
        0.0
    } else if ep <= 0.5 {
        ep * ep / 3.0
    } else {
        (((ep - C) / A).exp() + B) / 12.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for e in [0.0, 0.01, 1.0 / 12.0, 0.25, 0.5, 1.0] {
            let rt = eotf(oetf(e));
            assert!((e - rt).abs() < 1e-5, "e={e}, rt={rt}");
        }
    }

    #[test]
    fn test_segment_boundary() {
        // Both segments meet at signal 0.5
        assert!((oetf(1.0 / 12.0) - 0.5).abs() < 1e-6);
        assert!((oetf(1.0) - 1.0).abs() < 1e-3);
    }
}
