//! Perceptual HDR to SDR/HDR tone mapping.
//!
//! The tone mapper works on the PQ-encoded intensity channel of ICtCp.
//! Below the reference luminance it compresses linearly, trading at most
//! `max_added_headroom` of brightness for highlight space. Above it the
//! remaining input range is rolled off logarithmically into the remaining
//! output range.
//!
//! ```text
//! nits  = PQ^-1(I)
//! low   = min(nits / added_range, output_reference)
//! rel   = clamp((nits / ref - 1) / (input_range - 1), 0, 1)
//! high  = ln(rel * (e - 1) + 1) * (max_output - output_reference)
//! I'    = PQ(low + high)
//! ```

use std::f32::consts::E;
use std::fmt;

use dcolor_transfer::pq;

/// Fallback reference luminance for degenerate input, in nits.
const FALLBACK_REFERENCE: f32 = 203.0;

/// Keeps `value` if it is finite and positive, else uses `fallback`.
fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 { value } else { fallback }
}

/// Tone mapping curve applied to the ICtCp intensity channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTonemapper {
    reference_luminance: f32,
    max_input_luminance: f32,
    max_output_luminance: f32,
    max_added_headroom: f32,
    input_range: f32,
    output_range: f32,
    added_range: f32,
    output_reference_luminance: f32,
}

impl ColorTonemapper {
    /// Creates a tone mapper.
    ///
    /// Non-finite or non-positive arguments are replaced so that every
    /// derived constant stays finite: the reference falls back to 203 nits,
    /// the luminance bounds to the reference and the headroom to 1.
    pub fn new(
        reference_luminance: f32,
        max_input_luminance: f32,
        max_output_luminance: f32,
        max_added_headroom: f32,
    ) -> Self {
        let reference_luminance = positive_or(reference_luminance, FALLBACK_REFERENCE);
        let max_input_luminance = positive_or(max_input_luminance, reference_luminance);
        let max_output_luminance = positive_or(max_output_luminance, reference_luminance);
        let max_added_headroom = positive_or(max_added_headroom, 1.0).max(1.0);

        let input_range = max_input_luminance / reference_luminance;
        let output_range = max_output_luminance / reference_luminance;
        let added_range = (input_range / output_range).clamp(1.0, max_added_headroom);
        let output_reference_luminance = reference_luminance / added_range;

        Self {
            reference_luminance,
            max_input_luminance,
            max_output_luminance,
            max_added_headroom,
            input_range,
            output_range,
            added_range,
            output_reference_luminance,
        }
    }

    /// Maps a PQ-encoded intensity to the tone mapped PQ-encoded intensity.
    #[inline]
    pub fn map(&self, pq_encoded: f32) -> f32 {
        pq::oetf(self.map_nits(pq::eotf(pq_encoded)))
    }

    /// The curve in absolute luminance.
    pub fn map_nits(&self, nits: f32) -> f32 {
        let low = (nits / self.added_range).min(self.output_reference_luminance);
        let relative = if self.input_range > 1.0 {
            ((nits / self.reference_luminance - 1.0) / (self.input_range - 1.0)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let high = (relative * (E - 1.0) + 1.0).ln()
            * (self.max_output_luminance - self.output_reference_luminance);
        low + high
    }

    /// Reference (diffuse white) luminance in nits.
    #[inline]
    pub fn reference_luminance(&self) -> f32 {
        self.reference_luminance
    }

    /// Brightest input luminance in nits.
    #[inline]
    pub fn max_input_luminance(&self) -> f32 {
        self.max_input_luminance
    }

    /// Brightest output luminance in nits.
    #[inline]
    pub fn max_output_luminance(&self) -> f32 {
        self.max_output_luminance
    }

    /// Upper limit of the headroom taken from the reference.
    #[inline]
    pub fn max_added_headroom(&self) -> f32 {
        self.max_added_headroom
    }

    /// `max_input / reference`.
    #[inline]
    pub fn input_range(&self) -> f32 {
        self.input_range
    }

    /// `max_output / reference`.
    #[inline]
    pub fn output_range(&self) -> f32 {
        self.output_range
    }

    /// Headroom actually taken from the reference.
    #[inline]
    pub fn added_range(&self) -> f32 {
        self.added_range
    }

    /// Where the reference luminance lands after mapping, in nits.
    #[inline]
    pub fn output_reference_luminance(&self) -> f32 {
        self.output_reference_luminance
    }
}

impl fmt::Display for ColorTonemapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tonemap ref {} nits, {} -> {} nits",
            self.reference_luminance, self.max_input_luminance, self.max_output_luminance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_derived_constants() {
        let tm = ColorTonemapper::new(203.0, 1000.0, 400.0, 1.5);
        assert_relative_eq!(tm.input_range(), 1000.0 / 203.0);
        assert_relative_eq!(tm.output_range(), 400.0 / 203.0);
        // 2.5 clamps to the headroom limit
        assert_relative_eq!(tm.added_range(), 1.5);
        assert_relative_eq!(tm.output_reference_luminance(), 203.0 / 1.5);
    }

    #[test]
    fn test_endpoints() {
        let tm = ColorTonemapper::new(203.0, 1000.0, 400.0, 1.5);
        assert_eq!(tm.map_nits(0.0), 0.0);
        assert_relative_eq!(tm.map_nits(203.0), tm.output_reference_luminance(), max_relative = 1e-5);
        assert_relative_eq!(tm.map_nits(1000.0), 400.0, max_relative = 1e-5);
        // beyond the input peak the curve saturates
        assert_relative_eq!(tm.map_nits(5000.0), 400.0, max_relative = 1e-5);
    }

    #[test]
    fn test_monotonic() {
        let tm = ColorTonemapper::new(203.0, 4000.0, 600.0, 1.5);
        let mut prev = -1.0;
        for i in 0..=1000 {
            let v = tm.map(i as f32 / 1000.0);
            assert!(v >= prev - 1e-6, "not monotonic at {i}: {v} < {prev}");
            prev = v;
        }
    }

    #[test]
    fn test_no_headroom_needed() {
        // output has more headroom than input: reference is preserved
        let tm = ColorTonemapper::new(100.0, 150.0, 1000.0, 1.5);
        assert_eq!(tm.added_range(), 1.0);
        assert_relative_eq!(tm.map_nits(50.0), 50.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        for (r, i, o, h) in [
            (0.0, 1000.0, 100.0, 1.5),
            (f32::NAN, f32::NAN, f32::NAN, f32::NAN),
            (203.0, 0.0, 0.0, 0.0),
            (203.0, f32::INFINITY, 100.0, -1.0),
        ] {
            let tm = ColorTonemapper::new(r, i, o, h);
            assert!(tm.added_range().is_finite());
            assert!(tm.output_reference_luminance().is_finite());
            for x in [0.0, 0.25, 0.5, 0.75, 1.0] {
                assert!(tm.map(x).is_finite(), "{tm:?} at {x}");
            }
            assert_eq!(tm.map(0.0), 0.0);
        }
    }
}
