//! 1-dimensional lookup table.
//!
//! Applies an independent curve to each channel. Entries are stored RGB
//! interleaved so the table uploads directly as a one-row RGB texture.

use dcolor_math::{lerp, saturate};

use crate::{LutError, LutResult};

/// A per-channel 1D lookup table.
///
/// # Example
///
/// ```rust
/// use dcolor_lut::Lut1D;
///
/// let lut = Lut1D::identity(256);
/// assert!((lut.apply_rgb([0.5, 0.25, 1.0])[1] - 0.25).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lut1D {
    entries: Vec<[f32; 3]>,
    domain_min: f32,
    domain_max: f32,
}

impl Lut1D {
    /// Creates a pass-through LUT.
    pub fn identity(size: usize) -> Self {
        Self::from_fn(size, |t| [t, t, t])
    }

    /// Creates a power curve applied to all channels.
    pub fn gamma(size: usize, gamma: f32) -> Self {
        Self::from_fn(size, |t| {
            let v = t.powf(gamma);
            [v, v, v]
        })
    }

    /// Samples `f` at `size` evenly spaced points over `[0, 1]`.
    ///
    /// Sizes below 2 are raised to 2.
    pub fn from_fn(size: usize, f: impl Fn(f32) -> [f32; 3]) -> Self {
        let size = size.max(2);
        let n = (size - 1) as f32;
        Self {
            entries: (0..size).map(|i| f(i as f32 / n)).collect(),
            domain_min: 0.0,
            domain_max: 1.0,
        }
    }

    /// Creates a LUT applying the same curve to every channel.
    pub fn from_mono(data: &[f32]) -> LutResult<Self> {
        Self::from_entries(data.iter().map(|&v| [v, v, v]).collect())
    }

    /// Creates a LUT from separate channel curves of equal length.
    pub fn from_rgb(r: &[f32], g: &[f32], b: &[f32]) -> LutResult<Self> {
        if r.len() != g.len() || r.len() != b.len() {
            return Err(LutError::InvalidSize(format!(
                "channel lengths differ: {}, {}, {}",
                r.len(),
                g.len(),
                b.len()
            )));
        }
        let entries = r.iter().zip(g).zip(b).map(|((&r, &g), &b)| [r, g, b]).collect();
        Self::from_entries(entries)
    }

    /// Creates a LUT from interleaved entries.
    pub fn from_entries(entries: Vec<[f32; 3]>) -> LutResult<Self> {
        if entries.len() < 2 {
            return Err(LutError::InvalidSize(format!(
                "need at least 2 entries, got {}",
                entries.len()
            )));
        }
        if let Some(i) = entries.iter().position(|e| e.iter().any(|v| !v.is_finite())) {
            return Err(LutError::NonFinite(i));
        }
        Ok(Self {
            entries,
            domain_min: 0.0,
            domain_max: 1.0,
        })
    }

    /// Sets the input domain.
    pub fn with_domain(mut self, min: f32, max: f32) -> LutResult<Self> {
        if !(min.is_finite() && max.is_finite() && max > min) {
            return Err(LutError::InvalidDomain { min, max });
        }
        self.domain_min = min;
        self.domain_max = max;
        Ok(self)
    }

    /// Number of entries per channel.
    #[inline]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Interleaved RGB entries.
    #[inline]
    pub fn entries(&self) -> &[[f32; 3]] {
        &self.entries
    }

    /// Input domain `(min, max)`.
    #[inline]
    pub fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    /// Applies each channel's curve with linear interpolation.
    pub fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for (c, value) in rgb.into_iter().enumerate() {
            out[c] = self.sample(c, value);
        }
        out
    }

    fn sample(&self, channel: usize, value: f32) -> f32 {
        let last = self.entries.len() - 1;
        let pos = saturate((value - self.domain_min) / (self.domain_max - self.domain_min)) * last as f32;
        let i0 = (pos.floor() as usize).min(last);
        let i1 = (i0 + 1).min(last);
        let frac = pos - i0 as f32;
        lerp(self.entries[i0][channel], self.entries[i1][channel], frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let lut = Lut1D::identity(256);
        for v in [0.0, 0.3, 0.5, 1.0] {
            assert!((lut.apply_rgb([v; 3])[0] - v).abs() < 1e-5);
        }
    }

    #[test]
    fn test_gamma() {
        let lut = Lut1D::gamma(1024, 2.0);
        assert!((lut.apply_rgb([0.5; 3])[2] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_per_channel() {
        let lut = Lut1D::from_rgb(&[0.0, 1.0], &[1.0, 0.0], &[0.5, 0.5]).unwrap();
        assert_eq!(lut.apply_rgb([0.25, 0.25, 0.25]), [0.25, 0.75, 0.5]);
    }

    #[test]
    fn test_clamps_outside_domain() {
        let lut = Lut1D::gamma(64, 2.0);
        assert_eq!(lut.apply_rgb([-1.0; 3]), [0.0; 3]);
        assert_eq!(lut.apply_rgb([3.0; 3]), [1.0; 3]);
        assert_eq!(lut.apply_rgb([f32::NAN; 3]), [0.0; 3]);
    }

    #[test]
    fn test_domain() {
        let lut = Lut1D::identity(2).with_domain(0.0, 2.0).unwrap();
        assert_eq!(lut.apply_rgb([1.0; 3]), [0.5; 3]);
        assert!(Lut1D::identity(2).with_domain(1.0, 1.0).is_err());
    }

    #[test]
    fn test_invalid_data() {
        assert!(matches!(Lut1D::from_mono(&[1.0]), Err(LutError::InvalidSize(_))));
        assert!(matches!(Lut1D::from_rgb(&[0.0, 1.0], &[0.0], &[0.0, 1.0]), Err(LutError::InvalidSize(_))));
        assert_eq!(Lut1D::from_mono(&[0.0, f32::NAN]), Err(LutError::NonFinite(1)));
    }
}
