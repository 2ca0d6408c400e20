//! 3-dimensional lookup table.
//!
//! Entries are stored with red varying fastest, then green, then blue:
//! the memory order of a `size x size x size` 3D texture.

use dcolor_math::{lerp, saturate};

use crate::{Interpolation, LutError, LutResult};

/// An RGB cube lookup table.
///
/// # Example
///
/// ```rust
/// use dcolor_lut::Lut3D;
///
/// let lut = Lut3D::from_fn(9, |[r, g, b]| [g, b, r]);
/// let out = lut.apply([0.25, 0.5, 0.75]);
/// assert!((out[0] - 0.5).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    data: Vec<[f32; 3]>,
    size: usize,
    interpolation: Interpolation,
}

impl Lut3D {
    /// Creates a pass-through cube.
    pub fn identity(size: usize) -> Self {
        Self::from_fn(size, |rgb| rgb)
    }

    /// Samples `f` on a `size^3` grid over the unit cube.
    ///
    /// Sizes below 2 are raised to 2.
    pub fn from_fn(size: usize, f: impl Fn([f32; 3]) -> [f32; 3]) -> Self {
        let size = size.max(2);
        let n = (size - 1) as f32;
        let mut data = Vec::with_capacity(size * size * size);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    data.push(f([r as f32 / n, g as f32 / n, b as f32 / n]));
                }
            }
        }
        Self {
            data,
            size,
            interpolation: Interpolation::Linear,
        }
    }

    /// Creates a cube from raw data with exactly `size^3` entries.
    pub fn from_data(data: Vec<[f32; 3]>, size: usize) -> LutResult<Self> {
        let expected = size * size * size;
        if size < 2 || data.len() != expected {
            return Err(LutError::InvalidSize(format!(
                "expected {expected} entries for size {size}, got {}",
                data.len()
            )));
        }
        if let Some(i) = data.iter().position(|e| e.iter().any(|v| !v.is_finite())) {
            return Err(LutError::NonFinite(i));
        }
        Ok(Self {
            data,
            size,
            interpolation: Interpolation::Linear,
        })
    }

    /// Sets the interpolation method used by [`apply`](Self::apply).
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Grid points per axis.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw entries, red fastest.
    #[inline]
    pub fn data(&self) -> &[[f32; 3]] {
        &self.data
    }

    /// Interpolation method.
    #[inline]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    #[inline]
    fn get(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        self.data[(b * self.size + g) * self.size + r]
    }

    /// Looks up an RGB value. Inputs are clamped to the unit cube.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let n = (self.size - 1) as f32;
        let pos = rgb.map(|v| saturate(v) * n);
        match self.interpolation {
            Interpolation::Nearest => {
                let [r, g, b] = pos.map(|p| p.round() as usize);
                self.get(r, g, b)
            }
            Interpolation::Linear => self.trilinear(pos),
            Interpolation::Tetrahedral => self.tetrahedral(pos),
        }
    }

    // Lower grid corner and fractional offsets
    fn cell(&self, pos: [f32; 3]) -> ([usize; 3], [f32; 3]) {
        let i = pos.map(|p| (p.floor() as usize).min(self.size - 2));
        let f = [pos[0] - i[0] as f32, pos[1] - i[1] as f32, pos[2] - i[2] as f32];
        (i, f)
    }

    fn trilinear(&self, pos: [f32; 3]) -> [f32; 3] {
        let ([ri, gi, bi], [rf, gf, bf]) = self.cell(pos);
        let c000 = self.get(ri, gi, bi);
        let c100 = self.get(ri + 1, gi, bi);
        let c010 = self.get(ri, gi + 1, bi);
        let c110 = self.get(ri + 1, gi + 1, bi);
        let c001 = self.get(ri, gi, bi + 1);
        let c101 = self.get(ri + 1, gi, bi + 1);
        let c011 = self.get(ri, gi + 1, bi + 1);
        let c111 = self.get(ri + 1, gi + 1, bi + 1);

        std::array::from_fn(|c| {
            let c00 = lerp(c000[c], c100[c], rf);
            let c10 = lerp(c010[c], c110[c], rf);
            let c01 = lerp(c001[c], c101[c], rf);
            let c11 = lerp(c011[c], c111[c], rf);
            lerp(lerp(c00, c10, gf), lerp(c01, c11, gf), bf)
        })
    }

    fn tetrahedral(&self, pos: [f32; 3]) -> [f32; 3] {
        let ([ri, gi, bi], [rf, gf, bf]) = self.cell(pos);
        let c000 = self.get(ri, gi, bi);
        let c111 = self.get(ri + 1, gi + 1, bi + 1);

        // Walk from c000 to c111 along the edges ordered by fraction size
        let (w, p1, p2) = if rf > gf {
            if gf > bf {
                ([rf, gf, bf], self.get(ri + 1, gi, bi), self.get(ri + 1, gi + 1, bi))
            } else if rf > bf {
                ([rf, bf, gf], self.get(ri + 1, gi, bi), self.get(ri + 1, gi, bi + 1))
            } else {
                ([bf, rf, gf], self.get(ri, gi, bi + 1), self.get(ri + 1, gi, bi + 1))
            }
        } else if gf > bf {
            if rf > bf {
                ([gf, rf, bf], self.get(ri, gi + 1, bi), self.get(ri + 1, gi + 1, bi))
            } else {
                ([gf, bf, rf], self.get(ri, gi + 1, bi), self.get(ri, gi + 1, bi + 1))
            }
        } else {
            ([bf, gf, rf], self.get(ri, gi, bi + 1), self.get(ri, gi + 1, bi + 1))
        };

        std::array::from_fn(|c| {
            c000[c] + w[0] * (p1[c] - c000[c]) + w[1] * (p2[c] - p1[c]) + w[2] * (c111[c] - p2[c])
        })
    }
}
