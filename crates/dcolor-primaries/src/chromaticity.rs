//! CIE XYZ tristimulus and xyY chromaticity values.
//!
//! Both conversions have defined results for degenerate input:
//!
//! | Input | Result |
//! |-------|--------|
//! | `Xyz` with `X + Y + Z == 0` | `XyY(0, 0, 1)` |
//! | `XyY` with `y == 0` | `Xyz(0, 0, 0)` |

use dcolor_math::{Vec3, fuzzy_is_zero};

/// CIE 1931 XYZ tristimulus value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Xyz {
    /// X
    pub x: f32,
    /// Y (luminance)
    pub y: f32,
    /// Z
    pub z: f32,
}

impl Xyz {
    /// Creates a tristimulus value.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Converts to chromaticity plus luminance.
    pub fn to_xyy(self) -> XyY {
        let sum = self.x + self.y + self.z;
        if fuzzy_is_zero(sum) {
            return XyY::new(0.0, 0.0, 1.0);
        }
        XyY::new(self.x / sum, self.y / sum, self.y)
    }

    /// As a vector.
    #[inline]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Returns a copy scaled so that `Y == 1`, or unchanged if `Y` is zero.
    pub fn normalized(self) -> Self {
        if fuzzy_is_zero(self.y) {
            self
        } else {
            Self::from(self.to_vec3() / self.y)
        }
    }
}

impl From<Vec3> for Xyz {
    #[inline]
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Xyz> for Vec3 {
    #[inline]
    fn from(v: Xyz) -> Self {
        v.to_vec3()
    }
}

/// CIE xyY: chromaticity `(x, y)` plus luminance `Y`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XyY {
    /// Chromaticity x
    pub x: f32,
    /// Chromaticity y
    pub y: f32,
    /// Luminance (CIE Y)
    pub luminance: f32,
}

impl XyY {
    /// Creates a chromaticity with luminance.
    #[inline]
    pub const fn new(x: f32, y: f32, luminance: f32) -> Self {
        Self { x, y, luminance }
    }

    /// Chromaticity with unit luminance.
    #[inline]
    pub const fn from_xy(x: f32, y: f32) -> Self {
        Self::new(x, y, 1.0)
    }

    /// Converts to tristimulus.
    pub fn to_xyz(self) -> Xyz {
        if self.y == 0.0 {
            return Xyz::new(0.0, 0.0, 0.0);
        }
        let scale = self.luminance / self.y;
        Xyz::new(self.x * scale, self.luminance, (1.0 - self.x - self.y) * scale)
    }
}
