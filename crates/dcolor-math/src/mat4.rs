//! Homogeneous 4x4 matrix for affine color transforms.
//!
//! Pipelines carry colors as `(r, g, b, 1)` so that a single matrix can both
//! mix channels and add an offset. Offsets appear with black point
//! compensation and with linear transfer functions that have a non-zero
//! minimum luminance.
//!
//! Only affine matrices are produced in practice (bottom row `0 0 0 1`);
//! [`Mat4::transform_point`] relies on that and ignores the bottom row.

use std::ops::Mul;

use crate::fuzzy::{fuzzy_eq, fuzzy_is_zero};
use crate::{Mat3, Vec3};

/// A 4x4 row-major affine matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// Matrix elements: [row0, row1, row2, row3]
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    /// Creates a matrix from row arrays.
    #[inline]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { m: rows }
    }

    /// Builds an affine matrix from a linear part and a translation.
    pub const fn from_linear_translation(linear: Mat3, t: Vec3) -> Self {
        let l = &linear.m;
        Self::from_rows([
            [l[0][0], l[0][1], l[0][2], t.x],
            [l[1][0], l[1][1], l[1][2], t.y],
            [l[2][0], l[2][1], l[2][2], t.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Embeds a 3x3 matrix with no translation.
    #[inline]
    pub const fn from_mat3(linear: Mat3) -> Self {
        Self::from_linear_translation(linear, Vec3::ZERO)
    }

    /// Pure translation.
    #[inline]
    pub const fn translation(t: Vec3) -> Self {
        Self::from_linear_translation(Mat3::IDENTITY, t)
    }

    /// Per-channel scaling.
    #[inline]
    pub const fn scaling(s: Vec3) -> Self {
        Self::from_mat3(Mat3::from_diagonal(s))
    }

    /// Uniform scaling.
    #[inline]
    pub const fn uniform_scaling(s: f32) -> Self {
        Self::scaling(Vec3::splat(s))
    }

    /// The upper-left 3x3 block.
    #[inline]
    pub fn linear(&self) -> Mat3 {
        let m = &self.m;
        Mat3::from_rows([
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ])
    }

    /// The translation column.
    #[inline]
    pub fn translation_vec(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// The diagonal of the linear part.
    #[inline]
    pub fn scaling_vec(&self) -> Vec3 {
        Vec3::new(self.m[0][0], self.m[1][1], self.m[2][2])
    }

    /// Transforms `(v, 1)` and drops the homogeneous coordinate.
    ///
    /// Each row is accumulated in `f64` so large opposing terms cancel
    /// without losing the small remainder.
    #[inline]
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        let (x, y, z) = (f64::from(v.x), f64::from(v.y), f64::from(v.z));
        let row = |r: &[f32; 4]| {
            (f64::from(r[0]) * x + f64::from(r[1]) * y + f64::from(r[2]) * z + f64::from(r[3])) as f32
        };
        Vec3::new(row(&self.m[0]), row(&self.m[1]), row(&self.m[2]))
    }

    /// Matrix product `self * other`.
    pub fn mul_mat(&self, other: &Self) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4)
                    .map(|k| f64::from(self.m[i][k]) * f64::from(other.m[k][j]))
                    .sum::<f64>() as f32;
            }
        }
        Self::from_rows(out)
    }

    /// Computes the inverse.
    ///
    /// Returns `None` for singular or non-finite matrices.
    pub fn inverse(&self) -> Option<Self> {
        let g = self.to_glam();
        let det = g.determinant();
        if !det.is_finite() || det.abs() < 1e-10 {
            return None;
        }
        let inv = Self::from_glam(g.inverse());
        inv.is_finite().then_some(inv)
    }

    /// Returns true if all elements are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|x| x.is_finite())
    }

    /// Element-wise fuzzy equality.
    pub fn fuzzy_eq(&self, other: &Self) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| fuzzy_eq(*a, *b))
    }

    /// Returns true if this is (nearly) the identity, translation included.
    #[inline]
    pub fn is_fuzzy_identity(&self) -> bool {
        self.fuzzy_eq(&Self::IDENTITY)
    }

    /// Returns true if only the diagonal of the linear part is non-trivial.
    ///
    /// Such a matrix is equivalent to a per-channel multiplier.
    pub fn is_fuzzy_scaling_only(&self) -> bool {
        (0..4).all(|i| {
            (0..4).all(|j| {
                if i == j {
                    i < 3 || fuzzy_eq(self.m[i][j], 1.0)
                } else {
                    fuzzy_is_zero(self.m[i][j])
                }
            })
        })
    }

    /// Column-major element array, the layout of a WGSL `mat4x4<f32>`.
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.to_glam().to_cols_array()
    }

    /// Converts to glam (column-major).
    pub fn to_glam(&self) -> glam::Mat4 {
        glam::Mat4::from_cols_array_2d(&self.m).transpose()
    }

    /// Creates from glam.
    pub fn from_glam(m: glam::Mat4) -> Self {
        Self::from_rows(m.transpose().to_cols_array_2d())
    }

    /// Rounds a double precision glam matrix.
    pub fn from_dglam(m: glam::DMat4) -> Self {
        Self::from_glam(m.as_mat4())
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat3> for Mat4 {
    fn from(m: Mat3) -> Self {
        Self::from_mat3(m)
    }
}

impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform_point(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mat4_affine_order() {
        let m = Mat4::translation(Vec3::splat(1.0)) * Mat4::uniform_scaling(2.0);
        assert_eq!(m.transform_point(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(3.0, 5.0, 7.0));
    }

    #[test]
    fn test_mat4_inverse() {
        let m = Mat4::translation(Vec3::new(0.1, 0.2, 0.3))
            * Mat4::from_mat3(Mat3::from_rows([[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]));
        let inv = m.inverse().unwrap();
        assert!((inv * m).is_fuzzy_identity());
        let p = Vec3::new(0.3, -0.2, 0.9);
        let back = inv.transform_point(m.transform_point(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-5);
    }

    #[test]
    fn test_transform_point_keeps_cancelled_remainder() {
        // 1e8 + 1 - 1e8 is 0 in f32 but 1 in f64
        let m = Mat4::from_mat3(Mat3::from_rows([[1.0, 1.0, -1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]));
        let p = m.transform_point(Vec3::new(1e8, 1.0, 1e8));
        assert_eq!(p.x, 1.0);
    }

    #[test]
    fn test_mat4_singular() {
        assert!(Mat4::uniform_scaling(0.0).inverse().is_none());
        assert!(Mat4::uniform_scaling(f32::NAN).inverse().is_none());
    }

    #[test]
    fn test_mat4_scaling_only() {
        assert!(Mat4::scaling(Vec3::new(1.0, 2.0, 3.0)).is_fuzzy_scaling_only());
        assert!(!Mat4::translation(Vec3::splat(0.1)).is_fuzzy_scaling_only());
        let mut m = Mat4::IDENTITY;
        m.m[0][1] = 0.5;
        assert!(!m.is_fuzzy_scaling_only());
        m.m[0][1] = 1e-7;
        assert!(m.is_fuzzy_scaling_only());
    }

    #[test]
    fn test_mat4_cols_layout() {
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        let cols = m.to_cols_array();
        // Translation lives in the fourth column
        assert_eq!(&cols[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(cols[15], 1.0);
    }

    #[test]
    fn test_mat4_glam_roundtrip() {
        let m = Mat4::from_linear_translation(Mat3::diagonal(2.0, 3.0, 4.0), Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(Mat4::from_glam(m.to_glam()), m);
    }
}
