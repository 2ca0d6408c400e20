//! 3x3 matrix type for linear color transforms.
//!
//! [`Mat3`] holds RGB-to-XYZ, XYZ-to-LMS and chromatic adaptation matrices.
//! It is the linear part of every [`Mat4`](crate::Mat4) in a pipeline.
//!
//! # Convention
//!
//! Row-major storage, column vectors:
//!
//! ```text
//! | m00 m01 m02 |   | x |   | m00*x + m01*y + m02*z |
//! | m10 m11 m12 | * | y | = | m10*x + m11*y + m12*z |
//! | m20 m21 m22 |   | z |   | m20*x + m21*y + m22*z |
//! ```

use std::ops::{Index, Mul};

use glam::DMat3;

use crate::Vec3;
use crate::fuzzy::fuzzy_eq;

/// A 3x3 row-major matrix.
///
/// # Example
///
/// ```rust
/// use dcolor_math::{Mat3, Vec3};
///
/// let m = Mat3::diagonal(2.0, 3.0, 4.0);
/// assert_eq!(m * Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// Matrix elements: [row0, row1, row2]
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    /// Zero matrix.
    pub const ZERO: Self = Self { m: [[0.0; 3]; 3] };

    /// Identity matrix.
    pub const IDENTITY: Self = Self::diagonal(1.0, 1.0, 1.0);

    /// Creates a matrix from row arrays.
    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Creates a matrix from column arrays.
    #[inline]
    pub const fn from_cols(cols: [[f32; 3]; 3]) -> Self {
        Self {
            m: [
                [cols[0][0], cols[1][0], cols[2][0]],
                [cols[0][1], cols[1][1], cols[2][1]],
                [cols[0][2], cols[1][2], cols[2][2]],
            ],
        }
    }

    /// Creates a matrix whose columns are the given vectors.
    ///
    /// This is how primaries matrices are assembled: each column is the XYZ
    /// of one primary.
    #[inline]
    pub fn from_col_vecs(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_cols([c0.to_array(), c1.to_array(), c2.to_array()])
    }

    /// Creates a diagonal matrix.
    #[inline]
    pub const fn diagonal(d0: f32, d1: f32, d2: f32) -> Self {
        Self::from_rows([[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]])
    }

    /// Creates a diagonal matrix from a vector.
    #[inline]
    pub const fn from_diagonal(d: Vec3) -> Self {
        Self::diagonal(d.x, d.y, d.z)
    }

    /// Creates a uniform scale matrix.
    #[inline]
    pub const fn scale(s: f32) -> Self {
        Self::diagonal(s, s, s)
    }

    /// Returns the transpose.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.m)
    }

    /// Computes the determinant.
    #[inline]
    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Computes the inverse.
    ///
    /// Returns `None` if the matrix is singular or not finite.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < 1e-10 {
            return None;
        }
        let inv = Self::from_glam(self.to_glam().inverse());
        inv.is_finite().then_some(inv)
    }

    /// Transforms a vector (`self * v`).
    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Matrix product `self * other`.
    #[inline]
    pub fn mul_mat(&self, other: &Self) -> Self {
        let mut result = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                result.m[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j];
            }
        }
        result
    }

    /// Returns true if all elements are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|x| x.is_finite())
    }

    /// Returns true if every element is within tolerance of `other`.
    pub fn fuzzy_eq(&self, other: &Self) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| fuzzy_eq(*a, *b))
    }

    /// Converts to glam (column-major).
    #[inline]
    pub fn to_glam(&self) -> glam::Mat3 {
        glam::Mat3::from_cols_array_2d(&self.transpose().m)
    }

    /// Creates from glam.
    #[inline]
    pub fn from_glam(m: glam::Mat3) -> Self {
        Self::from_cols(m.to_cols_array_2d())
    }

    /// Widens to a double precision glam matrix.
    #[inline]
    pub fn to_dglam(&self) -> DMat3 {
        self.to_glam().as_dmat3()
    }

    /// Rounds a double precision glam matrix.
    #[inline]
    pub fn from_dglam(m: DMat3) -> Self {
        Self::from_glam(m.as_mat3())
    }
}

/// Double precision inverse, `None` if singular or not finite.
///
/// Matrices that are derived from each other (RGB to XYZ and back) are
/// computed in `f64` and rounded once, so that a conversion and its
/// reverse cancel to within `f32` rounding.
pub fn inverse_f64(m: DMat3) -> Option<DMat3> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() < 1e-10 {
        return None;
    }
    let inv = m.inverse();
    inv.is_finite().then_some(inv)
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform(rhs)
    }
}

impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat(&rhs)
    }
}

impl Index<usize> for Mat3 {
    type Output = [f32; 3];

    #[inline]
    fn index(&self, i: usize) -> &[f32; 3] {
        &self.m[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: Mat3 = Mat3::from_rows([[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]);

    #[test]
    fn test_mat3_identity() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat3::IDENTITY * v, v);
    }

    #[test]
    fn test_mat3_determinant() {
        assert!((SAMPLE.determinant() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mat3_inverse() {
        let inv = SAMPLE.inverse().unwrap();
        assert!((SAMPLE * inv).fuzzy_eq(&Mat3::IDENTITY));
    }

    #[test]
    fn test_mat3_singular() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [1.0, 1.0, 1.0]]);
        assert!(m.inverse().is_none());
        let nan = Mat3::scale(f32::NAN);
        assert!(nan.inverse().is_none());
    }

    #[test]
    fn test_mat3_product_order() {
        // b * a applies a first
        let a = Mat3::diagonal(2.0, 1.0, 1.0);
        let b = Mat3::from_rows([[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let v = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!((b * a) * v, b * (a * v));
        assert_eq!((b * a) * v, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_mat3_glam_roundtrip() {
        assert_eq!(Mat3::from_glam(SAMPLE.to_glam()), SAMPLE);
    }
}
