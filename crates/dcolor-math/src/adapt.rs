//! Chromatic adaptation.
//!
//! Converting between colorimetries with different white points (D65 sRGB
//! to DCI-P3's greenish white, for instance) needs a transform that maps one
//! white onto the other. The Bradford transform does this in a sharpened
//! cone response space and is what relative colorimetric intents use.
//!
//! # Usage
//!
//! ```rust
//! use dcolor_math::{adapt_matrix, BRADFORD, D50, D65};
//!
//! let d65_to_d50 = adapt_matrix(BRADFORD, D65, D50);
//! let white = d65_to_d50 * D65;
//! assert!((white.z - D50.z).abs() < 1e-3);
//! ```

use glam::{DMat3, DVec3};

use crate::{Mat3, Vec3, inverse_f64};

/// CIE Standard Illuminant D65 (XYZ, Y = 1).
pub const D65: Vec3 = Vec3::new(0.95047, 1.0, 1.08883);

/// CIE Standard Illuminant D50 (XYZ, Y = 1).
pub const D50: Vec3 = Vec3::new(0.96422, 1.0, 0.82521);

/// CIE Standard Illuminant E (equal energy).
pub const E: Vec3 = Vec3::new(1.0, 1.0, 1.0);

/// Bradford cone response matrix.
pub const BRADFORD: Mat3 = Mat3::from_rows([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// Computes `method^-1 * diag(dst / src) * method`.
///
/// Degenerate white points (a zero cone response) produce the identity
/// rather than infinities.
pub fn adapt_matrix(method: Mat3, src_white: Vec3, dst_white: Vec3) -> Mat3 {
    Mat3::from_dglam(adapt_matrix_f64(
        method.to_dglam(),
        src_white.to_glam().as_dvec3(),
        dst_white.to_glam().as_dvec3(),
    ))
}

/// Double precision [`adapt_matrix`].
pub fn adapt_matrix_f64(method: DMat3, src_white: DVec3, dst_white: DVec3) -> DMat3 {
    let Some(method_inv) = inverse_f64(method) else {
        return DMat3::IDENTITY;
    };

    let gain = (method * dst_white) / (method * src_white);
    if !gain.is_finite() {
        return DMat3::IDENTITY;
    }

    method_inv * DMat3::from_diagonal(gain) * method
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapt_maps_white() {
        let m = adapt_matrix(BRADFORD, D65, D50);
        let w = m * D65;
        assert!((w - D50).abs().max_element() < 1e-4);
    }

    #[test]
    fn test_adapt_roundtrip() {
        let fwd = adapt_matrix(BRADFORD, D65, D50);
        let back = adapt_matrix(BRADFORD, D50, D65);
        let rt = back * fwd;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((rt.m[i][j] - expected).abs() < 1e-4, "rt[{i}][{j}] = {}", rt.m[i][j]);
            }
        }
    }

    #[test]
    fn test_adapt_same_white_is_identity() {
        assert!(adapt_matrix(BRADFORD, D65, D65).fuzzy_eq(&Mat3::IDENTITY));
    }

    #[test]
    fn test_adapt_f64_roundtrip_is_exact() {
        let d65 = D65.to_glam().as_dvec3();
        let d50 = D50.to_glam().as_dvec3();
        let method = BRADFORD.to_dglam();
        let rt = adapt_matrix_f64(method, d50, d65) * adapt_matrix_f64(method, d65, d50);
        assert!(rt.abs_diff_eq(DMat3::IDENTITY, 1e-12), "{rt:?}");
    }

    #[test]
    fn test_adapt_degenerate_white() {
        let m = adapt_matrix(BRADFORD, Vec3::ZERO, D65);
        assert_eq!(m, Mat3::IDENTITY);
    }
}
