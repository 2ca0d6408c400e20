//! Pipeline operations.
//!
//! A [`ColorOp`] is one step of a [`ColorPipeline`](crate::ColorPipeline):
//! the operation itself plus the value ranges expected before and after it.
//! The set of operations is closed; the CPU evaluator here and the shader
//! serializer match on it exhaustively.

use std::fmt;
use std::sync::Arc;

use dcolor_lut::{Lut1D, Lut3D};
use dcolor_math::{Mat4, Vec3};
use dcolor_transfer::TransferFunction;

use crate::range::ValueRange;
use crate::tonemap::ColorTonemapper;

/// The operation performed by a [`ColorOp`].
#[derive(Clone)]
pub enum ColorOpKind {
    /// Affine 4x4 transform of the RGB triple.
    Matrix(Mat4),
    /// Per-channel scale.
    Multiplier(Vec3),
    /// Encoded signal to nits.
    TransferFunction(TransferFunction),
    /// Nits to encoded signal.
    InverseTransferFunction(TransferFunction),
    /// Tone mapping of the ICtCp intensity channel.
    Tonemapper(ColorTonemapper),
    /// Per-channel 1D lookup table.
    Lut1D(Arc<Lut1D>),
    /// 3D lookup table.
    Lut3D(Arc<Lut3D>),
}

impl ColorOpKind {
    /// Applies the operation to one RGB triple.
    #[inline]
    pub fn apply(&self, rgb: Vec3) -> Vec3 {
        match self {
            Self::Matrix(m) => m.transform_point(rgb),
            Self::Multiplier(f) => rgb * *f,
            Self::TransferFunction(tf) => tf.encoded_to_nits_rgb(rgb),
            Self::InverseTransferFunction(tf) => tf.nits_to_encoded_rgb(rgb),
            Self::Tonemapper(tm) => Vec3::new(tm.map(rgb.x), rgb.y, rgb.z),
            Self::Lut1D(lut) => Vec3::from(lut.apply_rgb(rgb.to_array())),
            Self::Lut3D(lut) => Vec3::from(lut.apply(rgb.to_array())),
        }
    }

    /// Short lowercase name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Matrix(_) => "matrix",
            Self::Multiplier(_) => "multiplier",
            Self::TransferFunction(_) => "transfer",
            Self::InverseTransferFunction(_) => "inverse-transfer",
            Self::Tonemapper(_) => "tonemapper",
            Self::Lut1D(_) => "lut1d",
            Self::Lut3D(_) => "lut3d",
        }
    }
}

// LUTs compare by identity: two ops are the same if they share the table.
impl PartialEq for ColorOpKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Matrix(a), Self::Matrix(b)) => a == b,
            (Self::Multiplier(a), Self::Multiplier(b)) => a == b,
            (Self::TransferFunction(a), Self::TransferFunction(b)) => a == b,
            (Self::InverseTransferFunction(a), Self::InverseTransferFunction(b)) => a == b,
            (Self::Tonemapper(a), Self::Tonemapper(b)) => a == b,
            (Self::Lut1D(a), Self::Lut1D(b)) => Arc::ptr_eq(a, b),
            (Self::Lut3D(a), Self::Lut3D(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ColorOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matrix(m) => f.debug_tuple("Matrix").field(&m.m).finish(),
            Self::Multiplier(v) => f.debug_tuple("Multiplier").field(v).finish(),
            Self::TransferFunction(tf) => f.debug_tuple("TransferFunction").field(tf).finish(),
            Self::InverseTransferFunction(tf) => {
                f.debug_tuple("InverseTransferFunction").field(tf).finish()
            }
            Self::Tonemapper(tm) => f.debug_tuple("Tonemapper").field(tm).finish(),
            Self::Lut1D(lut) => write!(f, "Lut1D({} entries)", lut.size()),
            Self::Lut3D(lut) => write!(f, "Lut3D({}^3)", lut.size()),
        }
    }
}

impl fmt::Display for ColorOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matrix(m) => {
                write!(f, "matrix")?;
                for row in &m.m[..3] {
                    write!(f, " [{:.6} {:.6} {:.6} | {:.6}]", row[0], row[1], row[2], row[3])?;
                }
                Ok(())
            }
            Self::Multiplier(v) => write!(f, "multiplier ({:.6}, {:.6}, {:.6})", v.x, v.y, v.z),
            Self::TransferFunction(tf) => write!(f, "transfer {tf}"),
            Self::InverseTransferFunction(tf) => write!(f, "inverse-transfer {tf}"),
            Self::Tonemapper(tm) => write!(f, "{tm}"),
            Self::Lut1D(lut) => write!(f, "lut1d {} entries", lut.size()),
            Self::Lut3D(lut) => write!(f, "lut3d {}^3", lut.size()),
        }
    }
}

/// One step of a color pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorOp {
    /// Expected range of the values entering this op.
    pub input: ValueRange,
    /// What the op does.
    pub operation: ColorOpKind,
    /// Expected range of the values leaving this op.
    pub output: ValueRange,
}

impl ColorOp {
    /// Creates an op.
    pub fn new(input: ValueRange, operation: ColorOpKind, output: ValueRange) -> Self {
        Self {
            input,
            operation,
            output,
        }
    }

    /// Applies the op to one RGB triple.
    #[inline]
    pub fn apply(&self, rgb: Vec3) -> Vec3 {
        self.operation.apply(rgb)
    }
}

impl fmt::Display for ColorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.operation, self.input, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dcolor_transfer::TransferFunctionType;

    #[test]
    fn test_matrix_apply() {
        let op = ColorOpKind::Matrix(Mat4::translation(Vec3::splat(0.5)) * Mat4::uniform_scaling(2.0));
        assert_eq!(op.apply(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(2.5, 4.5, 6.5));
    }

    #[test]
    fn test_transfer_apply() {
        let tf = TransferFunction::new(TransferFunctionType::Gamma22);
        let fwd = ColorOpKind::TransferFunction(tf);
        let inv = ColorOpKind::InverseTransferFunction(tf);
        let nits = fwd.apply(Vec3::ONE);
        assert_relative_eq!(nits.x, 80.0);
        let back = inv.apply(nits);
        assert_relative_eq!(back.y, 1.0, max_relative = 1e-5);
    }

    #[test]
    fn test_tonemapper_touches_intensity_only() {
        let tm = ColorTonemapper::new(203.0, 1000.0, 203.0, 1.5);
        let op = ColorOpKind::Tonemapper(tm);
        let out = op.apply(Vec3::new(0.75, 0.1, -0.2));
        assert!(out.x < 0.75);
        assert_eq!(out.y, 0.1);
        assert_eq!(out.z, -0.2);
    }

    #[test]
    fn test_lut_identity_equality() {
        let a = Arc::new(Lut1D::identity(16));
        let b = Arc::new(Lut1D::identity(16));
        assert_eq!(ColorOpKind::Lut1D(a.clone()), ColorOpKind::Lut1D(a.clone()));
        assert_ne!(ColorOpKind::Lut1D(a), ColorOpKind::Lut1D(b));
    }

    #[test]
    fn test_display() {
        let op = ColorOp::new(
            ValueRange::UNIT,
            ColorOpKind::Multiplier(Vec3::splat(2.0)),
            ValueRange::new(0.0, 2.0),
        );
        assert_eq!(op.to_string(), "multiplier (2.000000, 2.000000, 2.000000) [0, 1] -> [0, 2]");
    }
}
