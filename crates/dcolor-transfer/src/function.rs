//! Transfer functions bound to a luminance range.
//!
//! A [`TransferFunction`] maps an encoded signal to absolute luminance:
//!
//! ```text
//! nits = curve(encoded) * (max - min) + min
//! ```
//!
//! where `curve` is the normalized shape of the [`TransferFunctionType`].
//! For PQ with the default `[0, 10000]` range this is exactly the absolute
//! ST 2084 curve. Other ranges only appear after the pipeline folds a
//! uniform brightness scale into the function.

use std::fmt;
use std::str::FromStr;

use dcolor_math::{Vec3, fuzzy_eq_relative};

use crate::{gamma, hlg, pq, srgb};

/// Relative tolerance for luminance bounds in [`TransferFunction`] equality.
const LUMINANCE_TOLERANCE: f32 = 1e-4;

/// Error returned when parsing a transfer function name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transfer function: {0}")]
pub struct ParseTransferError(pub String);

/// The shape of a transfer function curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferFunctionType {
    /// Affine: `nits = min + x * (max - min)`.
    Linear,
    /// IEC 61966-2-1 piecewise curve.
    Srgb,
    /// Pure power law with exponent 2.2.
    Gamma22,
    /// SMPTE ST 2084.
    PerceptualQuantizer,
    /// BT.2100 Hybrid Log-Gamma (no OOTF).
    Hlg,
}

impl TransferFunctionType {
    /// Every supported type.
    pub const ALL: [Self; 5] = [
        Self::Linear,
        Self::Srgb,
        Self::Gamma22,
        Self::PerceptualQuantizer,
        Self::Hlg,
    ];

    /// Short lowercase name, accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Srgb => "srgb",
            Self::Gamma22 => "gamma22",
            Self::PerceptualQuantizer => "pq",
            Self::Hlg => "hlg",
        }
    }

    /// Default black level in nits.
    pub const fn default_min_luminance(self) -> f32 {
        0.0
    }

    /// Default peak luminance in nits.
    pub const fn default_max_luminance(self) -> f32 {
        match self {
            Self::Linear => 1.0,
            Self::Srgb | Self::Gamma22 => 80.0,
            Self::PerceptualQuantizer => pq::L_MAX,
            Self::Hlg => 1000.0,
        }
    }

    /// Default reference (diffuse white) luminance in nits.
    pub const fn default_reference_luminance(self) -> f32 {
        match self {
            Self::Linear => 1.0,
            Self::Srgb | Self::Gamma22 => 80.0,
            Self::PerceptualQuantizer | Self::Hlg => 203.0,
        }
    }

    /// Normalized curve: signal to relative luminance.
    #[inline]
    pub fn to_relative(self, x: f32) -> f32 {
        match self {
            Self::Linear => x,
            Self::Srgb => srgb::eotf(x),
            Self::Gamma22 => gamma::gamma22_eotf(x),
            Self::PerceptualQuantizer => pq::eotf_normalized(x),
            Self::Hlg => hlg::eotf(x),
        }
    }

    /// Normalized curve: relative luminance to signal.
    #[inline]
    pub fn from_relative(self, y: f32) -> f32 {
        match self {
            Self::Linear => y,
            Self::Srgb => srgb::oetf(y),
            Self::Gamma22 => gamma::gamma22_oetf(y),
            Self::PerceptualQuantizer => pq::oetf_normalized(y),
            Self::Hlg => hlg::oetf(y),
        }
    }
}

impl fmt::Display for TransferFunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransferFunctionType {
    type Err = ParseTransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "srgb" => Ok(Self::Srgb),
            "gamma22" | "gamma2.2" => Ok(Self::Gamma22),
            "pq" | "st2084" | "perceptualquantizer" => Ok(Self::PerceptualQuantizer),
            "hlg" => Ok(Self::Hlg),
            _ => Err(ParseTransferError(s.to_string())),
        }
    }
}

/// A transfer function curve with its luminance range.
///
/// Immutable value type. Equality compares the type exactly and the
/// luminance bounds with a small relative tolerance.
///
/// # Example
///
/// ```rust
/// use dcolor_transfer::{TransferFunction, TransferFunctionType};
///
/// let tf = TransferFunction::new(TransferFunctionType::Gamma22);
/// let nits = tf.encoded_to_nits(1.0);
/// assert_eq!(nits, 80.0);
/// assert!((tf.nits_to_encoded(nits) - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TransferFunction {
    ty: TransferFunctionType,
    min_luminance: f32,
    max_luminance: f32,
}

impl TransferFunction {
    /// Creates a transfer function with the type's default luminance range.
    pub const fn new(ty: TransferFunctionType) -> Self {
        Self {
            ty,
            min_luminance: ty.default_min_luminance(),
            max_luminance: ty.default_max_luminance(),
        }
    }

    /// Creates a transfer function with a custom luminance range.
    ///
    /// A range that is not finite or not increasing falls back to the
    /// type's defaults, so the curve never divides by zero.
    pub fn with_luminance(ty: TransferFunctionType, min_luminance: f32, max_luminance: f32) -> Self {
        if min_luminance.is_finite() && max_luminance.is_finite() && max_luminance > min_luminance {
            Self {
                ty,
                min_luminance,
                max_luminance,
            }
        } else {
            Self::new(ty)
        }
    }

    /// Curve type.
    #[inline]
    pub fn ty(&self) -> TransferFunctionType {
        self.ty
    }

    /// Luminance of encoded 0, in nits.
    #[inline]
    pub fn min_luminance(&self) -> f32 {
        self.min_luminance
    }

    /// Luminance of encoded 1, in nits.
    #[inline]
    pub fn max_luminance(&self) -> f32 {
        self.max_luminance
    }

    /// Default reference luminance for this curve type.
    #[inline]
    pub fn default_reference_luminance(&self) -> f32 {
        self.ty.default_reference_luminance()
    }

    /// Returns a copy with both luminance bounds multiplied by `factor`.
    ///
    /// This is equivalent to applying the curve and then scaling the result.
    /// Non-finite or non-positive factors leave the function unchanged.
    pub fn scaled(&self, factor: f32) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        Self::with_luminance(self.ty, self.min_luminance * factor, self.max_luminance * factor)
    }

    /// Encoded signal to nits.
    #[inline]
    pub fn encoded_to_nits(&self, encoded: f32) -> f32 {
        self.ty.to_relative(encoded) * (self.max_luminance - self.min_luminance) + self.min_luminance
    }

    /// Nits to encoded signal.
    #[inline]
    pub fn nits_to_encoded(&self, nits: f32) -> f32 {
        let relative = (nits - self.min_luminance) / (self.max_luminance - self.min_luminance);
        self.ty.from_relative(relative)
    }

    /// Per-channel [`encoded_to_nits`](Self::encoded_to_nits).
    #[inline]
    pub fn encoded_to_nits_rgb(&self, encoded: Vec3) -> Vec3 {
        encoded.map(|c| self.encoded_to_nits(c))
    }

    /// Per-channel [`nits_to_encoded`](Self::nits_to_encoded).
    #[inline]
    pub fn nits_to_encoded_rgb(&self, nits: Vec3) -> Vec3 {
        nits.map(|c| self.nits_to_encoded(c))
    }
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self::new(TransferFunctionType::Srgb)
    }
}

impl PartialEq for TransferFunction {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
            && fuzzy_eq_relative(self.min_luminance, other.min_luminance, LUMINANCE_TOLERANCE)
            && fuzzy_eq_relative(self.max_luminance, other.max_luminance, LUMINANCE_TOLERANCE)
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {}] nits", self.ty, self.min_luminance, self.max_luminance)
    }
}

impl FromStr for TransferFunction {
    type Err = ParseTransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<TransferFunctionType>().map(Self::new)
    }
}
