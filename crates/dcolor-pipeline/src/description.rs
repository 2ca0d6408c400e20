//! Color descriptions: everything needed to interpret an RGB signal.
//!
//! A description pairs a [`Colorimetry`] and a [`TransferFunction`] with
//! the luminance metadata of the content or display: the reference (SDR
//! white) luminance, the black level and the optional HDR peaks.

use std::fmt;

use dcolor_math::{DMat4, DVec3, Mat4, Vec3};
use dcolor_primaries::{Colorimetry, NamedColorimetry, RenderingIntent};
use dcolor_transfer::{TransferFunction, TransferFunctionType};
use tracing::warn;

use crate::pipeline::ColorPipeline;

/// Colorimetry, transfer function and luminance metadata of a signal.
///
/// # Example
///
/// ```rust
/// use dcolor_pipeline::ColorDescription;
/// use dcolor_primaries::RenderingIntent;
/// use dcolor_math::Vec3;
///
/// let sdr = ColorDescription::srgb();
/// let hdr = ColorDescription::bt2100_pq();
/// let white = sdr.map_to(Vec3::ONE, &hdr, RenderingIntent::RelativeColorimetric);
/// // SDR white lands on the HDR reference luminance (203 nits, ~0.58 PQ)
/// assert!((white.y - 0.58).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorDescription {
    colorimetry: Colorimetry,
    transfer_function: TransferFunction,
    reference_luminance: f32,
    min_luminance: f32,
    max_average_luminance: Option<f32>,
    max_hdr_luminance: Option<f32>,
}

impl ColorDescription {
    /// Creates a description.
    ///
    /// Degenerate metadata is repaired (and logged) instead of rejected:
    ///
    /// - a non-finite or non-positive reference falls back to the transfer
    ///   function's default reference
    /// - a non-finite or negative black level becomes 0, as does one at or
    ///   above the reference
    /// - non-finite or non-positive peaks are dropped
    pub fn new(
        colorimetry: Colorimetry,
        transfer_function: TransferFunction,
        reference_luminance: f32,
        min_luminance: f32,
        max_average_luminance: Option<f32>,
        max_hdr_luminance: Option<f32>,
    ) -> Self {
        let reference = if reference_luminance.is_finite() && reference_luminance > 0.0 {
            reference_luminance
        } else {
            let fallback = transfer_function.default_reference_luminance();
            warn!(reference_luminance, fallback, "invalid reference luminance");
            fallback
        };

        let min = if min_luminance.is_finite() && min_luminance >= 0.0 && min_luminance < reference {
            min_luminance
        } else {
            warn!(min_luminance, reference, "invalid minimum luminance, using 0");
            0.0
        };

        let peak = |name: &'static str, value: Option<f32>| match value {
            Some(v) if !(v.is_finite() && v > 0.0) => {
                warn!(value = v, "invalid {name} luminance, ignoring");
                None
            }
            other => other,
        };

        Self {
            colorimetry,
            transfer_function,
            reference_luminance: reference,
            min_luminance: min,
            max_average_luminance: peak("max average", max_average_luminance),
            max_hdr_luminance: peak("max HDR", max_hdr_luminance),
        }
    }

    /// Description with luminances taken from the transfer function's
    /// defaults.
    pub fn from_transfer_function(colorimetry: Colorimetry, transfer_function: TransferFunction) -> Self {
        Self::new(
            colorimetry,
            transfer_function,
            transfer_function.default_reference_luminance(),
            transfer_function.min_luminance(),
            Some(transfer_function.max_luminance()),
            Some(transfer_function.max_luminance()),
        )
    }

    /// sRGB: BT.709 primaries, gamma 2.2 with 80 nit white.
    pub fn srgb() -> Self {
        Self::from_transfer_function(
            Colorimetry::from_name(NamedColorimetry::Bt709),
            TransferFunction::new(TransferFunctionType::Gamma22),
        )
    }

    /// BT.2100 PQ: BT.2020 primaries, 203 nit reference, 10000 nit peak.
    pub fn bt2100_pq() -> Self {
        Self::from_transfer_function(
            Colorimetry::from_name(NamedColorimetry::Bt2020),
            TransferFunction::new(TransferFunctionType::PerceptualQuantizer),
        )
    }

    /// Primaries and white point.
    #[inline]
    pub fn colorimetry(&self) -> &Colorimetry {
        &self.colorimetry
    }

    /// Encoding curve.
    #[inline]
    pub fn transfer_function(&self) -> TransferFunction {
        self.transfer_function
    }

    /// Luminance of SDR white, in nits.
    #[inline]
    pub fn reference_luminance(&self) -> f32 {
        self.reference_luminance
    }

    /// Black level, in nits.
    #[inline]
    pub fn min_luminance(&self) -> f32 {
        self.min_luminance
    }

    /// Maximum frame-average luminance, if known.
    #[inline]
    pub fn max_average_luminance(&self) -> Option<f32> {
        self.max_average_luminance
    }

    /// Peak luminance, if known.
    #[inline]
    pub fn max_hdr_luminance(&self) -> Option<f32> {
        self.max_hdr_luminance
    }

    /// Peak luminance, or the reference when no peak is known.
    #[inline]
    pub fn max_luminance(&self) -> f32 {
        self.max_hdr_luminance.unwrap_or(self.reference_luminance)
    }

    /// Returns a copy with another transfer function.
    pub fn with_transfer_function(&self, transfer_function: TransferFunction) -> Self {
        Self {
            transfer_function,
            ..*self
        }
    }

    /// Returns a copy with another reference luminance.
    pub fn with_reference_luminance(&self, reference_luminance: f32) -> Self {
        Self::new(
            self.colorimetry,
            self.transfer_function,
            reference_luminance,
            self.min_luminance,
            self.max_average_luminance,
            self.max_hdr_luminance,
        )
    }

    /// Returns a copy with the reference luminance scaled by `factor`.
    ///
    /// Used for brightness control: SDR content gets dimmer while the
    /// display's peak stays where it is.
    pub fn dimmed(&self, factor: f32) -> Self {
        self.with_reference_luminance(self.reference_luminance * factor)
    }

    /// Linear-light transform from this description to `other`, in nits.
    ///
    /// Perceptual and BPC intents map `[min, reference]` onto the
    /// destination's `[min, reference]`, so black stays black and white
    /// stays white. The other intents only scale by the reference ratio.
    ///
    /// Composed in `f64` and rounded once.
    pub fn to_other(&self, other: &ColorDescription, intent: RenderingIntent) -> Mat4 {
        let colorimetry = DMat4::from_mat3(self.colorimetry.to_other_f64(&other.colorimetry, intent));
        let min = f64::from(self.min_luminance);
        let reference = f64::from(self.reference_luminance);
        let dst_min = f64::from(other.min_luminance);
        let dst_reference = f64::from(other.reference_luminance);

        let m = if intent.compensates_black_point() {
            let before = DMat4::from_scale(DVec3::splat(1.0 / (reference - min)))
                * DMat4::from_translation(DVec3::splat(-min));
            let after = DMat4::from_translation(DVec3::splat(dst_min))
                * DMat4::from_scale(DVec3::splat(dst_reference - dst_min));
            after * colorimetry * before
        } else {
            colorimetry * DMat4::from_scale(DVec3::splat(dst_reference / reference))
        };
        Mat4::from_dglam(m)
    }

    /// Converts one encoded RGB value to `other`'s encoding.
    ///
    /// Builds a full pipeline; convert many values with
    /// [`ColorPipeline::evaluate`] instead.
    pub fn map_to(&self, rgb: Vec3, other: &ColorDescription, intent: RenderingIntent) -> Vec3 {
        ColorPipeline::create(self, other, intent).evaluate(rgb)
    }
}

impl Default for ColorDescription {
    fn default() -> Self {
        Self::srgb()
    }
}

impl fmt::Display for ColorDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {}, ref {} nits, min {} nits",
            self.colorimetry, self.transfer_function, self.reference_luminance, self.min_luminance
        )?;
        if let Some(max) = self.max_hdr_luminance {
            write!(f, ", max {max} nits")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_presets() {
        let srgb = ColorDescription::srgb();
        assert_eq!(srgb.reference_luminance(), 80.0);
        assert_eq!(srgb.min_luminance(), 0.0);
        assert_eq!(srgb.max_hdr_luminance(), Some(80.0));

        let pq = ColorDescription::bt2100_pq();
        assert_eq!(pq.reference_luminance(), 203.0);
        assert_eq!(pq.max_luminance(), 10000.0);
        assert_eq!(pq.colorimetry().name(), Some(NamedColorimetry::Bt2020));
    }

    #[test]
    fn test_sanitize() {
        let tf = TransferFunction::new(TransferFunctionType::Gamma22);
        let bt709 = Colorimetry::from_name(NamedColorimetry::Bt709);
        let d = ColorDescription::new(bt709, tf, f32::NAN, -1.0, Some(0.0), Some(f32::INFINITY));
        assert_eq!(d.reference_luminance(), 80.0);
        assert_eq!(d.min_luminance(), 0.0);
        assert_eq!(d.max_average_luminance(), None);
        assert_eq!(d.max_hdr_luminance(), None);
        assert_eq!(d.max_luminance(), 80.0);

        // black above white
        let d = ColorDescription::new(bt709, tf, 80.0, 100.0, None, None);
        assert_eq!(d.min_luminance(), 0.0);
    }

    #[test]
    fn test_to_other_relative_scales_by_reference() {
        let a = ColorDescription::srgb();
        let b = a.with_reference_luminance(160.0);
        let m = a.to_other(&b, RenderingIntent::RelativeColorimetric);
        let v = m * Vec3::new(10.0, 20.0, 40.0);
        assert_relative_eq!(v.x, 20.0, max_relative = 1e-4);
        assert_relative_eq!(v.z, 80.0, max_relative = 1e-4);
    }

    #[test]
    fn test_to_other_bpc_maps_black_and_white() {
        let tf = TransferFunction::new(TransferFunctionType::Gamma22);
        let bt709 = Colorimetry::from_name(NamedColorimetry::Bt709);
        let src = ColorDescription::new(bt709, tf, 80.0, 0.2, None, None);
        let dst = ColorDescription::new(bt709, tf, 200.0, 0.5, None, None);
        let m = src.to_other(&dst, RenderingIntent::RelativeColorimetricWithBpc);

        let black = m * Vec3::splat(0.2);
        let white = m * Vec3::splat(80.0);
        assert_relative_eq!(black.y, 0.5, max_relative = 1e-4);
        assert_relative_eq!(white.y, 200.0, max_relative = 1e-4);
    }

    #[test]
    fn test_to_other_reverse_cancels() {
        let sdr = ColorDescription::srgb();
        let hdr = ColorDescription::bt2100_pq();
        for intent in RenderingIntent::ALL {
            let rt = hdr.to_other(&sdr, intent) * sdr.to_other(&hdr, intent);
            let v = rt * Vec3::new(80.0, 0.0, 0.0);
            assert_relative_eq!(v.x, 80.0, max_relative = 1e-6);
            assert!(v.y.abs() < 1e-4 && v.z.abs() < 1e-4, "{intent}: {v:?}");
        }
    }

    #[test]
    fn test_dimmed() {
        let d = ColorDescription::bt2100_pq().dimmed(0.5);
        assert_relative_eq!(d.reference_luminance(), 101.5);
        assert_eq!(d.max_hdr_luminance(), Some(10000.0));
    }

    #[test]
    fn test_map_to_same_is_identity() {
        let d = ColorDescription::srgb();
        let v = Vec3::new(0.2, 0.5, 0.9);
        let out = d.map_to(v, &d, RenderingIntent::Perceptual);
        assert!(out.fuzzy_eq(v), "{out:?}");
    }
}
