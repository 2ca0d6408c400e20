//! Colorimetry: RGB primaries and white point.
//!
//! A [`Colorimetry`] stores its primaries as XYZ rather than xy so that
//! gamuts with a primary at `y = 0` (CIE XYZ itself) remain representable.
//! The RGB to XYZ matrix is derived once at construction:
//!
//! ```text
//! P = [R G B]            primaries as columns
//! S = P^-1 * W           per-primary scale so that RGB(1,1,1) hits white
//! to_xyz = P * diag(S)
//! ```
//!
//! The derivation and every product of derived matrices run in `f64` and
//! are rounded to `f32` once, so a conversion followed by its reverse
//! cancels to `f32` precision.
//!
//! A zero-area gamut has no inverse; such colorimetries fall back to
//! identity matrices and report [`Colorimetry::is_valid`] as false.

use std::fmt;
use std::str::FromStr;

use dcolor_math::{BRADFORD, DMat3, DVec3, Mat3, Mat4, adapt_matrix, adapt_matrix_f64, inverse_f64};

use crate::{RenderingIntent, XyY, Xyz};

/// CIE XYZ to LMS cone response (BT.2100, with crosstalk).
pub const XYZ_TO_LMS: Mat3 = Mat3::from_rows([
    [0.3592, 0.6976, -0.0358],
    [-0.1922, 1.1004, 0.0755],
    [0.0070, 0.0749, 0.8434],
]);

/// LMS to CIE XYZ, inverse of [`XYZ_TO_LMS`].
pub const LMS_TO_XYZ: Mat3 = Mat3::from_rows([
    [2.070_180_1, -1.326_456_9, 0.206_616_0],
    [0.364_988_25, 0.680_467_4, -0.045_421_753],
    [-0.049_595_542, -0.049_421_16, 1.187_996],
]);

/// PQ-encoded LMS to ICtCp (BT.2100).
pub const LMS_TO_ICTCP: Mat3 = Mat3::from_rows([
    [2048.0 / 4096.0, 2048.0 / 4096.0, 0.0],
    [6610.0 / 4096.0, -13613.0 / 4096.0, 7003.0 / 4096.0],
    [17933.0 / 4096.0, -17390.0 / 4096.0, -543.0 / 4096.0],
]);

/// ICtCp to PQ-encoded LMS, inverse of [`LMS_TO_ICTCP`].
pub const ICTCP_TO_LMS: Mat3 = Mat3::from_rows([
    [1.0, 0.008_609_037, 0.111_029_625],
    [1.0, -0.008_609_037, -0.111_029_625],
    [1.0, 0.560_031_34, -0.320_627_17],
]);

const D65_XY: (f32, f32) = (0.3127, 0.3290);
const ILLUMINANT_C_XY: (f32, f32) = (0.310, 0.316);
const DCI_XY: (f32, f32) = (0.314, 0.351);

/// Error returned when parsing a colorimetry name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown colorimetry: {0}")]
pub struct ParseColorimetryError(pub String);

/// Well-known colorimetries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColorimetry {
    /// BT.709 / sRGB.
    Bt709,
    /// BT.470 System M (PAL-M).
    PalM,
    /// BT.601 625-line (PAL).
    Pal,
    /// SMPTE 170M (NTSC).
    Ntsc,
    /// Generic film (illuminant C).
    GenericFilm,
    /// BT.2020 / BT.2100.
    Bt2020,
    /// CIE 1931 XYZ, the identity gamut.
    CieXyz,
    /// DCI-P3 with the DCI white point.
    DciP3,
    /// P3 primaries with a D65 white point.
    DisplayP3,
    /// Adobe RGB (1998).
    AdobeRgb,
}

impl NamedColorimetry {
    /// Every named colorimetry.
    pub const ALL: [Self; 10] = [
        Self::Bt709,
        Self::PalM,
        Self::Pal,
        Self::Ntsc,
        Self::GenericFilm,
        Self::Bt2020,
        Self::CieXyz,
        Self::DciP3,
        Self::DisplayP3,
        Self::AdobeRgb,
    ];

    /// Short lowercase name, accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bt709 => "bt709",
            Self::PalM => "pal-m",
            Self::Pal => "pal",
            Self::Ntsc => "ntsc",
            Self::GenericFilm => "film",
            Self::Bt2020 => "bt2020",
            Self::CieXyz => "ciexyz",
            Self::DciP3 => "dci-p3",
            Self::DisplayP3 => "display-p3",
            Self::AdobeRgb => "adobe-rgb",
        }
    }

    // (red, green, blue, white) xy chromaticities
    const fn chromaticities(self) -> [(f32, f32); 4] {
        match self {
            Self::Bt709 => [(0.64, 0.33), (0.30, 0.60), (0.15, 0.06), D65_XY],
            Self::PalM => [(0.67, 0.33), (0.21, 0.71), (0.14, 0.08), ILLUMINANT_C_XY],
            Self::Pal => [(0.64, 0.33), (0.29, 0.60), (0.15, 0.06), D65_XY],
            Self::Ntsc => [(0.630, 0.340), (0.310, 0.595), (0.155, 0.070), D65_XY],
            Self::GenericFilm => [(0.681, 0.319), (0.243, 0.692), (0.145, 0.049), ILLUMINANT_C_XY],
            Self::Bt2020 => [(0.708, 0.292), (0.170, 0.797), (0.131, 0.046), D65_XY],
            // Only used for the white point; primaries are built from XYZ directly
            Self::CieXyz => [(1.0, 0.0), (0.0, 1.0), (0.0, 0.0), (1.0 / 3.0, 1.0 / 3.0)],
            Self::DciP3 => [(0.680, 0.320), (0.265, 0.690), (0.150, 0.060), DCI_XY],
            Self::DisplayP3 => [(0.680, 0.320), (0.265, 0.690), (0.150, 0.060), D65_XY],
            Self::AdobeRgb => [(0.64, 0.33), (0.21, 0.71), (0.15, 0.06), D65_XY],
        }
    }
}

impl fmt::Display for NamedColorimetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedColorimetry {
    type Err = ParseColorimetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_ascii_lowercase().replace(['_', '.'], "-");
        match key.as_str() {
            "bt709" | "rec709" | "srgb" => Ok(Self::Bt709),
            "pal-m" | "palm" => Ok(Self::PalM),
            "pal" => Ok(Self::Pal),
            "ntsc" => Ok(Self::Ntsc),
            "film" | "generic-film" => Ok(Self::GenericFilm),
            "bt2020" | "rec2020" | "bt2100" => Ok(Self::Bt2020),
            "ciexyz" | "xyz" => Ok(Self::CieXyz),
            "dci-p3" | "dcip3" => Ok(Self::DciP3),
            "display-p3" | "displayp3" | "p3" => Ok(Self::DisplayP3),
            "adobe-rgb" | "adobergb" => Ok(Self::AdobeRgb),
            _ => Err(ParseColorimetryError(s.to_string())),
        }
    }
}

/// A gamut definition: three primaries and a white point, in CIE XYZ.
///
/// # Example
///
/// ```rust
/// use dcolor_primaries::{Colorimetry, NamedColorimetry};
/// use dcolor_math::Vec3;
///
/// let bt709 = Colorimetry::from_name(NamedColorimetry::Bt709);
/// let white = bt709.to_xyz() * Vec3::ONE;
/// assert!((white.y - 1.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colorimetry {
    red: Xyz,
    green: Xyz,
    blue: Xyz,
    white: Xyz,
    name: Option<NamedColorimetry>,
    valid: bool,
    to_xyz: DMat3,
    from_xyz: DMat3,
}

fn dvec(p: Xyz) -> DVec3 {
    p.to_vec3().to_glam().as_dvec3()
}

impl Colorimetry {
    /// Builds a colorimetry from XYZ primaries and white point.
    ///
    /// The primaries may have any luminance; only their direction matters.
    /// The white point is normalized to `Y = 1`.
    pub fn new(red: Xyz, green: Xyz, blue: Xyz, white: Xyz) -> Self {
        let white = white.normalized();
        let primaries = DMat3::from_cols(dvec(red), dvec(green), dvec(blue));

        let matrices = inverse_f64(primaries).and_then(|inv| {
            let s = inv * dvec(white);
            let to_xyz = DMat3::from_cols(dvec(red) * s.x, dvec(green) * s.y, dvec(blue) * s.z);
            inverse_f64(to_xyz).map(|from_xyz| (to_xyz, from_xyz))
        });
        let (valid, (to_xyz, from_xyz)) = match matrices {
            Some(m) => (true, m),
            None => (false, (DMat3::IDENTITY, DMat3::IDENTITY)),
        };

        Self {
            red,
            green,
            blue,
            white,
            name: None,
            valid,
            to_xyz,
            from_xyz,
        }
    }

    /// Builds a colorimetry from xy chromaticities.
    pub fn from_xy(red: (f32, f32), green: (f32, f32), blue: (f32, f32), white: (f32, f32)) -> Self {
        let xyz = |(x, y): (f32, f32)| XyY::from_xy(x, y).to_xyz();
        Self::new(xyz(red), xyz(green), xyz(blue), xyz(white))
    }

    /// Returns the well-known colorimetry `name`.
    pub fn from_name(name: NamedColorimetry) -> Self {
        let mut c = match name {
            NamedColorimetry::CieXyz => Self::new(
                Xyz::new(1.0, 0.0, 0.0),
                Xyz::new(0.0, 1.0, 0.0),
                Xyz::new(0.0, 0.0, 1.0),
                Xyz::new(1.0, 1.0, 1.0),
            ),
            _ => {
                let [r, g, b, w] = name.chromaticities();
                Self::from_xy(r, g, b, w)
            }
        };
        c.name = Some(name);
        c
    }

    /// Red primary.
    #[inline]
    pub fn red(&self) -> Xyz {
        self.red
    }

    /// Green primary.
    #[inline]
    pub fn green(&self) -> Xyz {
        self.green
    }

    /// Blue primary.
    #[inline]
    pub fn blue(&self) -> Xyz {
        self.blue
    }

    /// White point, `Y = 1`.
    #[inline]
    pub fn white(&self) -> Xyz {
        self.white
    }

    /// The well-known name, if this colorimetry was built from one.
    #[inline]
    pub fn name(&self) -> Option<NamedColorimetry> {
        self.name
    }

    /// Returns false for a zero-area gamut.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// RGB to CIE XYZ.
    #[inline]
    pub fn to_xyz(&self) -> Mat3 {
        Mat3::from_dglam(self.to_xyz)
    }

    /// CIE XYZ to RGB.
    #[inline]
    pub fn from_xyz(&self) -> Mat3 {
        Mat3::from_dglam(self.from_xyz)
    }

    /// RGB to LMS cone response.
    #[inline]
    pub fn to_lms(&self) -> Mat3 {
        Mat3::from_dglam(XYZ_TO_LMS.to_dglam() * self.to_xyz)
    }

    /// LMS cone response to RGB.
    #[inline]
    pub fn from_lms(&self) -> Mat3 {
        let lms_to_xyz = inverse_f64(XYZ_TO_LMS.to_dglam()).unwrap_or_else(|| LMS_TO_XYZ.to_dglam());
        Mat3::from_dglam(self.from_xyz * lms_to_xyz)
    }

    /// Linear transform from this colorimetry's RGB to `dst`'s RGB.
    ///
    /// Relative intents adapt the white point with Bradford; the absolute
    /// intent keeps XYZ unchanged. Luminance handling (reference scaling,
    /// black point compensation) is done by the color description.
    pub fn to_other(&self, dst: &Colorimetry, intent: RenderingIntent) -> Mat4 {
        Mat4::from_mat3(Mat3::from_dglam(self.to_other_f64(dst, intent)))
    }

    /// Double precision [`Colorimetry::to_other`], for callers that compose
    /// it further before rounding.
    pub fn to_other_f64(&self, dst: &Colorimetry, intent: RenderingIntent) -> DMat3 {
        let adaptation = if intent.adapts_white_point() {
            adapt_matrix_f64(BRADFORD.to_dglam(), dvec(self.white), dvec(dst.white))
        } else {
            DMat3::IDENTITY
        };
        dst.from_xyz * adaptation * self.to_xyz
    }

    /// Returns this gamut with its primaries adapted to a new white point.
    pub fn adapted_to(&self, white: Xyz) -> Self {
        let white = white.normalized();
        let m = adapt_matrix(BRADFORD, self.white.to_vec3(), white.to_vec3());
        let adapt = |p: Xyz| Xyz::from(m * p.to_vec3());
        Self::new(adapt(self.red), adapt(self.green), adapt(self.blue), white)
    }
}

impl From<NamedColorimetry> for Colorimetry {
    fn from(name: NamedColorimetry) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for Colorimetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{name}"),
            None => {
                let w = self.white.to_xyy();
                write!(f, "custom (white {:.4}, {:.4})", w.x, w.y)
            }
        }
    }
}
