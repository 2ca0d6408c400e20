//! # dcolor-primaries
//!
//! Colorimetries (RGB primaries plus white point) and the matrices between
//! them.
//!
//! # Included Colorimetries
//!
//! | Name | White | Primary Use |
//! |------|-------|-------------|
//! | BT.709 / sRGB | D65 | SDR desktop, HDTV |
//! | PAL-M, PAL, NTSC | C / D65 | Legacy broadcast |
//! | Generic film | C | Film scans |
//! | BT.2020 | D65 | HDR, UHDTV |
//! | CIE XYZ | E | Identity gamut, interchange |
//! | DCI-P3 | DCI | Cinema |
//! | Display P3 | D65 | Wide gamut laptops and phones |
//! | Adobe RGB | D65 | Photography |
//!
//! # Usage
//!
//! ```rust
//! use dcolor_primaries::{Colorimetry, NamedColorimetry, RenderingIntent};
//! use dcolor_math::Vec3;
//!
//! let bt709 = Colorimetry::from_name(NamedColorimetry::Bt709);
//! let bt2020 = Colorimetry::from_name(NamedColorimetry::Bt2020);
//!
//! let m = bt709.to_other(&bt2020, RenderingIntent::RelativeColorimetric);
//! let white = m.transform_point(Vec3::ONE);
//! assert!((white - Vec3::ONE).abs().max_element() < 1e-4);
//! ```
//!
//! # Dependencies
//!
//! - `dcolor-math` - matrices and Bradford adaptation
//!
//! # Used By
//!
//! - `dcolor-pipeline` - gamut conversion and tone mapping in LMS

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod chromaticity;
mod colorimetry;
mod intent;

pub use chromaticity::{XyY, Xyz};
pub use colorimetry::{
    Colorimetry, ICTCP_TO_LMS, LMS_TO_ICTCP, LMS_TO_XYZ, NamedColorimetry, ParseColorimetryError,
    XYZ_TO_LMS,
};
pub use intent::{ParseIntentError, RenderingIntent};
