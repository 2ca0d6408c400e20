//! Rendering intents.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing a rendering intent fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rendering intent: {0} (expected perceptual, relative, absolute or relative-bpc)")]
pub struct ParseIntentError(pub String);

/// How a conversion treats white point, black level and out-of-range
/// luminance.
///
/// | Intent | White adaptation | Black point compensation | Tone mapping |
/// |--------|------------------|--------------------------|--------------|
/// | Perceptual | yes | yes | yes |
/// | RelativeColorimetric | yes | no | no |
/// | AbsoluteColorimetric | no | no | no |
/// | RelativeColorimetricWithBpc | yes | yes | no |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderingIntent {
    /// Adapt white, compensate black, tone map highlights.
    #[default]
    Perceptual,
    /// Adapt white, scale by reference luminance.
    RelativeColorimetric,
    /// Keep absolute chromaticities.
    AbsoluteColorimetric,
    /// Relative colorimetric with black point compensation.
    RelativeColorimetricWithBpc,
}

impl RenderingIntent {
    /// Every intent.
    pub const ALL: [Self; 4] = [
        Self::Perceptual,
        Self::RelativeColorimetric,
        Self::AbsoluteColorimetric,
        Self::RelativeColorimetricWithBpc,
    ];

    /// Returns true if white points are adapted with Bradford.
    #[inline]
    pub fn adapts_white_point(self) -> bool {
        !matches!(self, Self::AbsoluteColorimetric)
    }

    /// Returns true if black point compensation applies.
    #[inline]
    pub fn compensates_black_point(self) -> bool {
        matches!(self, Self::Perceptual | Self::RelativeColorimetricWithBpc)
    }

    /// Short name, accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Perceptual => "perceptual",
            Self::RelativeColorimetric => "relative",
            Self::AbsoluteColorimetric => "absolute",
            Self::RelativeColorimetricWithBpc => "relative-bpc",
        }
    }
}

impl fmt::Display for RenderingIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderingIntent {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "perceptual" => Ok(Self::Perceptual),
            "relative" | "relative-colorimetric" => Ok(Self::RelativeColorimetric),
            "absolute" | "absolute-colorimetric" => Ok(Self::AbsoluteColorimetric),
            "relative-bpc" | "relative-colorimetric-bpc" => Ok(Self::RelativeColorimetricWithBpc),
            _ => Err(ParseIntentError(s.to_string())),
        }
    }
}
