//! Value range bookkeeping.

use std::fmt;
use std::ops::Mul;

/// Expected `[min, max]` of the signal at some point in a pipeline.
///
/// Ranges are bookkeeping only: nothing is ever clamped to them. They
/// decide whether tone mapping is needed and size the tone mapper.
/// A range may temporarily invert when a matrix flips signs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl ValueRange {
    /// The `[0, 1]` range.
    pub const UNIT: Self = Self::new(0.0, 1.0);

    /// Creates a range.
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Applies `f` to both bounds.
    #[inline]
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.min), f(self.max))
    }

    /// Width of the range.
    #[inline]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::UNIT
    }
}

impl Mul<f32> for ValueRange {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.min * rhs, self.max * rhs)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
