//! LUT error types.

use thiserror::Error;

/// Result type for LUT construction.
pub type LutResult<T> = Result<T, LutError>;

/// Errors raised when building a LUT from raw data.
#[derive(Debug, Error, PartialEq)]
pub enum LutError {
    /// Wrong number of entries.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// Empty or inverted input domain.
    #[error("invalid input domain: [{min}, {max}]")]
    InvalidDomain {
        /// Domain minimum
        min: f32,
        /// Domain maximum
        max: f32,
    },

    /// NaN or infinite entry.
    #[error("non-finite LUT entry at index {0}")]
    NonFinite(usize),
}
