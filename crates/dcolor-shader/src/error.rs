//! Binding errors.

use thiserror::Error;

/// Result type for shader binding.
pub type BindResult<T> = Result<T, BindError>;

/// Why a pipeline could not be bound to the shader.
///
/// Overflows are not fatal: the caller can fall back to CPU evaluation or
/// to an unmanaged blit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// More operations than the shader loop handles.
    #[error("too many ops: {count} (max {limit})")]
    TooManyOps {
        /// Ops in the pipeline.
        count: usize,
        /// Shader limit.
        limit: usize,
    },

    /// More matrices and multipliers than uniform slots.
    #[error("too many matrices (max {limit})")]
    TooManyMatrices {
        /// Shader limit.
        limit: usize,
    },

    /// More forward and inverse transfer functions than uniform slots.
    #[error("too many transfer functions (max {limit})")]
    TooManyTransferFunctions {
        /// Shader limit.
        limit: usize,
    },

    /// More tone mappers than uniform slots.
    #[error("too many tonemappers (max {limit})")]
    TooManyTonemappers {
        /// Shader limit.
        limit: usize,
    },

    /// More 1D LUTs than texture bindings.
    #[error("too many 1D LUTs (max {limit})")]
    TooManyLuts1D {
        /// Shader limit.
        limit: usize,
    },

    /// More 3D LUTs than texture bindings.
    #[error("too many 3D LUTs (max {limit})")]
    TooManyLuts3D {
        /// Shader limit.
        limit: usize,
    },

    /// The GPU context failed.
    #[error("GPU error: {0}")]
    Gpu(String),
}
