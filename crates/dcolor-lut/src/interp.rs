//! Interpolation methods for 3D LUT evaluation.

/// How a [`Lut3D`](crate::Lut3D) is sampled between grid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Nearest grid point.
    Nearest,
    /// Trilinear, the same filtering a GPU 3D texture performs.
    #[default]
    Linear,
    /// Tetrahedral. CPU only; the shader path always filters trilinearly.
    Tetrahedral,
}
