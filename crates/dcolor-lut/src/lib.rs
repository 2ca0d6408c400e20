//! # dcolor-lut
//!
//! Lookup tables carried through the color pipeline as opaque operations.
//!
//! LUTs typically come from pre-parsed ICC profiles or calibration data.
//! The pipeline never fuses them; it evaluates them on the CPU and uploads
//! them as textures for the shader path.
//!
//! - [`Lut1D`] - per-channel curves, RGB interleaved
//! - [`Lut3D`] - full RGB cube
//!
//! Inputs outside the domain clamp to the edge entries, the same way a
//! clamp-to-edge texture behaves on the GPU.
//!
//! # Usage
//!
//! ```rust
//! use dcolor_lut::{Lut1D, Lut3D};
//!
//! let curve = Lut1D::gamma(1024, 2.2);
//! let out = curve.apply_rgb([0.5, 0.5, 0.5]);
//! assert!((out[0] - 0.5f32.powf(2.2)).abs() < 1e-3);
//!
//! let cube = Lut3D::identity(17);
//! let rgb = cube.apply([0.25, 0.5, 0.75]);
//! assert!((rgb[1] - 0.5).abs() < 1e-5);
//! ```
//!
//! # Dependencies
//!
//! - `dcolor-math` - interpolation helpers
//! - [`thiserror`] - error types
//!
//! # Used By
//!
//! - `dcolor-pipeline` - LUT operations
//! - `dcolor-shader` - LUT texture upload

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod interp;
mod lut1d;
mod lut3d;

pub use error::{LutError, LutResult};
pub use interp::Interpolation;
pub use lut1d::Lut1D;
pub use lut3d::Lut3D;
