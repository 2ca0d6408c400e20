//! # dcolor-math
//!
//! Math primitives for the display color pipeline.
//!
//! - [`Vec3`] - RGB, XYZ and LMS triplets
//! - [`Mat3`] - linear color space transforms (RGB to XYZ, adaptation)
//! - [`Mat4`] - homogeneous affine transforms, used wherever a pipeline step
//!   needs an offset (black point compensation, linear transfer functions)
//! - Bradford chromatic adaptation
//! - Fuzzy float comparison shared by the pipeline optimizer
//!
//! # Design
//!
//! All matrices are **row-major** and act on **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! Composition therefore reads right to left: `b * a` applies `a` first.
//!
//! # Usage
//!
//! ```rust
//! use dcolor_math::{Mat4, Vec3};
//!
//! // Scale by 2, then shift by 0.1
//! let m = Mat4::translation(Vec3::splat(0.1)) * Mat4::uniform_scaling(2.0);
//! let out = m.transform_point(Vec3::new(0.5, 0.25, 0.0));
//! assert!((out.x - 1.1).abs() < 1e-6);
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - matrix inversion
//!
//! # Used By
//!
//! - `dcolor-primaries` - RGB/XYZ/LMS matrices
//! - `dcolor-pipeline` - matrix fusion
//! - `dcolor-shader` - uniform serialization

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod adapt;
mod fuzzy;
mod interp;
mod mat3;
mod mat4;
mod vec3;

pub use adapt::*;
pub use fuzzy::*;
pub use interp::*;
pub use mat3::*;
pub use mat4::*;
pub use vec3::*;

/// Double precision glam types, used to derive matrices before rounding.
pub use glam::{DMat3, DMat4, DVec3};
