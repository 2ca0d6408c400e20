//! # dcolor-shader
//!
//! Runs color pipelines on the GPU.
//!
//! A [`ColorPipeline`](dcolor_pipeline::ColorPipeline) is serialized into a
//! fixed-size uniform block ([`ShaderUniforms`]) that the WGSL evaluator in
//! [`COLOR_PIPELINE_WGSL`] walks op by op. LUT ops become textures.
//!
//! # Limits
//!
//! | Resource | Slots |
//! |----------|-------|
//! | ops | [`MAX_OPS`] |
//! | matrices (multipliers included) | [`MAX_MATRICES`] |
//! | transfer functions (forward + inverse) | [`MAX_TRANSFER_FUNCTIONS`] |
//! | tone mappers | [`MAX_TONEMAPPERS`] |
//! | 1D LUTs | [`MAX_LUTS_1D`] |
//! | 3D LUTs | [`MAX_LUTS_3D`] |
//!
//! A pipeline that does not fit yields a [`BindError`] instead of a
//! partially bound shader.
//!
//! # Usage
//!
//! ```rust
//! use dcolor_pipeline::{ColorDescription, ColorPipeline};
//! use dcolor_primaries::RenderingIntent;
//! use dcolor_shader::{LutBindings, ShaderUniforms};
//! use dcolor_math::Vec3;
//!
//! let pipeline = ColorPipeline::create(
//!     &ColorDescription::srgb(),
//!     &ColorDescription::bt2100_pq(),
//!     RenderingIntent::Perceptual,
//! );
//! let uniforms = ShaderUniforms::from_pipeline(&pipeline).unwrap();
//! let bytes = uniforms.as_bytes(); // upload these
//!
//! // the CPU interpreter agrees with the pipeline
//! let luts = LutBindings::from_pipeline(&pipeline);
//! let a = pipeline.evaluate(Vec3::splat(0.5));
//! let b = uniforms.evaluate(Vec3::splat(0.5), &luts);
//! assert!((a.x - b.x).abs() < 1e-5);
//! # let _ = bytes;
//! ```
//!
//! # Dependencies
//!
//! - [`bytemuck`] - plain-old-data uniform structs
//! - [`thiserror`] - [`BindError`]
//! - [`tracing`] - bind diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod binder;
mod error;
mod shaders;
mod uniforms;

pub use binder::{GpuContext, ShaderBinder};
pub use error::{BindError, BindResult};
pub use shaders::*;
pub use uniforms::*;
