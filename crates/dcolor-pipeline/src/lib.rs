//! # dcolor-pipeline
//!
//! Compiles conversions between color descriptions into short, fused
//! operation lists that evaluate on the CPU and serialize to shader
//! uniforms.
//!
//! # Architecture
//!
//! ```text
//! ColorDescription ──┐
//!                    ├─> ColorPipeline::create ─> [ColorOp, ...]
//! ColorDescription ──┘                               │
//!                                       ┌────────────┴────────────┐
//!                                       v                         v
//!                              evaluate / evaluate_batch    dcolor-shader
//! ```
//!
//! A conversion always has the same shape before fusion:
//!
//! 1. source transfer function (encoded signal to nits)
//! 2. gamut and luminance matrix
//! 3. tone mapper, if the source is brighter than the destination
//! 4. inverse destination transfer function (nits to encoded signal)
//!
//! Fusion then collapses everything that is exact to collapse; converting a
//! description to itself produces an empty pipeline.
//!
//! # Usage
//!
//! ```rust
//! use dcolor_pipeline::prelude::*;
//!
//! let hdr = ColorDescription::bt2100_pq();
//! let sdr = ColorDescription::srgb();
//!
//! let pipeline = ColorPipeline::create(&hdr, &sdr, RenderingIntent::Perceptual);
//! let out = pipeline.evaluate(Vec3::new(0.75, 0.75, 0.75));
//! assert!(out.max_element() <= 1.01);
//! ```
//!
//! # Dependencies
//!
//! - `dcolor-math`, `dcolor-transfer`, `dcolor-primaries`, `dcolor-lut`
//! - [`rayon`] - parallel batch evaluation
//! - [`serde`] / [`serde_yaml`] - [`PipelineConfig`] files
//! - [`tracing`] - fusion and construction diagnostics
//!
//! # Used By
//!
//! - `dcolor-shader` - uniform serialization
//! - `dcolor-cli` - command line inspection

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod description;
mod error;
mod op;
mod pipeline;
mod range;
mod tonemap;

pub use config::{DISABLE_TONEMAPPING_ENV, PipelineConfig};
pub use description::ColorDescription;
pub use error::{ConfigError, ConfigResult};
pub use op::{ColorOp, ColorOpKind};
pub use pipeline::ColorPipeline;
pub use range::ValueRange;
pub use tonemap::ColorTonemapper;

/// Commonly used types.
pub mod prelude {
    pub use crate::{ColorDescription, ColorOp, ColorOpKind, ColorPipeline, PipelineConfig, ValueRange};
    pub use dcolor_math::{Mat4, Vec3};
    pub use dcolor_primaries::{Colorimetry, NamedColorimetry, RenderingIntent};
    pub use dcolor_transfer::{TransferFunction, TransferFunctionType};
}
