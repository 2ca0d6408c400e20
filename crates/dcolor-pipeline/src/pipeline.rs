//! The fusing color pipeline builder.
//!
//! A [`ColorPipeline`] is an ordered list of [`ColorOp`]s. Ops are never
//! pushed directly: every `add_*` call first looks at the tail of the list
//! and folds the new op into it where that is exact:
//!
//! | tail | new op | result |
//! |------|--------|--------|
//! | any | identity matrix / unit multiplier | dropped |
//! | matrix or multiplier | matrix or multiplier | one matrix (or multiplier) |
//! | transfer function | uniform positive multiplier | rescaled transfer function |
//! | inverse transfer `tf` | transfer `tf` | both dropped |
//! | transfer `tf` | inverse transfer `tf` | both dropped |
//!
//! A linear transfer function is affine, so it becomes a matrix and takes
//! part in matrix fusion. After a pop the fused op is re-added through the
//! same rules, so a fused identity disappears and a fused scaling can fold
//! further into a transfer function.
//!
//! # Example
//!
//! ```rust
//! use dcolor_pipeline::{ColorDescription, ColorPipeline};
//! use dcolor_primaries::RenderingIntent;
//!
//! let srgb = ColorDescription::srgb();
//! let pipeline = ColorPipeline::create(&srgb, &srgb, RenderingIntent::Perceptual);
//! assert!(pipeline.is_identity());
//! ```

use std::fmt;
use std::sync::Arc;

use dcolor_lut::{Lut1D, Lut3D};
use dcolor_math::{Mat4, Vec3};
use dcolor_primaries::{Colorimetry, ICTCP_TO_LMS, LMS_TO_ICTCP, RenderingIntent};
use dcolor_transfer::{TransferFunction, TransferFunctionType};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::PipelineConfig;
use crate::description::ColorDescription;
use crate::op::{ColorOp, ColorOpKind};
use crate::range::ValueRange;
use crate::tonemap::ColorTonemapper;

/// Squared distance from 1 below which a fused multiplier is dropped.
const MULTIPLIER_IDENTITY_EPSILON: f32 = 1e-10;

/// A fused sequence of color operations.
///
/// Build one with [`ColorPipeline::create`] or the `add_*` methods, then
/// evaluate it on the CPU or hand it to a shader binder. Pipelines are
/// plain values: cloning is cheap (LUTs are shared) and evaluation never
/// mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPipeline {
    input_range: ValueRange,
    ops: Vec<ColorOp>,
}

impl Default for ColorPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPipeline {
    /// Empty pipeline with a `[0, 1]` input range.
    pub fn new() -> Self {
        Self::with_input_range(ValueRange::UNIT)
    }

    /// Empty pipeline expecting inputs in `input_range`.
    pub fn with_input_range(input_range: ValueRange) -> Self {
        Self {
            input_range,
            ops: Vec::new(),
        }
    }

    /// Builds the conversion from `from` to `to` with default settings.
    pub fn create(from: &ColorDescription, to: &ColorDescription, intent: RenderingIntent) -> Self {
        Self::create_with_config(from, to, intent, &PipelineConfig::default())
    }

    /// Builds the conversion from `from` to `to`.
    ///
    /// The pipeline decodes the source signal to nits, converts gamut and
    /// luminance in linear light, optionally tone maps, and re-encodes
    /// with the destination transfer function.
    pub fn create_with_config(
        from: &ColorDescription,
        to: &ColorDescription,
        intent: RenderingIntent,
        config: &PipelineConfig,
    ) -> Self {
        let from_tf = from.transfer_function();
        let mut ret = Self::with_input_range(ValueRange::new(
            from_tf.nits_to_encoded(from.min_luminance()),
            from_tf.nits_to_encoded(from.max_luminance()),
        ));

        ret.add_transfer_function(from_tf);

        let range = ret.current_output_range() * (to.reference_luminance() / from.reference_luminance());
        ret.add_matrix(from.to_other(to, intent), range);

        let max_output = to.max_luminance();
        let max_input = ret.current_output_range().max;
        let tonemapped = config.tonemapping
            && intent == RenderingIntent::Perceptual
            && max_input > max_output * config.tonemap_threshold;
        if tonemapped {
            ret.add_tonemapper(
                to.colorimetry(),
                to.reference_luminance(),
                max_input,
                max_output,
                config.max_added_headroom,
            );
        }

        ret.add_inverse_transfer_function(to.transfer_function());

        debug!(
            ops = ret.ops.len(),
            tonemapped,
            %intent,
            "created color pipeline"
        );
        ret
    }

    /// Range the first op expects.
    #[inline]
    pub fn input_range(&self) -> ValueRange {
        self.input_range
    }

    /// Range produced by the last op, or the input range when empty.
    #[inline]
    pub fn current_output_range(&self) -> ValueRange {
        self.ops.last().map_or(self.input_range, |op| op.output)
    }

    /// The fused operations in order.
    #[inline]
    pub fn ops(&self) -> &[ColorOp] {
        &self.ops
    }

    /// Number of operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if there are no operations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns true if the pipeline leaves every value unchanged.
    ///
    /// Fusion removes identities as they appear, so this is the same as
    /// having no operations.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Appends an op whose input is the current output range.
    fn push(&mut self, operation: ColorOpKind, output: ValueRange) {
        let input = self.current_output_range();
        trace!(op = operation.name(), %input, %output, "append");
        self.ops.push(ColorOp::new(input, operation, output));
    }

    /// Adds an affine matrix.
    pub fn add_matrix(&mut self, mat: Mat4, output: ValueRange) {
        if mat.is_fuzzy_identity() {
            trace!("drop identity matrix");
            return;
        }
        match self.ops.last().map(|op| &op.operation) {
            Some(&ColorOpKind::Matrix(prev)) => {
                trace!("fuse matrix into matrix");
                self.ops.pop();
                self.add_matrix(mat * prev, output);
            }
            Some(&ColorOpKind::Multiplier(factors)) => {
                trace!("fuse matrix into multiplier");
                self.ops.pop();
                self.add_matrix(mat * Mat4::scaling(factors), output);
            }
            _ if mat.is_fuzzy_scaling_only() => self.add_multiplier(mat.scaling_vec(), output),
            _ => self.push(ColorOpKind::Matrix(mat), output),
        }
    }

    /// Adds a per-channel multiplier.
    pub fn add_multiplier(&mut self, factors: Vec3, output: ValueRange) {
        if (factors - Vec3::ONE).length_squared() < MULTIPLIER_IDENTITY_EPSILON {
            trace!("drop unit multiplier");
            return;
        }
        match self.ops.last().map(|op| &op.operation) {
            Some(&ColorOpKind::Matrix(prev)) => {
                trace!("fuse multiplier into matrix");
                self.ops.pop();
                self.add_matrix(Mat4::scaling(factors) * prev, output);
            }
            Some(&ColorOpKind::Multiplier(prev)) => {
                trace!("fuse multiplier into multiplier");
                self.ops.pop();
                self.add_multiplier(prev * factors, output);
            }
            Some(&ColorOpKind::TransferFunction(tf))
                if factors.is_uniform() && factors.x.is_finite() && factors.x > 0.0 =>
            {
                trace!(factor = factors.x, "fold multiplier into transfer function");
                if let Some(last) = self.ops.last_mut() {
                    last.operation = ColorOpKind::TransferFunction(tf.scaled(factors.x));
                    last.output = last.output * factors.x;
                }
            }
            _ => self.push(ColorOpKind::Multiplier(factors), output),
        }
    }

    /// Adds a transfer function (encoded signal to nits).
    pub fn add_transfer_function(&mut self, tf: TransferFunction) {
        if let Some(&ColorOpKind::InverseTransferFunction(prev)) = self.ops.last().map(|op| &op.operation) {
            if prev == tf {
                trace!(%tf, "cancel inverse transfer function");
                self.ops.pop();
                return;
            }
        }
        let range = self.current_output_range();
        let output = range.map(|v| tf.encoded_to_nits(v));
        if tf.ty() == TransferFunctionType::Linear {
            let min = tf.min_luminance();
            let max = tf.max_luminance();
            let mat = Mat4::translation(Vec3::splat(min)) * Mat4::uniform_scaling(max - min);
            self.add_matrix(mat, output);
        } else {
            self.push(ColorOpKind::TransferFunction(tf), output);
        }
    }

    /// Adds an inverse transfer function (nits to encoded signal).
    pub fn add_inverse_transfer_function(&mut self, tf: TransferFunction) {
        if let Some(&ColorOpKind::TransferFunction(prev)) = self.ops.last().map(|op| &op.operation) {
            if prev == tf {
                trace!(%tf, "cancel transfer function");
                self.ops.pop();
                return;
            }
        }
        let range = self.current_output_range();
        let output = range.map(|v| tf.nits_to_encoded(v));
        if tf.ty() == TransferFunctionType::Linear {
            let min = tf.min_luminance();
            let max = tf.max_luminance();
            let mat = Mat4::uniform_scaling(1.0 / (max - min)) * Mat4::translation(Vec3::splat(-min));
            self.add_matrix(mat, output);
        } else {
            self.push(ColorOpKind::InverseTransferFunction(tf), output);
        }
    }

    /// Adds ICtCp-based tone mapping from `max_input` down to `max_output`
    /// nits.
    ///
    /// Expects linear `colorimetry` RGB in nits and produces the same.
    pub fn add_tonemapper(
        &mut self,
        colorimetry: &Colorimetry,
        reference_luminance: f32,
        max_input: f32,
        max_output: f32,
        max_added_headroom: f32,
    ) {
        let pq = TransferFunction::new(TransferFunctionType::PerceptualQuantizer);
        let range = self.current_output_range();

        self.add_matrix(Mat4::from_mat3(colorimetry.to_lms()), range);
        self.add_inverse_transfer_function(pq);
        self.add_matrix(Mat4::from_mat3(LMS_TO_ICTCP), ValueRange::UNIT);

        let tonemapper = ColorTonemapper::new(reference_luminance, max_input, max_output, max_added_headroom);
        self.push(
            ColorOpKind::Tonemapper(tonemapper),
            ValueRange::new(0.0, pq.nits_to_encoded(tonemapper.max_output_luminance())),
        );

        self.add_matrix(Mat4::from_mat3(ICTCP_TO_LMS), ValueRange::UNIT);
        self.add_transfer_function(pq);
        self.add_matrix(
            Mat4::from_mat3(colorimetry.from_lms()),
            ValueRange::new(range.min.min(0.0), tonemapper.max_output_luminance()),
        );
    }

    /// Appends a 1D LUT.
    pub fn add_lut1d(&mut self, lut: Arc<Lut1D>) {
        let (min, max) = lut.domain();
        self.push(ColorOpKind::Lut1D(lut), ValueRange::new(min, max));
    }

    /// Appends a 3D LUT.
    pub fn add_lut3d(&mut self, lut: Arc<Lut3D>) {
        self.push(ColorOpKind::Lut3D(lut), ValueRange::UNIT);
    }

    /// Adds an existing op through the fusing rules.
    ///
    /// Tone mappers and LUTs cannot fuse. They are appended with their
    /// input range rebased onto the current output range.
    pub fn add(&mut self, op: ColorOp) {
        match op.operation {
            ColorOpKind::Matrix(mat) => self.add_matrix(mat, op.output),
            ColorOpKind::Multiplier(factors) => self.add_multiplier(factors, op.output),
            ColorOpKind::TransferFunction(tf) => self.add_transfer_function(tf),
            ColorOpKind::InverseTransferFunction(tf) => self.add_inverse_transfer_function(tf),
            ColorOpKind::Tonemapper(_) | ColorOpKind::Lut1D(_) | ColorOpKind::Lut3D(_) => {
                self.push(op.operation, op.output)
            }
        }
    }

    /// Returns this pipeline followed by `on_top`, fused at the seam.
    pub fn merged(&self, on_top: &ColorPipeline) -> ColorPipeline {
        let mut ret = self.clone();
        for op in &on_top.ops {
            ret.add(op.clone());
        }
        ret
    }

    /// Runs one RGB value through the pipeline.
    #[inline]
    pub fn evaluate(&self, rgb: Vec3) -> Vec3 {
        self.ops.iter().fold(rgb, |v, op| op.apply(v))
    }

    /// Runs a buffer of RGB values through the pipeline in parallel.
    pub fn evaluate_batch(&self, pixels: &mut [[f32; 3]]) {
        if self.ops.is_empty() {
            return;
        }
        trace!(count = pixels.len(), ops = self.ops.len(), "evaluate_batch");
        pixels.par_iter_mut().for_each(|px| {
            *px = self.evaluate(Vec3::from(*px)).to_array();
        });
    }
}

impl fmt::Display for ColorPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return write!(f, "identity {}", self.input_range);
        }
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{i:2}: {op}")?;
        }
        Ok(())
    }
}
