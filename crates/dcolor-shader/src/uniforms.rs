//! Uniform block layout and serialization.
//!
//! The block mirrors the `ColorPipeline` struct in
//! [`COLOR_PIPELINE_WGSL`](crate::COLOR_PIPELINE_WGSL). All members are
//! 4-byte scalars grouped into 16-byte rows, so the `#[repr(C)]` layout
//! equals the WGSL uniform layout without hidden padding:
//!
//! | offset | member |
//! |--------|--------|
//! | 0 | `matrices: array<mat4x4<f32>, 8>` |
//! | 512 | `transfer_functions: array<TransferFunction, 8>` |
//! | 640 | `tonemapper: Tonemapper` |
//! | 672 | `ops: array<Op, 16>` |
//! | 928 | `lut1d_params: array<vec4<f32>, 2>` |
//! | 960 | `lut3d_params: vec4<f32>` |
//! | 976 | `op_count: u32` (+ padding) |

use std::fmt;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use dcolor_lut::{Lut1D, Lut3D};
use dcolor_math::{Mat4, Vec3};
use dcolor_pipeline::{ColorOpKind, ColorPipeline, ColorTonemapper};
use dcolor_transfer::{TransferFunction, TransferFunctionType, pq};

use crate::error::{BindError, BindResult};

/// Maximum number of ops.
pub const MAX_OPS: usize = 16;
/// Maximum number of matrices (multipliers included).
pub const MAX_MATRICES: usize = 8;
/// Maximum number of transfer functions (forward and inverse).
pub const MAX_TRANSFER_FUNCTIONS: usize = 8;
/// Maximum number of tone mappers.
pub const MAX_TONEMAPPERS: usize = 1;
/// Maximum number of 1D LUTs.
pub const MAX_LUTS_1D: usize = 2;
/// Maximum number of 3D LUTs.
pub const MAX_LUTS_3D: usize = 1;

/// Op discriminant: affine matrix.
pub const OP_MATRIX: u32 = 0;
/// Op discriminant: transfer function.
pub const OP_TRANSFER_FUNCTION: u32 = 1;
/// Op discriminant: inverse transfer function.
pub const OP_INVERSE_TRANSFER_FUNCTION: u32 = 2;
/// Op discriminant: tone mapper.
pub const OP_TONEMAPPER: u32 = 3;
/// Op discriminant: 1D LUT.
pub const OP_LUT1D: u32 = 4;
/// Op discriminant: 3D LUT.
pub const OP_LUT3D: u32 = 5;

/// Transfer function kind as seen by the shader.
pub fn transfer_kind(ty: TransferFunctionType) -> u32 {
    match ty {
        TransferFunctionType::Linear => 0,
        TransferFunctionType::Srgb => 1,
        TransferFunctionType::Gamma22 => 2,
        TransferFunctionType::PerceptualQuantizer => 3,
        TransferFunctionType::Hlg => 4,
    }
}

fn transfer_type(kind: u32) -> Option<TransferFunctionType> {
    match kind {
        0 => Some(TransferFunctionType::Linear),
        1 => Some(TransferFunctionType::Srgb),
        2 => Some(TransferFunctionType::Gamma22),
        3 => Some(TransferFunctionType::PerceptualQuantizer),
        4 => Some(TransferFunctionType::Hlg),
        _ => None,
    }
}

/// One transfer function slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TransferFunctionUniform {
    /// Curve, see [`transfer_kind`].
    pub kind: u32,
    /// Luminance of encoded 0.
    pub min_luminance: f32,
    /// Luminance of encoded 1.
    pub max_luminance: f32,
    /// Padding.
    pub _pad: f32,
}

impl TransferFunctionUniform {
    fn new(tf: &TransferFunction) -> Self {
        Self {
            kind: transfer_kind(tf.ty()),
            min_luminance: tf.min_luminance(),
            max_luminance: tf.max_luminance(),
            _pad: 0.0,
        }
    }

    // Same arithmetic as `to_relative`/`from_relative` in the WGSL, unknown
    // kinds pass through like its `default` arm
    fn to_relative(&self, x: f32) -> f32 {
        transfer_type(self.kind).map_or(x, |ty| ty.to_relative(x))
    }

    fn from_relative(&self, y: f32) -> f32 {
        transfer_type(self.kind).map_or(y, |ty| ty.from_relative(y))
    }

    /// WGSL `encoded_to_nits`.
    fn encoded_to_nits(&self, rgb: Vec3) -> Vec3 {
        let range = self.max_luminance - self.min_luminance;
        rgb.map(|v| self.to_relative(v)) * range + Vec3::splat(self.min_luminance)
    }

    /// WGSL `nits_to_encoded`.
    fn nits_to_encoded(&self, nits: Vec3) -> Vec3 {
        let rel = (nits - Vec3::splat(self.min_luminance)) / (self.max_luminance - self.min_luminance);
        rel.map(|v| self.from_relative(v))
    }
}

/// Tone mapper constants, precomputed on the CPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TonemapperUniform {
    /// Reference luminance in nits.
    pub reference_luminance: f32,
    /// `max_input / reference`.
    pub input_range: f32,
    /// Headroom taken from the reference.
    pub added_range: f32,
    /// Reference luminance after mapping.
    pub output_reference_luminance: f32,
    /// Brightest output in nits.
    pub max_output_luminance: f32,
    /// Padding.
    pub _pad: [f32; 3],
}

impl TonemapperUniform {
    fn new(tm: &ColorTonemapper) -> Self {
        Self {
            reference_luminance: tm.reference_luminance(),
            input_range: tm.input_range(),
            added_range: tm.added_range(),
            output_reference_luminance: tm.output_reference_luminance(),
            max_output_luminance: tm.max_output_luminance(),
            _pad: [0.0; 3],
        }
    }

    /// Same arithmetic as `tonemap` in the shader.
    fn map(&self, pq_encoded: f32) -> f32 {
        let nits = pq::eotf(pq_encoded);
        let low = (nits / self.added_range).min(self.output_reference_luminance);
        let relative = if self.input_range > 1.0 {
            ((nits / self.reference_luminance - 1.0) / (self.input_range - 1.0)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let high = (relative * (std::f32::consts::E - 1.0) + 1.0).ln()
            * (self.max_output_luminance - self.output_reference_luminance);
        pq::oetf(low + high)
    }
}

/// One entry of the op list.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct OpUniform {
    /// Op discriminant (`OP_*`).
    pub kind: u32,
    /// Slot in the array for that kind.
    pub index: u32,
    /// Padding.
    pub _pad: [u32; 2],
}

/// The uniform block consumed by the color pipeline shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShaderUniforms {
    /// Column-major affine matrices.
    pub matrices: [[f32; 16]; MAX_MATRICES],
    /// Forward and inverse transfer functions.
    pub transfer_functions: [TransferFunctionUniform; MAX_TRANSFER_FUNCTIONS],
    /// Tone mapper constants.
    pub tonemapper: TonemapperUniform,
    /// The op list.
    pub ops: [OpUniform; MAX_OPS],
    /// Per 1D LUT: `[domain_min, domain_max, size, 0]`.
    pub lut1d_params: [[f32; 4]; MAX_LUTS_1D],
    /// 3D LUT: `[size, 0, 0, 0]`.
    pub lut3d_params: [f32; 4],
    /// Number of valid entries in `ops`.
    pub op_count: u32,
    /// Padding.
    pub _pad: [u32; 3],
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Slots used by a serialized pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotUsage {
    /// Ops.
    pub ops: usize,
    /// Matrices and multipliers.
    pub matrices: usize,
    /// Forward and inverse transfer functions.
    pub transfer_functions: usize,
    /// Tone mappers.
    pub tonemappers: usize,
    /// 1D LUTs.
    pub luts_1d: usize,
    /// 3D LUTs.
    pub luts_3d: usize,
}

impl fmt::Display for SlotUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ops:                {:2} / {MAX_OPS}", self.ops)?;
        writeln!(f, "matrices:           {:2} / {MAX_MATRICES}", self.matrices)?;
        writeln!(f, "transfer functions: {:2} / {MAX_TRANSFER_FUNCTIONS}", self.transfer_functions)?;
        writeln!(f, "tonemappers:        {:2} / {MAX_TONEMAPPERS}", self.tonemappers)?;
        writeln!(f, "1D LUTs:            {:2} / {MAX_LUTS_1D}", self.luts_1d)?;
        write!(f, "3D LUTs:            {:2} / {MAX_LUTS_3D}", self.luts_3d)
    }
}

/// LUTs referenced by a pipeline, in slot order.
#[derive(Debug, Clone, Default)]
pub struct LutBindings {
    /// 1D LUTs; slot `i` is bound to texture `i`.
    pub luts_1d: Vec<Arc<Lut1D>>,
    /// 3D LUTs.
    pub luts_3d: Vec<Arc<Lut3D>>,
}

impl LutBindings {
    /// Collects the LUT ops of `pipeline` in order.
    pub fn from_pipeline(pipeline: &ColorPipeline) -> Self {
        let mut ret = Self::default();
        for op in pipeline.ops() {
            match &op.operation {
                ColorOpKind::Lut1D(lut) => ret.luts_1d.push(Arc::clone(lut)),
                ColorOpKind::Lut3D(lut) => ret.luts_3d.push(Arc::clone(lut)),
                _ => {}
            }
        }
        ret
    }
}

/// Returns the next free slot of `count`, or `err` when full.
fn next_slot(count: &mut usize, limit: usize, err: BindError) -> BindResult<usize> {
    if *count >= limit {
        return Err(err);
    }
    *count += 1;
    Ok(*count - 1)
}

impl ShaderUniforms {
    /// Serializes `pipeline` into a uniform block.
    ///
    /// Multipliers become diagonal matrices. Fails if any slot array
    /// overflows.
    pub fn from_pipeline(pipeline: &ColorPipeline) -> BindResult<Self> {
        let ops = pipeline.ops();
        if ops.len() > MAX_OPS {
            return Err(BindError::TooManyOps {
                count: ops.len(),
                limit: MAX_OPS,
            });
        }

        let mut u = Self::zeroed();
        let mut usage = SlotUsage::default();

        for (slot, op) in u.ops.iter_mut().zip(ops) {
            let (kind, index) = match &op.operation {
                ColorOpKind::Matrix(m) => {
                    let i = next_slot(&mut usage.matrices, MAX_MATRICES, BindError::TooManyMatrices { limit: MAX_MATRICES })?;
                    u.matrices[i] = m.to_cols_array();
                    (OP_MATRIX, i)
                }
                ColorOpKind::Multiplier(f) => {
                    let i = next_slot(&mut usage.matrices, MAX_MATRICES, BindError::TooManyMatrices { limit: MAX_MATRICES })?;
                    u.matrices[i] = Mat4::scaling(*f).to_cols_array();
                    (OP_MATRIX, i)
                }
                ColorOpKind::TransferFunction(tf) | ColorOpKind::InverseTransferFunction(tf) => {
                    let i = next_slot(
                        &mut usage.transfer_functions,
                        MAX_TRANSFER_FUNCTIONS,
                        BindError::TooManyTransferFunctions {
                            limit: MAX_TRANSFER_FUNCTIONS,
                        },
                    )?;
                    u.transfer_functions[i] = TransferFunctionUniform::new(tf);
                    let kind = if matches!(op.operation, ColorOpKind::TransferFunction(_)) {
                        OP_TRANSFER_FUNCTION
                    } else {
                        OP_INVERSE_TRANSFER_FUNCTION
                    };
                    (kind, i)
                }
                ColorOpKind::Tonemapper(tm) => {
                    let i = next_slot(&mut usage.tonemappers, MAX_TONEMAPPERS, BindError::TooManyTonemappers { limit: MAX_TONEMAPPERS })?;
                    u.tonemapper = TonemapperUniform::new(tm);
                    (OP_TONEMAPPER, i)
                }
                ColorOpKind::Lut1D(lut) => {
                    let i = next_slot(&mut usage.luts_1d, MAX_LUTS_1D, BindError::TooManyLuts1D { limit: MAX_LUTS_1D })?;
                    let (min, max) = lut.domain();
                    u.lut1d_params[i] = [min, max, lut.size() as f32, 0.0];
                    (OP_LUT1D, i)
                }
                ColorOpKind::Lut3D(lut) => {
                    let i = next_slot(&mut usage.luts_3d, MAX_LUTS_3D, BindError::TooManyLuts3D { limit: MAX_LUTS_3D })?;
                    u.lut3d_params = [lut.size() as f32, 0.0, 0.0, 0.0];
                    (OP_LUT3D, i)
                }
            };
            *slot = OpUniform {
                kind,
                index: index as u32,
                _pad: [0; 2],
            };
        }
        u.op_count = ops.len() as u32;
        Ok(u)
    }

    /// Raw bytes for upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Valid ops.
    #[inline]
    pub fn active_ops(&self) -> &[OpUniform] {
        &self.ops[..(self.op_count as usize).min(MAX_OPS)]
    }

    /// Counts the slots in use.
    pub fn usage(&self) -> SlotUsage {
        let mut usage = SlotUsage {
            ops: self.active_ops().len(),
            ..SlotUsage::default()
        };
        for op in self.active_ops() {
            match op.kind {
                OP_MATRIX => usage.matrices += 1,
                OP_TRANSFER_FUNCTION | OP_INVERSE_TRANSFER_FUNCTION => usage.transfer_functions += 1,
                OP_TONEMAPPER => usage.tonemappers += 1,
                OP_LUT1D => usage.luts_1d += 1,
                OP_LUT3D => usage.luts_3d += 1,
                _ => {}
            }
        }
        usage
    }

    /// Evaluates the uniform block on the CPU the way the shader does.
    ///
    /// Unknown op kinds and out-of-range slots pass the color through,
    /// matching the shader's `default` branch.
    pub fn evaluate(&self, rgb: Vec3, luts: &LutBindings) -> Vec3 {
        self.active_ops().iter().fold(rgb, |c, op| {
            let i = op.index as usize;
            match op.kind {
                OP_MATRIX => self.matrices.get(i).map_or(c, |m| mul_cols(m, c)),
                OP_TRANSFER_FUNCTION => self.transfer_functions.get(i).map_or(c, |tf| tf.encoded_to_nits(c)),
                OP_INVERSE_TRANSFER_FUNCTION => self.transfer_functions.get(i).map_or(c, |tf| tf.nits_to_encoded(c)),
                OP_TONEMAPPER => Vec3::new(self.tonemapper.map(c.x), c.y, c.z),
                OP_LUT1D => luts.luts_1d.get(i).map_or(c, |lut| Vec3::from(lut.apply_rgb(c.to_array()))),
                OP_LUT3D => luts.luts_3d.get(i).map_or(c, |lut| Vec3::from(lut.apply(c.to_array()))),
                _ => c,
            }
        })
    }
}

/// `mat4x4<f32> * vec4<f32>(c, 1.0)` for a column-major matrix.
fn mul_cols(m: &[f32; 16], c: Vec3) -> Vec3 {
    Vec3::new(
        m[0] * c.x + m[4] * c.y + m[8] * c.z + m[12],
        m[1] * c.x + m[5] * c.y + m[9] * c.z + m[13],
        m[2] * c.x + m[6] * c.y + m[10] * c.z + m[14],
    )
}
