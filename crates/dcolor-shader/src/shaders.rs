//! WGSL source for the color pipeline evaluator.
//!
//! The shader exposes `apply_color_pipeline(rgb)`; the host shader that
//! samples the window texture includes this source and calls it once per
//! fragment. Per-op arithmetic is the same as `ColorOp::apply`.

/// Bind group index used by [`COLOR_PIPELINE_WGSL`].
pub const BIND_GROUP: u32 = 0;
/// Binding of the uniform block.
pub const BINDING_UNIFORMS: u32 = 0;
/// Bindings of the 1D LUT textures.
pub const BINDING_LUT1D: [u32; 2] = [1, 2];
/// Binding of the 3D LUT texture.
pub const BINDING_LUT3D: u32 = 3;
/// Binding of the linear clamp-to-edge sampler.
pub const BINDING_SAMPLER: u32 = 4;

/// Color pipeline evaluator.
pub const COLOR_PIPELINE_WGSL: &str = r#"
struct TransferFunction {
    kind: u32,
    min_luminance: f32,
    max_luminance: f32,
    _pad: f32,
}

struct Tonemapper {
    reference_luminance: f32,
    input_range: f32,
    added_range: f32,
    output_reference_luminance: f32,
    max_output_luminance: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
}

struct Op {
    kind: u32,
    index: u32,
    _pad0: u32,
    _pad1: u32,
}

struct ColorPipeline {
    matrices: array<mat4x4<f32>, 8>,
    transfer_functions: array<TransferFunction, 8>,
    tonemapper: Tonemapper,
    ops: array<Op, 16>,
    lut1d_params: array<vec4<f32>, 2>,   // domain min, domain max, size, 0
    lut3d_params: vec4<f32>,             // size, 0, 0, 0
    op_count: u32,
    _pad0: u32,
    _pad1: u32,
    _pad2: u32,
}

@group(0) @binding(0) var<uniform> pipeline: ColorPipeline;
@group(0) @binding(1) var lut1d_0: texture_2d<f32>;   // size x 1
@group(0) @binding(2) var lut1d_1: texture_2d<f32>;
@group(0) @binding(3) var lut3d: texture_3d<f32>;
@group(0) @binding(4) var lut_sampler: sampler;

const OP_MATRIX: u32 = 0u;
const OP_TRANSFER_FUNCTION: u32 = 1u;
const OP_INVERSE_TRANSFER_FUNCTION: u32 = 2u;
const OP_TONEMAPPER: u32 = 3u;
const OP_LUT1D: u32 = 4u;
const OP_LUT3D: u32 = 5u;

const TF_LINEAR: u32 = 0u;
const TF_SRGB: u32 = 1u;
const TF_GAMMA22: u32 = 2u;
const TF_PQ: u32 = 3u;
const TF_HLG: u32 = 4u;

const PQ_M1: f32 = 0.1593017578125;
const PQ_M2: f32 = 78.84375;
const PQ_C1: f32 = 0.8359375;
const PQ_C2: f32 = 18.8515625;
const PQ_C3: f32 = 18.6875;

const HLG_A: f32 = 0.17883277;
const HLG_B: f32 = 0.28466892;
const HLG_C: f32 = 0.55991073;

const E: f32 = 2.718281828459045;

fn srgb_eotf(v: f32) -> f32 {
    if v <= 0.04045 {
        return v / 12.92;
    }
    return pow((v + 0.055) / 1.055, 2.4);
}

fn srgb_oetf(l: f32) -> f32 {
    if l <= 0.0031308 {
        return l * 12.92;
    }
    return 1.055 * pow(l, 1.0 / 2.4) - 0.055;
}

fn gamma22_eotf(v: f32) -> f32 {
    return sign(v) * pow(abs(v), 2.2);
}

fn gamma22_oetf(l: f32) -> f32 {
    return sign(l) * pow(abs(l), 1.0 / 2.2);
}

fn pq_eotf(v: f32) -> f32 {
    if v <= 0.0 {
        return 0.0;
    }
    let vp = pow(min(v, 1.0), 1.0 / PQ_M2);
    let num = max(vp - PQ_C1, 0.0);
    let den = PQ_C2 - PQ_C3 * vp;
    return pow(num / den, 1.0 / PQ_M1);
}

fn pq_oetf(y: f32) -> f32 {
    if y <= 0.0 {
        return 0.0;
    }
    let yp = pow(min(y, 1.0), PQ_M1);
    return pow((PQ_C1 + PQ_C2 * yp) / (1.0 + PQ_C3 * yp), PQ_M2);
}

fn hlg_eotf(v: f32) -> f32 {
    if v <= 0.0 {
        return 0.0;
    }
    if v <= 0.5 {
        return v * v / 3.0;
    }
    return (exp((v - HLG_C) / HLG_A) + HLG_B) / 12.0;
}

fn hlg_oetf(e: f32) -> f32 {
    if e <= 0.0 {
        return 0.0;
    }
    if e <= 1.0 / 12.0 {
        return sqrt(3.0 * e);
    }
    return HLG_A * log(12.0 * e - HLG_B) + HLG_C;
}

fn to_relative(kind: u32, x: f32) -> f32 {
    switch kind {
        case TF_SRGB: { return srgb_eotf(x); }
        case TF_GAMMA22: { return gamma22_eotf(x); }
        case TF_PQ: { return pq_eotf(x); }
        case TF_HLG: { return hlg_eotf(x); }
        default: { return x; }
    }
}

fn from_relative(kind: u32, y: f32) -> f32 {
    switch kind {
        case TF_SRGB: { return srgb_oetf(y); }
        case TF_GAMMA22: { return gamma22_oetf(y); }
        case TF_PQ: { return pq_oetf(y); }
        case TF_HLG: { return hlg_oetf(y); }
        default: { return y; }
    }
}

fn encoded_to_nits(tf: TransferFunction, rgb: vec3<f32>) -> vec3<f32> {
    let range = tf.max_luminance - tf.min_luminance;
    return vec3<f32>(
        to_relative(tf.kind, rgb.r),
        to_relative(tf.kind, rgb.g),
        to_relative(tf.kind, rgb.b),
    ) * range + tf.min_luminance;
}

fn nits_to_encoded(tf: TransferFunction, nits: vec3<f32>) -> vec3<f32> {
    let rel = (nits - tf.min_luminance) / (tf.max_luminance - tf.min_luminance);
    return vec3<f32>(
        from_relative(tf.kind, rel.r),
        from_relative(tf.kind, rel.g),
        from_relative(tf.kind, rel.b),
    );
}

fn tonemap(i: f32) -> f32 {
    let tm = pipeline.tonemapper;
    let nits = 10000.0 * pq_eotf(i);
    let low = min(nits / tm.added_range, tm.output_reference_luminance);
    var relative = 0.0;
    if tm.input_range > 1.0 {
        relative = clamp((nits / tm.reference_luminance - 1.0) / (tm.input_range - 1.0), 0.0, 1.0);
    }
    let high = log(relative * (E - 1.0) + 1.0) * (tm.max_output_luminance - tm.output_reference_luminance);
    return pq_oetf((low + high) / 10000.0);
}

fn lut1d_coord(params: vec4<f32>, x: f32) -> f32 {
    let t = clamp((x - params.x) / (params.y - params.x), 0.0, 1.0);
    return (t * (params.z - 1.0) + 0.5) / params.z;
}

fn apply_lut1d(index: u32, rgb: vec3<f32>) -> vec3<f32> {
    let p = pipeline.lut1d_params[index];
    let u = vec3<f32>(lut1d_coord(p, rgb.r), lut1d_coord(p, rgb.g), lut1d_coord(p, rgb.b));
    if index == 0u {
        return vec3<f32>(
            textureSampleLevel(lut1d_0, lut_sampler, vec2<f32>(u.r, 0.5), 0.0).r,
            textureSampleLevel(lut1d_0, lut_sampler, vec2<f32>(u.g, 0.5), 0.0).g,
            textureSampleLevel(lut1d_0, lut_sampler, vec2<f32>(u.b, 0.5), 0.0).b,
        );
    }
    return vec3<f32>(
        textureSampleLevel(lut1d_1, lut_sampler, vec2<f32>(u.r, 0.5), 0.0).r,
        textureSampleLevel(lut1d_1, lut_sampler, vec2<f32>(u.g, 0.5), 0.0).g,
        textureSampleLevel(lut1d_1, lut_sampler, vec2<f32>(u.b, 0.5), 0.0).b,
    );
}

fn apply_lut3d(rgb: vec3<f32>) -> vec3<f32> {
    let size = pipeline.lut3d_params.x;
    let uvw = (clamp(rgb, vec3<f32>(0.0), vec3<f32>(1.0)) * (size - 1.0) + 0.5) / size;
    return textureSampleLevel(lut3d, lut_sampler, uvw, 0.0).rgb;
}

fn apply_color_pipeline(rgb_in: vec3<f32>) -> vec3<f32> {
    var rgb = rgb_in;
    for (var i = 0u; i < pipeline.op_count; i = i + 1u) {
        let op = pipeline.ops[i];
        switch op.kind {
            case OP_MATRIX: {
                rgb = (pipeline.matrices[op.index] * vec4<f32>(rgb, 1.0)).rgb;
            }
            case OP_TRANSFER_FUNCTION: {
                rgb = encoded_to_nits(pipeline.transfer_functions[op.index], rgb);
            }
            case OP_INVERSE_TRANSFER_FUNCTION: {
                rgb = nits_to_encoded(pipeline.transfer_functions[op.index], rgb);
            }
            case OP_TONEMAPPER: {
                rgb = vec3<f32>(tonemap(rgb.x), rgb.y, rgb.z);
            }
            case OP_LUT1D: {
                rgb = apply_lut1d(op.index, rgb);
            }
            case OP_LUT3D: {
                rgb = apply_lut3d(rgb);
            }
            default: {}
        }
    }
    return rgb;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declares_entry_point_and_bindings() {
        assert!(COLOR_PIPELINE_WGSL.contains("fn apply_color_pipeline(rgb_in: vec3<f32>) -> vec3<f32>"));
        for binding in [BINDING_UNIFORMS, BINDING_LUT1D[0], BINDING_LUT1D[1], BINDING_LUT3D, BINDING_SAMPLER] {
            let decl = format!("@group({BIND_GROUP}) @binding({binding})");
            assert!(COLOR_PIPELINE_WGSL.contains(&decl), "missing {decl}");
        }
    }

    #[test]
    fn test_wgsl_parses_and_validates() {
        use naga::valid::{Capabilities, ValidationFlags, Validator};

        // Minimal host shader calling the evaluator once per fragment
        let source = format!(
            "{COLOR_PIPELINE_WGSL}\n\
             @fragment\n\
             fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {{\n\
                 return vec4<f32>(apply_color_pipeline(color), 1.0);\n\
             }}\n"
        );
        let module = match naga::front::wgsl::parse_str(&source) {
            Ok(module) => module,
            Err(e) => panic!("{}", e.emit_to_string(&source)),
        };
        let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
        if let Err(e) = validator.validate(&module) {
            panic!("{}", e.emit_to_string(&source));
        }
        assert!(module.entry_points.iter().any(|ep| ep.name == "fs_main"));
    }

    #[test]
    fn test_op_kinds_match_serializer() {
        use crate::uniforms::*;
        for (name, value) in [
            ("OP_MATRIX", OP_MATRIX),
            ("OP_TRANSFER_FUNCTION", OP_TRANSFER_FUNCTION),
            ("OP_INVERSE_TRANSFER_FUNCTION", OP_INVERSE_TRANSFER_FUNCTION),
            ("OP_TONEMAPPER", OP_TONEMAPPER),
            ("OP_LUT1D", OP_LUT1D),
            ("OP_LUT3D", OP_LUT3D),
        ] {
            let decl = format!("const {name}: u32 = {value}u;");
            assert!(COLOR_PIPELINE_WGSL.contains(&decl), "missing {decl}");
        }
    }
}
