//! Golden hashes of pipeline output.
//!
//! Each case converts an RGB cube through a fixed pipeline and hashes the
//! quantized result. Reference hashes live in `golden/pipelines.json`
//! next to this crate's manifest and are regenerated with:
//!
//! ```bash
//! cargo run --package dcolor-tests --bin generate_golden
//! ```
//!
//! Comparison is skipped when the file does not exist.

use std::path::PathBuf;

use dcolor_math::Vec3;
use dcolor_pipeline::{ColorDescription, ColorPipeline};
use dcolor_primaries::{Colorimetry, NamedColorimetry, RenderingIntent};
use dcolor_transfer::{TransferFunction, TransferFunctionType};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Decimal places kept before hashing.
///
/// Four places absorb libm differences between platforms.
pub const HASH_PRECISION: i32 = 4;

/// One conversion under test.
#[derive(Debug, Clone)]
pub struct GoldenCase {
    /// Stable identifier.
    pub name: &'static str,
    /// Source description.
    pub from: ColorDescription,
    /// Destination description.
    pub to: ColorDescription,
    /// Rendering intent.
    pub intent: RenderingIntent,
}

/// Stored result of a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenEntry {
    /// Case name.
    pub name: String,
    /// Number of fused ops.
    pub ops: usize,
    /// SHA-256 of the quantized output.
    pub hash: String,
}

/// File format of `golden/pipelines.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenData {
    /// Cube size used for the inputs.
    pub cube_size: usize,
    /// Hash precision used for the entries.
    pub precision: i32,
    /// Results.
    pub entries: Vec<GoldenEntry>,
}

fn describe(name: NamedColorimetry, ty: TransferFunctionType) -> ColorDescription {
    ColorDescription::from_transfer_function(Colorimetry::from_name(name), TransferFunction::new(ty))
}

/// The golden cases.
pub fn cases() -> Vec<GoldenCase> {
    use NamedColorimetry::*;
    use TransferFunctionType::*;

    vec![
        GoldenCase {
            name: "srgb_to_hdr10_perceptual",
            from: ColorDescription::srgb(),
            to: ColorDescription::bt2100_pq(),
            intent: RenderingIntent::Perceptual,
        },
        GoldenCase {
            name: "hdr10_to_srgb_perceptual",
            from: ColorDescription::bt2100_pq(),
            to: ColorDescription::srgb(),
            intent: RenderingIntent::Perceptual,
        },
        GoldenCase {
            name: "hdr10_to_srgb_relative",
            from: ColorDescription::bt2100_pq(),
            to: ColorDescription::srgb(),
            intent: RenderingIntent::RelativeColorimetric,
        },
        GoldenCase {
            name: "p3_to_bt709_relative_bpc",
            from: describe(DisplayP3, Srgb),
            to: describe(Bt709, Gamma22),
            intent: RenderingIntent::RelativeColorimetricWithBpc,
        },
        GoldenCase {
            name: "dci_p3_to_bt709_absolute",
            from: describe(DciP3, Gamma22),
            to: describe(Bt709, Srgb),
            intent: RenderingIntent::AbsoluteColorimetric,
        },
        GoldenCase {
            name: "hlg_to_pq_perceptual",
            from: describe(Bt2020, Hlg),
            to: describe(Bt2020, PerceptualQuantizer),
            intent: RenderingIntent::Perceptual,
        },
    ]
}

/// RGB cube with `size` steps per axis, red varying fastest.
pub fn rgb_cube(size: usize) -> Vec<[f32; 3]> {
    let step = 1.0 / (size.max(2) - 1) as f32;
    let mut cube = Vec::with_capacity(size * size * size);
    for b in 0..size {
        for g in 0..size {
            for r in 0..size {
                cube.push([r as f32 * step, g as f32 * step, b as f32 * step]);
            }
        }
    }
    cube
}

/// SHA-256 of `data` quantized to [`HASH_PRECISION`] decimal places.
pub fn hash_rgb(data: &[[f32; 3]]) -> String {
    let factor = 10f64.powi(HASH_PRECISION);
    let mut hasher = Sha256::new();
    for v in data.iter().flatten() {
        let q = (*v as f64 * factor).round() as i64;
        hasher.update(q.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Evaluates `case` over a cube and hashes the result.
pub fn compute_entry(case: &GoldenCase, cube_size: usize) -> GoldenEntry {
    let pipeline = ColorPipeline::create(&case.from, &case.to, case.intent);
    let output: Vec<[f32; 3]> = rgb_cube(cube_size)
        .into_iter()
        .map(|rgb| pipeline.evaluate(Vec3::from(rgb)).to_array())
        .collect();
    GoldenEntry {
        name: case.name.to_string(),
        ops: pipeline.len(),
        hash: hash_rgb(&output),
    }
}

/// Computes every golden entry.
pub fn compute_golden(cube_size: usize) -> GoldenData {
    GoldenData {
        cube_size,
        precision: HASH_PRECISION,
        entries: cases().iter().map(|c| compute_entry(c, cube_size)).collect(),
    }
}

/// Location of the reference file.
pub fn golden_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden").join("pipelines.json")
}

/// Loads the reference file, if present and readable.
pub fn load_golden() -> Option<GoldenData> {
    let content = std::fs::read_to_string(golden_path()).ok()?;
    serde_json::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cube size for the stored hashes.
    const CUBE_SIZE: usize = 9;

    #[test]
    fn test_against_golden() {
        let Some(golden) = load_golden() else {
            println!("no golden file at {}, skipping", golden_path().display());
            return;
        };
        assert_eq!(golden.precision, HASH_PRECISION);
        let computed = compute_golden(golden.cube_size);
        for expected in &golden.entries {
            let got = computed
                .entries
                .iter()
                .find(|e| e.name == expected.name)
                .unwrap_or_else(|| panic!("unknown golden case {}", expected.name));
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_hash_deterministic() {
        let a = compute_golden(CUBE_SIZE);
        let b = compute_golden(CUBE_SIZE);
        assert_eq!(a, b);
        assert_eq!(a.entries.len(), cases().len());
    }

    #[test]
    fn test_batch_matches_serial() {
        for case in cases() {
            let pipeline = ColorPipeline::create(&case.from, &case.to, case.intent);
            let mut batch = rgb_cube(CUBE_SIZE);
            pipeline.evaluate_batch(&mut batch);
            assert_eq!(hash_rgb(&batch), compute_entry(&case, CUBE_SIZE).hash, "{}", case.name);
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let data = compute_golden(3);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipelines.json");
        std::fs::write(&path, serde_json::to_string_pretty(&data).unwrap()).unwrap();
        let loaded: GoldenData = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, data);
    }
}
