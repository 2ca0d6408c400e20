//! Integration tests for the dcolor crates.
//!
//! This crate checks properties that only hold across crates: pipelines
//! built from descriptions, their fusion, and agreement between the CPU
//! evaluator and the shader uniform path.

pub mod golden;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_abs_diff_eq;
    use dcolor_lut::Lut3D;
    use dcolor_math::{Mat4, Vec3};
    use dcolor_pipeline::{ColorDescription, ColorOpKind, ColorPipeline, PipelineConfig, ValueRange};
    use dcolor_primaries::{Colorimetry, NamedColorimetry, RenderingIntent, XyY, Xyz};
    use dcolor_shader::{LutBindings, ShaderUniforms};
    use dcolor_transfer::{TransferFunction, TransferFunctionType};

    fn describe(name: NamedColorimetry, ty: TransferFunctionType) -> ColorDescription {
        ColorDescription::from_transfer_function(Colorimetry::from_name(name), TransferFunction::new(ty))
    }

    /// Same description with every luminance scaled by `factor`.
    fn scaled(d: &ColorDescription, factor: f32) -> ColorDescription {
        ColorDescription::new(
            *d.colorimetry(),
            d.transfer_function().scaled(factor),
            d.reference_luminance() * factor,
            d.min_luminance() * factor,
            d.max_average_luminance().map(|v| v * factor),
            d.max_hdr_luminance().map(|v| v * factor),
        )
    }

    const PRIMARIES_AND_WHITE: [Vec3; 4] = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
    ];

    #[test]
    fn test_round_trip_to_linear_bt2020() {
        let dst = describe(NamedColorimetry::Bt2020, TransferFunctionType::Linear);
        for ty in [
            TransferFunctionType::Srgb,
            TransferFunctionType::Gamma22,
            TransferFunctionType::Linear,
            TransferFunctionType::PerceptualQuantizer,
        ] {
            let src = describe(NamedColorimetry::Bt709, ty);
            let tolerance = if ty == TransferFunctionType::PerceptualQuantizer {
                3.0 / 1024.0
            } else {
                1.0 / 1024.0
            };
            for intent in [RenderingIntent::RelativeColorimetric, RenderingIntent::AbsoluteColorimetric] {
                for c in PRIMARIES_AND_WHITE {
                    let there = src.map_to(c, &dst, intent);
                    let back = dst.map_to(there, &src, intent);
                    for i in 0..3 {
                        assert!(
                            (back[i] - c[i]).abs() <= tolerance,
                            "{ty} {intent}: {c:?} -> {there:?} -> {back:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_scaled_self_conversion_is_identity() {
        for name in [NamedColorimetry::Bt709, NamedColorimetry::Bt2020] {
            for ty in [
                TransferFunctionType::Srgb,
                TransferFunctionType::Gamma22,
                TransferFunctionType::PerceptualQuantizer,
                TransferFunctionType::Linear,
            ] {
                let src = describe(name, ty);
                let dst = scaled(&src, 1.1);
                for intent in RenderingIntent::ALL {
                    let pipeline = ColorPipeline::create(&src, &dst, intent);
                    assert!(pipeline.is_identity(), "{name} {ty} {intent}:\n{pipeline}");
                }
            }
        }
    }

    #[test]
    fn test_xyy_degenerate_values() {
        assert_eq!(Xyz::new(0.0, 0.0, 0.0).to_xyy(), XyY::new(0.0, 0.0, 1.0));
        assert!(Xyz::new(100.0, 100.0, 100.0).to_xyy().y <= 1.0);
        assert_eq!(XyY::new(0.0, 0.0, 1.0).to_xyz(), Xyz::new(0.0, 0.0, 0.0));
        assert_eq!(XyY::new(1.0, 0.0, 1.0).to_xyz(), Xyz::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_ciexyz_is_identity() {
        let xyz = Colorimetry::from_name(NamedColorimetry::CieXyz);
        assert!(Mat4::from_mat3(xyz.to_xyz()).is_fuzzy_identity());
        assert!(Mat4::from_mat3(xyz.from_xyz()).is_fuzzy_identity());
    }

    /// Largest per-channel difference in 8-bit units over a 255x255 gradient.
    fn max_gpu_distance(pipeline: &ColorPipeline) -> f32 {
        let uniforms = ShaderUniforms::from_pipeline(pipeline).unwrap();
        let luts = LutBindings::from_pipeline(pipeline);
        let mut max = 0.0f32;
        for y in 0..255 {
            for x in 0..255 {
                let rgb = Vec3::new(x as f32 / 254.0, y as f32 / 254.0, (x + y) as f32 / 508.0);
                let cpu = pipeline.evaluate(rgb);
                let gpu = uniforms.evaluate(rgb, &luts);
                assert!(cpu.is_finite() && gpu.is_finite(), "{rgb:?}: {cpu:?} vs {gpu:?}");
                max = max.max(((cpu - gpu).abs() * 255.0).max_element());
            }
        }
        max
    }

    #[test]
    fn test_cpu_matches_shader_uniforms() {
        let cases = [
            (ColorDescription::bt2100_pq(), ColorDescription::srgb(), RenderingIntent::Perceptual),
            (ColorDescription::srgb(), ColorDescription::bt2100_pq(), RenderingIntent::Perceptual),
            (
                describe(NamedColorimetry::DisplayP3, TransferFunctionType::Srgb),
                describe(NamedColorimetry::Bt709, TransferFunctionType::Gamma22),
                RenderingIntent::RelativeColorimetric,
            ),
            (
                describe(NamedColorimetry::Bt2020, TransferFunctionType::Hlg),
                describe(NamedColorimetry::Bt709, TransferFunctionType::Srgb),
                RenderingIntent::AbsoluteColorimetric,
            ),
        ];
        for (src, dst, intent) in cases {
            let pipeline = ColorPipeline::create(&src, &dst, intent);
            let threshold = if intent == RenderingIntent::Perceptual { 7.0 } else { 1.5 };
            let distance = max_gpu_distance(&pipeline);
            assert!(distance < threshold, "{src} -> {dst} ({intent}): {distance}");
        }
    }

    #[test]
    fn test_cpu_matches_shader_uniforms_with_lut() {
        let mut pipeline = ColorPipeline::create(
            &ColorDescription::srgb(),
            &describe(NamedColorimetry::Bt709, TransferFunctionType::Srgb),
            RenderingIntent::RelativeColorimetric,
        );
        pipeline.add_lut3d(Arc::new(Lut3D::from_fn(17, |[r, g, b]| [g, b, r])));
        assert!(max_gpu_distance(&pipeline) < 1.5);
    }

    #[test]
    fn test_degenerate_destination_metadata() {
        let bt709 = Colorimetry::from_name(NamedColorimetry::Bt709);
        let gamma22 = TransferFunction::new(TransferFunctionType::Gamma22);
        let destinations = [
            // max below reference
            ColorDescription::new(bt709, gamma22, 80.0, 0.0, Some(50.0), Some(50.0)),
            ColorDescription::new(bt709, gamma22, 80.0, 0.0, None, Some(f32::NAN)),
            ColorDescription::new(bt709, gamma22, 0.0, 0.0, Some(0.0), Some(0.0)),
            ColorDescription::new(bt709, gamma22, f32::NAN, f32::NAN, Some(f32::NAN), Some(f32::NAN)),
        ];
        for dst in destinations {
            for src in [ColorDescription::srgb(), ColorDescription::bt2100_pq()] {
                for intent in RenderingIntent::ALL {
                    let pipeline = ColorPipeline::create(&src, &dst, intent);
                    let black = pipeline.evaluate(Vec3::ZERO);
                    assert_abs_diff_eq!(black.max_element(), 0.0, epsilon = 1e-4);
                    assert_abs_diff_eq!(black.min_element(), 0.0, epsilon = 1e-4);
                    for v in [0.25, 0.5, 1.0] {
                        assert!(pipeline.evaluate(Vec3::splat(v)).is_finite(), "{src} -> {dst} ({intent})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_alternating_matrix_multiplier_stays_one_op() {
        let m = Mat4::from_rows([
            [0.9, 0.1, 0.0, 0.0],
            [0.05, 0.9, 0.05, 0.0],
            [0.0, 0.1, 0.9, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let mut pipeline = ColorPipeline::new();
        for i in 0..50 {
            if i % 2 == 0 {
                pipeline.add_matrix(m, ValueRange::UNIT);
            } else {
                pipeline.add_multiplier(Vec3::new(1.1, 0.9, 1.05), ValueRange::UNIT);
            }
            assert!(pipeline.len() <= 1, "step {i}: {}", pipeline.len());
        }
        assert!(matches!(pipeline.ops()[0].operation, ColorOpKind::Matrix(_)));
    }

    #[test]
    fn test_merged_round_trip_collapses() {
        let sdr = ColorDescription::srgb();
        let hdr = ColorDescription::bt2100_pq();
        let intent = RenderingIntent::RelativeColorimetric;
        let there = ColorPipeline::create(&sdr, &hdr, intent);
        let back = ColorPipeline::create(&hdr, &sdr, intent);
        assert_eq!(there.len(), 3);
        assert!(there.merged(&back).is_identity(), "{}", there.merged(&back));
    }

    #[test]
    fn test_config_file_disables_tonemapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dcolor.yaml");
        std::fs::write(&path, "tonemapping: false\n").unwrap();
        let config = PipelineConfig::load(&path).unwrap();

        let has_tonemapper = |p: &ColorPipeline| p.ops().iter().any(|op| matches!(op.operation, ColorOpKind::Tonemapper(_)));
        let hdr = ColorDescription::bt2100_pq();
        let sdr = ColorDescription::srgb();
        assert!(has_tonemapper(&ColorPipeline::create(&hdr, &sdr, RenderingIntent::Perceptual)));
        assert!(!has_tonemapper(&ColorPipeline::create_with_config(
            &hdr,
            &sdr,
            RenderingIntent::Perceptual,
            &config
        )));
    }

    #[test]
    fn test_dimmed_hdr_gray_ramp() {
        let hdr = ColorDescription::bt2100_pq().dimmed(0.5);
        let sdr = ColorDescription::srgb();
        let pipeline = ColorPipeline::create(&hdr, &sdr, RenderingIntent::Perceptual);
        let mut pixels: Vec<[f32; 3]> = (0..=64).map(|i| [i as f32 / 64.0; 3]).collect();
        pipeline.evaluate_batch(&mut pixels);
        for (i, px) in pixels.iter().enumerate() {
            assert!(px.iter().all(|c| c.is_finite()), "{i}: {px:?}");
        }
        // monotonic gray ramp
        for pair in pixels.windows(2) {
            assert!(pair[1][1] >= pair[0][1] - 1e-4, "{pair:?}");
        }
    }
}
