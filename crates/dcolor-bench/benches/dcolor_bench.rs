//! Benchmarks for dcolor pipelines.
//!
//! Run with: `cargo bench`

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use dcolor_math::Vec3;
use dcolor_pipeline::{ColorDescription, ColorPipeline};
use dcolor_primaries::{Colorimetry, NamedColorimetry, RenderingIntent};
use dcolor_shader::{LutBindings, ShaderUniforms};
use dcolor_transfer::{TransferFunction, TransferFunctionType, pq, srgb};

fn conversions() -> Vec<(&'static str, ColorDescription, ColorDescription, RenderingIntent)> {
    let p3 = ColorDescription::from_transfer_function(
        Colorimetry::from_name(NamedColorimetry::DisplayP3),
        TransferFunction::new(TransferFunctionType::Srgb),
    );
    vec![
        ("srgb_to_pq", ColorDescription::srgb(), ColorDescription::bt2100_pq(), RenderingIntent::Perceptual),
        ("pq_to_srgb", ColorDescription::bt2100_pq(), ColorDescription::srgb(), RenderingIntent::Perceptual),
        ("p3_to_srgb", p3, ColorDescription::srgb(), RenderingIntent::RelativeColorimetric),
    ]
}

/// Benchmark the scalar curves the pipeline is built from.
fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");

    let values: Vec<f32> = (0..10000).map(|i| i as f32 / 10000.0).collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    group.bench_function("srgb_eotf", |b| {
        b.iter(|| values.iter().map(|&x| srgb::eotf(black_box(x))).collect::<Vec<_>>())
    });

    group.bench_function("pq_eotf_normalized", |b| {
        b.iter(|| values.iter().map(|&x| pq::eotf_normalized(black_box(x))).collect::<Vec<_>>())
    });

    group.bench_function("pq_oetf_normalized", |b| {
        b.iter(|| values.iter().map(|&x| pq::oetf_normalized(black_box(x))).collect::<Vec<_>>())
    });

    group.finish();
}

/// Benchmark pipeline construction, including fusion.
fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for (name, src, dst, intent) in conversions() {
        group.bench_function(name, |b| {
            b.iter(|| ColorPipeline::create(black_box(&src), black_box(&dst), intent))
        });
    }

    group.finish();
}

/// Benchmark CPU evaluation, one value at a time and in parallel batches.
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for (name, src, dst, intent) in conversions() {
        let pipeline = ColorPipeline::create(&src, &dst, intent);

        for size in [1024usize, 65536] {
            let pixels: Vec<[f32; 3]> = (0..size)
                .map(|i| {
                    let t = i as f32 / size as f32;
                    [t, 1.0 - t, (t * 7.0).fract()]
                })
                .collect();
            group.throughput(Throughput::Elements(size as u64));

            group.bench_with_input(BenchmarkId::new(format!("{name}_serial"), size), &pixels, |b, px| {
                b.iter(|| {
                    px.iter()
                        .map(|&p| pipeline.evaluate(black_box(Vec3::from_array(p))))
                        .collect::<Vec<_>>()
                })
            });

            group.bench_with_input(BenchmarkId::new(format!("{name}_batch"), size), &pixels, |b, px| {
                b.iter(|| {
                    let mut buf = px.clone();
                    pipeline.evaluate_batch(black_box(&mut buf));
                    buf
                })
            });
        }
    }

    group.finish();
}

/// Benchmark uniform packing and the CPU reference of the shader path.
fn bench_uniforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("uniforms");

    for (name, src, dst, intent) in conversions() {
        let pipeline = ColorPipeline::create(&src, &dst, intent);

        group.bench_function(format!("{name}_pack"), |b| {
            b.iter(|| ShaderUniforms::from_pipeline(black_box(&pipeline)))
        });

        if let Ok(uniforms) = ShaderUniforms::from_pipeline(&pipeline) {
            let luts = LutBindings::from_pipeline(&pipeline);
            group.bench_function(format!("{name}_evaluate"), |b| {
                b.iter(|| uniforms.evaluate(black_box(Vec3::new(0.25, 0.5, 0.75)), &luts))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_transfer, bench_create, bench_evaluate, bench_uniforms);
criterion_main!(benches);
