use cirs_core::{
    Converter, ConverterConfig, JulianDate, PoleOffset, PoleOffsetSource, RotationBuilder,
    VectorBatch, transform,
};
use cirs_time::{EopResponse, FixedEop};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn rotation_bench(c: &mut Criterion) {
    let tt = JulianDate::new(2_460_000.5, 0.25);
    let builder = RotationBuilder::iau2006();

    let mut group = c.benchmark_group("rotation");
    group.bench_function("cip_xys", |b| {
        b.iter(|| cirs_frames::cip_xys(black_box(tt)))
    });
    group.bench_function("build", |b| {
        b.iter(|| builder.build(black_box(tt), PoleOffset::new(1e-10, -1e-10)))
    });
    group.finish();
}

fn batch_bench(c: &mut Criterion) {
    let tt = JulianDate::new(2_460_000.5, 0.25);
    let matrix = RotationBuilder::iau2006()
        .build(tt, PoleOffset::ZERO)
        .map(|rot| rot.cirs_to_gcrs())
        .unwrap_or_default();

    let mut group = c.benchmark_group("transform");
    for count in [1usize, 1_000, 100_000] {
        let states: Vec<[f64; 6]> = (0..count)
            .map(|i| {
                let k = i as f64;
                [7_000.0 + k, -k, 0.5 * k, 7.5, 0.001 * k, -1.0]
            })
            .collect();
        let batch = VectorBatch::from_states(&states);
        group.bench_with_input(BenchmarkId::new("states", count), &batch, |b, batch| {
            b.iter(|| transform(black_box(&matrix), black_box(batch)))
        });
    }
    group.finish();
}

fn converter_bench(c: &mut Criterion) {
    let Ok(converter) = Converter::new(ConverterConfig::default()) else {
        return;
    };
    let converter = converter.with_eop_provider(FixedEop(EopResponse::pole_offsets(1e-10, 0.0)));
    let tt = JulianDate::new(2_460_000.5, 0.25);
    let batch = VectorBatch::from_positions(&[[1.0, 0.0, 0.0]; 64]);

    let mut group = c.benchmark_group("converter");
    group.bench_function("cirs_to_gcrs_eop_lookup", |b| {
        b.iter(|| {
            converter.cirs_to_gcrs(
                black_box(tt),
                PoleOffsetSource::LookupFromEop,
                black_box(&batch),
            )
        })
    });
    group.finish();
}

criterion_group!(benches, rotation_bench, batch_bench, converter_bench);
criterion_main!(benches);
