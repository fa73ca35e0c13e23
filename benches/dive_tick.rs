//! Tick throughput benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use decompression::core::config::DecompressionConfig;
use decompression::core::curve::DiveCurves;
use decompression::dive::NitrogenAccumulator;
use decompression::simulation::{run_profile, DiveProfile, DiveSimulation, ProfileHost, RunSettings};

fn seeded() -> DiveSimulation {
    let config = DecompressionConfig {
        seed: Some(42),
        ..DecompressionConfig::default()
    };
    DiveSimulation::new(config).unwrap()
}

fn bench_accumulator_fire(c: &mut Criterion) {
    let curves = DiveCurves::default();
    c.bench_function("accumulator_fire", |b| {
        let mut acc = NitrogenAccumulator::new();
        let mut depth = 0.0f32;
        b.iter(|| {
            depth = (depth + 0.5) % 400.0;
            acc.fire(black_box(depth), 1.0, &curves);
        })
    });
}

fn bench_frame(c: &mut Criterion) {
    let profile = DiveProfile::deep_bounce();
    c.bench_function("frame_at_depth", |b| {
        let mut sim = seeded();
        let mut host = ProfileHost::new(&profile).unwrap();
        host.set_time(330.0);
        b.iter(|| {
            sim.on_fixed_tick(&host, 0.02);
            black_box(sim.on_variable_tick(&mut host, 1.0 / 60.0));
        })
    });
}

fn bench_deep_bounce(c: &mut Criterion) {
    let profile = DiveProfile::deep_bounce();
    c.bench_function("deep_bounce_profile", |b| {
        b.iter(|| {
            let mut sim = seeded();
            black_box(run_profile(&mut sim, &profile, RunSettings::default()).unwrap())
        })
    });
}

criterion_group!(benches, bench_accumulator_fire, bench_frame, bench_deep_bounce);
criterion_main!(benches);
