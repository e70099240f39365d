//! Benchmarks for the per-frame CPU work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cosmic_field::light::{Flicker, LightState};
use cosmic_field::{FieldConfig, ParticleFieldAnimator};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for count in [1_000usize, 15_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let config = FieldConfig {
                particle_count: count,
                seed: Some(1),
                ..Default::default()
            };
            let mut animator = ParticleFieldAnimator::new(&config);
            let mut t = 0.0;
            b.iter(|| {
                t += 1.0 / 60.0;
                animator.tick(black_box(t));
            })
        });
    }

    group.finish();
}

fn bench_flicker(c: &mut Criterion) {
    let flicker = Flicker::default();
    let mut light = LightState::new();
    c.bench_function("flicker", |b| {
        b.iter(|| light.apply_flicker(&flicker, black_box(1234.5)))
    });
}

criterion_group!(benches, bench_tick, bench_flicker);
criterion_main!(benches);
