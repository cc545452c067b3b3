//! Benchmarks for gain stages.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_ir::dsp::amplify::{self, SmoothedGain};

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut signal_copy = signal.clone();
        group.bench_with_input(BenchmarkId::new("apply_gain", size), &size, |b, _| {
            b.iter(|| {
                signal_copy.copy_from_slice(&signal);
                amplify::apply_gain(black_box(&mut signal_copy), black_box(0.5))
            })
        });

        // Settled smoother takes the constant-gain path
        let mut smoother = SmoothedGain::new(0.7, 5.0);
        let mut signal_copy = signal.clone();
        group.bench_with_input(BenchmarkId::new("smoothed_settled", size), &size, |b, _| {
            b.iter(|| {
                signal_copy.copy_from_slice(&signal);
                smoother.render(black_box(&mut signal_copy), black_box(48_000.0))
            })
        });

        // Knob being dragged: a new target every block
        let mut smoother = SmoothedGain::new(0.0, 5.0);
        let mut target = 0.0;
        let mut signal_copy = signal.clone();
        group.bench_with_input(BenchmarkId::new("smoothed_moving", size), &size, |b, _| {
            b.iter(|| {
                target = if target > 1.5 { 0.0 } else { target + 0.1 };
                smoother.set_target(target);
                signal_copy.copy_from_slice(&signal);
                smoother.render(black_box(&mut signal_copy), black_box(48_000.0))
            })
        });
    }

    group.finish();
}
