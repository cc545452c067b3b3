//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_ir::dsp::filter::SVFilter;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = SVFilter::lowpass(8_000.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(48_000.0));
            })
        });

        let mut filter = SVFilter::highpass(120.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("highpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(48_000.0));
            })
        });

        // Cutoff swept every block, as when a knob is dragged
        let mut filter = SVFilter::highpass(20.0);
        let mut cutoff = 20.0;
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("highpass_sweep", size), &size, |b, _| {
            b.iter(|| {
                cutoff = if cutoff > 2_000.0 { 20.0 } else { cutoff * 1.05 };
                filter.set_cutoff(cutoff);
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(48_000.0));
            })
        });
    }

    group.finish();
}
