//! Benchmarks for partitioned convolution.
//!
//! Cost grows with IR length (one complex multiply-accumulate per partition per
//! block), so lengths cover a small room up to a long hall at 48kHz.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_ir::dsp::convolution::{PartitionedConvolver, DEFAULT_PARTITION_SIZE};

use crate::BLOCK_SIZES;

const IR_LENGTHS: &[(&str, usize)] = &[("room_0.25s", 12_000), ("hall_2s", 96_000)];

fn decaying_noise(len: usize) -> Vec<f32> {
    // Cheap LCG, reproducible across runs
    let mut state = 0x1234_5678u32;
    (0..len)
        .map(|i| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0;
            noise * (-(i as f32) / (len as f32 / 6.0)).exp()
        })
        .collect()
}

pub fn bench_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolution");

    for &(name, ir_len) in IR_LENGTHS {
        let impulse = decaying_noise(ir_len);

        for &size in BLOCK_SIZES {
            let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
            let mut buffer = input.clone();
            let mut convolver = match PartitionedConvolver::new(&impulse, DEFAULT_PARTITION_SIZE) {
                Ok(convolver) => convolver,
                Err(err) => panic!("convolver setup failed: {err}"),
            };

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    convolver.process(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
