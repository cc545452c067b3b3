//! Benchmarks for low-level DSP primitives.

mod amplify;
mod convolution;
mod filter;
mod mix;

pub use amplify::bench_amplify;
pub use convolution::bench_convolution;
pub use filter::bench_filter;
pub use mix::bench_mix;
