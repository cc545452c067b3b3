//! Low-level DSP primitives used by the graph nodes.
//!
//! These components allocate only at construction and are realtime-safe
//! afterwards, making them safe to embed directly inside render-thread nodes.
//! They intentionally stay focused on the signal-processing math; parameter
//! sharing and graph wiring live in `graph` and `engine`.

/// Constant and smoothed gain.
pub mod amplify;
/// Uniformly partitioned FFT convolution and IR loudness calibration.
pub mod convolution;
/// Bus summing, normalization and channel downmix.
pub mod mix;
/// Linear-interpolation sample-rate conversion.
pub mod resample;
/// State-variable filter with low-pass and high-pass responses.
pub mod filter;
