//! Real-world scenario benchmarks.
//!
//! Complete session graphs as the engine builds them on play.

mod session;

pub use session::bench_session;
