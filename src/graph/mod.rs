//! Realtime building blocks of a playback session's signal graph.
//!
//! Graph nodes wrap the low-level DSP primitives with what the engine needs at
//! runtime: block-based rendering, parameters shared with the control thread,
//! and flags that let the control thread start, stop and detach a graph that
//! is owned by the render thread. The `extensions` module adds `.through()` so
//! serial chains read in signal order.

/// Plays a decoded buffer once, reporting its natural end.
pub mod source;
/// Fixed impulse-response convolution.
pub mod convolver;
/// Fluent combinators (`.through()`).
pub mod extensions;
/// High-pass / low-pass tone filters with live cutoffs.
pub mod filter;
/// Gain stage with de-zippered updates.
pub mod gain;
/// Detach flag shared between a session and its render-side graph.
pub mod link;
/// Core traits shared by all graph nodes.
pub mod node;
/// Lock-free `f32` parameter cells.
pub mod param;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use node::{GraphNode, RenderCtx};
pub use param::Param;
