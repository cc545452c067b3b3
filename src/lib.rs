pub mod control; // Knob/slider curves and typed control targets
pub mod dsp;
pub mod engine; // Slots, graph builder, playback sessions, facade
pub mod graph; // Realtime graph nodes with shared parameters
pub mod io;

pub use engine::{Engine, EngineConfig, EngineError, EngineEvent};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Number of IR module slots held by an engine.
pub const SLOT_COUNT: usize = 4;
