#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::convolution::DEFAULT_PARTITION_SIZE;

/// Tuning knobs for an [`Engine`](super::Engine).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Convolution partition length in frames; also the wet path latency
    pub partition_size: usize,
    /// Time constant for gain changes
    pub smoothing_ms: f32,
    /// Graphs in flight between control and render thread, each way
    pub queue_capacity: usize,
    /// Apply loudness calibration to impulse responses
    pub normalize_ir: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            partition_size: DEFAULT_PARTITION_SIZE,
            smoothing_ms: 5.0,
            queue_capacity: 8,
            normalize_ir: true,
        }
    }
}
