use thiserror::Error;

use crate::{dsp::convolution::ConvolverError, io::BackendError};

/// Why a session graph could not be built. Nothing is left running.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("no audio sample loaded")]
    NoSampleLoaded,
    #[error("render sample rate {0} is not usable")]
    InvalidSampleRate(f32),
    #[error("partition size {size} exceeds the render block limit of {max}")]
    PartitionTooLarge { size: usize, max: usize },
    #[error("impulse response {} could not be used", .slot + 1)]
    Convolver {
        slot: usize,
        #[source]
        source: ConvolverError,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("no audio sample loaded")]
    NoSampleLoaded,
    #[error("there is no IR slot {0}")]
    InvalidSlot(usize),
    #[error("could not build session: {0}")]
    Build(#[from] BuildError),
    #[error("could not start session: {0}")]
    Backend(#[from] BackendError),
}
