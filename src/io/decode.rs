//! Events delivered by the (external) audio file decoder.

use thiserror::Error;

use super::buffer::AudioBuffer;

/// Where a decoded buffer should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadTarget {
    /// The dry sample played by every session
    Dry,
    /// An IR module slot
    Ir(usize),
}

impl std::fmt::Display for LoadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadTarget::Dry => write!(f, "audio sample"),
            LoadTarget::Ir(slot) => write!(f, "impulse response {}", slot + 1),
        }
    }
}

/// A file that could not be turned into an [`AudioBuffer`].
#[derive(Debug, Error, Clone, PartialEq)]
#[error("failed to decode {file_name}: {reason}")]
pub struct DecodeFailure {
    pub file_name: String,
    pub reason: String,
}

impl DecodeFailure {
    pub fn new(file_name: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            file_name: file_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Completion of one asynchronous decode.
#[derive(Debug, Clone)]
pub struct DecodeEvent {
    pub target: LoadTarget,
    pub result: Result<AudioBuffer, DecodeFailure>,
}

impl DecodeEvent {
    pub fn loaded(target: LoadTarget, buffer: AudioBuffer) -> Self {
        Self {
            target,
            result: Ok(buffer),
        }
    }

    pub fn failed(target: LoadTarget, failure: DecodeFailure) -> Self {
        Self {
            target,
            result: Err(failure),
        }
    }
}
