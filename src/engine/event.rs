//! Notifications for the front-end.

use crate::io::{AudioBuffer, LoadTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayIcon {
    Play,
    Stop,
}

/// What the transport controls should currently allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub play_enabled: bool,
    pub stop_enabled: bool,
    pub icon: PlayIcon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Human-readable status line
    Status(String),
    /// A decoded file was stored
    SlotLoaded {
        target: LoadTarget,
        duration_secs: f64,
        sample_rate: f32,
        channels: usize,
    },
    SlotLoadFailed {
        target: LoadTarget,
        file_name: String,
    },
    ControlsChanged(ControlState),
}

impl EngineEvent {
    /// Load confirmation describing `buffer`.
    pub fn loaded(target: LoadTarget, buffer: &AudioBuffer) -> Self {
        EngineEvent::SlotLoaded {
            target,
            duration_secs: buffer.duration_secs(),
            sample_rate: buffer.sample_rate(),
            channels: buffer.channel_count(),
        }
    }
}
