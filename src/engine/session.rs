#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    control::{ControlTarget, ModuleParam},
    engine::builder::SessionHandles,
    graph::link::SessionLink,
};

/// Where the engine is in a play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Building,
    Running,
    Ended,
}

/// What a play-through routes through the reverb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlayMode {
    /// Dry and wet paths at the stored mix, one voice per loaded slot
    #[default]
    Wet,
    /// Bypass: the dry sample alone at unity, no voices built. The mix
    /// control does not reach the session.
    Dry,
}

/// One play-through: the control-side half of a graph running on the render thread.
///
/// Dropping the session tears it down. The source is halted at once and the
/// graph is flagged detached; the render thread lets go of it at its next
/// block. Teardown needs no ordering between nodes, so there is nothing else
/// to release by hand.
pub struct PlaybackSession {
    id: u64,
    mode: PlayMode,
    handles: SessionHandles,
    link: SessionLink,
}

impl PlaybackSession {
    pub(crate) fn new(id: u64, mode: PlayMode, handles: SessionHandles, link: SessionLink) -> Self {
        Self {
            id,
            mode,
            handles,
            link,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn handles(&self) -> &SessionHandles {
        &self.handles
    }

    pub fn voice_count(&self) -> usize {
        self.handles.voice_count()
    }

    /// Whether a voice was built for `slot` when this session started.
    pub fn has_voice(&self, slot: usize) -> bool {
        self.handles.voice(slot).is_some()
    }

    /// The source played through its whole buffer.
    pub fn has_ended(&self) -> bool {
        self.handles.source.has_ended()
    }

    pub fn is_detached(&self) -> bool {
        self.link.is_detached()
    }

    /// Push a physical value into the live node(s) behind `target`.
    ///
    /// Per-voice targets only reach voices built for this session, and a dry
    /// session keeps its unity dry gain. Returns whether any node was updated.
    pub fn apply(&self, target: ControlTarget, value: f32) -> bool {
        let handles = &self.handles;
        match target {
            ControlTarget::MasterGain => handles.master_gain.set(value),
            ControlTarget::MasterLowCut => handles.master_low_cut.set(value),
            ControlTarget::MasterHighCut => handles.master_high_cut.set(value),
            ControlTarget::DryWetMix if self.mode == PlayMode::Dry => return false,
            ControlTarget::DryWetMix => {
                handles.dry_gain.set(1.0 - value);
                handles.wet_gain.set(value);
            }
            ControlTarget::Module(slot, param) => {
                let Some(voice) = handles.voice(slot) else {
                    return false;
                };
                match param {
                    ModuleParam::Gain => voice.gain.set(value),
                    ModuleParam::LowCut => voice.low_cut.set(value),
                    ModuleParam::HighCut => voice.high_cut.set(value),
                }
            }
        }
        true
    }

    /// Halt the source and detach the graph. Safe to call any number of times.
    pub fn stop(&self) {
        if self.handles.source.stop() {
            debug!(session = self.id, "source halted");
        }
        self.link.detach();
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.stop();
    }
}
