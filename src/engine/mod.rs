//! The engine facade: slots, master state, dry sample and the live session.

pub mod builder;
pub mod config;
pub mod error;
pub mod event;
pub mod session;
pub mod slot;

use std::{collections::VecDeque, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    control::{ControlEvent, ControlTarget},
    graph::link::SessionLink,
    io::{AttachedGraph, AudioBackend, AudioBuffer, DecodeEvent, LoadTarget},
    SLOT_COUNT,
};

pub use self::{
    builder::{build_session, SessionGraph, SessionHandles, VoiceHandles},
    config::EngineConfig,
    error::{BuildError, EngineError},
    event::{ControlState, EngineEvent, PlayIcon},
    session::{PlayMode, PlaybackSession, PlaybackState},
    slot::{IrSlot, MasterState},
};

/*
Engine
======

Owns everything that outlives a single play-through and lives on the control
thread:

  - the dry sample
  - SLOT_COUNT IR slots (buffer + gain / low cut / high cut / phase)
  - master state (gain / low cut / high cut / dry-wet mix)
  - at most one PlaybackSession
  - the backend the session graphs are rendered by

Lifecycle:

  Idle ──play──▶ Building ──graph attached──▶ Running ──source ran out──▶ Ended
   ▲                │                           │                           │
   └────────────────┴─────────stop──────────────┴───────────stop────────────┘

`play` always tears down the previous session before building the next one,
so two sources never write to the output at once. `play_dry` is the A/B
bypass: the dry sample at unity with no voices, whatever the slots and the
mix hold. Natural end is observed on `poll`, which the front-end calls
regularly (e.g. once per UI frame).

Control changes are stored first, then pushed into the running session when
it has a node for them. Nothing here blocks on the render thread.
*/

pub struct Engine<B: AudioBackend> {
    backend: B,
    config: EngineConfig,
    dry: Option<Arc<AudioBuffer>>,
    slots: Vec<IrSlot>,
    master: MasterState,
    session: Option<PlaybackSession>,
    state: PlaybackState,
    next_session: u64,
    events: VecDeque<EngineEvent>,
    controls: ControlState,
}

impl<B: AudioBackend> Engine<B> {
    pub fn new(backend: B, config: EngineConfig) -> Self {
        Self {
            backend,
            config,
            dry: None,
            slots: (0..SLOT_COUNT).map(IrSlot::new).collect(),
            master: MasterState::default(),
            session: None,
            state: PlaybackState::Idle,
            next_session: 1,
            events: VecDeque::new(),
            controls: ControlState {
                play_enabled: false,
                stop_enabled: false,
                icon: PlayIcon::Play,
            },
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn dry_sample(&self) -> Option<&Arc<AudioBuffer>> {
        self.dry.as_ref()
    }

    pub fn slots(&self) -> &[IrSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&IrSlot> {
        self.slots.get(index)
    }

    pub fn master(&self) -> &MasterState {
        &self.master
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    /// Current physical value behind a control target
    pub fn parameter(&self, target: ControlTarget) -> Option<f32> {
        match target {
            ControlTarget::Module(slot, param) => self.slot(slot).map(|s| s.param(param)),
            _ => self.master.get(target),
        }
    }

    /// Take all events emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    /// Announce that a decode for `target` has started.
    pub fn begin_load(&mut self, target: LoadTarget) {
        self.status(format!("Loading {target}..."));
    }

    pub fn load_dry_sample(&mut self, buffer: AudioBuffer) {
        let loaded = EngineEvent::loaded(LoadTarget::Dry, &buffer);
        info!(
            duration_secs = buffer.duration_secs(),
            sample_rate = buffer.sample_rate(),
            channels = buffer.channel_count(),
            "dry sample loaded"
        );
        self.dry = Some(Arc::new(buffer));
        self.events.push_back(loaded);
        self.status("Audio sample loaded successfully!");
        self.refresh_controls();
    }

    /// Load an impulse response into `slot`. A running session keeps the voices
    /// it was built with; the new IR is used from the next play on.
    pub fn load_ir(&mut self, slot: usize, buffer: AudioBuffer) -> Result<(), EngineError> {
        let ir_slot = self
            .slots
            .get_mut(slot)
            .ok_or(EngineError::InvalidSlot(slot))?;

        let loaded = EngineEvent::loaded(LoadTarget::Ir(slot), &buffer);
        info!(
            slot,
            duration_secs = buffer.duration_secs(),
            sample_rate = buffer.sample_rate(),
            channels = buffer.channel_count(),
            "impulse response loaded"
        );
        ir_slot.load(Arc::new(buffer));

        self.events.push_back(loaded);
        self.status(format!("Impulse response {} loaded successfully!", slot + 1));
        self.refresh_controls();
        Ok(())
    }

    pub fn clear_ir(&mut self, slot: usize) -> Result<(), EngineError> {
        let ir_slot = self
            .slots
            .get_mut(slot)
            .ok_or(EngineError::InvalidSlot(slot))?;

        if ir_slot.clear().is_some() {
            info!(slot, "impulse response cleared");
            self.status(format!("Impulse response {} removed", slot + 1));
        }
        Ok(())
    }

    /// Store the phase offset (degrees) of `slot`. The value is kept for the
    /// front-end and does not change what is heard.
    pub fn set_phase(&mut self, slot: usize, phase: i32) -> Result<(), EngineError> {
        self.slots
            .get_mut(slot)
            .ok_or(EngineError::InvalidSlot(slot))?
            .set_phase(phase);
        debug!(slot, phase, "phase stored");
        Ok(())
    }

    /// Route a finished decode. Failures leave the target untouched and are
    /// reported through events rather than as an error.
    pub fn apply_decoded(&mut self, event: DecodeEvent) -> Result<(), EngineError> {
        if let LoadTarget::Ir(slot) = event.target {
            if slot >= SLOT_COUNT {
                return Err(EngineError::InvalidSlot(slot));
            }
        }

        match (event.target, event.result) {
            (LoadTarget::Dry, Ok(buffer)) => self.load_dry_sample(buffer),
            (LoadTarget::Ir(slot), Ok(buffer)) => self.load_ir(slot, buffer)?,
            (target, Err(failure)) => {
                warn!(%target, file = %failure.file_name, reason = %failure.reason, "decode failed");
                self.events.push_back(EngineEvent::SlotLoadFailed {
                    target,
                    file_name: failure.file_name,
                });
                self.status(format!("Error loading {target} file"));
            }
        }
        Ok(())
    }

    /// Store a physical value and push it into the running session.
    ///
    /// Values are clamped to the target's range; the stored value is returned.
    pub fn set_parameter(&mut self, target: ControlTarget, value: f32) -> Result<f32, EngineError> {
        let stored = match target {
            ControlTarget::Module(slot, param) => self
                .slots
                .get_mut(slot)
                .ok_or(EngineError::InvalidSlot(slot))?
                .set_param(param, value),
            _ => self
                .master
                .set(target, value)
                .unwrap_or_else(|| target.curve().clamp(value)),
        };

        if let Some(session) = &self.session {
            if session.apply(target, stored) {
                debug!(%target, value = stored, session = session.id(), "pushed to live graph");
            }
        }
        Ok(stored)
    }

    pub fn handle_control(&mut self, event: ControlEvent) -> Result<f32, EngineError> {
        self.set_parameter(event.target(), event.physical_value())
    }

    /// Start a new play-through with every loaded slot, replacing any running one.
    pub fn play(&mut self) -> Result<(), EngineError> {
        self.play_with(PlayMode::Wet)
    }

    /// Start a bypassed play-through: the dry sample alone at unity gain.
    pub fn play_dry(&mut self) -> Result<(), EngineError> {
        self.play_with(PlayMode::Dry)
    }

    pub fn play_with(&mut self, mode: PlayMode) -> Result<(), EngineError> {
        self.teardown();

        let Some(dry) = self.dry.clone() else {
            warn!("play requested without a dry sample");
            self.state = PlaybackState::Idle;
            self.status("Please load an audio sample first");
            self.refresh_controls();
            return Err(EngineError::NoSampleLoaded);
        };

        self.state = PlaybackState::Building;
        self.backend.collect_retired();

        match self.start_session(&dry, mode) {
            Ok(session) => {
                let voices = session.voice_count();
                info!(session = session.id(), ?mode, voices, "session running");
                self.session = Some(session);
                self.state = PlaybackState::Running;
                if voices == 0 {
                    self.status("Playing dry signal (no processing)...");
                } else {
                    self.status(format!(
                        "Playing with {voices} impulse response{}...",
                        if voices == 1 { "" } else { "s" }
                    ));
                }
                self.refresh_controls();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "session aborted");
                self.state = PlaybackState::Idle;
                self.status(format!("Playback failed: {err}"));
                self.refresh_controls();
                Err(err)
            }
        }
    }

    fn start_session(
        &mut self,
        dry: &AudioBuffer,
        mode: PlayMode,
    ) -> Result<PlaybackSession, EngineError> {
        let bypass;
        let (master, slots) = match mode {
            PlayMode::Wet => (&self.master, self.slots.as_slice()),
            PlayMode::Dry => {
                bypass = MasterState {
                    dry_wet_mix: 0.0,
                    ..self.master.clone()
                };
                (&bypass, &[][..])
            }
        };
        let (graph, handles) =
            build_session(Some(dry), master, slots, self.backend.sample_rate(), &self.config)?;

        let id = self.next_session;
        self.next_session += 1;
        let link = SessionLink::new(id);

        // Constructed first so any failure below tears the handles down.
        let session = PlaybackSession::new(id, mode, handles, link.clone());
        session.handles().source.start();
        self.backend.attach(AttachedGraph::new(graph, link))?;
        Ok(session)
    }

    /// Stop playback. Does nothing when nothing is playing.
    pub fn stop(&mut self) {
        match self.state {
            PlaybackState::Idle => {}
            PlaybackState::Ended => {
                self.state = PlaybackState::Idle;
            }
            PlaybackState::Building | PlaybackState::Running => {
                self.teardown();
                self.state = PlaybackState::Idle;
                info!("playback stopped");
                self.status("Playback stopped");
            }
        }
        self.refresh_controls();
    }

    /// Observe the render side: free retired graphs and catch the natural end
    /// of the running session. Returns `true` if the session ended just now.
    pub fn poll(&mut self) -> bool {
        self.backend.collect_retired();

        let ended = self.state == PlaybackState::Running
            && self.session.as_ref().is_some_and(PlaybackSession::has_ended);
        if ended {
            self.teardown();
            self.state = PlaybackState::Ended;
            info!("playback finished");
            self.status("Playback finished");
            self.refresh_controls();
        }
        ended
    }

    fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(session = session.id(), "tearing down session");
            drop(session);
        }
    }

    fn status(&mut self, message: impl Into<String>) {
        self.events.push_back(EngineEvent::Status(message.into()));
    }

    fn refresh_controls(&mut self) {
        let running = self.state == PlaybackState::Running;
        let controls = ControlState {
            play_enabled: self.dry.is_some(),
            stop_enabled: running,
            icon: if running { PlayIcon::Stop } else { PlayIcon::Play },
        };
        if controls != self.controls {
            self.controls = controls;
            self.events.push_back(EngineEvent::ControlsChanged(controls));
        }
    }
}
