//! TUI module for saavy_ir
//!
//! Shows the transport, every control with its current value, and an
//! oscilloscope of the output. All engine calls happen on this thread.

mod controls;
mod transport;
mod waveform;

use std::{path::Path, time::Duration};

use color_eyre::eyre::Result as EyreResult;
use crossbeam_channel::{Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use saavy_ir::{
    control::{mapper::normalized_to_knob, ControlEvent, ControlTarget},
    engine::{PlayMode, PlaybackState},
    io::{queue::RenderQueue, DecodeEvent, LoadTarget},
    Engine, EngineEvent, SLOT_COUNT,
};
use tracing::warn;

use crate::loader;

use controls::render_controls;
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

/// Knob rotation per arrow key press, in degrees
const KNOB_STEP_DEG: f32 = 5.4;

/// What the UI shows about each loaded file
#[derive(Clone, Debug, Default)]
pub enum SlotInfo {
    #[default]
    Empty,
    Loading,
    Loaded {
        duration_secs: f64,
        sample_rate: f32,
        channels: usize,
    },
    Failed { file_name: String },
}

/// UI application state
pub struct UiApp {
    engine: Engine<RenderQueue>,
    decode_tx: Sender<DecodeEvent>,
    decode_rx: Receiver<DecodeEvent>,
    /// Ring buffer receiver for audio samples
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    sample_rate: f32,

    targets: Vec<ControlTarget>,
    selected: usize,
    status: String,
    dry_info: SlotInfo,
    slot_info: [SlotInfo; SLOT_COUNT],
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        engine: Engine<RenderQueue>,
        audio_rx: Consumer<f32>,
        sample_rate: f32,
    ) -> Self {
        let (decode_tx, decode_rx) = crossbeam_channel::unbounded();
        let mut app = Self {
            engine,
            decode_tx,
            decode_rx,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            sample_rate,
            targets: ControlTarget::all().collect(),
            selected: 0,
            status: "Load an audio sample to begin".into(),
            dry_info: SlotInfo::Empty,
            slot_info: Default::default(),
            should_quit: false,
        };
        app.poll_engine();
        app
    }

    /// Start decoding `path` into `target`
    pub fn load(&mut self, target: LoadTarget, path: &Path) {
        *self.info_mut(target) = SlotInfo::Loading;
        self.engine.begin_load(target);
        loader::spawn_decode(target, path, self.decode_tx.clone());
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_decodes();
            self.engine.poll();
            self.poll_engine();
            self.poll_audio();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.engine.stop();
        Ok(())
    }

    fn poll_decodes(&mut self) {
        while let Ok(decoded) = self.decode_rx.try_recv() {
            if let Err(err) = self.engine.apply_decoded(decoded) {
                warn!(%err, "decode result rejected");
            }
        }
    }

    /// Fold engine events into what is on screen
    fn poll_engine(&mut self) {
        for event in self.engine.drain_events() {
            match event {
                EngineEvent::Status(message) => self.status = message,
                EngineEvent::SlotLoaded {
                    target,
                    duration_secs,
                    sample_rate,
                    channels,
                } => {
                    *self.info_mut(target) = SlotInfo::Loaded {
                        duration_secs,
                        sample_rate,
                        channels,
                    }
                }
                EngineEvent::SlotLoadFailed { target, file_name } => {
                    *self.info_mut(target) = SlotInfo::Failed { file_name }
                }
                // Transport reads the engine's control state directly when drawing
                EngineEvent::ControlsChanged(_) => {}
            }
        }
    }

    fn info_mut(&mut self, target: LoadTarget) -> &mut SlotInfo {
        match target {
            LoadTarget::Ir(slot) if slot < SLOT_COUNT => &mut self.slot_info[slot],
            _ => &mut self.dry_info,
        }
    }

    /// Poll for new audio samples from ring buffer
    fn poll_audio(&mut self) {
        let mut new_samples = Vec::new();
        while let Ok(sample) = self.audio_rx.pop() {
            new_samples.push(sample);
        }

        if !new_samples.is_empty() {
            self.audio_buffer.extend(new_samples);
            if self.audio_buffer.len() > VIS_BUFFER_SIZE {
                let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
                self.audio_buffer.drain(0..excess);
            }
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.toggle_playback(PlayMode::Wet),
            KeyCode::Char('d') | KeyCode::Char('D') => self.toggle_playback(PlayMode::Dry),
            KeyCode::Char('s') | KeyCode::Char('S') => self.engine.stop(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.clear_selected_slot(),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(self.targets.len().saturating_sub(1))
            }
            KeyCode::Left => self.nudge(-KNOB_STEP_DEG),
            KeyCode::Right => self.nudge(KNOB_STEP_DEG),
            _ => {}
        }
    }

    fn toggle_playback(&mut self, mode: PlayMode) {
        if self.engine.state() == PlaybackState::Running {
            self.engine.stop();
        } else if let Err(err) = self.engine.play_with(mode) {
            warn!(%err, "play failed");
        }
    }

    fn clear_selected_slot(&mut self) {
        let Some(slot) = self.targets.get(self.selected).and_then(|t| t.slot()) else {
            return;
        };
        if self.engine.clear_ir(slot).is_ok() {
            self.slot_info[slot] = SlotInfo::Empty;
        }
    }

    /// Turn the selected knob by `delta_deg`
    fn nudge(&mut self, delta_deg: f32) {
        let Some(&target) = self.targets.get(self.selected) else {
            return;
        };
        let Some(current) = self.engine.parameter(target) else {
            return;
        };
        let angle_deg = normalized_to_knob(target.curve().unmap(current)) + delta_deg;
        if let Err(err) = self
            .engine
            .handle_control(ControlEvent::Rotation { target, angle_deg })
        {
            warn!(%err, %target, "control rejected");
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Min(8),    // Controls
                Constraint::Length(8), // Waveform
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(
            frame,
            chunks[0],
            &self.engine.controls(),
            &self.status,
            self.sample_rate,
            &stats,
        );
        render_controls(
            frame,
            chunks[1],
            &self.engine,
            &self.targets,
            self.selected,
            &self.dry_info,
            &self.slot_info,
        );
        render_waveform(frame, chunks[2], &self.audio_buffer);

        let help = Paragraph::new(
            " [Q] Quit  [Space] Play/Stop  [D] Play dry  [S] Stop  [↑↓] Select  [←→] Adjust  [C] Clear IR",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
