use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{
    dsp::resample::read_linear,
    graph::node::{GraphNode, RenderCtx},
    io::buffer::AudioBuffer,
};

/*
Buffer Source
=============

Plays one decoded buffer from start to end, exactly once.

  created ──start()──▶ playing ──position reaches end──▶ ended
                          │
                          └──────stop()──────▶ stopped

The end of playback is intrinsic to the buffer: nothing on the control thread
runs a timer. The node raises `ended` itself when its read position passes the
last frame, and the control thread notices on its next poll.

If the buffer was decoded at a different rate than the render thread runs at,
the read position advances by buffer_rate / output_rate per output sample and
reads between frames with linear interpolation, so duration and pitch are
preserved.
*/

#[derive(Default)]
struct SourceState {
    started: AtomicBool,
    stopped: AtomicBool,
    ended: AtomicBool,
}

/// Control-thread handle to a [`BufferSourceNode`].
#[derive(Clone)]
pub struct SourceControl {
    state: Arc<SourceState>,
}

impl SourceControl {
    pub fn start(&self) {
        self.state.started.store(true, Ordering::Release);
    }

    /// Halt playback immediately. Returns `false` if the source had already
    /// stopped or ended (stopping twice is a no-op).
    pub fn stop(&self) -> bool {
        let was_stopped = self.state.stopped.swap(true, Ordering::AcqRel);
        !was_stopped && !self.has_ended()
    }

    /// Whether the source played through to the end of its buffer.
    pub fn has_ended(&self) -> bool {
        self.state.ended.load(Ordering::Acquire)
    }

    pub fn is_playing(&self) -> bool {
        self.state.started.load(Ordering::Acquire)
            && !self.state.stopped.load(Ordering::Acquire)
            && !self.has_ended()
    }
}

pub struct BufferSourceNode {
    samples: Vec<f32>,
    buffer_rate: f32,
    position: f64,
    state: Arc<SourceState>,
}

impl BufferSourceNode {
    /// Bind a source to `buffer` (downmixed to mono). It stays silent until started.
    pub fn new(buffer: &AudioBuffer) -> (Self, SourceControl) {
        let state = Arc::new(SourceState::default());
        let node = Self {
            samples: buffer.to_mono(),
            buffer_rate: buffer.sample_rate(),
            position: 0.0,
            state: Arc::clone(&state),
        };
        (node, SourceControl { state })
    }

    fn is_halted(&self) -> bool {
        !self.state.started.load(Ordering::Acquire)
            || self.state.stopped.load(Ordering::Acquire)
            || self.state.ended.load(Ordering::Acquire)
    }
}

impl GraphNode for BufferSourceNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.is_halted() {
            out.fill(0.0);
            return;
        }

        let step = self.buffer_rate as f64 / ctx.sample_rate as f64;
        let end = self.samples.len() as f64;

        for sample in out.iter_mut() {
            if self.position >= end {
                *sample = 0.0;
                continue;
            }
            *sample = read_linear(&self.samples, self.position);
            self.position += step;
        }

        if self.position >= end {
            self.state.ended.store(true, Ordering::Release);
        }
    }

    fn reset(&mut self) {
        self.position = 0.0;
    }

    fn is_active(&self) -> bool {
        !self.is_halted()
    }
}
