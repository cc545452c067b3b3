use rtrb::{Consumer, Producer, PushError, RingBuffer};
use tracing::trace;

use crate::{
    graph::RenderCtx,
    io::{AttachedGraph, AudioBackend, BackendError},
    MAX_BLOCK_SIZE,
};

/*
Render Queue
============

Hands session graphs from the control thread to the audio callback without
locks, and hands them back once they are done so they are freed off the
audio thread.

  control thread                           render thread (audio callback)
  --------------                           ------------------------------
  RenderQueue::attach(graph) ── incoming ──▶ Renderer picks it up next block
                                             │
  RenderQueue::collect_retired() ◀─ retired ─┘ detached or replaced graphs

At most one graph renders at a time. A graph is retired when:
  - its SessionLink was detached (session stopped, ended or dropped), or
  - a newer graph arrived (a replay replaces the running session)

Retired graphs go back through the `retired` ring. If that ring is full the
render thread drops the graph itself; correct but not allocation-free, so the
capacity should cover a few sessions of churn between collections.
*/

/// Build a connected queue pair. `capacity` bounds graphs in flight each way.
pub fn render_queue(sample_rate: f32, capacity: usize) -> (RenderQueue, Renderer) {
    let capacity = capacity.max(1);
    let (incoming_tx, incoming_rx) = RingBuffer::new(capacity);
    let (retired_tx, retired_rx) = RingBuffer::new(capacity);

    let queue = RenderQueue {
        sample_rate,
        incoming: incoming_tx,
        retired: retired_rx,
    };
    let renderer = Renderer {
        sample_rate,
        incoming: incoming_rx,
        retired: retired_tx,
        current: None,
        frame: 0,
        scratch: vec![0.0; MAX_BLOCK_SIZE],
    };
    (queue, renderer)
}

/// Control-thread end of the render queue.
pub struct RenderQueue {
    sample_rate: f32,
    incoming: Producer<AttachedGraph>,
    retired: Consumer<AttachedGraph>,
}

impl AudioBackend for RenderQueue {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn attach(&mut self, graph: AttachedGraph) -> Result<(), BackendError> {
        if self.incoming.is_abandoned() {
            return Err(BackendError::Disconnected);
        }
        match self.incoming.push(graph) {
            Ok(()) => Ok(()),
            Err(PushError::Full(_)) => Err(BackendError::QueueFull),
        }
    }

    fn collect_retired(&mut self) -> usize {
        let mut dropped = 0;
        while let Ok(graph) = self.retired.pop() {
            trace!(session = graph.link.id(), "freeing retired graph");
            drop(graph);
            dropped += 1;
        }
        dropped
    }
}

/// Render-thread end of the render queue. Call [`Renderer::render`] from the
/// audio callback.
pub struct Renderer {
    sample_rate: f32,
    incoming: Consumer<AttachedGraph>,
    retired: Producer<AttachedGraph>,
    current: Option<AttachedGraph>,
    frame: u64,
    scratch: Vec<f32>,
}

impl Renderer {
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered since creation
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn has_graph(&self) -> bool {
        self.current.is_some()
    }

    /// Id of the session currently rendering, if any
    pub fn session_id(&self) -> Option<u64> {
        self.current.as_ref().map(|graph| graph.link.id())
    }

    /// Render mono output. Silence when no session is attached.
    pub fn render(&mut self, out: &mut [f32]) {
        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_block(block);
        }
    }

    /// Render into an interleaved device buffer, copying mono to every channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let total_frames = data.len() / channels;
        let mut frames_written = 0;
        let mut scratch = std::mem::take(&mut self.scratch);

        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let block = &mut scratch[..frames];
            self.render_block(block);

            let offset = frames_written * channels;
            for (i, &sample) in block.iter().enumerate() {
                let start = offset + i * channels;
                data[start..start + channels].fill(sample);
            }
            frames_written += frames;
        }

        self.scratch = scratch;
    }

    fn render_block(&mut self, block: &mut [f32]) {
        self.receive();

        if self
            .current
            .as_ref()
            .is_some_and(|graph| graph.link.is_detached())
        {
            if let Some(graph) = self.current.take() {
                self.retire(graph);
            }
        }

        let ctx = RenderCtx::at_frame(self.sample_rate, self.frame);
        match self.current.as_mut() {
            Some(graph) => graph.node.render_block(block, &ctx),
            None => block.fill(0.0),
        }
        self.frame += block.len() as u64;
    }

    fn receive(&mut self) {
        while let Ok(graph) = self.incoming.pop() {
            if let Some(previous) = self.current.replace(graph) {
                self.retire(previous);
            }
        }
    }

    fn retire(&mut self, graph: AttachedGraph) {
        if let Err(PushError::Full(graph)) = self.retired.push(graph) {
            drop(graph);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{link::SessionLink, GraphNode};

    struct Constant(f32);

    impl GraphNode for Constant {
        fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
            out.fill(self.0);
        }
    }

    #[test]
    fn silent_without_a_graph() {
        let (_queue, mut renderer) = render_queue(48_000.0, 4);
        let mut out = vec![1.0; 64];

        renderer.render(&mut out);

        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(renderer.frame(), 64);
    }

    #[test]
    fn renders_attached_graph() {
        let (mut queue, mut renderer) = render_queue(48_000.0, 4);
        queue
            .attach(AttachedGraph::new(Constant(0.5), SessionLink::new(1)))
            .unwrap();

        let mut out = vec![0.0; MAX_BLOCK_SIZE * 2 + 10];
        renderer.render(&mut out);

        assert!(out.iter().all(|&s| s == 0.5));
        assert_eq!(renderer.session_id(), Some(1));
    }

    #[test]
    fn detached_graph_is_retired_and_returned() {
        let (mut queue, mut renderer) = render_queue(48_000.0, 4);
        let link = SessionLink::new(3);
        queue
            .attach(AttachedGraph::new(Constant(1.0), link.clone()))
            .unwrap();

        let mut out = vec![0.0; 32];
        renderer.render(&mut out);
        link.detach();
        renderer.render(&mut out);

        assert!(out.iter().all(|&s| s == 0.0));
        assert!(!renderer.has_graph());
        assert_eq!(queue.collect_retired(), 1);
    }

    #[test]
    fn newer_graph_replaces_current() {
        let (mut queue, mut renderer) = render_queue(48_000.0, 4);
        queue
            .attach(AttachedGraph::new(Constant(1.0), SessionLink::new(1)))
            .unwrap();
        let mut out = vec![0.0; 16];
        renderer.render(&mut out);

        queue
            .attach(AttachedGraph::new(Constant(2.0), SessionLink::new(2)))
            .unwrap();
        renderer.render(&mut out);

        assert_eq!(out, vec![2.0; 16]);
        assert_eq!(renderer.session_id(), Some(2));
        assert_eq!(queue.collect_retired(), 1);
    }

    #[test]
    fn full_queue_is_reported() {
        let (mut queue, _renderer) = render_queue(48_000.0, 1);
        queue
            .attach(AttachedGraph::new(Constant(1.0), SessionLink::new(1)))
            .unwrap();

        let err = queue
            .attach(AttachedGraph::new(Constant(1.0), SessionLink::new(2)))
            .unwrap_err();
        assert_eq!(err, BackendError::QueueFull);
    }

    #[test]
    fn dropped_renderer_disconnects() {
        let (mut queue, renderer) = render_queue(48_000.0, 4);
        drop(renderer);

        let err = queue
            .attach(AttachedGraph::new(Constant(1.0), SessionLink::new(1)))
            .unwrap_err();
        assert_eq!(err, BackendError::Disconnected);
    }

    #[test]
    fn interleaved_copies_mono_to_all_channels() {
        let (mut queue, mut renderer) = render_queue(48_000.0, 4);
        queue
            .attach(AttachedGraph::new(Constant(0.25), SessionLink::new(1)))
            .unwrap();

        let mut data = vec![0.0; 2 * 100];
        renderer.render_interleaved(&mut data, 2);

        assert!(data.iter().all(|&s| s == 0.25));
        assert_eq!(renderer.frame(), 100);
    }
}
