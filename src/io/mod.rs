//! Boundaries of the engine: decoded audio coming in, rendered audio going out.
//!
//! Decoding and the audio device itself live outside the library. What comes
//! in is an [`AudioBuffer`] (or a [`DecodeFailure`]) wrapped in a
//! [`DecodeEvent`]; what goes out is a finished graph handed to an
//! [`AudioBackend`], which owns it until the session detaches.

pub mod buffer;
pub mod decode;
#[cfg(feature = "rtrb")]
pub mod queue;

use thiserror::Error;

use crate::graph::{link::SessionLink, GraphNode};

pub use buffer::{AudioBuffer, BufferError};
pub use decode::{DecodeEvent, DecodeFailure, LoadTarget};

/// A session graph on its way to (or back from) the render thread.
pub struct AttachedGraph {
    pub node: Box<dyn GraphNode>,
    pub link: SessionLink,
}

impl AttachedGraph {
    pub fn new<N: GraphNode + 'static>(node: N, link: SessionLink) -> Self {
        Self {
            node: Box::new(node),
            link,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("render queue is full")]
    QueueFull,
    #[error("render thread is gone")]
    Disconnected,
    #[error("audio backend unavailable: {0}")]
    Unavailable(String),
}

/// Where finished session graphs are sent to be rendered.
///
/// The engine talks to the audio device only through this trait, so tests can
/// swap in a backend that renders offline or refuses every graph.
pub trait AudioBackend {
    /// Rate the render side runs at; every node is built for it
    fn sample_rate(&self) -> f32;

    /// Hand a graph to the render side. It starts producing audio on the next block.
    fn attach(&mut self, graph: AttachedGraph) -> Result<(), BackendError>;

    /// Free graphs the render side has finished with. Returns how many were dropped.
    fn collect_retired(&mut self) -> usize {
        0
    }
}
