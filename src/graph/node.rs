/// Context passed to graph nodes during rendering
///
/// Contains information about what to render:
/// - sample_rate: Output sample rate of the render thread (e.g., 48000.0)
/// - frame: Index of the first frame of this block since the renderer started
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frame: u64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frame: 0,
        }
    }

    /// Context for the block starting at `frame`
    pub fn at_frame(sample_rate: f32, frame: u64) -> Self {
        Self { sample_rate, frame }
    }

    /// Current playback time in seconds
    pub fn time(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }
}

/// Core trait for audio processing graph nodes
///
/// Effects process `out` in place; sources overwrite it.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Clear internal state (delay lines, filter memory, smoothing).
    ///
    /// Default implementation does nothing (stateless nodes).
    fn reset(&mut self) {
        // Default: do nothing
    }

    /// Check if this node is still producing sound
    ///
    /// Sources report `false` once they ran out of material or were stopped.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
