use crate::{
    dsp::amplify::SmoothedGain,
    graph::{
        node::{GraphNode, RenderCtx},
        param::Param,
    },
};

/// Scales its input by a shared gain parameter, gliding between updates.
pub struct GainNode {
    gain: Param,
    smoother: SmoothedGain,
}

impl GainNode {
    pub fn new(gain: Param, smoothing_ms: f32) -> Self {
        let smoother = SmoothedGain::new(gain.get(), smoothing_ms);
        Self { gain, smoother }
    }

    pub fn param(&self) -> &Param {
        &self.gain
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.smoother.set_target(self.gain.get());
        self.smoother.render(out, ctx.sample_rate);
    }

    fn reset(&mut self) {
        self.smoother.set_target(self.gain.get());
        self.smoother.snap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_initial_gain_immediately() {
        let mut node = GainNode::new(Param::new(0.5), 5.0);
        let mut out = [1.0; 16];

        node.render_block(&mut out, &RenderCtx::new(48_000.0));

        assert!(out.iter().all(|&s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn follows_param_updates() {
        let param = Param::new(1.0);
        let mut node = GainNode::new(param.clone(), 1.0);
        let ctx = RenderCtx::new(48_000.0);

        param.set(0.0);
        let mut out = vec![1.0; 2048];
        node.render_block(&mut out, &ctx);

        assert!(out[0] > 0.5, "should glide, not jump");
        assert!(out[2047].abs() < 1e-3);
    }

    #[test]
    fn settles_after_param_push() {
        let param = Param::new(0.0);
        let mut node = GainNode::new(param.clone(), 5.0);
        let ctx = RenderCtx::new(48_000.0);

        param.set(1.0);

        let mut out = vec![1.0; 2048];
        for _ in 0..100 {
            out.fill(1.0);
            node.render_block(&mut out, &ctx);
        }

        assert!(node.smoother.is_settled());
        assert_eq!(node.smoother.current(), 1.0);
        assert_eq!(out, vec![1.0; 2048]);
    }

    #[test]
    fn reset_snaps_to_param() {
        let param = Param::new(1.0);
        let mut node = GainNode::new(param.clone(), 50.0);

        param.set(0.25);
        node.reset();

        let mut out = [1.0; 4];
        node.render_block(&mut out, &RenderCtx::new(48_000.0));
        assert_eq!(out, [0.25; 4]);
    }
}
