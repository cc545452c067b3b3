use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first (source)
into the second (effect). Every straight run of the reverb graph is built from
it:

  voice:   convolver → gain → low cut → high cut
  master:  low cut → high cut → gain

How It Works:
-------------
1. Render the source into the output buffer
2. Pass that buffer through the effect (in-place processing)

  Source renders:  [0.5, 0.8, -0.3, 0.9, ...]
  Effect processes in-place (e.g., filter)
  Final output:    [0.4, 0.6, -0.2, 0.7, ...]  (filtered result)

Nesting:
--------
Chains nest to the left, so a four stage voice is

  Through<Through<Through<Convolver, Gain>, HighPass>, LowPass>

which the `.through()` extension writes as

  convolver.through(gain).through(low_cut).through(high_cut)

Everything is monomorphized; rendering a chain is a sequence of direct calls
over the same buffer, with no temporary buffers and no dynamic dispatch.

Fan-out and fan-in (one source feeding several chains, several chains summed
into one bus) are not expressible with Through alone; the session graph does
that wiring itself.
*/

pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn effect(&self) -> &F {
        &self.effect
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn reset(&mut self) {
        self.source.reset();
        self.effect.reset();
    }

    fn is_active(&self) -> bool {
        self.source.is_active() || self.effect.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{extensions::NodeExt, gain::GainNode, param::Param};

    fn ctx() -> RenderCtx {
        RenderCtx::new(48_000.0)
    }

    #[test]
    fn renders_source_then_effect() {
        let mut node = GainNode::new(Param::new(0.5), 0.0).through(GainNode::new(Param::new(0.5), 0.0));
        let mut buffer = vec![1.0; 16];

        node.render_block(&mut buffer, &ctx());

        assert!(buffer.iter().all(|&s| (s - 0.25).abs() < 1e-6));
    }

    #[test]
    fn nested_chain_keeps_order() {
        let first = Param::new(2.0);
        let second = Param::new(0.0);
        let mut node = GainNode::new(first, 0.0)
            .through(GainNode::new(second.clone(), 0.0))
            .through(GainNode::new(Param::new(3.0), 0.0));

        second.set(1.0);
        let mut buffer = vec![1.0; 4];
        node.render_block(&mut buffer, &ctx());

        assert_eq!(buffer, vec![6.0; 4]);
    }
}
