use crate::{
    dsp::filter::{FilterType, SVFilter},
    graph::{
        node::{GraphNode, RenderCtx},
        param::Param,
    },
};

/*
Tone Filters
============

Every convolution voice, and the master stage, ends in a high-pass followed by
a low-pass. Together they keep a band of the spectrum:

  Low cut (high-pass, 20 Hz .. 2 kHz):
    Removes rumble and boominess from the reverb. Impulse responses of large
    rooms carry a lot of low-frequency energy that muddies a mix; raising the
    low cut thins the tail out.

  High cut (low-pass, 1 kHz .. 20 kHz):
    Removes fizz and air. Lowering it makes the space sound darker, like a
    room with heavy curtains or a hall seen from far back.

              gain
               │        ┌───────────────┐
               │       ╱                 ╲
               │      ╱                   ╲
               └─────┴─────────────────────┴─────── freq
                   low cut             high cut

Both filters are 12 dB/octave state-variable filters with a Butterworth
(maximally flat) response, so the band itself is not coloured.

The cutoff lives in a shared `Param`: a knob on the control thread writes it,
the filter picks it up at the start of the next block.

Example usage:

  let low_cut = Param::new(80.0);
  let high_cut = Param::new(8_000.0);
  let band = FilterNode::highpass(low_cut.clone())
      .through(FilterNode::lowpass(high_cut.clone()));

  high_cut.set(4_000.0); // darker from the next block on
*/

pub struct FilterNode {
    filter: SVFilter,
    cutoff: Param,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff: Param) -> Self {
        let filter = SVFilter::new(filter_type, cutoff.get());
        Self { filter, cutoff }
    }

    pub fn lowpass(cutoff: Param) -> Self {
        Self::new(FilterType::LowPass, cutoff)
    }

    pub fn highpass(cutoff: Param) -> Self {
        Self::new(FilterType::HighPass, cutoff)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.filter.cutoff_hz
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.set_cutoff(self.cutoff.get());
        self.filter.render(out, ctx.sample_rate);
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}
