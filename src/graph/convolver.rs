use crate::{
    dsp::{
        amplify::apply_gain,
        convolution::{normalization_scale, ConvolverError, PartitionedConvolver},
        resample::resample_linear,
    },
    graph::node::{GraphNode, RenderCtx},
    io::buffer::AudioBuffer,
};

/// Convolves its input with a fixed impulse response.
///
/// The IR is downmixed to mono and resampled to the render rate once, when the
/// node is built on the control thread. With `normalize` set the output is
/// scaled by the IR's loudness calibration so different IRs sit at a similar
/// level.
pub struct ConvolverNode {
    convolver: PartitionedConvolver,
    scale: f32,
}

impl ConvolverNode {
    pub fn new(
        impulse: &AudioBuffer,
        sample_rate: f32,
        partition_size: usize,
        normalize: bool,
    ) -> Result<Self, ConvolverError> {
        let taps = resample_linear(&impulse.to_mono(), impulse.sample_rate(), sample_rate);
        let convolver = PartitionedConvolver::new(&taps, partition_size)?;
        let scale = if normalize {
            normalization_scale(impulse.channels(), sample_rate)
        } else {
            1.0
        };

        Ok(Self { convolver, scale })
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn latency(&self) -> usize {
        self.convolver.latency()
    }
}

impl GraphNode for ConvolverNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.convolver.process(out);
        if self.scale != 1.0 {
            apply_gain(out, self.scale);
        }
    }

    fn reset(&mut self) {
        self.convolver.reset();
    }
}
