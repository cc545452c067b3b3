use tracing::debug;

use crate::{
    dsp::mix::{bus_normalization, sum_in_place},
    engine::{
        config::EngineConfig,
        error::BuildError,
        slot::{IrSlot, MasterState},
    },
    graph::{
        convolver::ConvolverNode,
        extensions::NodeExt,
        filter::FilterNode,
        gain::GainNode,
        source::{BufferSourceNode, SourceControl},
        through::Through,
        GraphNode, Param, RenderCtx,
    },
    io::AudioBuffer,
    MAX_BLOCK_SIZE,
};

/*
Session Graph
=============

One graph is built per play-through from a snapshot of the engine state:

                  ┌──▶ dry gain (1 - mix) ─────────────────────────────┐
                  │                                                    ▼
  source ─────────┤                                        master high-pass
                  │   ┌─ convolver → gain → high-pass → low-pass ─┐    │
                  └──▶┤  ... one voice per active slot ...         ├─▶ merge (1/K)
                      └─ convolver → gain → high-pass → low-pass ─┘    │
                                                        wet gain (mix) ┘
  master high-pass → master low-pass → master gain → output

Voices are built in slot order from the slots active at build time. Summing K
roughly unity voices would make the wet bus K times louder, so the merge stage
attenuates by 1/K (1 for K ≤ 1).

With no active slots the wet gain still exists (so mix updates have somewhere
to go) but nothing feeds it, and the session plays dry only.

Every tweakable scalar is a Param. The builder keeps a second handle to each
one in SessionHandles, which the control thread uses to push live updates
while the graph itself lives on the render thread.
*/

pub type VoiceChain = Through<Through<Through<ConvolverNode, GainNode>, FilterNode>, FilterNode>;
pub type MasterChain = Through<Through<FilterNode, FilterNode>, GainNode>;

/// Control-side handles of one convolution voice.
#[derive(Debug, Clone)]
pub struct VoiceHandles {
    pub slot: usize,
    pub gain: Param,
    pub low_cut: Param,
    pub high_cut: Param,
}

/// Control-side handles to every live parameter of a session graph.
#[derive(Clone)]
pub struct SessionHandles {
    pub source: SourceControl,
    pub dry_gain: Param,
    pub merge_gain: Param,
    pub wet_gain: Param,
    pub master_low_cut: Param,
    pub master_high_cut: Param,
    pub master_gain: Param,
    pub voices: Vec<VoiceHandles>,
}

impl SessionHandles {
    pub fn voice(&self, slot: usize) -> Option<&VoiceHandles> {
        self.voices.iter().find(|voice| voice.slot == slot)
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }
}

/// Render-side session graph: source fan-out, parallel voices, master chain.
pub struct SessionGraph {
    source: BufferSourceNode,
    dry_gain: GainNode,
    voices: Vec<VoiceChain>,
    merge_gain: GainNode,
    wet_gain: GainNode,
    master: MasterChain,

    dry: Vec<f32>,
    wet: Vec<f32>,
    voice: Vec<f32>,
}

impl SessionGraph {
    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    fn render_chunk(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len();
        self.source.render_block(out, ctx);

        let dry = &mut self.dry[..len];
        dry.copy_from_slice(out);
        self.dry_gain.render_block(dry, ctx);

        if !self.voices.is_empty() {
            let wet = &mut self.wet[..len];
            wet.fill(0.0);
            for chain in &mut self.voices {
                let voice = &mut self.voice[..len];
                voice.copy_from_slice(out);
                chain.render_block(voice, ctx);
                sum_in_place(wet, voice);
            }
            self.merge_gain.render_block(wet, ctx);
            self.wet_gain.render_block(wet, ctx);

            out.copy_from_slice(dry);
            sum_in_place(out, wet);
        } else {
            out.copy_from_slice(dry);
        }

        self.master.render_block(out, ctx);
    }
}

impl GraphNode for SessionGraph {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk, ctx);
        }
    }

    fn reset(&mut self) {
        self.source.reset();
        self.dry_gain.reset();
        for chain in &mut self.voices {
            chain.reset();
        }
        self.merge_gain.reset();
        self.wet_gain.reset();
        self.master.reset();
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}

/// Build a session graph for `dry` and the active slots among `slots`.
///
/// Parameters start at the current stored values. The source is built halted;
/// start it through `SessionHandles::source` once the graph is handed off.
pub fn build_session(
    dry: Option<&AudioBuffer>,
    master: &MasterState,
    slots: &[IrSlot],
    sample_rate: f32,
    config: &EngineConfig,
) -> Result<(SessionGraph, SessionHandles), BuildError> {
    let dry = dry.ok_or(BuildError::NoSampleLoaded)?;
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(BuildError::InvalidSampleRate(sample_rate));
    }
    if config.partition_size > MAX_BLOCK_SIZE {
        return Err(BuildError::PartitionTooLarge {
            size: config.partition_size,
            max: MAX_BLOCK_SIZE,
        });
    }

    let smoothing = config.smoothing_ms;
    let (source, source_control) = BufferSourceNode::new(dry);

    let dry_gain = Param::new(master.dry_gain());
    let wet_gain = Param::new(master.wet_gain());

    let mut voices = Vec::new();
    let mut voice_handles = Vec::new();
    for slot in slots {
        let Some(impulse) = slot.buffer() else {
            continue;
        };

        let convolver = ConvolverNode::new(
            impulse,
            sample_rate,
            config.partition_size,
            config.normalize_ir,
        )
        .map_err(|source| BuildError::Convolver {
            slot: slot.index(),
            source,
        })?;

        let handles = VoiceHandles {
            slot: slot.index(),
            gain: Param::new(slot.gain()),
            low_cut: Param::new(slot.low_cut_hz()),
            high_cut: Param::new(slot.high_cut_hz()),
        };
        debug!(
            slot = slot.index(),
            ir_frames = impulse.frames(),
            scale = convolver.scale(),
            gain = slot.gain(),
            low_cut = slot.low_cut_hz(),
            high_cut = slot.high_cut_hz(),
            "built convolution voice"
        );

        let chain = convolver
            .through(GainNode::new(handles.gain.clone(), smoothing))
            .through(FilterNode::highpass(handles.low_cut.clone()))
            .through(FilterNode::lowpass(handles.high_cut.clone()));
        voices.push(chain);
        voice_handles.push(handles);
    }

    let merge_gain = Param::new(bus_normalization(voices.len()));

    let master_low_cut = Param::new(master.low_cut_hz);
    let master_high_cut = Param::new(master.high_cut_hz);
    let master_gain = Param::new(master.gain);
    let master_chain = FilterNode::highpass(master_low_cut.clone())
        .through(FilterNode::lowpass(master_high_cut.clone()))
        .through(GainNode::new(master_gain.clone(), smoothing));

    debug!(
        voices = voices.len(),
        merge = merge_gain.get(),
        dry = dry_gain.get(),
        wet = wet_gain.get(),
        "built session graph"
    );

    let graph = SessionGraph {
        source,
        dry_gain: GainNode::new(dry_gain.clone(), smoothing),
        voices,
        merge_gain: GainNode::new(merge_gain.clone(), smoothing),
        wet_gain: GainNode::new(wet_gain.clone(), smoothing),
        master: master_chain,
        dry: vec![0.0; MAX_BLOCK_SIZE],
        wet: vec![0.0; MAX_BLOCK_SIZE],
        voice: vec![0.0; MAX_BLOCK_SIZE],
    };
    let handles = SessionHandles {
        source: source_control,
        dry_gain,
        merge_gain,
        wet_gain,
        master_low_cut,
        master_high_cut,
        master_gain,
        voices: voice_handles,
    };

    Ok((graph, handles))
}
