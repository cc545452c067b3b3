//! Sound card output: a cpal stream driving the engine's renderer.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat, Stream,
};
use rtrb::{Consumer, RingBuffer};
use saavy_ir::io::queue::{render_queue, RenderQueue};
use tracing::{error, info};

/// Samples kept for the oscilloscope
const SCOPE_CAPACITY: usize = 8192;

pub struct AudioOutput {
    /// Keeps the device running; dropping it stops audio
    pub stream: Stream,
    pub queue: RenderQueue,
    pub scope_rx: Consumer<f32>,
    pub sample_rate: f32,
    pub channels: usize,
}

/// Open the default output device and start rendering silence into it.
pub fn open(queue_capacity: usize) -> EyreResult<AudioOutput> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    if config.sample_format() != SampleFormat::F32 {
        return Err(eyre!(
            "output device wants {:?} samples, only f32 is supported",
            config.sample_format()
        ));
    }

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    info!(
        device = %device.name().unwrap_or_else(|_| "unknown".into()),
        sample_rate,
        channels,
        "opening audio output"
    );

    let (queue, mut renderer) = render_queue(sample_rate, queue_capacity);
    let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_CAPACITY);

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                renderer.render_interleaved(data, channels);

                // First channel only; drop samples if the UI is behind
                for frame in data.chunks(channels) {
                    if scope_tx.push(frame[0]).is_err() {
                        break;
                    }
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    Ok(AudioOutput {
        stream,
        queue,
        scope_rx,
        sample_rate,
        channels,
    })
}
