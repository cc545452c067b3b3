//! Decoded PCM audio shared between slots and render nodes.

use thiserror::Error;

use crate::dsp::mix::downmix;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BufferError {
    #[error("audio buffer has no channels")]
    NoChannels,
    #[error("channel {channel} has {found} frames, expected {expected}")]
    RaggedChannels {
        channel: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid sample rate {0}")]
    InvalidSampleRate(f32),
}

/// Immutable decoded PCM data, stored planar (one `Vec` per channel).
///
/// Buffers are shared as `Arc<AudioBuffer>` and replaced wholesale on reload.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: f32,
}

impl AudioBuffer {
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: f32) -> Result<Self, BufferError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(BufferError::InvalidSampleRate(sample_rate));
        }
        let expected = match channels.first() {
            Some(first) => first.len(),
            None => return Err(BufferError::NoChannels),
        };
        if let Some((channel, found)) = channels
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(BufferError::RaggedChannels {
                channel,
                expected,
                found,
            });
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    pub fn mono(samples: Vec<f32>, sample_rate: f32) -> Result<Self, BufferError> {
        Self::new(vec![samples], sample_rate)
    }

    /// Split interleaved frames (L R L R ...) into planar channels.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(
        samples: &[f32],
        channel_count: usize,
        sample_rate: f32,
    ) -> Result<Self, BufferError> {
        if channel_count == 0 {
            return Err(BufferError::NoChannels);
        }
        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(channels, sample_rate)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Average all channels into one.
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels.len() == 1 {
            return self.channels[0].clone();
        }
        let mut out = vec![0.0; self.frames()];
        downmix(&self.channels, &mut out);
        out
    }
}
