//! WAV decoding off the UI thread.

use std::{path::Path, thread};

use crossbeam_channel::Sender;
use saavy_ir::io::{AudioBuffer, DecodeEvent, DecodeFailure, LoadTarget};
use tracing::debug;

/// Decode `path` on a worker thread; the result arrives on `tx`.
pub fn spawn_decode(target: LoadTarget, path: &Path, tx: Sender<DecodeEvent>) {
    let path = path.to_path_buf();
    thread::spawn(move || {
        let event = match decode_wav(&path) {
            Ok(buffer) => DecodeEvent::loaded(target, buffer),
            Err(failure) => DecodeEvent::failed(target, failure),
        };
        // The UI may have quit in the meantime
        let _ = tx.send(event);
    });
}

pub fn decode_wav(path: &Path) -> Result<AudioBuffer, DecodeFailure> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let fail = |reason: &dyn std::fmt::Display| DecodeFailure::new(file_name.clone(), reason);

    let mut reader = hound::WavReader::open(path).map_err(|err| fail(&err))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|err| fail(&err))?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()
                .map_err(|err| fail(&err))?
        }
    };

    debug!(
        file = %file_name,
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        samples = samples.len(),
        "decoded wav"
    );

    if samples.is_empty() {
        return Err(fail(&"file contains no audio"));
    }
    AudioBuffer::from_interleaved(&samples, spec.channels as usize, spec.sample_rate as f32)
        .map_err(|err| fail(&err))
}
