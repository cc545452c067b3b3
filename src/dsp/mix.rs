//! Bus summing and channel downmix primitives.

/*
Summing Buses
=============

A bus is a buffer several signal paths add into. The reverb graph has two:

  merge bus   every active convolution voice adds its output here
  master bus  the dry path and the (attenuated) merge bus add here

Vocabulary
----------

  summing       Adding signals at equal levels. The result contains all of them
                superimposed and can exceed the [-1.0, +1.0] range.

  normalization A gain placed after a bus so that adding more inputs does not
                keep making the result louder.


Why the merge bus is scaled by 1/K
----------------------------------

K voices fed by the same source, each roughly at unity level, sum to roughly
K times the level of one voice:

    K = 1   →  ×1
    K = 2   →  ×2   (+6 dB)
    K = 4   →  ×4   (+12 dB)

The merge gain is therefore 1 / max(1, K). For fully correlated voices this
keeps the peak level constant. For uncorrelated voices the power only grows
with √K, so 1/K is slightly too much attenuation; an RMS-preserving sum would
use 1/√K. The engine deliberately uses the simpler, deterministic 1/K.


Downmix
-------

The graph renders one channel. Multichannel buffers are folded to mono by
averaging their channels, which keeps a fully correlated stereo file at the
same level and never clips more than the loudest input channel.
*/

/// Sum two signals together without weighting.
///
/// ⚠️ WARNING: Can exceed [-1.0, +1.0] range! Apply gain before or limiting after.
#[inline]
pub fn sum(a: &[f32], b: &[f32], out: &mut [f32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());

    for ((&sa, &sb), o) in a.iter().zip(b.iter()).zip(out.iter_mut()) {
        *o = sa + sb;
    }
}

/// Add signal B into signal A in-place (summing).
///
/// ⚠️ WARNING: Can exceed [-1.0, +1.0] range!
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

/// Normalization gain for a bus fed by `inputs` parallel paths.
#[inline]
pub fn bus_normalization(inputs: usize) -> f32 {
    1.0 / inputs.max(1) as f32
}

/// Average planar channels into one mono signal.
///
/// Channels shorter than `out` contribute silence past their end.
pub fn downmix<C: AsRef<[f32]>>(channels: &[C], out: &mut [f32]) {
    out.fill(0.0);
    if channels.is_empty() {
        return;
    }

    for channel in channels {
        let channel = channel.as_ref();
        let len = channel.len().min(out.len());
        sum_in_place(&mut out[..len], &channel[..len]);
    }

    let scale = 1.0 / channels.len() as f32;
    for sample in out.iter_mut() {
        *sample *= scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_can_exceed_one() {
        let a = [1.0, 0.5];
        let b = [1.0, 0.8];
        let mut out = [0.0; 2];

        sum(&a, &b, &mut out);

        assert_eq!(out[0], 2.0); // Exceeds 1.0!
        assert_eq!(out[1], 1.3);
    }

    #[test]
    fn test_sum_in_place() {
        let mut a = [0.25, -0.5, 0.0];
        let b = [0.25, 0.5, -1.0];

        sum_in_place(&mut a, &b);

        assert_eq!(a, [0.5, 0.0, -1.0]);
    }

    #[test]
    fn test_bus_normalization() {
        assert_eq!(bus_normalization(0), 1.0);
        assert_eq!(bus_normalization(1), 1.0);
        assert_eq!(bus_normalization(2), 0.5);
        assert_eq!(bus_normalization(4), 0.25);
    }

    #[test]
    fn test_normalized_bus_keeps_correlated_level() {
        let voice = [0.8, -0.4, 0.2];
        let mut bus = [0.0; 3];
        for _ in 0..4 {
            sum_in_place(&mut bus, &voice);
        }
        for s in bus.iter_mut() {
            *s *= bus_normalization(4);
        }
        for (b, v) in bus.iter().zip(voice.iter()) {
            assert!((b - v).abs() < 1e-6);
        }
    }

    #[test]
    fn test_downmix_averages_channels() {
        let left = vec![1.0, 0.0, 0.5];
        let right = vec![0.0, 1.0, 0.5];
        let mut out = [9.0; 3];

        downmix(&[left, right], &mut out);

        assert_eq!(out, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_downmix_short_channel_pads_silence() {
        let left = vec![1.0, 1.0];
        let mut out = [9.0; 4];

        downmix(&[left], &mut out);

        assert_eq!(out, [1.0, 1.0, 0.0, 0.0]);
    }
}
