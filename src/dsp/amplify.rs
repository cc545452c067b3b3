//! Gain primitives: constant gain and de-zippered gain changes.

/*
Gain
====

Every level control in the reverb graph (dry path, wet path, merge bus, each
voice, master) is a plain multiplication:

    output[i] = input[i] × gain

  gain > 1.0  →  louder (amplification)
  gain = 1.0  →  unchanged (unity gain)
  gain < 1.0  →  quieter (attenuation)
  gain = 0.0  →  silence

Attenuation in Decibels
-----------------------

    dB = 20 × log₁₀(amplitude_ratio)

    ×2.0   =  +6 dB   (top of the gain knob)
    ×1.0   =   0 dB   (unity)
    ×0.5   =  -6 dB   (two voices on the merge bus)
    ×0.25  = -12 dB   (four voices on the merge bus)


Zipper Noise
------------

When a knob is dragged, the control thread pushes a new gain a few dozen times
per second. Jumping straight to each new value puts a step into the waveform
every time, heard as a "zipper" crackle. Instead the gain glides towards its
target with a one-pole lowpass on the gain value itself:

    current += (target - current) × coeff        (once per sample)

    coeff = 1 - e^(-1 / (time_constant × sample_rate))

After one time constant the glide has covered ~63% of the distance, after five
it is indistinguishable from the target. With a 5 ms time constant a knob sweep
sounds continuous while still feeling immediate.
*/

/// Multiply a signal by a constant gain factor (in-place).
///
/// # Arguments
/// * `signal` - The signal buffer to modify in-place
/// * `gain` - The gain factor (0.0 = silence, 1.0 = unchanged, 2.0 = double)
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Convert a linear gain to decibels.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.max(1e-9).log10()
}

/// Residual distance below which the smoother snaps onto its target.
const SETTLE_EPSILON: f32 = 1e-6;

/// Gain that glides towards its target instead of jumping.
pub struct SmoothedGain {
    current: f32,
    target: f32,
    time_constant_s: f32,
    coeff: f32,
    sample_rate: f32,
}

impl SmoothedGain {
    /// Start settled at `gain`, so the first block plays at the requested level.
    pub fn new(gain: f32, time_constant_ms: f32) -> Self {
        Self {
            current: gain,
            target: gain,
            time_constant_s: (time_constant_ms / 1000.0).max(0.0),
            coeff: 1.0,
            sample_rate: 0.0,
        }
    }

    pub fn set_target(&mut self, gain: f32) {
        self.target = gain;
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Jump to the target (used on reset).
    pub fn snap(&mut self) {
        self.current = self.target;
    }

    fn update_coeff(&mut self, sample_rate: f32) {
        if self.sample_rate == sample_rate {
            return;
        }
        self.sample_rate = sample_rate;
        let samples = self.time_constant_s * sample_rate;
        self.coeff = if samples <= 1.0 {
            1.0
        } else {
            1.0 - (-1.0 / samples).exp()
        };
    }

    /// Apply the (possibly moving) gain to a block in place.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        self.update_coeff(sample_rate);

        if self.is_settled() {
            apply_gain(buffer, self.current);
            return;
        }

        for sample in buffer.iter_mut() {
            let next = self.current + (self.target - self.current) * self.coeff;
            // Once the step rounds away in f32 the glide has stalled short of
            // the target; finish it.
            self.current = if next == self.current { self.target } else { next };
            *sample *= self.current;
        }

        if (self.target - self.current).abs() < SETTLE_EPSILON {
            self.current = self.target;
        }
    }
}
