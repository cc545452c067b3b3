use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type      | constructed by | passes       | rejects      | used as        |
| --------- | -------------- | ------------ | ------------ | -------------- |
| low-pass  | LPF            | below cutoff | above cutoff | "high cut"     |
| high-pass | HPF            | above cutoff | below cutoff | "low cut"      |
| band-pass | HPF → LPF      | between      | outside      | voice/master   |

Every voice and the master stage run a high-pass followed by a low-pass, which
turns the two cutoffs into a band: low cut at the bottom, high cut at the top.
*/

/// Resonance giving a Butterworth (Q = 1/√2) response: k = 2 - 2r = √2.
pub const BUTTERWORTH_RESONANCE: f32 = 1.0 - std::f32::consts::FRAC_1_SQRT_2;

/// Highest usable cutoff as a fraction of the sample rate.
const MAX_CUTOFF_RATIO: f32 = 0.49;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub resonance: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: BUTTERWORTH_RESONANCE,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// TPT integrator gain. The cutoff is pulled below Nyquist so a 20 kHz
    /// high cut stays stable on low sample rates.
    #[inline]
    fn compute_g(&self, sample_rate: f32) -> f32 {
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate * MAX_CUTOFF_RATIO);
        (PI * cutoff / sample_rate).tan()
    }

    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = self.compute_g(sample_rate);
        let k = 2.0 - (2.0 * self.resonance);

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, k, g);

            *sample = match self.filter_type {
                FilterType::LowPass => outputs.lowpass,
                FilterType::HighPass => outputs.highpass,
            }
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (TAU * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn test_lowpass_basic() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = vec![1.0; 512];

        filter.render(&mut buffer, 48_000.0);

        assert!(buffer[511] > 0.99, "DC should pass, got {}", buffer[511]);
    }

    #[test]
    fn test_highpass_basic() {
        let mut filter = SVFilter::highpass(500.0);
        let mut buffer = vec![1.0; 512];

        filter.render(&mut buffer, 48_000.0);

        assert!(buffer[511].abs() < 0.001, "DC should be removed, got {}", buffer[511]);
    }

    #[test]
    fn test_lowpass_filters_high_freq() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = sine(5_000.0, 48_000.0, 1024);

        filter.render(&mut buffer, 48_000.0);

        // 10x above cutoff at 12 dB/octave
        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "Expected high freq attenuation, got peak: {}", peak);
    }

    #[test]
    fn test_highpass_filters_low_freq() {
        let mut filter = SVFilter::highpass(2_000.0);
        let mut buffer = sine(100.0, 48_000.0, 4096);

        filter.render(&mut buffer, 48_000.0);

        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "Expected low freq attenuation, got peak: {}", peak);
    }

    #[test]
    fn test_band_passes_between_cutoffs() {
        let mut hp = SVFilter::highpass(200.0);
        let mut lp = SVFilter::lowpass(5_000.0);
        let mut buffer = sine(1_000.0, 48_000.0, 2048);

        hp.render(&mut buffer, 48_000.0);
        lp.render(&mut buffer, 48_000.0);

        let peak = peak_after_transient(&buffer);
        assert!(peak > 0.9, "1 kHz should pass a 200..5000 band, got {}", peak);
    }

    #[test]
    fn test_cutoff_above_nyquist_stays_stable() {
        let mut filter = SVFilter::lowpass(20_000.0);
        let mut buffer = sine(1_000.0, 8_000.0, 2048);

        filter.render(&mut buffer, 8_000.0);

        assert!(buffer.iter().all(|s| s.is_finite()));
        assert!(peak_after_transient(&buffer) < 1.5);
    }

    #[test]
    fn test_set_cutoff_updates_frequency() {
        let mut filter = SVFilter::lowpass(1000.0);
        assert!((filter.cutoff_hz - 1000.0).abs() < 0.1);

        filter.set_cutoff(2000.0);
        assert!((filter.cutoff_hz - 2000.0).abs() < 0.1);

        filter.set_cutoff(500.0);
        assert!((filter.cutoff_hz - 500.0).abs() < 0.1);
    }

    #[test]
    fn test_set_cutoff_affects_filtering() {
        let sample_rate = 48_000.0;

        let mut filter = SVFilter::lowpass(200.0);
        let mut buffer1 = sine(1_000.0, sample_rate, 1024);
        filter.render(&mut buffer1, sample_rate);
        let peak_low_cutoff = peak_after_transient(&buffer1);

        filter.reset();
        filter.set_cutoff(5_000.0);
        let mut buffer2 = sine(1_000.0, sample_rate, 1024);
        filter.render(&mut buffer2, sample_rate);
        let peak_high_cutoff = peak_after_transient(&buffer2);

        assert!(
            peak_high_cutoff > peak_low_cutoff * 2.0,
            "High cutoff should pass more signal: high={}, low={}",
            peak_high_cutoff,
            peak_low_cutoff
        );
    }

    #[test]
    fn test_default_resonance_is_butterworth() {
        let filter = SVFilter::highpass(100.0);
        let k = 2.0 - 2.0 * filter.resonance;
        assert!((k - std::f32::consts::SQRT_2).abs() < 1e-6);
    }
}
