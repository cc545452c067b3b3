//! Sample-rate conversion by linear interpolation.

/// Read `signal` at a fractional position, linearly interpolating between
/// neighbouring samples. Positions past the end read as silence.
#[inline]
pub fn read_linear(signal: &[f32], position: f64) -> f32 {
    if position < 0.0 {
        return 0.0;
    }
    let index = position as usize;
    let frac = (position - index as f64) as f32;

    let a = match signal.get(index) {
        Some(&a) => a,
        None => return 0.0,
    };
    let b = signal.get(index + 1).copied().unwrap_or(0.0);
    a + (b - a) * frac
}

/// Resample a whole signal from `from_rate` to `to_rate`.
///
/// Returns the input unchanged when the rates already match.
pub fn resample_linear(signal: &[f32], from_rate: f32, to_rate: f32) -> Vec<f32> {
    if from_rate == to_rate || signal.is_empty() || from_rate <= 0.0 || to_rate <= 0.0 {
        return signal.to_vec();
    }

    let step = from_rate as f64 / to_rate as f64;
    let len = ((signal.len() as f64) / step).ceil().max(1.0) as usize;

    (0..len)
        .map(|i| read_linear(signal, i as f64 * step))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_linear_interpolates() {
        let signal = [0.0, 1.0, 0.0];
        assert_eq!(read_linear(&signal, 0.0), 0.0);
        assert_eq!(read_linear(&signal, 0.5), 0.5);
        assert_eq!(read_linear(&signal, 1.0), 1.0);
        assert_eq!(read_linear(&signal, 1.25), 0.75);
    }

    #[test]
    fn test_read_linear_past_end_is_silent() {
        let signal = [1.0, 1.0];
        assert_eq!(read_linear(&signal, 2.0), 0.0);
        assert_eq!(read_linear(&signal, 10.5), 0.0);
    }

    #[test]
    fn test_same_rate_is_identity() {
        let signal = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_linear(&signal, 48_000.0, 48_000.0), signal);
    }

    #[test]
    fn test_upsample_doubles_length() {
        let signal = vec![0.0, 1.0, 0.0, -1.0];
        let out = resample_linear(&signal, 24_000.0, 48_000.0);

        assert_eq!(out.len(), 8);
        assert_eq!(out[1], 0.5);
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn test_downsample_halves_length() {
        let signal: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let out = resample_linear(&signal, 48_000.0, 24_000.0);

        assert_eq!(out.len(), 50);
        assert_eq!(out[10], 20.0);
    }
}
