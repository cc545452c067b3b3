//! Curves from normalized control positions (0..1) to physical units.

/*
Control Curves
==============

Every front-end control produces a position in [0, 1]. How that position maps
to a physical value depends on what is being controlled:

  Linear   value = lo + norm * (hi - lo)
           gain 0..2, dry/wet mix 0..1

  Log      value = scale * base^norm
           low cut   20 * 100^norm    20 Hz .. 2 kHz
           high cut  1000 * 20^norm   1 kHz .. 20 kHz

Frequencies are perceived logarithmically, so equal knob travel gives equal
musical intervals on the log curve (half way on the low cut is 200 Hz, a
decade from each end).

All functions are pure and continuous. Positions are clamped by the caller
(knobs clamp their rotation first), but mapping an out-of-range position
simply extrapolates the curve.
*/

/// Gain knobs span silence to +6 dB.
pub const GAIN_RANGE: (f32, f32) = (0.0, 2.0);
pub const MIX_RANGE: (f32, f32) = (0.0, 1.0);

/// `(base, scale)` of the low-cut curve, 20 Hz to 2 kHz.
pub const LOW_CUT_CURVE: (f32, f32) = (100.0, 20.0);
/// `(base, scale)` of the high-cut curve, 1 kHz to 20 kHz.
pub const HIGH_CUT_CURVE: (f32, f32) = (20.0, 1000.0);

/// Knob rotation limit either side of center, in degrees.
pub const KNOB_MAX_ANGLE: f32 = 135.0;

#[inline]
pub fn map_linear(norm: f32, lo: f32, hi: f32) -> f32 {
    lo + norm * (hi - lo)
}

#[inline]
pub fn map_log(norm: f32, base: f32, scale: f32) -> f32 {
    scale * base.powf(norm)
}

/// Inverse of [`map_linear`]. A zero-width range maps to 0.
pub fn unmap_linear(value: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if span == 0.0 {
        return 0.0;
    }
    (value - lo) / span
}

/// Inverse of [`map_log`]. Non-positive values map to 0.
pub fn unmap_log(value: f32, base: f32, scale: f32) -> f32 {
    if value <= 0.0 || scale <= 0.0 || base <= 0.0 || base == 1.0 {
        return 0.0;
    }
    (value / scale).ln() / base.ln()
}

/// Knob rotation in degrees (0 = straight up) to a position in [0, 1].
pub fn knob_to_normalized(angle_deg: f32) -> f32 {
    let angle = angle_deg.clamp(-KNOB_MAX_ANGLE, KNOB_MAX_ANGLE);
    (angle + KNOB_MAX_ANGLE) / (2.0 * KNOB_MAX_ANGLE)
}

/// Knob position in [0, 1] to rotation in degrees.
pub fn normalized_to_knob(norm: f32) -> f32 {
    norm.clamp(0.0, 1.0) * 2.0 * KNOB_MAX_ANGLE - KNOB_MAX_ANGLE
}

/// Slider percentage (0..100) to a position in [0, 1].
pub fn percent_to_normalized(percent: f32) -> f32 {
    (percent / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-3 * b.abs().max(1.0)
    }

    #[test]
    fn linear_gain_endpoints_and_monotonic() {
        assert_eq!(map_linear(0.0, 0.0, 2.0), 0.0);
        assert_eq!(map_linear(1.0, 0.0, 2.0), 2.0);
        assert_eq!(map_linear(0.5, 0.0, 2.0), 1.0);

        let mut last = f32::MIN;
        for i in 0..=100 {
            let value = map_linear(i as f32 / 100.0, 0.0, 2.0);
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn low_cut_curve_spans_20_to_2000() {
        let (base, scale) = LOW_CUT_CURVE;
        assert!(approx(map_log(0.0, base, scale), 20.0));
        assert!(approx(map_log(0.5, base, scale), 200.0));
        assert!(approx(map_log(1.0, base, scale), 2000.0));
    }

    #[test]
    fn high_cut_curve_spans_1k_to_20k() {
        let (base, scale) = HIGH_CUT_CURVE;
        assert!(approx(map_log(0.0, base, scale), 1000.0));
        assert!(approx(map_log(1.0, base, scale), 20_000.0));
    }

    #[test]
    fn log_curve_is_continuous() {
        let (base, scale) = LOW_CUT_CURVE;
        let step = 1e-4;
        let mut norm = 0.0;
        while norm < 1.0 {
            let jump = map_log(norm + step, base, scale) - map_log(norm, base, scale);
            assert!(jump > 0.0 && jump < 1.0, "jump {jump} at {norm}");
            norm += step;
        }
    }

    #[test]
    fn unmap_inverts_map() {
        for norm in [0.0, 0.1, 0.37, 0.5, 0.9, 1.0] {
            assert!(approx(unmap_linear(map_linear(norm, 0.0, 2.0), 0.0, 2.0), norm));
            let (base, scale) = HIGH_CUT_CURVE;
            assert!(approx(unmap_log(map_log(norm, base, scale), base, scale), norm));
        }
        assert_eq!(unmap_log(0.0, 20.0, 1000.0), 0.0);
        assert_eq!(unmap_linear(3.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn knob_rotation_is_clamped() {
        assert_eq!(knob_to_normalized(-135.0), 0.0);
        assert_eq!(knob_to_normalized(0.0), 0.5);
        assert_eq!(knob_to_normalized(135.0), 1.0);
        assert_eq!(knob_to_normalized(400.0), 1.0);
        assert_eq!(knob_to_normalized(-720.0), 0.0);
        assert_eq!(normalized_to_knob(0.5), 0.0);
    }

    #[test]
    fn slider_percent() {
        assert_eq!(percent_to_normalized(30.0), 0.3);
        assert_eq!(percent_to_normalized(150.0), 1.0);
        assert_eq!(percent_to_normalized(-5.0), 0.0);
    }
}
