use std::{fmt, str::FromStr};

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    control::mapper::{
        knob_to_normalized, map_linear, map_log, percent_to_normalized, unmap_linear, unmap_log,
        GAIN_RANGE, HIGH_CUT_CURVE, LOW_CUT_CURVE, MIX_RANGE,
    },
    SLOT_COUNT,
};

/// Per-voice parameter of an IR module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModuleParam {
    Gain,
    LowCut,
    HighCut,
}

/// Everything a control can be bound to.
///
/// Slot indices are zero-based; the textual form (`module1.gain`) is one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControlTarget {
    MasterGain,
    MasterLowCut,
    MasterHighCut,
    DryWetMix,
    Module(usize, ModuleParam),
}

/// How a normalized position becomes a physical value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear { lo: f32, hi: f32 },
    Log { base: f32, scale: f32 },
}

impl Curve {
    pub fn map(&self, norm: f32) -> f32 {
        match *self {
            Curve::Linear { lo, hi } => map_linear(norm, lo, hi),
            Curve::Log { base, scale } => map_log(norm, base, scale),
        }
    }

    pub fn unmap(&self, value: f32) -> f32 {
        match *self {
            Curve::Linear { lo, hi } => unmap_linear(value, lo, hi),
            Curve::Log { base, scale } => unmap_log(value, base, scale),
        }
    }

    /// Physical values at positions 0 and 1
    pub fn range(&self) -> (f32, f32) {
        (self.map(0.0), self.map(1.0))
    }

    pub fn clamp(&self, value: f32) -> f32 {
        let (lo, hi) = self.range();
        value.clamp(lo.min(hi), lo.max(hi))
    }
}

impl ControlTarget {
    /// All targets, master first, then every slot in order.
    pub fn all() -> impl Iterator<Item = ControlTarget> {
        let master = [
            ControlTarget::DryWetMix,
            ControlTarget::MasterGain,
            ControlTarget::MasterLowCut,
            ControlTarget::MasterHighCut,
        ];
        let modules = (0..SLOT_COUNT).flat_map(|slot| {
            [ModuleParam::Gain, ModuleParam::LowCut, ModuleParam::HighCut]
                .map(move |param| ControlTarget::Module(slot, param))
        });
        master.into_iter().chain(modules)
    }

    pub fn curve(&self) -> Curve {
        let (log_base, log_scale) = match self {
            ControlTarget::MasterGain | ControlTarget::Module(_, ModuleParam::Gain) => {
                let (lo, hi) = GAIN_RANGE;
                return Curve::Linear { lo, hi };
            }
            ControlTarget::DryWetMix => {
                let (lo, hi) = MIX_RANGE;
                return Curve::Linear { lo, hi };
            }
            ControlTarget::MasterLowCut | ControlTarget::Module(_, ModuleParam::LowCut) => {
                LOW_CUT_CURVE
            }
            ControlTarget::MasterHighCut | ControlTarget::Module(_, ModuleParam::HighCut) => {
                HIGH_CUT_CURVE
            }
        };
        Curve::Log {
            base: log_base,
            scale: log_scale,
        }
    }

    /// Slot index for per-voice targets
    pub fn slot(&self) -> Option<usize> {
        match self {
            ControlTarget::Module(slot, _) => Some(*slot),
            _ => None,
        }
    }

    /// Short label for display
    pub fn label(&self) -> String {
        match self {
            ControlTarget::MasterGain => "Master gain".into(),
            ControlTarget::MasterLowCut => "Master low cut".into(),
            ControlTarget::MasterHighCut => "Master high cut".into(),
            ControlTarget::DryWetMix => "Dry/wet mix".into(),
            ControlTarget::Module(slot, param) => {
                let name = match param {
                    ModuleParam::Gain => "gain",
                    ModuleParam::LowCut => "low cut",
                    ModuleParam::HighCut => "high cut",
                };
                format!("IR {} {name}", slot + 1)
            }
        }
    }
}

impl fmt::Display for ControlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlTarget::MasterGain => write!(f, "master.gain"),
            ControlTarget::MasterLowCut => write!(f, "master.lowcut"),
            ControlTarget::MasterHighCut => write!(f, "master.highcut"),
            ControlTarget::DryWetMix => write!(f, "dryWetMix"),
            ControlTarget::Module(slot, param) => {
                let param = match param {
                    ModuleParam::Gain => "gain",
                    ModuleParam::LowCut => "lowcut",
                    ModuleParam::HighCut => "highcut",
                };
                write!(f, "module{}.{param}", slot + 1)
            }
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetParseError {
    #[error("unknown control target `{0}`")]
    Unknown(String),
    #[error("module {0} does not exist")]
    NoSuchModule(usize),
}

impl FromStr for ControlTarget {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || TargetParseError::Unknown(s.to_string());

        if s.eq_ignore_ascii_case("dryWetMix") {
            return Ok(ControlTarget::DryWetMix);
        }

        let (owner, param) = s.split_once('.').ok_or_else(unknown)?;
        let param = match param.to_ascii_lowercase().as_str() {
            "gain" => ModuleParam::Gain,
            "lowcut" => ModuleParam::LowCut,
            "highcut" => ModuleParam::HighCut,
            _ => return Err(unknown()),
        };

        if owner.eq_ignore_ascii_case("master") {
            return Ok(match param {
                ModuleParam::Gain => ControlTarget::MasterGain,
                ModuleParam::LowCut => ControlTarget::MasterLowCut,
                ModuleParam::HighCut => ControlTarget::MasterHighCut,
            });
        }

        let number = owner
            .strip_prefix("module")
            .ok_or_else(unknown)?
            .parse::<usize>()
            .map_err(|_| unknown())?;
        if number == 0 || number > SLOT_COUNT {
            return Err(TargetParseError::NoSuchModule(number));
        }
        Ok(ControlTarget::Module(number - 1, param))
    }
}

/// A control gesture from the front-end, already reduced to a number.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControlEvent {
    /// Knob position in [0, 1]
    Knob { target: ControlTarget, normalized: f32 },
    /// Knob rotation in degrees, 0 = straight up
    Rotation { target: ControlTarget, angle_deg: f32 },
    /// Slider position in percent, 0..100
    Slider { target: ControlTarget, percent: f32 },
    /// Value already in physical units (gain factor, Hz)
    Physical { target: ControlTarget, value: f32 },
}

impl ControlEvent {
    pub fn target(&self) -> ControlTarget {
        match *self {
            ControlEvent::Knob { target, .. }
            | ControlEvent::Rotation { target, .. }
            | ControlEvent::Slider { target, .. }
            | ControlEvent::Physical { target, .. } => target,
        }
    }

    /// Resolve to a physical value for the target, clamped to its range.
    pub fn physical_value(&self) -> f32 {
        let target = self.target();
        let curve = target.curve();
        let value = match *self {
            ControlEvent::Knob { normalized, .. } => curve.map(normalized.clamp(0.0, 1.0)),
            ControlEvent::Rotation { angle_deg, .. } => curve.map(knob_to_normalized(angle_deg)),
            ControlEvent::Slider { percent, .. } => curve.map(percent_to_normalized(percent)),
            ControlEvent::Physical { value, .. } => value,
        };
        curve.clamp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_front_end_identifiers() {
        assert_eq!("master.gain".parse(), Ok(ControlTarget::MasterGain));
        assert_eq!("master.lowcut".parse(), Ok(ControlTarget::MasterLowCut));
        assert_eq!("master.highcut".parse(), Ok(ControlTarget::MasterHighCut));
        assert_eq!("dryWetMix".parse(), Ok(ControlTarget::DryWetMix));
        assert_eq!(
            "module2.lowcut".parse(),
            Ok(ControlTarget::Module(1, ModuleParam::LowCut))
        );
        assert_eq!(
            "module4.highcut".parse(),
            Ok(ControlTarget::Module(3, ModuleParam::HighCut))
        );
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert!(matches!(
            "master.phase".parse::<ControlTarget>(),
            Err(TargetParseError::Unknown(_))
        ));
        assert!(matches!(
            "module5.gain".parse::<ControlTarget>(),
            Err(TargetParseError::NoSuchModule(_))
        ));
        assert!(matches!(
            "module0.gain".parse::<ControlTarget>(),
            Err(TargetParseError::NoSuchModule(_))
        ));
        assert!("volume".parse::<ControlTarget>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for target in ControlTarget::all() {
            assert_eq!(target.to_string().parse(), Ok(target));
        }
        assert_eq!(ControlTarget::all().count(), 4 + 3 * SLOT_COUNT);
    }

    #[test]
    fn knob_events_use_target_curve() {
        let gain = ControlEvent::Knob {
            target: ControlTarget::Module(0, ModuleParam::Gain),
            normalized: 0.5,
        };
        assert_eq!(gain.physical_value(), 1.0);

        let low_cut = ControlEvent::Knob {
            target: ControlTarget::MasterLowCut,
            normalized: 1.0,
        };
        assert!((low_cut.physical_value() - 2000.0).abs() < 0.5);
    }

    #[test]
    fn slider_percent_is_divided_by_100() {
        let mix = ControlEvent::Slider {
            target: ControlTarget::DryWetMix,
            percent: 30.0,
        };
        assert!((mix.physical_value() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn rotation_covers_knob_travel() {
        let at = |angle_deg| {
            ControlEvent::Rotation {
                target: ControlTarget::DryWetMix,
                angle_deg,
            }
            .physical_value()
        };
        assert_eq!(at(-135.0), 0.0);
        assert!((at(0.0) - 0.5).abs() < 1e-6);
        assert_eq!(at(135.0), 1.0);
        assert_eq!(at(400.0), 1.0);
    }

    #[test]
    fn physical_values_are_clamped() {
        let high = ControlEvent::Physical {
            target: ControlTarget::Module(2, ModuleParam::HighCut),
            value: 50_000.0,
        };
        assert!((high.physical_value() - 20_000.0).abs() < 0.5);

        let gain = ControlEvent::Physical {
            target: ControlTarget::MasterGain,
            value: -1.0,
        };
        assert_eq!(gain.physical_value(), 0.0);
    }
}
