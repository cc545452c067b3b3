use std::sync::Arc;

use crate::{
    control::{ControlTarget, ModuleParam},
    io::AudioBuffer,
};

pub const DEFAULT_GAIN: f32 = 1.0;
pub const DEFAULT_LOW_CUT_HZ: f32 = 20.0;
pub const DEFAULT_HIGH_CUT_HZ: f32 = 20_000.0;
pub const DEFAULT_DRY_WET_MIX: f32 = 0.5;

/// Configuration of one IR module.
///
/// A slot without a buffer is inactive and gets no voice when a session is
/// built. Parameters are always in physical units and within range.
#[derive(Debug, Clone)]
pub struct IrSlot {
    index: usize,
    buffer: Option<Arc<AudioBuffer>>,
    gain: f32,
    low_cut_hz: f32,
    high_cut_hz: f32,
    phase: i32,
}

impl IrSlot {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            buffer: None,
            gain: DEFAULT_GAIN,
            low_cut_hz: DEFAULT_LOW_CUT_HZ,
            high_cut_hz: DEFAULT_HIGH_CUT_HZ,
            phase: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Swap in a new impulse response, returning the previous one.
    pub fn load(&mut self, buffer: Arc<AudioBuffer>) -> Option<Arc<AudioBuffer>> {
        self.buffer.replace(buffer)
    }

    pub fn clear(&mut self) -> Option<Arc<AudioBuffer>> {
        self.buffer.take()
    }

    pub fn buffer(&self) -> Option<&Arc<AudioBuffer>> {
        self.buffer.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn low_cut_hz(&self) -> f32 {
        self.low_cut_hz
    }

    pub fn high_cut_hz(&self) -> f32 {
        self.high_cut_hz
    }

    pub fn param(&self, param: ModuleParam) -> f32 {
        match param {
            ModuleParam::Gain => self.gain,
            ModuleParam::LowCut => self.low_cut_hz,
            ModuleParam::HighCut => self.high_cut_hz,
        }
    }

    /// Store a parameter, clamped to its range. Returns the stored value.
    ///
    /// Non-finite values are ignored and the current value is kept.
    pub fn set_param(&mut self, param: ModuleParam, value: f32) -> f32 {
        if !value.is_finite() {
            return self.param(param);
        }
        let value = ControlTarget::Module(self.index, param).curve().clamp(value);
        match param {
            ModuleParam::Gain => self.gain = value,
            ModuleParam::LowCut => self.low_cut_hz = value,
            ModuleParam::HighCut => self.high_cut_hz = value,
        }
        value
    }

    pub fn set_gain(&mut self, gain: f32) -> f32 {
        self.set_param(ModuleParam::Gain, gain)
    }

    pub fn set_low_cut(&mut self, hz: f32) -> f32 {
        self.set_param(ModuleParam::LowCut, hz)
    }

    pub fn set_high_cut(&mut self, hz: f32) -> f32 {
        self.set_param(ModuleParam::HighCut, hz)
    }

    /// Phase offset in degrees. Stored for the front-end; the signal path ignores it.
    pub fn phase(&self) -> i32 {
        self.phase
    }

    pub fn set_phase(&mut self, phase: i32) {
        self.phase = phase;
    }
}

/// Master tone stage and dry/wet balance.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterState {
    pub gain: f32,
    pub low_cut_hz: f32,
    pub high_cut_hz: f32,
    pub dry_wet_mix: f32,
}

impl Default for MasterState {
    fn default() -> Self {
        Self {
            gain: DEFAULT_GAIN,
            low_cut_hz: DEFAULT_LOW_CUT_HZ,
            high_cut_hz: DEFAULT_HIGH_CUT_HZ,
            dry_wet_mix: DEFAULT_DRY_WET_MIX,
        }
    }
}

impl MasterState {
    pub fn dry_gain(&self) -> f32 {
        1.0 - self.dry_wet_mix
    }

    pub fn wet_gain(&self) -> f32 {
        self.dry_wet_mix
    }

    /// Store a master-level value, clamped to its range. Returns the stored
    /// value, or `None` for per-module targets. Non-finite values leave the
    /// current value in place.
    pub fn set(&mut self, target: ControlTarget, value: f32) -> Option<f32> {
        if !value.is_finite() {
            return self.get(target);
        }
        let value = target.curve().clamp(value);
        let field = match target {
            ControlTarget::MasterGain => &mut self.gain,
            ControlTarget::MasterLowCut => &mut self.low_cut_hz,
            ControlTarget::MasterHighCut => &mut self.high_cut_hz,
            ControlTarget::DryWetMix => &mut self.dry_wet_mix,
            ControlTarget::Module(..) => return None,
        };
        *field = value;
        Some(value)
    }

    pub fn get(&self, target: ControlTarget) -> Option<f32> {
        match target {
            ControlTarget::MasterGain => Some(self.gain),
            ControlTarget::MasterLowCut => Some(self.low_cut_hz),
            ControlTarget::MasterHighCut => Some(self.high_cut_hz),
            ControlTarget::DryWetMix => Some(self.dry_wet_mix),
            ControlTarget::Module(..) => None,
        }
    }
}
