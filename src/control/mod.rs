//! Front-end controls: typed targets and the curves that map them.

pub mod mapper;
pub mod target;

pub use target::{ControlEvent, ControlTarget, Curve, ModuleParam, TargetParseError};
