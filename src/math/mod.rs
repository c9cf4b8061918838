mod color;
pub mod curve;
pub mod damp;

pub use color::hsl_to_rgb;
pub use curve::{wrap_unit, ClosedCurve, CurveType, Parameterization};
pub use damp::{damp_factor, DampedFollower};
