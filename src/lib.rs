pub mod autopilot;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod fleet;
pub mod frame;
pub mod math;
pub mod paths;
pub mod traits;
pub mod types;

pub use autopilot::{AutopilotCameraController, AutopilotMode};
pub use camera::OrbitCamera;
pub use config::{AutopilotConfig, FleetConfig, SceneConfig};
pub use error::{ConfigError, CurveError};
pub use fleet::{InstanceBuffer, InstanceFleetAnimator, InstanceState};
pub use math::{ClosedCurve, CurveType, DampedFollower, Parameterization};
