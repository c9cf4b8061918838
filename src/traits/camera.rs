use glam::Vec3;

/// Camera abstraction the autopilot drives
///
/// Mirrors an orbit-style control: a position, a point it looks at, and a
/// refresh that re-derives orientation after either changes.
pub trait CameraRig {
    /// Camera position in world space
    fn position(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);

    /// Point the camera looks at
    fn target(&self) -> Vec3;

    fn set_target(&mut self, target: Vec3);

    /// Re-derive orientation from position and target
    fn refresh(&mut self);
}
