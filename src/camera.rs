use glam::{Mat4, Vec3};

use crate::traits::CameraRig;
use crate::types::CameraUniform;

/// Keeps the view direction away from straight up/down
pub const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit-style camera: a position looking at a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub position: Vec3,
    target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitCamera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            target,
            yaw: 0.0,
            pitch: 0.0,
        };
        camera.refresh();
        camera
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Distance from the vertical axis through the scene origin
    pub fn horizontal_distance(&self) -> f32 {
        self.position.x.hypot(self.position.z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn to_uniform(&self, time: f32) -> CameraUniform {
        CameraUniform {
            view: self.view_matrix().to_cols_array_2d(),
            position: self.position.to_array(),
            time,
            target: self.target.to_array(),
            _pad: 0.0,
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::new(45.0, 18.0, 0.0), Vec3::new(0.0, 2.0, 0.0))
    }
}

impl CameraRig for OrbitCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn refresh(&mut self) {
        let direction = self.target - self.position;
        let distance = direction.length();
        // target on top of the camera: keep the previous orientation
        if !(distance > 1e-6) {
            return;
        }

        self.yaw = direction.x.atan2(direction.z);
        self.pitch = (direction.y / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_at_target_after_refresh() {
        let camera = OrbitCamera::new(Vec3::new(10.0, 5.0, -3.0), Vec3::new(0.0, 2.0, 0.0));
        let expected = (Vec3::new(0.0, 2.0, 0.0) - camera.position).normalize();
        assert!(camera.forward().distance(expected) < 1e-4);
    }

    #[test]
    fn refresh_tracks_new_target() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, Vec3::Z);
        camera.set_target(Vec3::X);
        camera.refresh();
        assert!(camera.forward().distance(Vec3::X) < 1e-5);
    }

    #[test]
    fn coincident_target_keeps_orientation() {
        let mut camera = OrbitCamera::new(Vec3::ZERO, Vec3::X);
        let before = (camera.yaw, camera.pitch);
        camera.set_target(Vec3::ZERO);
        camera.refresh();
        assert_eq!((camera.yaw, camera.pitch), before);
    }

    #[test]
    fn basis_is_orthonormal() {
        let camera = OrbitCamera::default();
        assert!(camera.forward().dot(camera.right()).abs() < 1e-5);
        assert!(camera.forward().dot(camera.up()).abs() < 1e-5);
        assert!((camera.up().length() - 1.0).abs() < 1e-4);
        assert!(camera.up().y > 0.0);
    }

    #[test]
    fn horizontal_distance_ignores_height() {
        let camera = OrbitCamera::new(Vec3::new(3.0, 100.0, 4.0), Vec3::ZERO);
        assert!((camera.horizontal_distance() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn view_matrix_looks_down_forward() {
        let camera = OrbitCamera::new(Vec3::new(10.0, 5.0, -3.0), Vec3::new(0.0, 2.0, 0.0));
        let view = camera.view_matrix();

        assert!(view.transform_point3(camera.position).length() < 1e-4);
        let ahead = view.transform_point3(camera.position + camera.forward());
        assert!(ahead.distance(Vec3::NEG_Z) < 1e-4);
    }

    #[test]
    fn uniform_carries_pose_and_time() {
        let camera = OrbitCamera::default();
        let uniform = camera.to_uniform(2.5);

        assert_eq!(uniform.position, camera.position.to_array());
        assert_eq!(uniform.target, camera.target().to_array());
        assert_eq!(uniform.time, 2.5);
        assert_eq!(uniform.view, camera.view_matrix().to_cols_array_2d());
    }
}
