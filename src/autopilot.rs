//! Autopilot camera: drives an orbit camera around the city along a closed
//! path and hands control back and forth with the user.
//!
//! The controller only reacts to interaction start/end, never to continuous
//! drag updates, and it damps the live camera toward the path instead of
//! binding it to the path directly.

use glam::Vec3;
use log::{debug, warn};

use crate::config::AutopilotConfig;
use crate::core::input_adapter::Interaction;
use crate::error::{require_positive, require_range, ConfigError, CurveError};
use crate::frame::sanitize_delta;
use crate::math::{wrap_unit, ClosedCurve, CurveType, DampedFollower};
use crate::paths;
use crate::traits::CameraRig;

/// Who is moving the camera right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutopilotMode {
    Autonomous,
    UserControlled,
    /// Interaction ended but the resume delay has not elapsed yet
    ResumePending,
}

#[derive(Debug, Clone)]
pub struct AutopilotCameraController {
    config: AutopilotConfig,
    radius: f32,
    height: f32,
    camera_path: ClosedCurve,
    look_path: ClosedCurve,
    follower: DampedFollower,
    progress: f32,
    interacting: bool,
    resume_at: f64,
    desired_position: Vec3,
    desired_target: Vec3,
}

impl AutopilotCameraController {
    /// Validate `config` and build both paths
    pub fn new(config: AutopilotConfig) -> Result<Self, ConfigError> {
        require_positive("orbit_duration", config.orbit_duration)?;
        require_range("height", [config.min_height, config.max_height])?;
        if !(config.resume_delay_ms >= 0.0) || !config.resume_delay_ms.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "resume_delay_ms",
                value: config.resume_delay_ms,
            });
        }
        if !(config.smoothness >= 0.0) || !config.smoothness.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "smoothness",
                value: config.smoothness,
            });
        }
        if !config.look_ahead.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "look_ahead",
                value: config.look_ahead,
            });
        }

        let radius = config.radius;
        let height = config.height.clamp(config.min_height, config.max_height);
        let camera_path = build_camera_path(radius, height)?;
        let look_path = ClosedCurve::new(paths::look_target_points(), CurveType::Centripetal)?;

        Ok(Self {
            follower: DampedFollower::new(config.smoothness),
            desired_position: camera_path.position(0.0),
            desired_target: config.initial_target,
            radius,
            height,
            camera_path,
            look_path,
            progress: 0.0,
            interacting: false,
            resume_at: 0.0,
            config,
        })
    }

    pub fn config(&self) -> &AutopilotConfig {
        &self.config
    }

    /// Position along the camera path, in [0, 1)
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn camera_path(&self) -> &ClosedCurve {
        &self.camera_path
    }

    pub fn look_path(&self) -> &ClosedCurve {
        &self.look_path
    }

    pub fn desired_position(&self) -> Vec3 {
        self.desired_position
    }

    pub fn desired_target(&self) -> Vec3 {
        self.desired_target
    }

    /// Time after which autonomous driving may resume
    pub fn resume_at(&self) -> f64 {
        self.resume_at
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    pub fn mode(&self, now: f64) -> AutopilotMode {
        if self.interacting {
            AutopilotMode::UserControlled
        } else if now < self.resume_at {
            AutopilotMode::ResumePending
        } else {
            AutopilotMode::Autonomous
        }
    }

    /// User grabbed the camera
    pub fn interaction_start(&mut self) {
        if !self.interacting {
            debug!("Autopilot paused: user interaction started");
        }
        self.interacting = true;
    }

    /// User released the camera at `camera_position`
    ///
    /// The release pose becomes the new orbit: radius from the horizontal
    /// distance, height clamped to the configured band. Driving resumes
    /// `resume_delay_ms` after `now`.
    pub fn interaction_end(&mut self, now: f64, camera_position: Vec3) {
        self.interacting = false;

        let radius = camera_position.x.hypot(camera_position.z);
        let height = camera_position
            .y
            .clamp(self.config.min_height, self.config.max_height);

        match build_camera_path(radius, height) {
            Ok(path) => {
                debug!(
                    "Camera path rebuilt: radius {:.2} -> {:.2}, height {:.2} -> {:.2}",
                    self.radius, radius, self.height, height
                );
                self.radius = radius;
                self.height = height;
                self.camera_path = path;
            }
            Err(err) => {
                warn!("Keeping previous camera path, release pose rejected: {err}");
            }
        }

        let now = if now.is_finite() { now } else { self.resume_at };
        self.resume_at = now + f64::from(self.config.resume_delay_secs());
        debug!("Autopilot resumes at t={:.3}s", self.resume_at);
    }

    /// Apply an event from the input adapter
    pub fn handle(&mut self, interaction: Interaction, now: f64, rig: &dyn CameraRig) {
        match interaction {
            Interaction::Start => self.interaction_start(),
            Interaction::End => self.interaction_end(now, rig.position()),
        }
    }

    /// Per-frame update; `dt` is the frame delta, `now` the absolute frame time
    ///
    /// A missing rig makes the tick a no-op. Outside autonomous mode the
    /// progress and the camera are left untouched.
    pub fn update(&mut self, dt: f32, now: f64, rig: Option<&mut dyn CameraRig>) {
        let Some(rig) = rig else {
            return;
        };
        if self.mode(now) != AutopilotMode::Autonomous {
            return;
        }

        let dt = sanitize_delta(dt);
        self.progress = wrap_unit(self.progress + dt / self.config.orbit_duration);

        let parameterization = self.config.parameterization;
        self.desired_position = self.camera_path.sample(self.progress, parameterization);
        self.desired_target = self
            .look_path
            .sample(wrap_unit(self.progress + self.config.look_ahead), parameterization);

        let position = self.follower.follow(rig.position(), self.desired_position, dt);
        let target = self.follower.follow(rig.target(), self.desired_target, dt);
        rig.set_position(position);
        rig.set_target(target);
        rig.refresh();
    }
}

fn build_camera_path(radius: f32, height: f32) -> Result<ClosedCurve, CurveError> {
    ClosedCurve::new(paths::camera_path_points(radius, height), CurveType::catmull_rom())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;

    fn controller() -> AutopilotCameraController {
        AutopilotCameraController::new(AutopilotConfig::default()).unwrap()
    }

    #[test]
    fn rejects_bad_duration() {
        let config = AutopilotConfig {
            orbit_duration: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            AutopilotCameraController::new(config),
            Err(ConfigError::InvalidParameter {
                name: "orbit_duration",
                ..
            })
        ));
    }

    #[test]
    fn rejects_inverted_height_band() {
        let config = AutopilotConfig {
            min_height: 50.0,
            max_height: 10.0,
            ..Default::default()
        };
        assert!(AutopilotCameraController::new(config).is_err());
    }

    #[test]
    fn non_finite_radius_fails_as_curve_error() {
        let config = AutopilotConfig {
            radius: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            AutopilotCameraController::new(config),
            Err(ConfigError::Curve(CurveError::NonFiniteControlPoint { .. }))
        ));
    }

    #[test]
    fn missing_rig_is_a_no_op() {
        let mut rig = controller();
        rig.update(1.0, 10.0, None);
        assert_eq!(rig.progress(), 0.0);
    }

    #[test]
    fn invalid_dt_does_not_advance() {
        let mut rig = controller();
        let mut camera = OrbitCamera::default();
        rig.update(f32::NAN, 1.0, Some(&mut camera));
        rig.update(-1.0, 1.0, Some(&mut camera));
        assert_eq!(rig.progress(), 0.0);
        assert!(camera.position.is_finite());
    }

    #[test]
    fn modes_follow_interaction_events() {
        let mut rig = controller();
        assert_eq!(rig.mode(0.0), AutopilotMode::Autonomous);

        rig.interaction_start();
        assert_eq!(rig.mode(1.0), AutopilotMode::UserControlled);

        rig.interaction_end(2.0, Vec3::new(30.0, 10.0, 40.0));
        assert_eq!(rig.mode(2.3), AutopilotMode::ResumePending);
        assert_eq!(rig.mode(2.6), AutopilotMode::Autonomous);
    }

    #[test]
    fn resume_time_keeps_resolution_after_a_day() {
        let mut rig = controller();
        let day = 86_400.0 * 1.5;
        rig.interaction_start();
        rig.interaction_end(day, Vec3::new(30.0, 10.0, 40.0));

        assert_eq!(rig.mode(day + 0.5999), AutopilotMode::ResumePending);
        assert_eq!(rig.mode(day + 0.6001), AutopilotMode::Autonomous);
    }

    #[test]
    fn non_finite_release_keeps_previous_path() {
        let mut rig = controller();
        rig.interaction_start();
        rig.interaction_end(1.0, Vec3::new(f32::NAN, 10.0, 0.0));
        assert_eq!(rig.radius(), 45.0);
        assert_eq!(rig.height(), 18.0);
        assert!(!rig.is_interacting());
    }

    #[test]
    fn handle_reads_release_pose_from_rig() {
        let mut rig = controller();
        let camera = OrbitCamera::new(Vec3::new(6.0, 100.0, 8.0), Vec3::ZERO);
        rig.handle(Interaction::Start, 0.0, &camera);
        rig.handle(Interaction::End, 0.5, &camera);
        assert!((rig.radius() - 10.0).abs() < 1e-5);
        assert_eq!(rig.height(), 60.0);
        assert!((rig.resume_at() - 1.1).abs() < 1e-5);
    }

    #[test]
    fn look_target_leads_the_camera() {
        let mut rig = controller();
        let mut camera = OrbitCamera::default();
        rig.update(1.0, 1.0, Some(&mut camera));

        let expected = rig.look_path().position(rig.progress() + 0.02);
        assert!(rig.desired_target().distance(expected) < 1e-5);
    }
}
