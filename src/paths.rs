//! Control-point generators for the camera path, the look-target loop and the road.

use glam::Vec3;
use std::f32::consts::TAU;

pub const CAMERA_PATH_POINTS: usize = 8;
/// Vertical bob amplitude of the camera path.
pub const CAMERA_BOB: f32 = 2.0;

pub const LOOK_TARGET_POINTS: usize = 6;
pub const LOOK_TARGET_RADIUS: f32 = 4.0;
pub const LOOK_TARGET_HEIGHT: f32 = 2.0;

pub const ROAD_HEIGHT: f32 = 0.2;

/// Points on a circle of `radius` around the origin, bobbing twice per loop around `height`.
pub fn camera_path_points(radius: f32, height: f32) -> Vec<Vec3> {
    (0..CAMERA_PATH_POINTS)
        .map(|i| {
            let angle = i as f32 / CAMERA_PATH_POINTS as f32 * TAU;
            Vec3::new(
                angle.cos() * radius,
                height + (angle * 2.0).sin() * CAMERA_BOB,
                angle.sin() * radius,
            )
        })
        .collect()
}

/// Small flat loop near the city centre that the camera looks at.
pub fn look_target_points() -> Vec<Vec3> {
    (0..LOOK_TARGET_POINTS)
        .map(|i| {
            let angle = i as f32 / LOOK_TARGET_POINTS as f32 * TAU;
            Vec3::new(
                angle.cos() * LOOK_TARGET_RADIUS,
                LOOK_TARGET_HEIGHT,
                angle.sin() * LOOK_TARGET_RADIUS,
            )
        })
        .collect()
}

/// The octagonal ring road the vehicles drive on.
pub fn road_control_points() -> Vec<Vec3> {
    [
        (-18.0, -18.0),
        (0.0, -22.0),
        (18.0, -18.0),
        (22.0, 0.0),
        (18.0, 18.0),
        (0.0, 22.0),
        (-18.0, 18.0),
        (-22.0, 0.0),
    ]
    .into_iter()
    .map(|(x, z)| Vec3::new(x, ROAD_HEIGHT, z))
    .collect()
}
