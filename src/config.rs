// config.rs - Tunables for the camera autopilot and the vehicle fleet
use anyhow::{Context, Result};
use glam::Vec3;
use serde::Deserialize;
use std::path::Path;

use crate::math::Parameterization;

/// Camera autopilot parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Horizontal distance of the camera path from the origin
    pub radius: f32,
    /// Base height of the camera path
    pub height: f32,
    /// Seconds per full loop
    pub orbit_duration: f32,
    /// Grace period after an interaction ends, in milliseconds
    pub resume_delay_ms: f32,
    /// Exponential decay rate toward the path, in 1/s
    pub smoothness: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Parameter lead of the look target over the camera
    pub look_ahead: f32,
    pub initial_target: Vec3,
    pub parameterization: Parameterization,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            radius: 45.0,
            height: 18.0,
            orbit_duration: 48.0,
            resume_delay_ms: 600.0,
            smoothness: 7.0,
            min_height: 4.0,
            max_height: 60.0,
            look_ahead: 0.02,
            initial_target: Vec3::new(0.0, 2.0, 0.0),
            parameterization: Parameterization::Uniform,
        }
    }
}

impl AutopilotConfig {
    pub fn resume_delay_secs(&self) -> f32 {
        self.resume_delay_ms / 1000.0
    }
}

/// Vehicle fleet parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub count: usize,
    /// Loop fractions per second, sampled from [min, max)
    pub velocity_range: [f32; 2],
    pub scale_range: [f32; 2],
    pub hue_range: [f32; 2],
    pub saturation: f32,
    pub lightness: f32,
    /// Fixed seed for reproducible fleets; entropy when unset
    pub seed: Option<u64>,
    pub parameterization: Parameterization,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            count: 120,
            velocity_range: [0.015, 0.025],
            scale_range: [0.6, 1.4],
            hue_range: [0.55, 0.65],
            saturation: 0.8,
            lightness: 0.6,
            seed: None,
            parameterization: Parameterization::Uniform,
        }
    }
}

/// Everything the headless driver needs
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: AutopilotConfig,
    pub fleet: FleetConfig,
}

impl SceneConfig {
    /// Load a JSON config; missing fields keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid scene config JSON")
    }
}
