// cli.rs - Command-line interface configuration
use clap::Parser;
use glam::Vec3;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "city-autopilot")]
#[command(about = "Headless run of the city camera autopilot and vehicle fleet", long_about = None)]
pub struct Cli {
    /// JSON scene config; defaults are used for anything it omits
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 48.0)]
    pub seconds: f32,

    /// Fixed frame rate of the simulation
    #[arg(long, default_value_t = 60.0)]
    pub fps: f32,

    /// Fleet RNG seed, overrides the config
    #[arg(long)]
    pub seed: Option<u64>,

    /// Time at which a simulated user grabs the camera
    #[arg(long)]
    pub grab_at: Option<f64>,

    /// Time at which the simulated user lets go
    #[arg(long)]
    pub release_at: Option<f64>,

    /// Where the simulated user leaves the camera, as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub release_position: Option<Vec3>,

    /// Write sampled camera and vehicle poses to this JSON file
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Frames between trace samples
    #[arg(long, default_value_t = 30)]
    pub trace_every: u64,

    /// Disable console output
    #[arg(long, default_value = "false")]
    pub quiet: bool,
}

fn parse_vec3(text: &str) -> Result<Vec3, String> {
    let parts = text
        .split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|e| format!("{part:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {} values", parts.len())),
    }
}
