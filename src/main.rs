use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use log::{info, warn};
use serde::Serialize;

use city_autopilot::cli::Cli;
use city_autopilot::core::{Interaction, InteractionTracker};
use city_autopilot::frame::FixedStepFrames;
use city_autopilot::math::ClosedCurve;
use city_autopilot::paths;
use city_autopilot::traits::CameraRig;
use city_autopilot::{AutopilotCameraController, InstanceFleetAnimator, OrbitCamera, SceneConfig};

#[derive(Debug, Serialize)]
struct TraceSample {
    frame: u64,
    time: f64,
    progress: f32,
    mode: String,
    camera_position: Vec3,
    camera_target: Vec3,
    lead_vehicle: Option<Vec3>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if !cli.quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.fleet.seed = Some(seed);
    }
    anyhow::ensure!(cli.fps > 0.0 && cli.fps.is_finite(), "--fps must be positive");

    let road = Arc::new(ClosedCurve::catmull_rom(paths::road_control_points())?);
    let mut autopilot = AutopilotCameraController::new(config.camera.clone())
        .context("Invalid camera autopilot config")?;
    let mut fleet = InstanceFleetAnimator::new(road, &config.fleet)
        .context("Invalid fleet config")?;
    let mut camera = OrbitCamera::new(
        autopilot.camera_path().position(0.0),
        config.camera.initial_target,
    );

    // simulated pointer: grab and release drive the same tracker a window would
    let mut tracker = InteractionTracker::new();
    let mut trace = Vec::new();

    let frame_count = (cli.seconds.max(0.0) * cli.fps).round() as usize;
    for frame in FixedStepFrames::at_fps(cli.fps).take(frame_count) {
        let mut events = Vec::new();
        if crossed(cli.grab_at, frame.time, frame.delta) {
            events.extend(tracker.press(winit::event::MouseButton::Left));
        }
        if crossed(cli.release_at, frame.time, frame.delta) {
            if let Some(position) = cli.release_position {
                camera.set_position(position);
                camera.refresh();
            }
            events.extend(tracker.release(winit::event::MouseButton::Left));
        }
        for event in events {
            info!("t={:.2}s {:?}", frame.time, event);
            autopilot.handle(event, frame.time, &camera);
            if event == Interaction::End {
                info!(
                    "New orbit: radius {:.2}, height {:.2}",
                    autopilot.radius(),
                    autopilot.height()
                );
            }
        }

        autopilot.update(frame.delta, frame.time, Some(&mut camera));
        fleet.update(frame.delta);

        if cli.trace.is_some() && frame.number % cli.trace_every.max(1) == 0 {
            trace.push(TraceSample {
                frame: frame.number,
                time: frame.time,
                progress: autopilot.progress(),
                mode: format!("{:?}", autopilot.mode(frame.time)),
                camera_position: camera.position,
                camera_target: camera.target(),
                lead_vehicle: fleet.buffer().get(0).map(|slot| slot.model().w_axis.truncate()),
            });
        }
    }

    if tracker.is_active() {
        warn!("Run ended while the simulated user still holds the camera");
    }

    info!(
        "Ran {} frames: progress {:.4}, camera at ({:.2}, {:.2}, {:.2}), {} vehicles",
        frame_count,
        autopilot.progress(),
        camera.position.x,
        camera.position.y,
        camera.position.z,
        fleet.len()
    );

    if let Some(path) = &cli.trace {
        let file = File::create(path)
            .with_context(|| format!("Failed to create trace file: {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &trace)
            .with_context(|| format!("Failed to write trace file: {:?}", path))?;
        info!("Wrote {} trace samples to {:?}", trace.len(), path);
    }

    Ok(())
}

/// True on the frame whose interval (time - delta, time] contains `at`
fn crossed(at: Option<f64>, time: f64, delta: f32) -> bool {
    at.is_some_and(|at| at > time - f64::from(delta) && at <= time)
}
