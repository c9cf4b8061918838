//! Vehicles driving around a shared closed road curve, written straight into
//! an instance buffer for a single instanced draw.

use std::sync::Arc;

use glam::{Mat3, Mat4, Quat, Vec3};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::FleetConfig;
use crate::error::{require_positive, require_range, ConfigError, CurveError};
use crate::frame::sanitize_delta;
use crate::math::{hsl_to_rgb, wrap_unit, ClosedCurve, CurveType, Parameterization};
use crate::types::InstanceRaw;

/// Motion state of one vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceState {
    /// Position along the curve, in [0, 1)
    pub progress: f32,
    /// Loop fractions per second
    pub velocity: f32,
    /// Uniform scale
    pub scale: f32,
}

/// Fixed-capacity transform slots consumed by the renderer
#[derive(Debug, Clone)]
pub struct InstanceBuffer {
    slots: Vec<InstanceRaw>,
    dirty: bool,
}

impl InstanceBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![InstanceRaw::default(); capacity],
            dirty: true,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<&InstanceRaw> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[InstanceRaw] {
        &self.slots
    }

    /// Overwrite slot `index`; out-of-range writes are dropped.
    pub fn set(&mut self, index: usize, instance: InstanceRaw) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = instance;
            self.dirty = true;
        }
    }

    /// True when slots changed since the last upload
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.slots)
    }

    pub fn size_in_bytes(&self) -> wgpu::BufferAddress {
        self.as_bytes().len() as wgpu::BufferAddress
    }

    /// Upload to `buffer` if anything changed; `buffer` must hold `size_in_bytes()`
    pub fn write_to(&mut self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        if !self.dirty {
            return;
        }
        queue.write_buffer(buffer, 0, self.as_bytes());
        self.dirty = false;
    }
}

/// Advances every vehicle along the road each frame
#[derive(Debug, Clone)]
pub struct InstanceFleetAnimator {
    curve: Option<Arc<ClosedCurve>>,
    instances: Vec<InstanceState>,
    colors: Vec<[f32; 3]>,
    buffer: InstanceBuffer,
    parameterization: Parameterization,
}

impl InstanceFleetAnimator {
    /// Spawn `config.count` vehicles with random start, speed, size and color
    pub fn new(curve: Arc<ClosedCurve>, config: &FleetConfig) -> Result<Self, ConfigError> {
        let velocity_range = require_range("velocity_range", config.velocity_range)?;
        require_positive("velocity_range", velocity_range[0])?;
        let scale_range = require_range("scale_range", config.scale_range)?;
        require_positive("scale_range", scale_range[0])?;
        let hue_range = require_range("hue_range", config.hue_range)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut instances = Vec::with_capacity(config.count);
        let mut colors = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            instances.push(InstanceState {
                progress: rng.gen::<f32>(),
                velocity: sample_range(&mut rng, velocity_range),
                scale: sample_range(&mut rng, scale_range),
            });
            let hue = sample_range(&mut rng, hue_range);
            colors.push(hsl_to_rgb(hue, config.saturation, config.lightness));
        }

        debug!("Spawned fleet of {} vehicles", config.count);
        Ok(Self::assemble(curve, instances, colors, config.parameterization))
    }

    /// Fleet from explicit states, all white
    ///
    /// Velocity and scale must be positive and finite; progress is wrapped
    /// into [0, 1).
    pub fn with_instances(
        curve: Arc<ClosedCurve>,
        mut instances: Vec<InstanceState>,
    ) -> Result<Self, ConfigError> {
        for state in &mut instances {
            require_positive("velocity", state.velocity)?;
            require_positive("scale", state.scale)?;
            state.progress = wrap_unit(state.progress);
        }
        let colors = vec![[1.0, 1.0, 1.0]; instances.len()];
        Ok(Self::assemble(curve, instances, colors, Parameterization::Uniform))
    }

    fn assemble(
        curve: Arc<ClosedCurve>,
        instances: Vec<InstanceState>,
        colors: Vec<[f32; 3]>,
        parameterization: Parameterization,
    ) -> Self {
        let mut fleet = Self {
            buffer: InstanceBuffer::new(instances.len()),
            curve: Some(curve),
            instances,
            colors,
            parameterization,
        };
        // place everything before the first frame
        fleet.write_transforms();
        fleet
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[InstanceState] {
        &self.instances
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn buffer(&self) -> &InstanceBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut InstanceBuffer {
        &mut self.buffer
    }

    pub fn curve(&self) -> Option<&Arc<ClosedCurve>> {
        self.curve.as_ref()
    }

    pub fn set_parameterization(&mut self, parameterization: Parameterization) {
        self.parameterization = parameterization;
    }

    /// Swap in a new shared curve; takes effect on the next update
    pub fn set_curve(&mut self, curve: Arc<ClosedCurve>) {
        self.curve = Some(curve);
    }

    /// Drop the curve; updates become no-ops and transforms stay where they are
    pub fn detach_curve(&mut self) -> Option<Arc<ClosedCurve>> {
        warn!("Fleet curve detached, vehicles frozen");
        self.curve.take()
    }

    /// Rebuild the road from new control points
    ///
    /// On failure the fleet is frozen at its last transforms until a valid
    /// curve is set again.
    pub fn rebuild_curve(&mut self, points: Vec<Vec3>) -> Result<(), CurveError> {
        match ClosedCurve::new(points, CurveType::catmull_rom()) {
            Ok(curve) => {
                self.curve = Some(Arc::new(curve));
                Ok(())
            }
            Err(err) => {
                warn!("Road rebuild failed, freezing fleet: {err}");
                self.curve = None;
                Err(err)
            }
        }
    }

    /// Advance every vehicle by `dt` seconds and rewrite its slot
    pub fn update(&mut self, dt: f32) {
        if self.curve.is_none() {
            return;
        }
        let dt = sanitize_delta(dt);
        for state in &mut self.instances {
            state.progress = wrap_unit(state.progress + state.velocity * dt);
        }
        self.write_transforms();
    }

    fn write_transforms(&mut self) {
        let Some(curve) = self.curve.as_deref() else {
            return;
        };
        for (index, (state, color)) in self.instances.iter().zip(&self.colors).enumerate() {
            let position = curve.sample(state.progress, self.parameterization);
            let look = position + curve.sample_tangent(state.progress, self.parameterization);
            // degenerate heading keeps the slot's previous transform
            if let Some(model) = instance_transform(position, look, state.scale) {
                self.buffer.set(index, InstanceRaw::new(model, *color));
            }
        }
    }
}

/// Places a model at `position`, local +Z facing `look`, Y up, uniform `scale`
pub fn instance_transform(position: Vec3, look: Vec3, scale: f32) -> Option<Mat4> {
    let forward = (look - position).normalize_or_zero();
    let right = Vec3::Y.cross(forward).normalize_or_zero();
    if forward == Vec3::ZERO || right == Vec3::ZERO {
        return None;
    }
    let up = forward.cross(right);
    let rotation = Quat::from_mat3(&Mat3::from_cols(right, up, forward));

    Some(Mat4::from_scale_rotation_translation(
        Vec3::splat(scale),
        rotation,
        position,
    ))
}

fn sample_range(rng: &mut StdRng, [min, max]: [f32; 2]) -> f32 {
    if min < max {
        rng.gen_range(min..max)
    } else {
        min
    }
}
