use glam::Mat4;
use std::mem::size_of;
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub time: f32,
    pub target: [f32; 3],
    pub _pad: f32,
}

/// Per-instance data for the fleet's instanced draw call
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub _pad: f32,
}

impl InstanceRaw {
    /// First shader location used by the instance attributes.
    pub const FIRST_LOCATION: u32 = 5;

    const ATTRIBUTES: &'static [VertexAttribute] = &[
        // model matrix, one column per vec4
        VertexAttribute {
            shader_location: Self::FIRST_LOCATION,
            format: VertexFormat::Float32x4,
            offset: 0,
        },
        VertexAttribute {
            shader_location: Self::FIRST_LOCATION + 1,
            format: VertexFormat::Float32x4,
            offset: 16,
        },
        VertexAttribute {
            shader_location: Self::FIRST_LOCATION + 2,
            format: VertexFormat::Float32x4,
            offset: 32,
        },
        VertexAttribute {
            shader_location: Self::FIRST_LOCATION + 3,
            format: VertexFormat::Float32x4,
            offset: 48,
        },
        // color
        VertexAttribute {
            shader_location: Self::FIRST_LOCATION + 4,
            format: VertexFormat::Float32x3,
            offset: 64,
        },
    ];

    pub fn new(model: Mat4, color: [f32; 3]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            _pad: 0.0,
        }
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: size_of::<InstanceRaw>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: Self::ATTRIBUTES,
        }
    }
}

impl Default for InstanceRaw {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, [1.0, 1.0, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_is_tightly_packed() {
        assert_eq!(size_of::<InstanceRaw>(), 80);
        assert_eq!(size_of::<CameraUniform>(), 96);
    }

    #[test]
    fn layout_steps_per_instance() {
        let layout = InstanceRaw::layout();
        assert_eq!(layout.array_stride, 80);
        assert_eq!(layout.step_mode, VertexStepMode::Instance);
        assert_eq!(layout.attributes.len(), 5);
        assert_eq!(layout.attributes[4].offset, 64);
    }

    #[test]
    fn model_round_trips_through_columns() {
        let model = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(InstanceRaw::new(model, [0.5; 3]).model(), model);
    }
}
