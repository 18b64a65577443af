//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Screen-space vertex: position in pixels, straight-alpha color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// 8-bit RGB plus alpha to a vertex color
pub fn rgba(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        alpha.clamp(0.0, 1.0),
    ]
}

/// Same color, different alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Component-wise blend between two colors
pub fn mix(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Colors for game elements
pub mod colors {
    pub const SURFACE_WATER: [f32; 4] = [0.05, 0.36, 0.52, 1.0];
    pub const MID_WATER: [f32; 4] = [0.02, 0.18, 0.33, 1.0];
    pub const DEEP_WATER: [f32; 4] = [0.01, 0.05, 0.12, 1.0];
    pub const LIGHT_SHAFT: [f32; 4] = [0.75, 0.92, 1.0, 1.0];
    pub const PLANKTON: [f32; 4] = [0.7, 0.95, 0.85, 1.0];
    pub const BUBBLE: [f32; 4] = [0.8, 0.93, 1.0, 1.0];
    pub const PARTICLE: [f32; 4] = [0.85, 0.95, 1.0, 1.0];
    pub const EYE_WHITE: [f32; 4] = [0.96, 0.97, 0.95, 1.0];
    pub const PUPIL: [f32; 4] = [0.04, 0.04, 0.06, 1.0];
    pub const DAMAGE: [f32; 4] = [1.0, 0.16, 0.12, 1.0];
    pub const HEALTH_OK: [f32; 4] = [0.25, 0.88, 0.55, 1.0];
    pub const HEALTH_LOW: [f32; 4] = [0.95, 0.2, 0.2, 1.0];
    pub const HUD_TRACK: [f32; 4] = [0.0, 0.0, 0.0, 0.45];
    pub const HUD_FRAME: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const BACKGROUND: [f32; 4] = [0.01, 0.05, 0.12, 1.0];
}
