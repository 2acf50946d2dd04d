use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::canvas::Vertex;

pub const NETWORK_SHADER: &str = include_str!("network.wgsl");

/// Vertex buffer layout matching [`Vertex`].
pub const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x2,
    1 => Float32x4,
    2 => Float32x2,
    3 => Float32
];

pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Viewport {
    pub size: [f32; 2],
    pub _pad: [f32; 2],
}

impl Viewport {
    /// Viewport in the same (logical pixel) space as the vertices.
    pub fn new(size: Vec2) -> Self {
        Self {
            size: size.max(Vec2::ONE).to_array(),
            _pad: [0.0; 2],
        }
    }
}
