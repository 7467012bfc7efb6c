//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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

/// Colors for game elements
pub mod colors {
    /// Wall colors, indexed by `Wall::color`
    pub const WALL_PALETTE: [[f32; 4]; 6] = [
        [1.0, 0.267, 0.267, 1.0], // #ff4444
        [0.267, 1.0, 0.267, 1.0], // #44ff44
        [0.267, 0.267, 1.0, 1.0], // #4444ff
        [1.0, 1.0, 0.267, 1.0],   // #ffff44
        [1.0, 0.267, 1.0, 1.0],   // #ff44ff
        [0.267, 1.0, 1.0, 1.0],   // #44ffff
    ];
    pub const PLAYER: [f32; 4] = [0.298, 0.686, 0.314, 1.0]; // #4CAF50
    pub const PLAYER_LOW: [f32; 4] = [0.957, 0.263, 0.212, 1.0]; // #F44336, last life
    pub const HUB: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GUIDE: [f32; 4] = [1.0, 1.0, 1.0, 0.08];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];

    /// Palette lookup that tolerates out-of-range indices
    pub fn wall(index: u8) -> [f32; 4] {
        WALL_PALETTE[index as usize % WALL_PALETTE.len()]
    }

    /// Same color at a different opacity
    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }
}
