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
    use super::super::Color;

    pub const BACKGROUND: Color = [0.059, 0.059, 0.102, 1.0]; // #0f0f1a
    pub const GRID: Color = [1.0, 1.0, 1.0, 0.04];
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.75];
    pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const TEXT_DIM: Color = [0.631, 0.631, 0.667, 1.0];
    pub const DANGER: Color = [0.937, 0.267, 0.267, 1.0];
    pub const GOLD: Color = [0.984, 0.749, 0.141, 1.0];
    pub const BALL: Color = [1.0, 1.0, 1.0, 1.0];
    pub const CENTER_LINE: Color = [1.0, 1.0, 1.0, 0.1];

    pub const BREAKOUT_PADDLE: Color = [0.961, 0.620, 0.043, 1.0];
    /// One per brick row, top to bottom
    pub const BRICK_ROWS: [Color; 5] = [
        [0.937, 0.267, 0.267, 1.0],
        [0.976, 0.451, 0.086, 1.0],
        [0.918, 0.702, 0.031, 1.0],
        [0.133, 0.773, 0.369, 1.0],
        [0.231, 0.510, 0.965, 1.0],
    ];
    /// Highlight strip on bricks that still need more than one hit
    pub const BRICK_SHINE: Color = [1.0, 1.0, 1.0, 0.3];

    pub const PONG_PADDLE: Color = [0.078, 0.722, 0.651, 1.0];
    pub const PONG_SCORE: Color = [1.0, 1.0, 1.0, 0.05];

    pub const SNAKE_HEAD: Color = [0.290, 0.871, 0.502, 1.0];
    pub const SNAKE_BODY: Color = [0.133, 0.773, 0.369, 1.0];
    pub const FOOD: Color = [0.937, 0.267, 0.267, 1.0];

    /// I, O, T, S, Z, J, L
    pub const TETROMINOES: [Color; 7] = [
        [0.024, 0.714, 0.831, 1.0],
        [0.918, 0.702, 0.031, 1.0],
        [0.659, 0.333, 0.969, 1.0],
        [0.133, 0.773, 0.369, 1.0],
        [0.937, 0.267, 0.267, 1.0],
        [0.231, 0.510, 0.965, 1.0],
        [0.976, 0.451, 0.086, 1.0],
    ];
    pub const GHOST: Color = [1.0, 1.0, 1.0, 0.12];
    pub const PANEL: Color = [1.0, 1.0, 1.0, 0.03];
}
