//! Vertex type and palette for 2D rendering

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

/// Colors for game elements (sRGB, straight alpha)
pub mod colors {
    /// `0xRRGGBB` to an opaque color
    pub const fn hex(rgb: u32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    /// CSS-style `rgba(r, g, b, a)`
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
    }

    pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }

    pub const BACKGROUND: [f32; 4] = hex(0x0a0a1a);

    // Theme
    pub const PRIMARY: [f32; 4] = hex(0x00d4ff);
    pub const GROUND_TOP: [f32; 4] = hex(0x1e3a5f);
    pub const GROUND_FILL: [f32; 4] = hex(0x0d1b2a);
    pub const DANGER: [f32; 4] = hex(0xff3366);
    pub const TEXT: [f32; 4] = hex(0xe8e8f0);
    pub const TEXT_DIM: [f32; 4] = hex(0x8a8aa0);

    // Player sprite
    pub const ARMOR: [f32; 4] = hex(0x0f71de);
    pub const ARMOR_LIGHT: [f32; 4] = hex(0x12d5cd);
    pub const SKIN: [f32; 4] = hex(0xf0b281);
    pub const BOOTS: [f32; 4] = hex(0x0a4fa0);

    // Obstacles
    pub const HARD_HAT: [f32; 4] = hex(0xffd700);
    pub const CRAWLER_FACE: [f32; 4] = hex(0x333333);
    pub const EYE_WHITE: [f32; 4] = hex(0xffffff);
    pub const EYE_PUPIL: [f32; 4] = hex(0x000000);
    pub const SPIKE: [f32; 4] = hex(0x888888);

    /// Skyline fill; alpha comes from the layer
    pub const BUILDING: [f32; 4] = rgba(30, 58, 95, 1.0);
    /// Lit windows; alpha is half the layer's
    pub const WINDOW: [f32; 4] = rgba(0, 212, 255, 1.0);
    pub const GROUND_PATTERN: [f32; 4] = rgba(30, 58, 95, 0.5);
    pub const OVERLAY: [f32; 4] = rgba(10, 10, 26, 1.0);
}
