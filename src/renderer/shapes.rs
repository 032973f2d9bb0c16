//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::surface::{Color, Surface, TextLine};
use super::vertex::Vertex;

/// Segments used for half discs
const HALF_DISC_SEGMENTS: u32 = 12;

/// Generate vertices for an axis-aligned rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: Color) -> [Vertex; 6] {
    let (x1, y1) = (x + w, y + h);
    [
        Vertex::new(x, y, color),
        Vertex::new(x1, y, color),
        Vertex::new(x, y1, color),
        Vertex::new(x, y1, color),
        Vertex::new(x1, y, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for the upper half of a filled circle
pub fn half_disc(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        // From the left end (π) to the right end (2π); y grows downward so
        // sin is negative over this range, i.e. above the center
        let theta1 = PI + (i as f32 / segments as f32) * PI;
        let theta2 = PI + ((i + 1) as f32 / segments as f32) * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Surface that triangulates every draw call into one vertex list.
/// Text is kept aside for the DOM overlay.
#[derive(Debug, Default)]
pub struct VertexSurface {
    pub vertices: Vec<Vertex>,
    pub text: Vec<TextLine>,
}

impl VertexSurface {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(4096),
            text: Vec::new(),
        }
    }

    /// Drop the previous frame, keeping allocations
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.text.clear();
    }
}

impl Surface for VertexSurface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.vertices.extend_from_slice(&rect(x, y, w, h, color));
    }

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        self.vertices.push(Vertex::new(a.x, a.y, color));
        self.vertices.push(Vertex::new(b.x, b.y, color));
        self.vertices.push(Vertex::new(c.x, c.y, color));
    }

    fn fill_half_disc(&mut self, center: Vec2, radius: f32, color: Color) {
        self.vertices
            .extend(half_disc(center, radius, color, HALF_DISC_SEGMENTS));
    }

    fn text(&mut self, line: TextLine) {
        self.text.push(line);
    }
}
