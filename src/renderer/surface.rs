//! Drawing target abstraction
//!
//! The scene is described in 800×400 logical units with y pointing down.
//! Shapes are filled with straight-alpha colors; text is collected as lines
//! for the host to lay out (the GPU pipeline has no font rasterizer).

use glam::Vec2;

pub type Color = [f32; 4];

/// Horizontal anchor of a text line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A line of text anchored at its baseline
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub pos: Vec2,
    /// Font size in logical units
    pub size: f32,
    pub color: Color,
    pub align: Align,
}

impl TextLine {
    pub fn new(text: impl Into<String>, x: f32, y: f32, size: f32, color: Color, align: Align) -> Self {
        Self {
            text: text.into(),
            pos: Vec2::new(x, y),
            size,
            color,
            align,
        }
    }
}

pub trait Surface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color);

    /// Upper half of a disc (flat side down)
    fn fill_half_disc(&mut self, center: Vec2, radius: f32, color: Color);

    fn text(&mut self, line: TextLine);
}
