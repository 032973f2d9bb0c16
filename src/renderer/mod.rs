//! Runner rendering
//!
//! `scene::render` turns the simulation state into draw calls on any
//! `Surface`. In the browser those calls are triangulated by
//! `VertexSurface` and drawn through a flat-color WebGPU pipeline; text
//! lines go to a DOM overlay.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{FrameView, render};
pub use shapes::VertexSurface;
pub use surface::{Align, Color, Surface, TextLine};
