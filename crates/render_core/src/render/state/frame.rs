//! Frame-level commands
//!
//! [`FrameCommands`] exposes the part of the command surface that carries no
//! cached state: viewport, clearing, draws and matrix push/pop. Toggles,
//! programs and texture bindings stay behind [`super::RenderState`].

use crate::foundation::math::Mat4;
use crate::render::api::{ClearMask, GraphicsApi, Primitive};

/// Borrowed handle for commands the render state does not track
pub struct FrameCommands<'a> {
    gpu: &'a mut dyn GraphicsApi,
}

impl<'a> FrameCommands<'a> {
    pub(crate) fn new(gpu: &'a mut dyn GraphicsApi) -> Self {
        Self { gpu }
    }

    /// Set the viewport rectangle
    pub fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.gpu.viewport(x, y, width, height);
    }

    /// Set the clear colour
    pub fn clear_colour(&mut self, colour: [f32; 4]) {
        self.gpu.clear_colour(colour);
    }

    /// Clear the buffers in `mask`
    pub fn clear(&mut self, mask: ClearMask) {
        self.gpu.clear(mask);
    }

    /// Push the current matrix stack
    pub fn push_matrix(&mut self) {
        self.gpu.push_matrix();
    }

    /// Multiply the top of the current matrix stack by `matrix`
    pub fn mult_matrix(&mut self, matrix: &Mat4) {
        self.gpu.mult_matrix(matrix);
    }

    /// Pop the current matrix stack
    pub fn pop_matrix(&mut self) {
        self.gpu.pop_matrix();
    }

    /// Draw `count` vertices starting at `first`
    pub fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32) {
        self.gpu.draw_arrays(primitive, first, count);
    }
}
