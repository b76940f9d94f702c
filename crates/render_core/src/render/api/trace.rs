//! Recording implementation of the graphics API
//!
//! [`TraceApi`] executes nothing. Every call is appended to a shared
//! [`CallLog`] and echoed at `trace` level, which makes it usable both as a
//! headless backend and for asserting exactly which commands a sequence of
//! state changes produced.

use std::cell::RefCell;
use std::rc::Rc;

use super::graphics_api::{
    AttributeLocation, BlendFactor, Capability, ClearMask, ClientArray, GraphicsApi, MatrixMode,
    Primitive, ProgramId, TextureName, TextureUnit, UniformLocation,
};
use crate::foundation::math::Mat4;

/// One recorded graphics call
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum ApiCall {
    Enable(Capability),
    Disable(Capability),
    EnableClientState(ClientArray),
    DisableClientState(ClientArray),
    BlendFunc(BlendFactor, BlendFactor),
    BlendFuncSeparate(BlendFactor, BlendFactor, BlendFactor, BlendFactor),
    MatrixMode(MatrixMode),
    LoadMatrix(Mat4),
    MultMatrix(Mat4),
    PushMatrix,
    PopMatrix,
    UseProgram(ProgramId),
    EnableVertexAttribArray(AttributeLocation),
    ActiveTexture(TextureUnit),
    BindTexture(TextureName),
    UniformMatrix4(UniformLocation, Mat4),
    Uniform4f(UniformLocation, [f32; 4]),
    Uniform1i(UniformLocation, i32),
    Viewport { x: i32, y: i32, width: u32, height: u32 },
    ClearColour([f32; 4]),
    Clear(ClearMask),
    DrawArrays { primitive: Primitive, first: u32, count: u32 },
}

/// Shared, cloneable view of the calls a [`TraceApi`] recorded
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<ApiCall>>>,
}

impl CallLog {
    /// Copy of every call recorded so far, oldest first
    pub fn snapshot(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn push(&self, call: ApiCall) {
        log::trace!("gpu: {:?}", call);
        self.calls.borrow_mut().push(call);
    }
}

/// Graphics API that records instead of executing
#[derive(Debug, Default)]
pub struct TraceApi {
    log: CallLog,
}

impl TraceApi {
    /// Create a recorder with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the recorded calls; stays valid after the recorder is boxed
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl GraphicsApi for TraceApi {
    fn enable(&mut self, capability: Capability) {
        self.log.push(ApiCall::Enable(capability));
    }

    fn disable(&mut self, capability: Capability) {
        self.log.push(ApiCall::Disable(capability));
    }

    fn enable_client_state(&mut self, array: ClientArray) {
        self.log.push(ApiCall::EnableClientState(array));
    }

    fn disable_client_state(&mut self, array: ClientArray) {
        self.log.push(ApiCall::DisableClientState(array));
    }

    fn blend_func(&mut self, source: BlendFactor, destination: BlendFactor) {
        self.log.push(ApiCall::BlendFunc(source, destination));
    }

    fn blend_func_separate(
        &mut self,
        source_rgb: BlendFactor,
        destination_rgb: BlendFactor,
        source_alpha: BlendFactor,
        destination_alpha: BlendFactor,
    ) {
        self.log.push(ApiCall::BlendFuncSeparate(
            source_rgb,
            destination_rgb,
            source_alpha,
            destination_alpha,
        ));
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.log.push(ApiCall::MatrixMode(mode));
    }

    fn load_matrix(&mut self, matrix: &Mat4) {
        self.log.push(ApiCall::LoadMatrix(*matrix));
    }

    fn mult_matrix(&mut self, matrix: &Mat4) {
        self.log.push(ApiCall::MultMatrix(*matrix));
    }

    fn push_matrix(&mut self) {
        self.log.push(ApiCall::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        self.log.push(ApiCall::PopMatrix);
    }

    fn use_program(&mut self, program: ProgramId) {
        self.log.push(ApiCall::UseProgram(program));
    }

    fn enable_vertex_attrib_array(&mut self, location: AttributeLocation) {
        self.log.push(ApiCall::EnableVertexAttribArray(location));
    }

    fn active_texture(&mut self, unit: TextureUnit) {
        self.log.push(ApiCall::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, texture: TextureName) {
        self.log.push(ApiCall::BindTexture(texture));
    }

    fn uniform_matrix4(&mut self, location: UniformLocation, matrix: &Mat4) {
        self.log.push(ApiCall::UniformMatrix4(location, *matrix));
    }

    fn uniform4f(&mut self, location: UniformLocation, value: [f32; 4]) {
        self.log.push(ApiCall::Uniform4f(location, value));
    }

    fn uniform1i(&mut self, location: UniformLocation, value: i32) {
        self.log.push(ApiCall::Uniform1i(location, value));
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.log.push(ApiCall::Viewport { x, y, width, height });
    }

    fn clear_colour(&mut self, colour: [f32; 4]) {
        self.log.push(ApiCall::ClearColour(colour));
    }

    fn clear(&mut self, mask: ClearMask) {
        self.log.push(ApiCall::Clear(mask));
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32) {
        self.log.push(ApiCall::DrawArrays { primitive, first, count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_survives_boxing() {
        let api = TraceApi::new();
        let log = api.log();
        let mut boxed: Box<dyn GraphicsApi> = Box::new(api);

        boxed.enable(Capability::Blend);
        boxed.clear(ClearMask::COLOUR | ClearMask::DEPTH);

        assert_eq!(
            log.snapshot(),
            vec![
                ApiCall::Enable(Capability::Blend),
                ApiCall::Clear(ClearMask::COLOUR | ClearMask::DEPTH),
            ]
        );
    }

    #[test]
    fn test_count_and_clear() {
        let mut api = TraceApi::new();
        let log = api.log();
        api.bind_texture(TextureName(3));
        api.bind_texture(TextureName(4));
        api.active_texture(TextureUnit(1));

        assert_eq!(log.count(|c| matches!(c, ApiCall::BindTexture(_))), 2);
        log.clear();
        assert!(log.is_empty());
    }
}
