//! Programmable pipeline state

use crate::foundation::math::Mat4;
use crate::render::api::{AttributeLocation, GraphicsApi};
use crate::render::primitives::Camera;
use crate::render::resources::Shader;

use super::attributes::{AttributeSlots, ShaderBinding, VertexAttribute};
use super::pipeline::{PipelineKind, PipelineState};

/// Attribute slots of the shader pipeline
///
/// Cameras and texture matrices are never uploaded here; the uniform
/// updaters read them from the render state when a draw is prepared.
#[derive(Debug, Default)]
pub struct ProgrammableState {
    slots: AttributeSlots,
}

impl ProgrammableState {
    /// Create with every slot unresolved
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently resolved slots
    pub fn slots(&self) -> &AttributeSlots {
        &self.slots
    }
}

impl PipelineState for ProgrammableState {
    fn kind(&self) -> PipelineKind {
        PipelineKind::Programmable
    }

    fn upload_camera(&mut self, _gpu: &mut dyn GraphicsApi, _camera: &Camera) {}

    fn upload_texture_matrix(&mut self, _gpu: &mut dyn GraphicsApi, _matrix: &Mat4) {}

    fn bind_attributes(&mut self, gpu: &mut dyn GraphicsApi, shader: &Shader) {
        self.slots = ShaderBinding::resolve(shader).slots();

        for (attribute, location) in self.slots.resolved() {
            log::trace!("{} bound to attribute {}", attribute.name(), location.0);
            gpu.enable_vertex_attrib_array(location);
        }
    }

    fn clear_attributes(&mut self) {
        self.slots.reset();
    }

    fn attribute_slot(&self, attribute: VertexAttribute) -> Option<AttributeLocation> {
        self.slots.get(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::api::{ApiCall, ProgramId, TraceApi};

    #[test]
    fn test_bind_enables_only_resolved_semantics() {
        let shader = Shader::new(ProgramId(3))
            .with_attribute("a_position", 0)
            .with_attribute("a_texCoord0", 2)
            .with_attribute("a_weights", 6);
        let mut api = TraceApi::new();
        let log = api.log();
        let mut state = ProgrammableState::new();

        state.bind_attributes(&mut api, &shader);

        assert_eq!(
            log.snapshot(),
            vec![
                ApiCall::EnableVertexAttribArray(AttributeLocation(0)),
                ApiCall::EnableVertexAttribArray(AttributeLocation(2)),
            ]
        );
        assert_eq!(state.attribute_slot(VertexAttribute::TexCoord0), Some(AttributeLocation(2)));
        assert_eq!(state.attribute_slot(VertexAttribute::Normal), None);
    }

    #[test]
    fn test_camera_upload_is_deferred() {
        let mut api = TraceApi::new();
        let log = api.log();
        let mut state = ProgrammableState::new();

        state.upload_camera(&mut api, &Camera::default());
        state.upload_texture_matrix(&mut api, &Mat4::identity());

        assert!(log.is_empty());
    }
}
