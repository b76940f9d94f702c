//! Renderers
//!
//! A [`Renderer`] turns a mesh into draw calls through the render state.
//! The render context only observes its renderer, so the same renderer can
//! be shared by several contexts or swapped out at runtime.

use crate::foundation::math::Mat4;
use crate::render::api::BlendFactor;
use crate::render::primitives::Mesh;
use crate::render::resources::ResourceStore;
use crate::render::state::{PipelineKind, RenderState};
use crate::render::{RenderError, RenderResult};

/// Draws meshes through a [`RenderState`]
pub trait Renderer {
    /// Draw `mesh` with the model transform `transform`
    fn draw_mesh(
        &mut self,
        state: &mut RenderState,
        resources: &ResourceStore,
        mesh: &Mesh,
        transform: &Mat4,
    ) -> RenderResult<()>;
}

/// Single-pass renderer drawing each mesh as it arrives
#[derive(Debug, Default)]
pub struct ForwardRenderer {
    draws: u64,
}

impl ForwardRenderer {
    /// Create a renderer with no draws recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls issued so far
    pub fn draw_count(&self) -> u64 {
        self.draws
    }
}

impl Renderer for ForwardRenderer {
    fn draw_mesh(
        &mut self,
        state: &mut RenderState,
        resources: &ResourceStore,
        mesh: &Mesh,
        transform: &Mat4,
    ) -> RenderResult<()> {
        let material = &mesh.material;

        match mesh.shader {
            Some(shader) => state.bind_shader(resources, shader)?,
            None if state.pipeline() == PipelineKind::FixedFunction => state.unbind_shader(),
            None => return Err(RenderError::NoShaderBound),
        }

        state.set_texturing_enabled(material.texture_count() > 0);
        state.set_alpha_blending_enabled(material.is_alpha_blended());
        if material.is_alpha_blended() {
            state.set_blending_function(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
        }
        state.update_textures(resources, material)?;

        match state.pipeline() {
            PipelineKind::Programmable => {
                state.update_uniforms(resources, material, transform)?;
                state
                    .frame()
                    .draw_arrays(mesh.primitive, mesh.first, mesh.vertex_count);
            }
            PipelineKind::FixedFunction => {
                if mesh.shader.is_some() {
                    state.update_uniforms(resources, material, transform)?;
                }
                let mut frame = state.frame();
                frame.push_matrix();
                frame.mult_matrix(transform);
                frame.draw_arrays(mesh.primitive, mesh.first, mesh.vertex_count);
                frame.pop_matrix();
            }
        }

        self.draws += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::api::{ApiCall, Capability, Primitive, ProgramId, TextureName, TraceApi};
    use crate::render::resources::{Material, Shader, Texture};

    #[test]
    fn test_programmable_draw_sequence() {
        let mut resources = ResourceStore::new();
        let shader = resources.add_shader(
            Shader::new(ProgramId(4))
                .with_attribute("a_position", 0)
                .with_uniform("u_mvp", 0),
        );
        let api = TraceApi::new();
        let log = api.log();
        let mut state = RenderState::new(PipelineKind::Programmable, Box::new(api));
        let mut renderer = ForwardRenderer::new();
        let mesh = Mesh::new(Some(shader), Material::new(), 36);

        renderer
            .draw_mesh(&mut state, &resources, &mesh, &Mat4::identity())
            .unwrap();
        renderer
            .draw_mesh(&mut state, &resources, &mesh, &Mat4::identity())
            .unwrap();

        assert_eq!(renderer.draw_count(), 2);
        assert_eq!(log.count(|c| matches!(c, ApiCall::UseProgram(_))), 1);
        assert_eq!(
            log.count(|c| *c
                == ApiCall::DrawArrays {
                    primitive: Primitive::Triangles,
                    first: 0,
                    count: 36
                }),
            2
        );
    }

    #[test]
    fn test_fixed_function_draw_wraps_transform() {
        let mut resources = ResourceStore::new();
        let texture = resources.add_texture(Texture::new(TextureName(2), 16, 16));
        let material = Material::new().with_texture(texture).with_alpha_blending(true);
        let api = TraceApi::new();
        let log = api.log();
        let mut state = RenderState::new(PipelineKind::FixedFunction, Box::new(api));
        let transform = Mat4::new_scaling(2.0);

        ForwardRenderer::new()
            .draw_mesh(&mut state, &resources, &Mesh::new(None, material, 3), &transform)
            .unwrap();

        let calls = log.snapshot();
        assert!(calls.contains(&ApiCall::Enable(Capability::Texture2D)));
        assert!(calls.contains(&ApiCall::Enable(Capability::Blend)));
        assert_eq!(
            &calls[calls.len() - 4..],
            &[
                ApiCall::PushMatrix,
                ApiCall::MultMatrix(transform),
                ApiCall::DrawArrays {
                    primitive: Primitive::Triangles,
                    first: 0,
                    count: 3
                },
                ApiCall::PopMatrix,
            ]
        );
    }

    #[test]
    fn test_shaderless_mesh_unbinds_previous_program() {
        let mut resources = ResourceStore::new();
        let shader = resources.add_shader(Shader::new(ProgramId(7)).with_uniform("u_mvp", 0));
        let api = TraceApi::new();
        let log = api.log();
        let mut state = RenderState::new(PipelineKind::FixedFunction, Box::new(api));
        let mut renderer = ForwardRenderer::new();

        renderer
            .draw_mesh(&mut state, &resources, &Mesh::new(Some(shader), Material::new(), 3), &Mat4::identity())
            .unwrap();
        log.clear();
        renderer
            .draw_mesh(&mut state, &resources, &Mesh::new(None, Material::new(), 3), &Mat4::identity())
            .unwrap();

        assert_eq!(state.current_shader(), None);
        assert_eq!(log.snapshot().first(), Some(&ApiCall::UseProgram(ProgramId(0))));
        assert_eq!(log.count(|c| matches!(c, ApiCall::UseProgram(_))), 1);

        log.clear();
        renderer
            .draw_mesh(&mut state, &resources, &Mesh::new(None, Material::new(), 3), &Mat4::identity())
            .unwrap();
        assert_eq!(log.count(|c| matches!(c, ApiCall::UseProgram(_))), 0);
    }

    #[test]
    fn test_programmable_without_shader_fails() {
        let resources = ResourceStore::new();
        let mut state = RenderState::new(PipelineKind::Programmable, Box::new(TraceApi::new()));

        let result = ForwardRenderer::new().draw_mesh(
            &mut state,
            &resources,
            &Mesh::new(None, Material::new(), 3),
            &Mat4::identity(),
        );
        assert!(matches!(result, Err(RenderError::NoShaderBound)));
    }
}
