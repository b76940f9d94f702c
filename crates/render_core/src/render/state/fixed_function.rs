//! Fixed-function pipeline state

use std::collections::HashSet;

use crate::foundation::math::{Mat4, Mat4Ext};
use crate::render::api::{AttributeLocation, ClientArray, GraphicsApi, MatrixMode};
use crate::render::primitives::Camera;
use crate::render::resources::Shader;
use crate::render::RenderResult;

use super::attributes::{ShaderBinding, VertexAttribute};
use super::pipeline::{PipelineKind, PipelineState};

/// Matrix stacks and client arrays of the legacy pipeline
#[derive(Debug, Default)]
pub struct FixedFunctionState {
    client_arrays: [bool; 3],
}

impl FixedFunctionState {
    /// Create with every client array disabled
    pub fn new() -> Self {
        Self::default()
    }
}

impl PipelineState for FixedFunctionState {
    fn kind(&self) -> PipelineKind {
        PipelineKind::FixedFunction
    }

    fn upload_camera(&mut self, gpu: &mut dyn GraphicsApi, camera: &Camera) {
        gpu.matrix_mode(MatrixMode::Projection);
        gpu.load_matrix(camera.projection_matrix());
        gpu.matrix_mode(MatrixMode::ModelView);
        gpu.load_matrix(&camera.view_matrix().to_native_handedness());
    }

    fn upload_texture_matrix(&mut self, gpu: &mut dyn GraphicsApi, matrix: &Mat4) {
        gpu.matrix_mode(MatrixMode::Texture);
        gpu.load_matrix(matrix);
        gpu.matrix_mode(MatrixMode::ModelView);
    }

    fn bind_attributes(&mut self, gpu: &mut dyn GraphicsApi, shader: &Shader) {
        let binding = ShaderBinding::resolve(shader);
        let mut enabled = HashSet::new();

        for (_, location) in binding.slots().resolved() {
            if enabled.insert(location) {
                gpu.enable_vertex_attrib_array(location);
            }
        }
        for location in binding.declared() {
            if enabled.insert(location) {
                gpu.enable_vertex_attrib_array(location);
            }
        }
    }

    fn clear_attributes(&mut self) {}

    fn reset(&mut self) {
        self.client_arrays = [false; 3];
    }

    fn attribute_slot(&self, _attribute: VertexAttribute) -> Option<AttributeLocation> {
        None
    }

    fn set_client_array_enabled(
        &mut self,
        gpu: &mut dyn GraphicsApi,
        array: ClientArray,
        enabled: bool,
    ) -> RenderResult<()> {
        let cached = &mut self.client_arrays[array.index()];
        if *cached != enabled {
            if enabled {
                gpu.enable_client_state(array);
            } else {
                gpu.disable_client_state(array);
            }
            *cached = enabled;
        }
        Ok(())
    }

    fn is_client_array_enabled(&self, array: ClientArray) -> bool {
        self.client_arrays[array.index()]
    }
}
