//! Pipeline variants
//!
//! The fixed-function and programmable pipelines differ in how cameras and
//! texture matrices reach the GPU and in how vertex attributes are enabled.
//! Everything else is shared by [`super::RenderState`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::math::Mat4;
use crate::render::api::{AttributeLocation, ClientArray, GraphicsApi};
use crate::render::context::RenderableType;
use crate::render::primitives::Camera;
use crate::render::resources::Shader;
use crate::render::{RenderError, RenderResult};

use super::attributes::VertexAttribute;

/// Which pipeline a render state drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    /// Matrix stacks and client arrays
    FixedFunction,
    /// Shader programs fed through uniforms
    #[default]
    Programmable,
}

impl PipelineKind {
    /// Client API version requested when creating the native context
    pub const fn client_version(self) -> u32 {
        match self {
            PipelineKind::FixedFunction => 1,
            PipelineKind::Programmable => 2,
        }
    }

    /// Renderable bits a framebuffer config must support
    pub fn renderable_type(self) -> RenderableType {
        match self {
            PipelineKind::FixedFunction => RenderableType::empty(),
            PipelineKind::Programmable => RenderableType::OPENGL_ES2,
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineKind::FixedFunction => write!(f, "fixed-function"),
            PipelineKind::Programmable => write!(f, "programmable"),
        }
    }
}

/// Pipeline-specific half of the render state
pub trait PipelineState: fmt::Debug {
    /// Which variant this is
    fn kind(&self) -> PipelineKind;

    /// Called when a new camera becomes current
    fn upload_camera(&mut self, gpu: &mut dyn GraphicsApi, camera: &Camera);

    /// Called when a new texture matrix becomes current
    fn upload_texture_matrix(&mut self, gpu: &mut dyn GraphicsApi, matrix: &Mat4);

    /// Enable the vertex attributes of a freshly bound shader
    fn bind_attributes(&mut self, gpu: &mut dyn GraphicsApi, shader: &Shader);

    /// Forget attributes resolved for the current shader
    fn clear_attributes(&mut self);

    /// Forget everything cached for the native context
    fn reset(&mut self) {
        self.clear_attributes();
    }

    /// Resolved location of `attribute` for the current shader
    fn attribute_slot(&self, attribute: VertexAttribute) -> Option<AttributeLocation>;

    /// Toggle a client-side vertex array
    fn set_client_array_enabled(
        &mut self,
        _gpu: &mut dyn GraphicsApi,
        _array: ClientArray,
        _enabled: bool,
    ) -> RenderResult<()> {
        Err(RenderError::UnsupportedByPipeline {
            operation: "set_client_array_enabled",
            pipeline: self.kind(),
        })
    }

    /// Cached state of a client-side vertex array
    fn is_client_array_enabled(&self, _array: ClientArray) -> bool {
        false
    }
}

/// Build the pipeline variant for `kind`
pub fn for_kind(kind: PipelineKind) -> Box<dyn PipelineState> {
    match kind {
        PipelineKind::FixedFunction => Box::new(super::FixedFunctionState::new()),
        PipelineKind::Programmable => Box::new(super::ProgrammableState::new()),
    }
}
