//! Render state cache
//!
//! [`RenderState`] mirrors the GPU state that matters between draws so that
//! redundant driver calls are never issued. Toggles are only sent on a real
//! transition, shaders and cameras only when they change, and textures only
//! when a unit does not already hold them. The pipeline-specific half lives
//! behind [`PipelineState`].

pub mod attributes;
pub mod fixed_function;
pub mod frame;
pub mod pipeline;
pub mod programmable;
pub mod textures;
pub mod uniforms;
pub mod updaters;

pub use attributes::{AttributeSlots, ShaderBinding, VertexAttribute};
pub use fixed_function::FixedFunctionState;
pub use frame::FrameCommands;
pub use pipeline::{PipelineKind, PipelineState};
pub use programmable::ProgrammableState;
pub use textures::TextureBindingCache;
pub use uniforms::{FnUpdater, UniformInputs, UniformName, UniformRegistry, UniformUpdater};

use crate::foundation::math::Mat4;
use crate::render::api::{
    AttributeLocation, BlendFactor, Capability, ClientArray, GraphicsApi, ProgramId,
};
use crate::render::resources::{CameraId, Material, MatrixId, ResourceId, ResourceStore, ShaderId};
use crate::render::{RenderError, RenderResult};

/// Cached GPU state shared by both pipelines
pub struct RenderState {
    gpu: Box<dyn GraphicsApi>,
    pipeline: Box<dyn PipelineState>,
    texturing: bool,
    alpha_blending: bool,
    current_shader: Option<ShaderId>,
    camera: Option<CameraId>,
    texture_matrix: Option<MatrixId>,
    textures: TextureBindingCache,
    uniforms: UniformRegistry,
}

impl std::fmt::Debug for RenderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderState")
            .field("pipeline", &self.pipeline)
            .field("texturing", &self.texturing)
            .field("alpha_blending", &self.alpha_blending)
            .field("current_shader", &self.current_shader)
            .field("camera", &self.camera)
            .field("texture_matrix", &self.texture_matrix)
            .field("textures", &self.textures)
            .field("uniforms", &self.uniforms)
            .finish_non_exhaustive()
    }
}

impl RenderState {
    /// Create a state cache for `kind`, issuing commands through `gpu`
    ///
    /// The standard uniform updaters are registered up front.
    pub fn new(kind: PipelineKind, gpu: Box<dyn GraphicsApi>) -> Self {
        Self::with_pipeline(pipeline::for_kind(kind), gpu)
    }

    /// Create a state cache around an explicit pipeline variant
    pub fn with_pipeline(pipeline: Box<dyn PipelineState>, gpu: Box<dyn GraphicsApi>) -> Self {
        log::debug!("Creating {} render state", pipeline.kind());
        Self {
            gpu,
            pipeline,
            texturing: false,
            alpha_blending: false,
            current_shader: None,
            camera: None,
            texture_matrix: None,
            textures: TextureBindingCache::new(),
            uniforms: UniformRegistry::standard(),
        }
    }

    /// Pipeline this state drives
    pub fn pipeline(&self) -> PipelineKind {
        self.pipeline.kind()
    }

    /// Commands that carry no cached state
    pub fn frame(&mut self) -> FrameCommands<'_> {
        FrameCommands::new(self.gpu.as_mut())
    }

    /// Unrestricted access, for untracked state such as the scissor test
    pub(crate) fn gpu(&mut self) -> &mut dyn GraphicsApi {
        self.gpu.as_mut()
    }

    /// Make `camera` current
    pub fn set_camera(&mut self, resources: &ResourceStore, camera: CameraId) -> RenderResult<()> {
        if self.camera == Some(camera) {
            return Ok(());
        }
        let value = resources.camera(camera)?;
        self.pipeline.upload_camera(self.gpu.as_mut(), value);
        self.camera = Some(camera);
        Ok(())
    }

    /// Make `matrix` the current texture matrix
    pub fn set_texture_matrix(
        &mut self,
        resources: &ResourceStore,
        matrix: MatrixId,
    ) -> RenderResult<()> {
        if self.texture_matrix == Some(matrix) {
            return Ok(());
        }
        let value = resources.texture_matrix(matrix)?;
        self.pipeline.upload_texture_matrix(self.gpu.as_mut(), value);
        self.texture_matrix = Some(matrix);
        Ok(())
    }

    /// Enable or disable 2D texturing
    pub fn set_texturing_enabled(&mut self, enabled: bool) {
        Self::toggle(self.gpu.as_mut(), &mut self.texturing, Capability::Texture2D, enabled);
    }

    /// Enable or disable alpha blending
    pub fn set_alpha_blending_enabled(&mut self, enabled: bool) {
        Self::toggle(self.gpu.as_mut(), &mut self.alpha_blending, Capability::Blend, enabled);
    }

    fn toggle(gpu: &mut dyn GraphicsApi, cached: &mut bool, capability: Capability, enabled: bool) {
        if *cached == enabled {
            return;
        }
        if enabled {
            gpu.enable(capability);
        } else {
            gpu.disable(capability);
        }
        *cached = enabled;
    }

    /// Enable or disable a client-side vertex array (fixed-function only)
    pub fn set_client_array_enabled(&mut self, array: ClientArray, enabled: bool) -> RenderResult<()> {
        self.pipeline
            .set_client_array_enabled(self.gpu.as_mut(), array, enabled)
    }

    /// Set the blend function for colour and alpha
    pub fn set_blending_function(&mut self, source: BlendFactor, destination: BlendFactor) {
        self.gpu.blend_func(source, destination);
    }

    /// Set separate blend functions for colour and alpha
    pub fn set_full_blending_function(
        &mut self,
        source_rgb: BlendFactor,
        destination_rgb: BlendFactor,
        source_alpha: BlendFactor,
        destination_alpha: BlendFactor,
    ) {
        self.gpu
            .blend_func_separate(source_rgb, destination_rgb, source_alpha, destination_alpha);
    }

    /// Register `updater` for `name`, returning the updater it replaced
    pub fn add_uniform_updater(
        &mut self,
        name: impl Into<UniformName>,
        updater: Box<dyn UniformUpdater>,
    ) -> Option<Box<dyn UniformUpdater>> {
        self.uniforms.register(name, updater)
    }

    /// Make `shader` the current program and enable its attributes
    pub fn bind_shader(&mut self, resources: &ResourceStore, shader: ShaderId) -> RenderResult<()> {
        if self.current_shader == Some(shader) {
            return Ok(());
        }
        let program = resources.shader(shader)?;
        self.gpu.use_program(program.program());
        self.pipeline.bind_attributes(self.gpu.as_mut(), program);
        self.current_shader = Some(shader);
        Ok(())
    }

    /// Return to the fixed-function program
    ///
    /// Nothing is issued when no shader is current.
    pub fn unbind_shader(&mut self) {
        if self.current_shader.take().is_some() {
            self.gpu.use_program(ProgramId(0));
            self.pipeline.clear_attributes();
        }
    }

    /// Upload every uniform the current shader declares
    ///
    /// # Errors
    ///
    /// [`RenderError::NoShaderBound`] without a current shader,
    /// [`RenderError::MissingUniformUpdaters`] when
    /// some declared uniforms have no updater. In the latter case all other
    /// uniforms have still been uploaded.
    pub fn update_uniforms(
        &mut self,
        resources: &ResourceStore,
        material: &Material,
        transform: &Mat4,
    ) -> RenderResult<()> {
        let shader = self
            .current_shader
            .ok_or(RenderError::NoShaderBound)?;
        let shader = resources.shader(shader)?;
        let camera = self.camera.map(|id| resources.camera(id)).transpose()?;
        let texture_matrix = self
            .texture_matrix
            .map(|id| resources.texture_matrix(id))
            .transpose()?;

        let inputs = UniformInputs {
            camera,
            texture_matrix,
            material,
            transform,
        };
        self.uniforms
            .dispatch(self.gpu.as_mut(), shader.uniforms(), &inputs)
    }

    /// Bind the material's textures to their units
    pub fn update_textures(&mut self, resources: &ResourceStore, material: &Material) -> RenderResult<()> {
        self.textures.apply(self.gpu.as_mut(), resources, material)
    }

    /// Drop cached references to a resource its owner destroyed
    pub fn release(&mut self, resource: impl Into<ResourceId>) {
        match resource.into() {
            ResourceId::Shader(id) => {
                if self.current_shader == Some(id) {
                    self.current_shader = None;
                    self.pipeline.clear_attributes();
                }
            }
            ResourceId::Texture(id) => self.textures.forget(id),
            ResourceId::Camera(id) => {
                if self.camera == Some(id) {
                    self.camera = None;
                }
            }
            ResourceId::Matrix(id) => {
                if self.texture_matrix == Some(id) {
                    self.texture_matrix = None;
                }
            }
        }
    }

    /// Forget all cached GPU state; used when a fresh native context is made
    /// current. Registered uniform updaters are kept.
    pub fn reset(&mut self) {
        self.texturing = false;
        self.alpha_blending = false;
        self.current_shader = None;
        self.camera = None;
        self.texture_matrix = None;
        self.textures.reset();
        self.pipeline.reset();
    }

    /// Cached texturing toggle
    pub fn is_texturing_enabled(&self) -> bool {
        self.texturing
    }

    /// Cached blending toggle
    pub fn is_alpha_blending_enabled(&self) -> bool {
        self.alpha_blending
    }

    /// Cached client array toggle; always false on the programmable pipeline
    pub fn is_client_array_enabled(&self, array: ClientArray) -> bool {
        self.pipeline.is_client_array_enabled(array)
    }

    /// Current shader
    pub fn current_shader(&self) -> Option<ShaderId> {
        self.current_shader
    }

    /// Current camera
    pub fn current_camera(&self) -> Option<CameraId> {
        self.camera
    }

    /// Current texture matrix
    pub fn current_texture_matrix(&self) -> Option<MatrixId> {
        self.texture_matrix
    }

    /// Resolved location of `attribute` for the current shader
    pub fn attribute_slot(&self, attribute: VertexAttribute) -> Option<AttributeLocation> {
        self.pipeline.attribute_slot(attribute)
    }

    /// Number of registered uniform updaters
    pub fn uniform_updater_count(&self) -> usize {
        self.uniforms.len()
    }

    /// Texture bindings per unit
    pub fn texture_bindings(&self) -> &TextureBindingCache {
        &self.textures
    }
}
