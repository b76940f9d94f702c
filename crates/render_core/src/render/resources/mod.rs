//! Resource management
//!
//! [`ResourceStore`] owns every shader, texture, camera and texture matrix the
//! render state can reference. The render state itself only remembers typed
//! ids. Ids are slotmap keys, so an id of a destroyed resource never compares
//! equal to the id of a resource created later in the same slot.

pub mod material;
pub mod shader;
pub mod texture;

pub use material::Material;
pub use shader::Shader;
pub use texture::Texture;

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Mat4;
use crate::render::primitives::Camera;
use crate::render::{RenderError, RenderResult};

new_key_type! {
    /// Handle to a shader owned by a [`ResourceStore`]
    pub struct ShaderId;
    /// Handle to a texture owned by a [`ResourceStore`]
    pub struct TextureId;
    /// Handle to a camera owned by a [`ResourceStore`]
    pub struct CameraId;
    /// Handle to a texture matrix owned by a [`ResourceStore`]
    pub struct MatrixId;
}

/// Any resource id, used when invalidating cached references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// A shader
    Shader(ShaderId),
    /// A texture
    Texture(TextureId),
    /// A camera
    Camera(CameraId),
    /// A texture matrix
    Matrix(MatrixId),
}

impl From<ShaderId> for ResourceId {
    fn from(id: ShaderId) -> Self {
        Self::Shader(id)
    }
}

impl From<TextureId> for ResourceId {
    fn from(id: TextureId) -> Self {
        Self::Texture(id)
    }
}

impl From<CameraId> for ResourceId {
    fn from(id: CameraId) -> Self {
        Self::Camera(id)
    }
}

impl From<MatrixId> for ResourceId {
    fn from(id: MatrixId) -> Self {
        Self::Matrix(id)
    }
}

/// Arena owning the resources the render state observes
#[derive(Debug, Default)]
pub struct ResourceStore {
    shaders: SlotMap<ShaderId, Shader>,
    textures: SlotMap<TextureId, Texture>,
    cameras: SlotMap<CameraId, Camera>,
    matrices: SlotMap<MatrixId, Mat4>,
}

impl ResourceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a shader
    pub fn add_shader(&mut self, shader: Shader) -> ShaderId {
        self.shaders.insert(shader)
    }

    /// Take ownership of a texture
    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.insert(texture)
    }

    /// Take ownership of a camera
    pub fn add_camera(&mut self, camera: Camera) -> CameraId {
        self.cameras.insert(camera)
    }

    /// Take ownership of a texture matrix
    pub fn add_texture_matrix(&mut self, matrix: Mat4) -> MatrixId {
        self.matrices.insert(matrix)
    }

    /// Look up a shader
    pub fn shader(&self, id: ShaderId) -> RenderResult<&Shader> {
        self.shaders
            .get(id)
            .ok_or(RenderError::ResourceNotFound { kind: "shader" })
    }

    /// Look up a texture
    pub fn texture(&self, id: TextureId) -> RenderResult<&Texture> {
        self.textures
            .get(id)
            .ok_or(RenderError::ResourceNotFound { kind: "texture" })
    }

    /// Look up a camera
    pub fn camera(&self, id: CameraId) -> RenderResult<&Camera> {
        self.cameras
            .get(id)
            .ok_or(RenderError::ResourceNotFound { kind: "camera" })
    }

    /// Mutable camera access; `RenderContext::update_camera` keeps the render
    /// state in step with the change
    pub(crate) fn camera_mut(&mut self, id: CameraId) -> RenderResult<&mut Camera> {
        self.cameras
            .get_mut(id)
            .ok_or(RenderError::ResourceNotFound { kind: "camera" })
    }

    /// Look up a texture matrix
    pub fn texture_matrix(&self, id: MatrixId) -> RenderResult<&Mat4> {
        self.matrices
            .get(id)
            .ok_or(RenderError::ResourceNotFound { kind: "texture matrix" })
    }

    /// Mutable texture matrix access; see `RenderContext::update_texture_matrix`
    pub(crate) fn texture_matrix_mut(&mut self, id: MatrixId) -> RenderResult<&mut Mat4> {
        self.matrices
            .get_mut(id)
            .ok_or(RenderError::ResourceNotFound { kind: "texture matrix" })
    }

    /// Whether the id still refers to a live resource
    pub fn contains(&self, id: impl Into<ResourceId>) -> bool {
        match id.into() {
            ResourceId::Shader(id) => self.shaders.contains_key(id),
            ResourceId::Texture(id) => self.textures.contains_key(id),
            ResourceId::Camera(id) => self.cameras.contains_key(id),
            ResourceId::Matrix(id) => self.matrices.contains_key(id),
        }
    }

    /// Drop a resource. Callers holding a render state must also release the
    /// id there; `RenderContext::destroy_resource` does both.
    pub(crate) fn remove(&mut self, id: ResourceId) -> bool {
        match id {
            ResourceId::Shader(id) => self.shaders.remove(id).is_some(),
            ResourceId::Texture(id) => self.textures.remove(id).is_some(),
            ResourceId::Camera(id) => self.cameras.remove(id).is_some(),
            ResourceId::Matrix(id) => self.matrices.remove(id).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::api::{ProgramId, TextureName};

    #[test]
    fn test_removed_ids_are_never_reused() {
        let mut store = ResourceStore::new();
        let first = store.add_texture(Texture::new(TextureName(1), 4, 4));
        assert!(store.remove(first.into()));

        let second = store.add_texture(Texture::new(TextureName(1), 4, 4));
        assert_ne!(first, second);
        assert!(!store.contains(first));
        assert!(matches!(
            store.texture(first),
            Err(RenderError::ResourceNotFound { kind: "texture" })
        ));
    }

    #[test]
    fn test_lookup() {
        let mut store = ResourceStore::new();
        let shader = store.add_shader(Shader::new(ProgramId(9)));
        assert_eq!(store.shader(shader).map(Shader::program).ok(), Some(ProgramId(9)));
        assert!(!store.remove(ResourceId::Camera(CameraId::default())));
    }
}
