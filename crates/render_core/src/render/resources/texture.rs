//! Texture descriptions
//!
//! Decoding and upload happen elsewhere; the render state only needs the
//! native name to bind.

use crate::render::api::TextureName;

/// A texture already uploaded to the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    name: TextureName,
    width: u32,
    height: u32,
}

impl Texture {
    /// Describe an uploaded texture
    pub fn new(name: TextureName, width: u32, height: u32) -> Self {
        Self { name, width, height }
    }

    /// Native texture name
    pub fn name(&self) -> TextureName {
        self.name
    }

    /// Size in texels
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
