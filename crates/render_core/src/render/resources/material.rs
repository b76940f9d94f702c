//! Materials as seen by the render state
//!
//! A material contributes its texture slots to texture binding and is passed
//! through untouched to uniform updaters.

use super::TextureId;

/// Ordered texture slots plus the surface parameters updaters read
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    textures: Vec<TextureId>,
    colour: [f32; 4],
    alpha_blended: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            textures: Vec::new(),
            colour: [1.0, 1.0, 1.0, 1.0],
            alpha_blended: false,
        }
    }
}

impl Material {
    /// Opaque white material without textures
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a texture to the next free slot
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.textures.push(texture);
        self
    }

    /// Set the base colour
    pub fn with_colour(mut self, colour: [f32; 4]) -> Self {
        self.colour = colour;
        self
    }

    /// Mark the material as needing alpha blending
    pub fn with_alpha_blending(mut self, enabled: bool) -> Self {
        self.alpha_blended = enabled;
        self
    }

    /// Number of texture slots in use
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Texture in `slot`, if any
    pub fn texture(&self, slot: usize) -> Option<TextureId> {
        self.textures.get(slot).copied()
    }

    /// All texture slots, in unit order
    pub fn textures(&self) -> &[TextureId] {
        &self.textures
    }

    /// Base colour
    pub fn colour(&self) -> [f32; 4] {
        self.colour
    }

    /// Whether the material draws with alpha blending
    pub fn is_alpha_blended(&self) -> bool {
        self.alpha_blended
    }
}
