//! Texture unit binding cache

use crate::render::api::{GraphicsApi, TextureUnit};
use crate::render::resources::{Material, ResourceStore, TextureId};
use crate::render::RenderResult;

/// Last texture bound on each unit and the last activated unit
#[derive(Debug, Default, Clone)]
pub struct TextureBindingCache {
    active_unit: Option<TextureUnit>,
    bound: Vec<Option<TextureId>>,
}

impl TextureBindingCache {
    /// Create an empty cache; nothing is assumed bound
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every texture of `material` to the unit matching its slot
    ///
    /// Units already holding the right texture are skipped. A unit is only
    /// activated when it differs from the last activated one.
    pub fn apply(
        &mut self,
        gpu: &mut dyn GraphicsApi,
        resources: &ResourceStore,
        material: &Material,
    ) -> RenderResult<()> {
        for (slot, texture) in material.textures().iter().enumerate() {
            if self.bound_on(slot) == Some(*texture) {
                continue;
            }

            let name = resources.texture(*texture)?.name();
            let unit = TextureUnit(u32::try_from(slot).unwrap_or(u32::MAX));

            if self.active_unit != Some(unit) {
                gpu.active_texture(unit);
                self.active_unit = Some(unit);
            }
            gpu.bind_texture(name);

            if self.bound.len() <= slot {
                self.bound.resize(slot + 1, None);
            }
            self.bound[slot] = Some(*texture);
        }
        Ok(())
    }

    /// Texture last bound on unit `slot`
    pub fn bound_on(&self, slot: usize) -> Option<TextureId> {
        self.bound.get(slot).copied().flatten()
    }

    /// Last activated unit
    pub fn active_unit(&self) -> Option<TextureUnit> {
        self.active_unit
    }

    /// Drop every unit's reference to `texture`
    pub fn forget(&mut self, texture: TextureId) {
        for bound in self.bound.iter_mut().filter(|bound| **bound == Some(texture)) {
            *bound = None;
        }
    }

    /// Forget all bindings
    pub fn reset(&mut self) {
        self.active_unit = None;
        self.bound.clear();
    }
}
