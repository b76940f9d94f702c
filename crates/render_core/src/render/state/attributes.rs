//! Semantic vertex attributes and their per-shader locations

use crate::render::api::AttributeLocation;
use crate::render::resources::Shader;

/// Vertex attribute semantics the engine knows by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    /// `a_position`
    Position,
    /// `a_colour`, also accepted as `a_color`
    Colour,
    /// `a_normal`
    Normal,
    /// `a_texCoord0`
    TexCoord0,
    /// `a_texCoord1`
    TexCoord1,
    /// `a_custom0`
    Custom0,
    /// `a_custom1`
    Custom1,
    /// `a_custom2`
    Custom2,
}

impl VertexAttribute {
    /// Every semantic, in slot order
    pub const ALL: [VertexAttribute; 8] = [
        VertexAttribute::Position,
        VertexAttribute::Colour,
        VertexAttribute::Normal,
        VertexAttribute::TexCoord0,
        VertexAttribute::TexCoord1,
        VertexAttribute::Custom0,
        VertexAttribute::Custom1,
        VertexAttribute::Custom2,
    ];

    /// Attribute name as declared in shader source
    pub const fn name(self) -> &'static str {
        match self {
            VertexAttribute::Position => "a_position",
            VertexAttribute::Colour => "a_colour",
            VertexAttribute::Normal => "a_normal",
            VertexAttribute::TexCoord0 => "a_texCoord0",
            VertexAttribute::TexCoord1 => "a_texCoord1",
            VertexAttribute::Custom0 => "a_custom0",
            VertexAttribute::Custom1 => "a_custom1",
            VertexAttribute::Custom2 => "a_custom2",
        }
    }

    const fn alias(self) -> Option<&'static str> {
        match self {
            VertexAttribute::Colour => Some("a_color"),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }

    /// Look up this semantic's location in `shader`
    pub fn locate(self, shader: &Shader) -> Option<AttributeLocation> {
        shader
            .attribute(self.name())
            .or_else(|| self.alias().and_then(|alias| shader.attribute(alias)))
    }
}

/// Resolved location of each semantic, `None` while unresolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeSlots([Option<AttributeLocation>; 8]);

impl AttributeSlots {
    /// Location of `attribute`, if resolved
    pub fn get(&self, attribute: VertexAttribute) -> Option<AttributeLocation> {
        self.0[attribute.index()]
    }

    /// Mark every slot unresolved
    pub fn reset(&mut self) {
        self.0 = [None; 8];
    }

    /// Iterate resolved slots in semantic order
    pub fn resolved(&self) -> impl Iterator<Item = (VertexAttribute, AttributeLocation)> + '_ {
        VertexAttribute::ALL
            .iter()
            .filter_map(move |attribute| self.get(*attribute).map(|location| (*attribute, location)))
    }

    /// Number of resolved slots
    pub fn resolved_count(&self) -> usize {
        self.0.iter().flatten().count()
    }
}

/// Attribute view of a shader at the moment it is bound
#[derive(Debug, Clone, Copy)]
pub struct ShaderBinding<'a> {
    shader: &'a Shader,
    slots: AttributeSlots,
}

impl<'a> ShaderBinding<'a> {
    /// Resolve all semantics against `shader`
    pub fn resolve(shader: &'a Shader) -> Self {
        let mut slots = AttributeSlots::default();
        for attribute in VertexAttribute::ALL {
            slots.0[attribute.index()] = attribute.locate(shader);
        }
        Self { shader, slots }
    }

    /// Resolved semantic slots
    pub fn slots(&self) -> AttributeSlots {
        self.slots
    }

    /// Every attribute the shader declares, including non-semantic ones
    pub fn declared(&self) -> impl Iterator<Item = AttributeLocation> + 'a {
        self.shader.attributes().iter().map(|(_, location)| *location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::api::ProgramId;

    #[test]
    fn test_resolve_semantics() {
        let shader = Shader::new(ProgramId(1))
            .with_attribute("a_position", 0)
            .with_attribute("a_color", 1)
            .with_attribute("a_texCoord0", 2)
            .with_attribute("a_tangent", 5);

        let binding = ShaderBinding::resolve(&shader);
        let slots = binding.slots();

        assert_eq!(slots.get(VertexAttribute::Position), Some(AttributeLocation(0)));
        assert_eq!(slots.get(VertexAttribute::Colour), Some(AttributeLocation(1)));
        assert_eq!(slots.get(VertexAttribute::TexCoord0), Some(AttributeLocation(2)));
        assert_eq!(slots.get(VertexAttribute::Normal), None);
        assert_eq!(slots.resolved_count(), 3);
        assert_eq!(binding.declared().count(), 4);
    }

    #[test]
    fn test_reset_clears_all_slots() {
        let shader = Shader::new(ProgramId(1)).with_attribute("a_normal", 3);
        let mut slots = ShaderBinding::resolve(&shader).slots();
        assert_eq!(slots.resolved_count(), 1);

        slots.reset();
        assert_eq!(slots, AttributeSlots::default());
    }
}
