//! Linked shader programs
//!
//! A [`Shader`] is the render state's view of a program compiled elsewhere:
//! its native name plus the attribute and uniform tables queried at link
//! time. Locations are specific to this program object; two programs built
//! from the same source may assign different locations.

use crate::render::api::{AttributeLocation, ProgramId, UniformLocation};
use crate::render::state::UniformName;

/// A linked program with its attribute and uniform tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    program: ProgramId,
    attributes: Vec<(String, AttributeLocation)>,
    uniforms: Vec<(UniformName, UniformLocation)>,
}

impl Shader {
    /// Describe a program with empty tables
    pub fn new(program: ProgramId) -> Self {
        Self {
            program,
            attributes: Vec::new(),
            uniforms: Vec::new(),
        }
    }

    /// Declare an active attribute
    pub fn with_attribute(mut self, name: impl Into<String>, location: u32) -> Self {
        self.attributes.push((name.into(), AttributeLocation(location)));
        self
    }

    /// Declare an active uniform
    pub fn with_uniform(mut self, name: impl Into<UniformName>, location: i32) -> Self {
        self.uniforms.push((name.into(), UniformLocation(location)));
        self
    }

    /// Native program name
    pub fn program(&self) -> ProgramId {
        self.program
    }

    /// Location of the named attribute, if the program declares it
    pub fn attribute(&self, name: &str) -> Option<AttributeLocation> {
        self.attributes
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, location)| *location)
    }

    /// Every declared attribute
    pub fn attributes(&self) -> &[(String, AttributeLocation)] {
        &self.attributes
    }

    /// Every declared uniform
    pub fn uniforms(&self) -> &[(UniformName, UniformLocation)] {
        &self.uniforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup() {
        let shader = Shader::new(ProgramId(1))
            .with_attribute("a_position", 0)
            .with_attribute("a_normal", 3);

        assert_eq!(shader.attribute("a_normal"), Some(AttributeLocation(3)));
        assert_eq!(shader.attribute("a_colour"), None);
    }

    #[test]
    fn test_uniform_names_are_interned() {
        let shader = Shader::new(ProgramId(1))
            .with_uniform("u_mvp", 0)
            .with_uniform("u_glow", 1);

        assert_eq!(shader.uniforms()[0].0, UniformName::ModelViewProjection);
        assert_eq!(shader.uniforms()[1].0, UniformName::Custom("u_glow".to_string()));
    }
}
