//! Mesh draw descriptions
//!
//! Vertex storage lives outside the render core. A [`Mesh`] names what a
//! renderer needs to issue one draw: the program, the material and the
//! vertex range.

use crate::render::api::Primitive;
use crate::render::resources::{Material, ShaderId};

/// One drawable vertex range with its shading inputs
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Program to draw with; `None` draws with the fixed-function pipeline
    pub shader: Option<ShaderId>,
    /// Material supplying textures and uniform inputs
    pub material: Material,
    /// Primitive topology
    pub primitive: Primitive,
    /// First vertex in the bound vertex arrays
    pub first: u32,
    /// Number of vertices
    pub vertex_count: u32,
}

impl Mesh {
    /// Describe a triangle list drawn with `shader`
    pub fn new(shader: Option<ShaderId>, material: Material, vertex_count: u32) -> Self {
        Self {
            shader,
            material,
            primitive: Primitive::Triangles,
            first: 0,
            vertex_count,
        }
    }

    /// Override the primitive topology
    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitive = primitive;
        self
    }
}
