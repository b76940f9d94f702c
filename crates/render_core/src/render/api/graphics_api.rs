//! Backend abstraction trait for the graphics command stream
//!
//! Every state change the render core makes goes through [`GraphicsApi`].
//! Implementations execute the calls synchronously on the thread that owns
//! the current context and never report errors back; driver-level failures
//! are the implementation's to log.

use bitflags::bitflags;

use crate::foundation::math::Mat4;

/// Native shader program name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Native texture object name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureName(pub u32);

/// Location of a vertex attribute inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeLocation(pub u32);

/// Location of a uniform inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

/// Numbered texture binding point (unit 0 is `TEXTURE0`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureUnit(pub u32);

/// Server-side capabilities toggled with enable/disable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// 2D texturing
    Texture2D,
    /// Colour blending
    Blend,
    /// Scissor rectangle test
    ScissorTest,
    /// Depth buffer test
    DepthTest,
    /// Face culling
    CullFace,
}

/// Client-side vertex arrays of the fixed-function pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientArray {
    /// Vertex position array
    VertexPositions,
    /// Vertex colour array
    VertexColours,
    /// Vertex normal array
    VertexNormals,
}

impl ClientArray {
    /// All client arrays, in cache order
    pub const ALL: [ClientArray; 3] = [
        ClientArray::VertexPositions,
        ClientArray::VertexColours,
        ClientArray::VertexNormals,
    ];

    pub(crate) const fn index(self) -> usize {
        match self {
            ClientArray::VertexPositions => 0,
            ClientArray::VertexColours => 1,
            ClientArray::VertexNormals => 2,
        }
    }
}

/// Source/destination factors for the blend equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// `(0, 0, 0, 0)`
    Zero,
    /// `(1, 1, 1, 1)`
    One,
    /// Source colour
    SrcColour,
    /// One minus source colour
    OneMinusSrcColour,
    /// Destination colour
    DstColour,
    /// One minus destination colour
    OneMinusDstColour,
    /// Source alpha
    SrcAlpha,
    /// One minus source alpha
    OneMinusSrcAlpha,
    /// Destination alpha
    DstAlpha,
    /// One minus destination alpha
    OneMinusDstAlpha,
    /// `min(As, 1 - Ad)`
    SrcAlphaSaturate,
}

/// Matrix stack targeted by matrix load operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    /// Projection stack
    Projection,
    /// Model-view stack
    ModelView,
    /// Texture coordinate stack
    Texture,
}

/// Primitive topology for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Primitive {
    /// Independent points
    Points,
    /// Independent line segments
    Lines,
    /// Independent triangles
    #[default]
    Triangles,
    /// Triangle strip
    TriangleStrip,
    /// Triangle fan
    TriangleFan,
}

bitflags! {
    /// Buffers cleared by [`GraphicsApi::clear`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        /// Colour buffer
        const COLOUR = 0b001;
        /// Depth buffer
        const DEPTH = 0b010;
        /// Stencil buffer
        const STENCIL = 0b100;
    }
}

/// GL-shaped command surface driven by the render state
///
/// Matrices are passed column-major, as nalgebra stores them.
pub trait GraphicsApi {
    /// Enable a server-side capability
    fn enable(&mut self, capability: Capability);

    /// Disable a server-side capability
    fn disable(&mut self, capability: Capability);

    /// Enable a fixed-function client array
    fn enable_client_state(&mut self, array: ClientArray);

    /// Disable a fixed-function client array
    fn disable_client_state(&mut self, array: ClientArray);

    /// Set the blend function for colour and alpha together
    fn blend_func(&mut self, source: BlendFactor, destination: BlendFactor);

    /// Set separate blend functions for colour and alpha
    fn blend_func_separate(
        &mut self,
        source_rgb: BlendFactor,
        destination_rgb: BlendFactor,
        source_alpha: BlendFactor,
        destination_alpha: BlendFactor,
    );

    /// Select the matrix stack subsequent matrix operations apply to
    fn matrix_mode(&mut self, mode: MatrixMode);

    /// Replace the top of the current matrix stack
    fn load_matrix(&mut self, matrix: &Mat4);

    /// Multiply the top of the current matrix stack
    fn mult_matrix(&mut self, matrix: &Mat4);

    /// Duplicate the top of the current matrix stack
    fn push_matrix(&mut self);

    /// Pop the current matrix stack
    fn pop_matrix(&mut self);

    /// Make a program current
    fn use_program(&mut self, program: ProgramId);

    /// Enable a generic vertex attribute array
    fn enable_vertex_attrib_array(&mut self, location: AttributeLocation);

    /// Select the active texture unit
    fn active_texture(&mut self, unit: TextureUnit);

    /// Bind a 2D texture to the active unit
    fn bind_texture(&mut self, texture: TextureName);

    /// Upload a 4x4 matrix uniform
    fn uniform_matrix4(&mut self, location: UniformLocation, matrix: &Mat4);

    /// Upload a vec4 uniform
    fn uniform4f(&mut self, location: UniformLocation, value: [f32; 4]);

    /// Upload an integer (or sampler) uniform
    fn uniform1i(&mut self, location: UniformLocation, value: i32);

    /// Set the viewport rectangle
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Set the colour used by colour clears
    fn clear_colour(&mut self, colour: [f32; 4]);

    /// Clear the selected buffers
    fn clear(&mut self, mask: ClearMask);

    /// Draw `count` vertices starting at `first`
    fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32);
}
