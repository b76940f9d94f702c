//! Graphics command API
//!
//! This module contains the command surface the render state drives. It is
//! deliberately GL-shaped: capabilities are toggled, matrices are loaded into
//! stacks, programs and texture units are bound by name. Concrete driver
//! bindings implement [`GraphicsApi`]; [`TraceApi`] records the calls instead
//! of executing them.

pub mod graphics_api;
pub mod trace;

// Re-export commonly used types
pub use graphics_api::{
    AttributeLocation, BlendFactor, Capability, ClearMask, ClientArray, GraphicsApi, MatrixMode,
    Primitive, ProgramId, TextureName, TextureUnit, UniformLocation,
};
pub use trace::{ApiCall, CallLog, TraceApi};
