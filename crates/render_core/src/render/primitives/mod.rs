//! Core primitive types for rendering
//!
//! Cameras and meshes as the render state and renderers consume them.

pub mod camera;
pub mod mesh;

// Re-export commonly used types
pub use camera::Camera;
pub use mesh::Mesh;
