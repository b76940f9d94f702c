//! # Rendering System
//!
//! The render core sits between a renderer and the native graphics API. It
//! caches GPU state so redundant commands are never issued, and it owns the
//! native display, surface and context for one window.
//!
//! ## Architecture
//!
//! - **State**: [`state::RenderState`] caches toggles, the bound shader,
//!   camera and texture bindings, and dispatches uniform updaters. It drives
//!   either the fixed-function or the programmable pipeline.
//! - **Context**: [`context::RenderContext`] brings up the native platform,
//!   presents frames and forwards draws to the observed [`renderer::Renderer`].
//! - **Targets**: [`target`] builds screen, buffer and texture targets.
//! - **API**: [`api::GraphicsApi`] is the command surface; [`api::TraceApi`]
//!   records instead of executing.

pub mod api;
pub mod context;
pub mod primitives;
pub mod renderer;
pub mod resources;
pub mod state;
pub mod target;
pub mod window;

pub use context::{LifecycleState, PlatformError, RenderContext};
pub use primitives::{Camera, Mesh};
pub use renderer::{ForwardRenderer, Renderer};
pub use resources::{Material, ResourceStore, Shader, Texture};
pub use state::{PipelineKind, RenderState, UniformName};
pub use target::{RenderTarget, RenderTargetOptions, RenderTargetType};
pub use window::{HeadlessWindow, RenderWindow};

use thiserror::Error;

use crate::config::ConfigError;

/// Rendering error types
///
/// Native acquisition failures abort the operation that hit them. Everything
/// else reports a caller mistake or a missing piece of setup.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A draw could not be carried out
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// A native platform call failed
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Configuration was rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The bound shader declares uniforms nobody knows how to fill
    ///
    /// Every other uniform of the shader was still uploaded.
    #[error("No uniform updater registered for {}", join_names(.0))]
    MissingUniformUpdaters(Vec<UniformName>),

    /// Uniforms were requested without a bound shader
    #[error("No shader is bound")]
    NoShaderBound,

    /// Numeric render target tag outside the known set
    #[error("Unsupported render target type {0}")]
    UnsupportedTargetType(u32),

    /// Render target options unusable for the requested kind
    #[error("Invalid render target options: {0}")]
    InvalidTargetOptions(String),

    /// Operation called out of lifecycle order
    #[error("Cannot {operation} while the render context is {state}")]
    InvalidLifecycle {
        /// Rejected operation
        operation: &'static str,
        /// State the context was in
        state: LifecycleState,
    },

    /// A resource id no longer refers to a live resource
    #[error("{kind} not found")]
    ResourceNotFound {
        /// Resource kind
        kind: &'static str,
    },

    /// Operation only exists on the other pipeline
    #[error("{operation} is not available on the {pipeline} pipeline")]
    UnsupportedByPipeline {
        /// Rejected operation
        operation: &'static str,
        /// Pipeline of the render state
        pipeline: PipelineKind,
    },
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

pub(crate) fn join_names(names: &[UniformName]) -> String {
    names
        .iter()
        .map(UniformName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let missing = RenderError::MissingUniformUpdaters(vec![
            UniformName::from("u_extra"),
            UniformName::from("u_glow"),
        ]);
        assert_eq!(missing.to_string(), "No uniform updater registered for u_extra, u_glow");

        let lifecycle = RenderError::InvalidLifecycle {
            operation: "refresh",
            state: LifecycleState::ShutDown,
        };
        assert_eq!(lifecycle.to_string(), "Cannot refresh while the render context is shut down");
    }
}
