//! # Render Core
//!
//! GPU render-state caching and render-context lifecycle for engines that
//! drive either a fixed-function or a programmable graphics pipeline.
//!
//! ## Features
//!
//! - **State Caching**: toggles, shaders, cameras and textures are only sent
//!   to the GPU when they actually change
//! - **Uniform Updaters**: named strategies fill shader uniforms per draw
//! - **Context Lifecycle**: checked `bind → initialise → refresh → shutdown`
//!   over an EGL-shaped native platform
//! - **Render Targets**: screen, offscreen buffer and texture targets
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use render_core::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let window = HeadlessWindow::new(800, 600);
//!     let mut context = RenderContext::new(
//!         RenderContextConfig::default(),
//!         Box::new(HeadlessPlatform::new()),
//!         Box::new(TraceApi::new()),
//!     )?;
//!     context.bind_to_window(&window)?;
//!     context.initialise()?;
//!     context.refresh()?;
//!     context.shutdown()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod render;

/// Common imports for render core users
pub mod prelude {
    pub use crate::{
        core::{Config, CoreConfig, RenderContextConfig},
        foundation::{
            logging::LoggingConfig,
            math::{Mat4, Point3, Vec3},
        },
        render::{
            api::{GraphicsApi, TraceApi},
            context::{HeadlessPlatform, NativePlatform},
            Camera, ForwardRenderer, HeadlessWindow, Material, Mesh, PipelineKind, RenderContext,
            RenderError, RenderResult, RenderState, RenderWindow, Renderer, ResourceStore, Shader,
            Texture,
        },
    };
}
