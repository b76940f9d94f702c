//! # Core Module
//!
//! Shared configuration types consumed by the render context and by
//! applications embedding the render core.

pub mod config;

// Re-export commonly used config types
pub use config::{CoreConfig, RenderContextConfig};
pub use crate::config::{Config, ConfigError};
