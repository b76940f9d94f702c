//! # Unified Configuration
//!
//! Configuration structures for the render context and the ambient services
//! around it. Every structure deserializes with defaults, so a partial file
//! (or an empty one) is valid input.

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::logging::LoggingConfig;
use crate::render::state::PipelineKind;

/// Default clear colour, a neutral grey
pub const DEFAULT_CLEAR_COLOUR: [f32; 4] = [0.4, 0.4, 0.4, 1.0];

/// Minimum colour-buffer depth requested when choosing a native config.
pub const DEFAULT_MIN_COLOUR_BUFFER_BITS: u32 = 16;

/// # Render Context Configuration
///
/// Selects the pipeline variant and the constraints used while acquiring the
/// native display, surface and context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderContextConfig {
    /// Which render-state variant the context builds
    pub pipeline: PipelineKind,
    /// Minimum colour-buffer bit depth for the native config
    pub min_colour_buffer_bits: u32,
    /// Colour used when clearing between frames
    pub clear_colour: [f32; 4],
}

impl RenderContextConfig {
    /// Create a configuration for the given pipeline with default constraints
    pub fn new(pipeline: PipelineKind) -> Self {
        Self {
            pipeline,
            min_colour_buffer_bits: DEFAULT_MIN_COLOUR_BUFFER_BITS,
            clear_colour: DEFAULT_CLEAR_COLOUR,
        }
    }

    /// Set the clear colour
    pub fn with_clear_colour(mut self, colour: [f32; 4]) -> Self {
        self.clear_colour = colour;
        self
    }

    /// Set the minimum colour-buffer depth
    pub fn with_min_colour_buffer_bits(mut self, bits: u32) -> Self {
        self.min_colour_buffer_bits = bits;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_colour_buffer_bits == 0 || self.min_colour_buffer_bits > 32 {
            return Err(ConfigError::Invalid(format!(
                "min_colour_buffer_bits must be within 1..=32, got {}",
                self.min_colour_buffer_bits
            )));
        }

        if self
            .clear_colour
            .iter()
            .any(|c| !c.is_finite() || !(0.0..=1.0).contains(c))
        {
            return Err(ConfigError::Invalid(format!(
                "clear_colour components must be within 0.0..=1.0, got {:?}",
                self.clear_colour
            )));
        }

        Ok(())
    }
}

impl Default for RenderContextConfig {
    fn default() -> Self {
        Self::new(PipelineKind::Programmable)
    }
}

impl Config for RenderContextConfig {}

/// # Complete Core Configuration
///
/// Top-level configuration applications load from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Logger setup
    pub logging: LoggingConfig,
    /// Render context setup
    pub context: RenderContextConfig,
}

impl CoreConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.context.validate()
    }
}

impl Config for CoreConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.context.pipeline, PipelineKind::Programmable);
        assert_eq!(config.context.clear_colour, DEFAULT_CLEAR_COLOUR);
    }

    #[test]
    fn test_partial_toml() {
        let text = r#"
            [logging]
            filter = "debug"

            [context]
            pipeline = "fixed_function"
        "#;
        let config = CoreConfig::parse("core.toml", text).expect("valid toml");
        assert_eq!(config.context.pipeline, PipelineKind::FixedFunction);
        assert_eq!(config.context.min_colour_buffer_bits, DEFAULT_MIN_COLOUR_BUFFER_BITS);
        assert_eq!(config.logging.filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_ron_format() {
        let text = "(context: (pipeline: programmable, clear_colour: (0.0, 0.0, 0.0, 1.0)))";
        let config = CoreConfig::parse("core.ron", text).expect("valid ron");
        assert_eq!(config.context.clear_colour, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = CoreConfig::parse("core.yaml", "");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validation_rejects_out_of_range_values() {
        let config = RenderContextConfig::default().with_min_colour_buffer_bits(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = RenderContextConfig::default().with_clear_colour([1.5, 0.0, 0.0, 1.0]);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
