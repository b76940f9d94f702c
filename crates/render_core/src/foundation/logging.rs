//! Logging utilities and structured logging support
//!
//! The crate logs through the `log` facade only. Applications that do not
//! bring their own logger can call [`init`] or [`init_with`] once at startup.

use serde::{Deserialize, Serialize};
use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "render_core=debug"). When unset, `RUST_LOG` is consulted, then `info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directives for the global logger
    pub filter: Option<String>,
    /// Force ANSI colours off (useful when piping to files)
    pub plain: bool,
}

static INIT: Once = Once::new();

/// Initialize the logging system with defaults
pub fn init() {
    init_with(&LoggingConfig::default());
}

/// Initialize the logging system once.
///
/// Subsequent calls are ignored, as is an already-installed global logger.
pub fn init_with(config: &LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        if config.plain {
            builder.write_style(env_logger::WriteStyle::Never);
        }

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_with(&LoggingConfig {
            filter: Some("render_core=trace".to_string()),
            plain: true,
        });
        init();
        log::info!("logger survives repeated initialization");
    }

    #[test]
    fn test_config_defaults_from_empty_toml() {
        let config: LoggingConfig = toml::from_str("").expect("empty config parses");
        assert_eq!(config, LoggingConfig::default());
    }
}
