//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::AppConfig;
use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

fn builder() -> ConfigBuilder<DefaultState> {
    Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            File::with_name(&format!(
                "config/{}",
                std::env::var("HERALD_ENV").unwrap_or_else(|_| "production".to_string())
            ))
            .required(false),
        )
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority)
        // prefix_separator("_") makes HERALD_PACING__MIN_DELAY_MS work.
        .add_source(
            Environment::with_prefix("HERALD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
}

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    builder()
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}
