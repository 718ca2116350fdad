//! `clicktrack-config`: configuration for the click handler and gateway.
//!
//! Provides:
//! - Typed config schema (selector, tracking request, navigation delay, gateway, logging)
//! - YAML read/write
//! - `${ENV_VAR}` substitution
//! - Default normalization
//! - Validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, read_config_value, write_config};
pub use schema::{
    ClickTrackConfig, GatewayConfig, LoggingConfig, NavigationConfig, SelectorConfig,
    TrackingConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// A validated config and the warnings validation raised for it.
#[derive(Debug)]
pub struct PreparedConfig {
    pub config: ClickTrackConfig,
    pub warnings: Vec<ConfigValidationError>,
}

impl PreparedConfig {
    /// Emit the warnings. Call once a subscriber is installed, since the
    /// logging settings themselves come from this config.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
    }
}

/// Load, substitute env vars, apply defaults, and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Any
/// validation error fails the load; warnings are handed back unlogged.
pub async fn load_and_prepare(path: &Path) -> Result<PreparedConfig> {
    let value = read_config_value(path).await?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: ClickTrackConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    if !report.is_valid() {
        let summary: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid config at {}: {}", path.display(), summary.join("; "));
    }

    Ok(PreparedConfig {
        config,
        warnings: report.warnings,
    })
}
