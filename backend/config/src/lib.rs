//! `readaloud-config` — configuration for the readaloud reader.
//!
//! Provides:
//! - Typed config schema (speech, recognition, playback, storage, logging)
//! - YAML read/write with atomic replace and backup rotation
//! - `${ENV_VAR}` substitution
//! - Config redaction for safe display
//! - Default value application and validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use schema::{
    DownloadConfig, LoggingConfig, OcrConfig, PlaybackConfig, ReadAloudConfig, StorageConfig,
    TtsConfig,
};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use env::{collect_referenced_vars, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use redact::{collect_redacted_paths, redact};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load, apply env substitution, apply defaults, and validate a config file.
///
/// Validation findings are logged; the caller decides what to do with an
/// invalid config via [`validate`].
pub async fn load_and_prepare(path: &Path) -> Result<ReadAloudConfig> {
    let raw_config = load_config(path).await?;

    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;

    let config: ReadAloudConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepares_a_missing_file_with_defaults() {
        let path = std::env::temp_dir()
            .join(format!("readaloud-missing-{}", uuid::Uuid::new_v4()))
            .join("config.yaml");
        let config = load_and_prepare(&path).await.unwrap();
        assert_eq!(config.tts.as_ref().unwrap().provider.as_deref(), Some("huggingface"));
        assert_eq!(config.fallback_timeout().as_millis(), 5_000);
    }
}
