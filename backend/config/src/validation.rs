//! Config validation: schema checks with user-friendly error messages.

use crate::schema::ReadAloudConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &ReadAloudConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_tts(config, &mut report);
    validate_ocr(config, &mut report);
    validate_playback(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn missing(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn validate_tts(config: &ReadAloudConfig, report: &mut ValidationReport) {
    let Some(tts) = &config.tts else { return };
    match tts.provider.as_deref() {
        None | Some("huggingface") => {
            if missing(tts.api_key.as_deref()) {
                report.warn(
                    "tts.apiKey",
                    "No Hugging Face token; anonymous inference is heavily rate limited",
                );
            }
        }
        Some("openai") => {
            if missing(tts.api_key.as_deref()) {
                report.warn("tts.apiKey", "OpenAI speech requires an API key");
            }
        }
        Some(other) => report.error(
            "tts.provider",
            format!("Unknown TTS provider '{other}'. Use 'huggingface' or 'openai'"),
        ),
    }
}

fn validate_ocr(config: &ReadAloudConfig, report: &mut ValidationReport) {
    let Some(ocr) = &config.ocr else { return };
    match ocr.provider.as_deref() {
        None | Some("openai") => {
            if missing(ocr.api_key.as_deref()) {
                report.warn("ocr.apiKey", "No API key for text recognition; scans will fail");
            }
        }
        Some(other) => report.error(
            "ocr.provider",
            format!("Unknown OCR provider '{other}'. Use 'openai'"),
        ),
    }
    if let Some(prompt) = &ocr.prompt {
        if prompt.trim().is_empty() {
            report.error("ocr.prompt", "prompt cannot be empty");
        }
    }
}

fn validate_playback(config: &ReadAloudConfig, report: &mut ValidationReport) {
    let Some(playback) = &config.playback else { return };
    if playback.fallback_timeout_ms == Some(0) {
        report.error("playback.fallbackTimeoutMs", "fallbackTimeoutMs must be > 0");
    }
    if let Some(volume) = playback.volume {
        if !(0.0..=2.0).contains(&volume) {
            report.error(
                "playback.volume",
                format!("volume {volume} is out of range; use 0.0 to 2.0"),
            );
        }
    }
}

fn validate_logging(config: &ReadAloudConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        if !matches!(
            level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            report.warn(
                "logging.level",
                format!("'{level}' is not a plain level; it will be read as a filter directive"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{PlaybackConfig, TtsConfig};

    #[test]
    fn empty_config_is_valid() {
        let report = validate(&ReadAloudConfig::default());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn defaults_only_warn_about_keys() {
        let report = validate(&apply_all_defaults(ReadAloudConfig::default()));
        assert!(report.is_valid());
        let paths: Vec<_> = report.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["tts.apiKey", "ocr.apiKey"]);
    }

    #[test]
    fn zero_timeout_is_error() {
        let cfg = ReadAloudConfig {
            playback: Some(PlaybackConfig {
                fallback_timeout_ms: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "playback.fallbackTimeoutMs");
    }

    #[test]
    fn volume_out_of_range_is_error() {
        let cfg = ReadAloudConfig {
            playback: Some(PlaybackConfig {
                volume: Some(3.5),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!validate(&cfg).is_valid());
    }

    #[test]
    fn unknown_tts_provider_is_error() {
        let cfg = ReadAloudConfig {
            tts: Some(TtsConfig {
                provider: Some("espeak".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.errors[0].message.contains("espeak"));
    }
}
