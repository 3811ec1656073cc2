//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{LoggingConfig, OcrConfig, PlaybackConfig, ReadAloudConfig, TtsConfig};

/// How long the fallback path may take to start playing.
pub const DEFAULT_FALLBACK_TIMEOUT_MS: u64 = 5_000;

pub const DEFAULT_NOTIFY_ON_FAILURE: bool = true;

pub const DEFAULT_VOLUME: f32 = 1.0;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_TTS_PROVIDER: &str = "huggingface";

pub const DEFAULT_OCR_PROVIDER: &str = "openai";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ReadAloudConfig) -> ReadAloudConfig {
    let config = apply_provider_defaults(config);
    let config = apply_playback_defaults(config);
    apply_logging_defaults(config)
}

/// Pick the default collaborators when none are named.
fn apply_provider_defaults(mut config: ReadAloudConfig) -> ReadAloudConfig {
    let tts = config.tts.get_or_insert_with(TtsConfig::default);
    if tts.provider.is_none() {
        tts.provider = Some(DEFAULT_TTS_PROVIDER.to_string());
    }
    let ocr = config.ocr.get_or_insert_with(OcrConfig::default);
    if ocr.provider.is_none() {
        ocr.provider = Some(DEFAULT_OCR_PROVIDER.to_string());
    }
    config
}

fn apply_playback_defaults(mut config: ReadAloudConfig) -> ReadAloudConfig {
    let playback = config.playback.get_or_insert_with(PlaybackConfig::default);
    if playback.fallback_timeout_ms.is_none() {
        playback.fallback_timeout_ms = Some(DEFAULT_FALLBACK_TIMEOUT_MS);
    }
    if playback.notify_on_failure.is_none() {
        playback.notify_on_failure = Some(DEFAULT_NOTIFY_ON_FAILURE);
    }
    if playback.volume.is_none() {
        playback.volume = Some(DEFAULT_VOLUME);
    }
    config
}

fn apply_logging_defaults(mut config: ReadAloudConfig) -> ReadAloudConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let cfg = apply_all_defaults(ReadAloudConfig::default());
        assert_eq!(cfg.tts.unwrap().provider.as_deref(), Some("huggingface"));
        assert_eq!(cfg.ocr.unwrap().provider.as_deref(), Some("openai"));
        let playback = cfg.playback.unwrap();
        assert_eq!(playback.fallback_timeout_ms, Some(5_000));
        assert_eq!(playback.notify_on_failure, Some(true));
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some("info"));
    }

    #[test]
    fn keeps_explicit_values() {
        let cfg = ReadAloudConfig {
            playback: Some(PlaybackConfig {
                fallback_timeout_ms: Some(1_200),
                notify_on_failure: Some(false),
                volume: None,
            }),
            ..Default::default()
        };
        let playback = apply_all_defaults(cfg).playback.unwrap();
        assert_eq!(playback.fallback_timeout_ms, Some(1_200));
        assert_eq!(playback.notify_on_failure, Some(false));
        assert_eq!(playback.volume, Some(1.0));
    }
}
