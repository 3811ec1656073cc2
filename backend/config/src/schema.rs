//! readaloud configuration schema.
//!
//! Every field is optional in the file; [`crate::defaults`] fills the gaps
//! and the accessors below fall back to the same constants.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::{
    DEFAULT_FALLBACK_TIMEOUT_MS, DEFAULT_LOG_LEVEL, DEFAULT_NOTIFY_ON_FAILURE, DEFAULT_VOLUME,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadAloudConfig {
    /// Speech synthesis provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts: Option<TtsConfig>,

    /// Text recognition provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback: Option<PlaybackConfig>,

    /// Favorites store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<DownloadConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

impl ReadAloudConfig {
    pub fn fallback_timeout(&self) -> Duration {
        let ms = self
            .playback
            .as_ref()
            .and_then(|p| p.fallback_timeout_ms)
            .unwrap_or(DEFAULT_FALLBACK_TIMEOUT_MS);
        Duration::from_millis(ms)
    }

    pub fn notify_on_failure(&self) -> bool {
        self.playback
            .as_ref()
            .and_then(|p| p.notify_on_failure)
            .unwrap_or(DEFAULT_NOTIFY_ON_FAILURE)
    }

    pub fn volume(&self) -> f32 {
        self.playback
            .as_ref()
            .and_then(|p| p.volume)
            .unwrap_or(DEFAULT_VOLUME)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&PathBuf> {
        self.logging.as_ref().and_then(|l| l.dir.as_ref())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn storage_path(&self) -> Option<&PathBuf> {
        self.storage.as_ref().and_then(|s| s.path.as_ref())
    }

    pub fn download_dir(&self) -> Option<&PathBuf> {
        self.download.as_ref().and_then(|d| d.dir.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsConfig {
    /// "huggingface" | "openai"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// OpenAI voice name; ignored by Hugging Face models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrConfig {
    /// Only "openai" (any OpenAI-compatible vision endpoint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_timeout_ms: Option<u64>,
    /// Tell the user when neither playback path worked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_on_failure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling NDJSON log; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// JSON lines on the console too.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}
