//! Wires configured collaborators into a reader page.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use readaloud_config::ReadAloudConfig;
use readaloud_core::{AudioHost, Notifier};
use readaloud_favorites::{FavoritesBook, JsonFileStore};
use readaloud_media::{DiskSaver, ScriptedHost};
use readaloud_reader::{AudioOrchestrator, ReaderPage};
use readaloud_tts::{create_synthesizer, SpeechSynthesizer, SynthesizerKind};
use readaloud_understanding::{TextRecognizer, VisionOcr};
use tracing::{debug, info};

use crate::terminal_output::ConsoleNotifier;

pub struct App {
    pub config: ReadAloudConfig,
    pub mute: bool,
}

impl App {
    pub fn new(config: ReadAloudConfig, mute: bool) -> Self {
        Self { config, mute }
    }

    pub fn synthesizer(&self) -> Result<Arc<dyn SpeechSynthesizer>> {
        let tts = self.config.tts.clone().unwrap_or_default();
        let kind = match tts.provider.as_deref() {
            None | Some("huggingface") => SynthesizerKind::HuggingFace {
                api_key: tts.api_key,
                model: tts.model,
                base_url: tts.base_url,
            },
            Some("openai") => {
                let Some(api_key) = tts.api_key.filter(|k| !k.trim().is_empty()) else {
                    bail!("tts.apiKey is required for the openai provider");
                };
                SynthesizerKind::OpenAi {
                    api_key,
                    model: tts.model,
                    voice: tts.voice,
                    base_url: tts.base_url,
                }
            }
            Some(other) => bail!("unknown TTS provider '{other}'"),
        };
        let synthesizer: Arc<dyn SpeechSynthesizer> = Arc::from(create_synthesizer(kind));
        debug!(provider = synthesizer.name(), "Speech synthesizer ready");
        Ok(synthesizer)
    }

    pub fn recognizer(&self) -> Arc<dyn TextRecognizer> {
        let ocr = self.config.ocr.clone().unwrap_or_default();
        let mut recognizer = VisionOcr::new(ocr.api_key);
        if let Some(model) = ocr.model {
            recognizer = recognizer.with_model(model);
        }
        if let Some(url) = ocr.base_url {
            recognizer = recognizer.with_base_url(url);
        }
        if let Some(prompt) = ocr.prompt {
            recognizer = recognizer.with_prompt(prompt);
        }
        Arc::new(recognizer)
    }

    /// The speaker when built with it, otherwise a host without audio.
    /// `--mute` runs the full pipeline against a silent scripted host.
    pub fn host(&self) -> Arc<dyn AudioHost> {
        if self.mute {
            return Arc::new(ScriptedHost::succeeding());
        }
        speaker_host(self.config.volume())
    }

    pub fn favorites(&self) -> FavoritesBook {
        let path = self
            .config
            .storage_path()
            .cloned()
            .unwrap_or_else(JsonFileStore::default_path);
        debug!(path = %path.display(), "Favorites store");
        FavoritesBook::new(Arc::new(JsonFileStore::new(path)))
    }

    pub fn download_dir(&self, override_dir: Option<PathBuf>) -> PathBuf {
        override_dir
            .or_else(|| self.config.download_dir().cloned())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn orchestrator(&self, synthesizer: Arc<dyn SpeechSynthesizer>) -> AudioOrchestrator {
        let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
        AudioOrchestrator::new(synthesizer, self.host(), notifier)
            .with_fallback_timeout(self.config.fallback_timeout())
            .with_failure_notice(self.config.notify_on_failure())
            .with_saver(Arc::new(DiskSaver::new(self.download_dir(None))))
    }

    pub fn page(&self) -> Result<ReaderPage> {
        let audio = self.orchestrator(self.synthesizer()?);
        info!(host = audio.host().name(), "Reader ready");
        Ok(ReaderPage::new(audio, self.recognizer(), self.favorites()))
    }
}

#[cfg(feature = "speaker")]
fn speaker_host(volume: f32) -> Arc<dyn AudioHost> {
    Arc::new(readaloud_media::SpeakerHost::new(volume))
}

#[cfg(not(feature = "speaker"))]
fn speaker_host(_volume: f32) -> Arc<dyn AudioHost> {
    Arc::new(readaloud_media::NullHost)
}
