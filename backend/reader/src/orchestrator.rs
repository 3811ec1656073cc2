//! Word → speech: synthesis, transport encoding, and the two-stage playback
//! pipeline, with the user-facing notices at each failure point.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use readaloud_core::{
    AudioHost, FileSaver, Notice, Notifier, PlaybackOutcome, ReadAloudError, TransportAudioUri,
};
use readaloud_media::{encode, DiskSaver, PlaybackPipeline};
use readaloud_tts::SpeechSynthesizer;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// What became of one `generate_and_play` request.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioRequestOutcome {
    /// Blank input; nothing was sent anywhere.
    Rejected,
    SynthesisFailed,
    /// The host cannot encode audio, so there was nothing to play.
    Skipped,
    Played(PlaybackOutcome),
}

#[derive(Clone)]
pub struct AudioOrchestrator {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    host: Arc<dyn AudioHost>,
    notifier: Arc<dyn Notifier>,
    saver: Arc<dyn FileSaver>,
    pipeline: Arc<PlaybackPipeline>,
    notify_on_failure: bool,
}

impl AudioOrchestrator {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        host: Arc<dyn AudioHost>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            synthesizer,
            pipeline: Arc::new(PlaybackPipeline::new(Arc::clone(&host))),
            host,
            notifier,
            saver: Arc::new(DiskSaver::new(".")),
            notify_on_failure: true,
        }
    }

    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.pipeline = Arc::new(
            PlaybackPipeline::new(Arc::clone(&self.host)).with_fallback_timeout(timeout),
        );
        self
    }

    /// Whether a playback failure on both paths is reported to the user.
    pub fn with_failure_notice(mut self, enabled: bool) -> Self {
        self.notify_on_failure = enabled;
        self
    }

    pub fn with_saver(mut self, saver: Arc<dyn FileSaver>) -> Self {
        self.saver = saver;
        self
    }

    pub fn host(&self) -> &Arc<dyn AudioHost> {
        &self.host
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Synthesize `word` and play it.
    pub async fn generate_and_play(&self, word: &str) -> AudioRequestOutcome {
        let uri = match self.synthesize_and_encode(word).await {
            Ok(uri) => uri,
            Err(ReadAloudError::Validation(_)) => return AudioRequestOutcome::Rejected,
            Err(ReadAloudError::EncodingUnavailable) => return AudioRequestOutcome::Skipped,
            Err(_) => return AudioRequestOutcome::SynthesisFailed,
        };

        let outcome = self.pipeline.run(&uri).await;
        match &outcome {
            PlaybackOutcome::Succeeded { stage } => {
                debug!(%stage, "Playback started");
            }
            PlaybackOutcome::Failed { primary, fallback } => {
                warn!(%primary, %fallback, "Audio could not be played");
                if self.notify_on_failure {
                    self.notifier.notify(Notice::PlaybackFailed);
                }
            }
        }
        AudioRequestOutcome::Played(outcome)
    }

    /// Fire-and-forget variant; each task owns its own playback session.
    pub fn spawn_generate_and_play(&self, word: impl Into<String>) -> JoinHandle<AudioRequestOutcome> {
        let this = self.clone();
        let word = word.into();
        tokio::spawn(async move { this.generate_and_play(&word).await })
    }

    /// Synthesize `word` and hand the clip to the file saver.
    ///
    /// The suggested filename defaults to `<word>.wav`.
    pub async fn download(
        &self,
        word: &str,
        filename: Option<&str>,
    ) -> Result<PathBuf, ReadAloudError> {
        let uri = self.synthesize_and_encode(word).await?;
        let word = word.trim();
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| format!("{word}.wav"));

        match self.saver.save(&uri, &filename).await {
            Ok(path) => {
                info!(path = %path.display(), "Saved synthesized audio");
                self.notifier.notify(Notice::Saved {
                    location: path.display().to_string(),
                });
                Ok(path)
            }
            Err(e) => {
                error!(error = %e, filename, "Failed to save audio");
                self.notifier.notify(Notice::DownloadFailed);
                Err(ReadAloudError::Other(e))
            }
        }
    }

    async fn synthesize_and_encode(&self, word: &str) -> Result<TransportAudioUri, ReadAloudError> {
        let word = word.trim();
        if word.is_empty() {
            self.notifier.notify(Notice::EmptyWord);
            return Err(ReadAloudError::Validation("empty word".into()));
        }

        let payload = match self.synthesizer.synthesize(word).await {
            Ok(payload) => payload,
            Err(e) => {
                error!(provider = self.synthesizer.name(), error = %e, "Speech synthesis failed");
                self.notifier.notify(Notice::SynthesisFailed);
                return Err(ReadAloudError::collaborator("tts", e));
            }
        };
        debug!(bytes = payload.len(), "Synthesized audio");

        let uri = encode(&payload, self.host.as_ref());
        if uri.is_empty() {
            debug!(host = self.host.name(), "No transport URI produced; skipping playback");
            return Err(ReadAloudError::EncodingUnavailable);
        }
        Ok(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use readaloud_core::{PlaybackStage, PrimitiveKind, RecordingNotifier};
    use readaloud_media::{NullHost, Script, ScriptedHost};
    use readaloud_tts::MockSynthesizer;

    #[derive(Default)]
    struct RecordingSaver {
        saved: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl FileSaver for RecordingSaver {
        async fn save(&self, source: &TransportAudioUri, filename: &str) -> anyhow::Result<PathBuf> {
            self.saved
                .lock()
                .unwrap()
                .push((source.as_str().to_string(), filename.to_string()));
            Ok(PathBuf::from(filename))
        }
    }

    fn fixture(
        synth: Arc<MockSynthesizer>,
        host: ScriptedHost,
    ) -> (AudioOrchestrator, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let orchestrator = AudioOrchestrator::new(synth, Arc::new(host), notifier.clone());
        (orchestrator, notifier)
    }

    #[tokio::test]
    async fn blank_word_never_reaches_the_synthesizer() {
        let synth = Arc::new(MockSynthesizer::new());
        let host = ScriptedHost::succeeding();
        let (orchestrator, notifier) = fixture(synth.clone(), host.clone());

        for word in ["", "   ", "\t\n"] {
            assert_eq!(orchestrator.generate_and_play(word).await, AudioRequestOutcome::Rejected);
        }
        assert_eq!(synth.calls(), 0);
        assert_eq!(host.opened(PrimitiveKind::MediaElement), 0);
        assert_eq!(notifier.notices(), vec![Notice::EmptyWord; 3]);
    }

    #[tokio::test]
    async fn synthesis_failure_stops_before_encoding() {
        let synth = Arc::new(MockSynthesizer::failing());
        let host = ScriptedHost::succeeding();
        let (orchestrator, notifier) = fixture(synth.clone(), host.clone());

        let outcome = orchestrator.generate_and_play("hello").await;
        assert_eq!(outcome, AudioRequestOutcome::SynthesisFailed);
        assert_eq!(synth.calls(), 1);
        assert_eq!(host.encoding_checks(), 0);
        assert_eq!(host.opened(PrimitiveKind::MediaElement), 0);
        assert_eq!(host.opened(PrimitiveKind::FreshContext), 0);
        assert_eq!(notifier.notices(), vec![Notice::SynthesisFailed]);
    }

    #[tokio::test]
    async fn word_is_trimmed_but_not_lowercased() {
        let synth = Arc::new(MockSynthesizer::new());
        let (orchestrator, notifier) = fixture(synth.clone(), ScriptedHost::succeeding());

        let outcome = orchestrator.generate_and_play("  Hello ").await;
        assert_eq!(
            outcome,
            AudioRequestOutcome::Played(PlaybackOutcome::Succeeded {
                stage: PlaybackStage::Primary
            })
        );
        assert_eq!(synth.requests(), vec!["Hello".to_string()]);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn host_without_encoding_skips_quietly() {
        let synth = Arc::new(MockSynthesizer::new());
        let host = ScriptedHost::succeeding().without_encoding();
        let (orchestrator, notifier) = fixture(synth.clone(), host.clone());

        assert_eq!(orchestrator.generate_and_play("cat").await, AudioRequestOutcome::Skipped);
        assert_eq!(synth.calls(), 1);
        assert_eq!(host.opened(PrimitiveKind::MediaElement), 0);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn null_host_skips_playback() {
        let notifier = Arc::new(RecordingNotifier::new());
        let orchestrator = AudioOrchestrator::new(
            Arc::new(MockSynthesizer::new()),
            Arc::new(NullHost),
            notifier.clone(),
        );
        assert_eq!(orchestrator.generate_and_play("cat").await, AudioRequestOutcome::Skipped);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn total_playback_failure_notifies_when_enabled() {
        let host = ScriptedHost::new(Script::decode_error("bad"), Script::decode_error("bad"));
        let (orchestrator, notifier) = fixture(Arc::new(MockSynthesizer::new()), host.clone());

        let outcome = orchestrator.generate_and_play("cat").await;
        assert!(matches!(
            outcome,
            AudioRequestOutcome::Played(PlaybackOutcome::Failed { .. })
        ));
        assert_eq!(host.opened(PrimitiveKind::FreshContext), 1);
        assert_eq!(notifier.notices(), vec![Notice::PlaybackFailed]);
    }

    #[tokio::test]
    async fn total_playback_failure_can_stay_silent() {
        let host = ScriptedHost::new(Script::decode_error("bad"), Script::decode_error("bad"));
        let (orchestrator, notifier) = fixture(Arc::new(MockSynthesizer::new()), host);
        let orchestrator = orchestrator.with_failure_notice(false);

        let outcome = orchestrator.generate_and_play("cat").await;
        assert!(!matches!(outcome, AudioRequestOutcome::Played(ref o) if o.is_success()));
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn repeated_requests_are_not_cached() {
        let synth = Arc::new(MockSynthesizer::new());
        let host = ScriptedHost::succeeding();
        let (orchestrator, _) = fixture(synth.clone(), host.clone());

        let first = orchestrator.spawn_generate_and_play("cat");
        let second = orchestrator.spawn_generate_and_play("cat");
        let (first, second) = (first.await.unwrap(), second.await.unwrap());

        assert!(matches!(first, AudioRequestOutcome::Played(ref o) if o.is_success()));
        assert!(matches!(second, AudioRequestOutcome::Played(ref o) if o.is_success()));
        assert_eq!(synth.calls(), 2);
        assert_eq!(host.opened(PrimitiveKind::MediaElement), 2);
    }

    #[tokio::test]
    async fn download_defaults_to_word_dot_wav() {
        let saver = Arc::new(RecordingSaver::default());
        let (orchestrator, notifier) =
            fixture(Arc::new(MockSynthesizer::new()), ScriptedHost::succeeding());
        let orchestrator = orchestrator.with_saver(saver.clone());

        let path = orchestrator.download("hello", None).await.unwrap();
        assert_eq!(path, PathBuf::from("hello.wav"));

        let saved = saver.saved.lock().unwrap().clone();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].0.starts_with("data:audio/wav;base64,"));
        assert_eq!(saved[0].1, "hello.wav");
        assert_eq!(
            notifier.notices(),
            vec![Notice::Saved {
                location: "hello.wav".into()
            }]
        );
    }

    #[tokio::test]
    async fn download_honours_filename_override() {
        let saver = Arc::new(RecordingSaver::default());
        let (orchestrator, _) =
            fixture(Arc::new(MockSynthesizer::new()), ScriptedHost::succeeding());
        let orchestrator = orchestrator.with_saver(saver.clone());

        orchestrator.download("hello", Some("greeting.wav")).await.unwrap();
        assert_eq!(saver.saved.lock().unwrap()[0].1, "greeting.wav");
    }

    #[tokio::test]
    async fn download_reports_synthesis_failure() {
        let saver = Arc::new(RecordingSaver::default());
        let (orchestrator, notifier) =
            fixture(Arc::new(MockSynthesizer::failing()), ScriptedHost::succeeding());
        let orchestrator = orchestrator.with_saver(saver.clone());

        let err = orchestrator.download("hello", None).await.unwrap_err();
        assert!(matches!(err, ReadAloudError::Collaborator { .. }));
        assert!(saver.saved.lock().unwrap().is_empty());
        assert_eq!(notifier.notices(), vec![Notice::SynthesisFailed]);
    }
}
