//! The reader page: scan an image into lines, speak them, keep favorites.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use readaloud_core::{Notice, ReadAloudError};
use readaloud_favorites::{AddReport, FavoritesBook};
use readaloud_media::{data_uri, detect_mime_type, is_image};
use readaloud_understanding::{split_recognized_text, TextItem, TextRecognizer};
use tracing::{debug, error, info};

use crate::orchestrator::{AudioOrchestrator, AudioRequestOutcome};

/// What the host can do with audio, for the `doctor` report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSupport {
    pub host: String,
    pub encoding: bool,
    pub playback: bool,
}

impl AudioSupport {
    pub fn is_supported(&self) -> bool {
        self.encoding && self.playback
    }
}

pub struct ReaderPage {
    audio: AudioOrchestrator,
    recognizer: Arc<dyn TextRecognizer>,
    favorites: FavoritesBook,
    items: Vec<TextItem>,
}

impl ReaderPage {
    pub fn new(
        audio: AudioOrchestrator,
        recognizer: Arc<dyn TextRecognizer>,
        favorites: FavoritesBook,
    ) -> Self {
        Self {
            audio,
            recognizer,
            favorites,
            items: Vec::new(),
        }
    }

    pub fn audio(&self) -> &AudioOrchestrator {
        &self.audio
    }

    /// Lines from the most recent successful scan.
    pub fn items(&self) -> &[TextItem] {
        &self.items
    }

    /// Recognize the text in an image file.
    ///
    /// Non-image files are refused with a notice before anything is read.
    pub async fn recognize_file(&mut self, path: &Path) -> Result<&[TextItem], ReadAloudError> {
        let mime = detect_mime_type(path);
        if !is_image(mime) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            self.audio.notifier().notify(Notice::NotAnImage { name });
            return Ok(&self.items);
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ReadAloudError::Other(anyhow::anyhow!("failed to read {}: {e}", path.display())))?;
        self.recognize_bytes(&bytes, mime).await
    }

    /// Recognize the text in already-loaded image bytes.
    pub async fn recognize_bytes(
        &mut self,
        bytes: &[u8],
        mime: &str,
    ) -> Result<&[TextItem], ReadAloudError> {
        let uri = data_uri(bytes, mime);
        debug!(mime, bytes = bytes.len(), "Sending image for recognition");

        let content = match self.recognizer.recognize(&uri).await {
            Ok(content) => content,
            Err(e) => {
                error!(provider = self.recognizer.name(), error = %e, "Text recognition failed");
                self.audio.notifier().notify(Notice::RecognitionFailed);
                return Err(ReadAloudError::collaborator("ocr", e));
            }
        };

        let items = content
            .map(|text| split_recognized_text(&text, Utc::now().timestamp_millis()))
            .unwrap_or_default();
        if items.is_empty() {
            self.audio.notifier().notify(Notice::NoTextRecognized);
        }
        info!(lines = items.len(), "Recognized text");
        self.items = items;
        Ok(&self.items)
    }

    /// Speak one recognized line, lowercased like `play_all`.
    pub async fn play_item(&self, index: usize) -> AudioRequestOutcome {
        match self.items.get(index) {
            Some(item) => self.audio.generate_and_play(&item.content.to_lowercase()).await,
            None => {
                self.audio.notifier().notify(Notice::NothingToPlay);
                AudioRequestOutcome::Rejected
            }
        }
    }

    /// Speak every recognized line as one utterance.
    pub async fn play_all(&self) -> AudioRequestOutcome {
        let joined = self
            .items
            .iter()
            .map(|item| item.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.trim().is_empty() {
            self.audio.notifier().notify(Notice::NothingToPlay);
            return AudioRequestOutcome::Rejected;
        }
        self.audio.generate_and_play(&joined.to_lowercase()).await
    }

    /// Add every recognized line to the favorites.
    ///
    /// Returns `None` when there was nothing to add.
    pub async fn favorite_all(&self) -> Result<Option<AddReport>, ReadAloudError> {
        if self.items.is_empty() {
            self.audio.notifier().notify(Notice::NothingToFavorite);
            return Ok(None);
        }
        let report = self
            .favorites
            .add(self.items.iter().map(|item| item.content.as_str()))
            .await
            .map_err(|e| ReadAloudError::Storage(e.to_string()))?;
        self.audio.notifier().notify(Notice::Favorited {
            count: report.submitted,
        });
        Ok(Some(report))
    }

    pub async fn favorites(&self) -> Result<Vec<String>, ReadAloudError> {
        self.favorites
            .load()
            .await
            .map_err(|e| ReadAloudError::Storage(e.to_string()))
    }

    pub fn audio_support(&self) -> AudioSupport {
        let host = self.audio.host();
        AudioSupport {
            host: host.name().to_string(),
            encoding: host.supports_encoding(),
            playback: host.supports_playback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readaloud_core::{PlaybackOutcome, PlaybackStage, RecordingNotifier};
    use readaloud_favorites::{InMemoryStore, KeyValueStore, FAVORITES_KEY};
    use readaloud_media::{NullHost, ScriptedHost};
    use readaloud_tts::MockSynthesizer;
    use readaloud_understanding::MockRecognizer;

    struct Fixture {
        page: ReaderPage,
        synth: Arc<MockSynthesizer>,
        recognizer: Arc<MockRecognizer>,
        store: Arc<InMemoryStore>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture(recognizer: MockRecognizer) -> Fixture {
        let synth = Arc::new(MockSynthesizer::new());
        let recognizer = Arc::new(recognizer);
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let audio = AudioOrchestrator::new(
            synth.clone(),
            Arc::new(ScriptedHost::succeeding()),
            notifier.clone(),
        );
        let page = ReaderPage::new(audio, recognizer.clone(), FavoritesBook::new(store.clone()));
        Fixture {
            page,
            synth,
            recognizer,
            store,
            notifier,
        }
    }

    #[tokio::test]
    async fn non_image_is_refused_without_reading() {
        let mut f = fixture(MockRecognizer::with_text("hello"));
        let items = f.page.recognize_file(Path::new("/nonexistent/notes.txt")).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(f.recognizer.calls(), 0);
        assert_eq!(
            f.notifier.notices(),
            vec![Notice::NotAnImage {
                name: "notes.txt".into()
            }]
        );
    }

    #[tokio::test]
    async fn recognized_lines_become_items() {
        let mut f = fixture(MockRecognizer::with_text("The cat\n\nsat on\n  \nthe mat"));
        let items = f.page.recognize_bytes(&[0x89, b'P', b'N', b'G'], "image/png").await.unwrap();
        let contents: Vec<_> = items.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["The cat", "sat on", "the mat"]);
        assert!(items[0].id.starts_with("text-0-"));
        assert!(items[2].id.starts_with("text-2-"));
        assert!(f.notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn empty_recognition_notifies() {
        let mut f = fixture(MockRecognizer::empty());
        let items = f.page.recognize_bytes(b"img", "image/jpeg").await.unwrap();
        assert!(items.is_empty());
        assert_eq!(f.notifier.notices(), vec![Notice::NoTextRecognized]);
    }

    #[tokio::test]
    async fn recognition_failure_notifies_and_errors() {
        let mut f = fixture(MockRecognizer::failing());
        let err = f.page.recognize_bytes(b"img", "image/jpeg").await.unwrap_err();
        assert!(matches!(err, ReadAloudError::Collaborator { collaborator: "ocr", .. }));
        assert_eq!(f.notifier.notices(), vec![Notice::RecognitionFailed]);
    }

    #[tokio::test]
    async fn play_all_joins_and_lowercases() {
        let mut f = fixture(MockRecognizer::with_text("The Cat\nSAT"));
        f.page.recognize_bytes(b"img", "image/png").await.unwrap();

        let outcome = f.page.play_all().await;
        assert_eq!(
            outcome,
            AudioRequestOutcome::Played(PlaybackOutcome::Succeeded {
                stage: PlaybackStage::Primary
            })
        );
        assert_eq!(f.synth.requests(), vec!["the cat sat".to_string()]);
    }

    #[tokio::test]
    async fn play_all_with_nothing_scanned() {
        let f = fixture(MockRecognizer::empty());
        assert_eq!(f.page.play_all().await, AudioRequestOutcome::Rejected);
        assert_eq!(f.synth.calls(), 0);
        assert_eq!(f.notifier.notices(), vec![Notice::NothingToPlay]);
    }

    #[tokio::test]
    async fn play_item_speaks_one_lowercased_line() {
        let mut f = fixture(MockRecognizer::with_text("apple\nBanana"));
        f.page.recognize_bytes(b"img", "image/png").await.unwrap();
        f.page.play_item(1).await;
        assert_eq!(f.synth.requests(), vec!["banana".to_string()]);
    }

    #[tokio::test]
    async fn play_item_out_of_range_is_rejected() {
        let mut f = fixture(MockRecognizer::with_text("apple"));
        f.page.recognize_bytes(b"img", "image/png").await.unwrap();
        assert_eq!(f.page.play_item(5).await, AudioRequestOutcome::Rejected);
        assert_eq!(f.synth.calls(), 0);
        assert_eq!(f.notifier.notices(), vec![Notice::NothingToPlay]);
    }

    #[tokio::test]
    async fn favorite_all_merges_normalized_lines() {
        let mut f = fixture(MockRecognizer::with_text(" Dog\nBIRD\ndog"));
        f.store
            .set(FAVORITES_KEY, r#"["cat","dog"]"#)
            .await
            .unwrap();
        f.page.recognize_bytes(b"img", "image/png").await.unwrap();

        let report = f.page.favorite_all().await.unwrap().unwrap();
        assert_eq!(report.submitted, 3);
        assert_eq!(f.page.favorites().await.unwrap(), vec!["cat", "dog", "bird"]);
        assert_eq!(f.notifier.notices(), vec![Notice::Favorited { count: 3 }]);
    }

    #[tokio::test]
    async fn favorite_all_with_nothing_scanned() {
        let f = fixture(MockRecognizer::empty());
        assert_eq!(f.page.favorite_all().await.unwrap(), None);
        assert_eq!(f.notifier.notices(), vec![Notice::NothingToFavorite]);
        assert!(f.page.favorites().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn audio_support_reflects_host() {
        let f = fixture(MockRecognizer::empty());
        assert!(f.page.audio_support().is_supported());

        let muted = ReaderPage::new(
            AudioOrchestrator::new(
                Arc::new(MockSynthesizer::new()),
                Arc::new(NullHost),
                Arc::new(RecordingNotifier::new()),
            ),
            Arc::new(MockRecognizer::empty()),
            FavoritesBook::new(Arc::new(InMemoryStore::new())),
        );
        let support = muted.audio_support();
        assert_eq!(support.host, "null");
        assert!(!support.is_supported());
    }
}
