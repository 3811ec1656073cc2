//! `say` and `download`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use readaloud_core::AudioHost;
use readaloud_media::DiskSaver;
use readaloud_reader::{AudioOrchestrator, AudioRequestOutcome};
use readaloud_understanding::trim_text;

use crate::app::App;
use crate::terminal_output::{note_info, note_warn};

/// Returns whether the word was spoken.
pub async fn say(app: &App, word: &str, clean: bool) -> Result<bool> {
    let word = if clean { trim_text(word) } else { word.to_string() };
    let audio = app.orchestrator(app.synthesizer()?);
    let outcome = audio.generate_and_play(&word).await;
    report(app, &audio, &outcome);
    settle(Arc::clone(audio.host())).await;
    Ok(spoke(&outcome))
}

/// Returns whether the file was written.
pub async fn download(
    app: &App,
    word: &str,
    filename: Option<&str>,
    dir: Option<PathBuf>,
) -> Result<bool> {
    let audio = app
        .orchestrator(app.synthesizer()?)
        .with_saver(Arc::new(DiskSaver::new(app.download_dir(dir))));
    Ok(save(&audio, word, filename).await)
}

// Failures were already shown as notices; only the exit status is left.
async fn save(audio: &AudioOrchestrator, word: &str, filename: Option<&str>) -> bool {
    audio.download(word, filename).await.is_ok()
}

/// Only a completed playback counts; a host without audio output did not speak.
pub fn spoke(outcome: &AudioRequestOutcome) -> bool {
    matches!(outcome, AudioRequestOutcome::Played(played) if played.is_success())
}

pub fn report(app: &App, audio: &AudioOrchestrator, outcome: &AudioRequestOutcome) {
    match outcome {
        AudioRequestOutcome::Skipped => note_warn(&format!(
            "No audio output on host '{}'; rebuild with `--features speaker` or use `download`",
            audio.host().name()
        )),
        AudioRequestOutcome::Played(played) if played.is_success() && app.mute => {
            note_info("Muted: playback pipeline completed without sound")
        }
        _ => {}
    }
}

/// Let clips that are still sounding finish before the process exits.
pub async fn settle(host: Arc<dyn AudioHost>) {
    let _ = tokio::task::spawn_blocking(move || host.wait_until_quiet()).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use readaloud_core::{PlaybackError, PlaybackOutcome, PlaybackStage, RecordingNotifier};
    use readaloud_media::ScriptedHost;
    use readaloud_tts::MockSynthesizer;

    fn orchestrator(synth: MockSynthesizer, dir: PathBuf) -> AudioOrchestrator {
        AudioOrchestrator::new(
            Arc::new(synth),
            Arc::new(ScriptedHost::succeeding()),
            Arc::new(RecordingNotifier::new()),
        )
        .with_saver(Arc::new(DiskSaver::new(dir)))
    }

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("readaloud-cli-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn only_completed_playback_counts_as_spoken() {
        assert!(spoke(&AudioRequestOutcome::Played(PlaybackOutcome::Succeeded {
            stage: PlaybackStage::Fallback
        })));
        assert!(!spoke(&AudioRequestOutcome::Played(PlaybackOutcome::Failed {
            primary: PlaybackError::PlayRejected("blocked".into()),
            fallback: PlaybackError::StreamClosed,
        })));
        assert!(!spoke(&AudioRequestOutcome::SynthesisFailed));
        assert!(!spoke(&AudioRequestOutcome::Rejected));
        assert!(!spoke(&AudioRequestOutcome::Skipped));
    }

    #[tokio::test]
    async fn failed_synthesis_is_not_saved() {
        let dir = scratch_dir();
        let audio = orchestrator(MockSynthesizer::failing(), dir.clone());
        assert!(!save(&audio, "hello", None).await);
        assert!(!dir.join("hello.wav").exists());
    }

    #[tokio::test]
    async fn successful_download_is_saved() {
        let dir = scratch_dir();
        let audio = orchestrator(MockSynthesizer::new(), dir.clone());
        assert!(save(&audio, "hello", None).await);
        assert!(dir.join("hello.wav").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
