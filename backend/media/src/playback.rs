//! Primary playback: a media-element primitive driven from load to end.
//!
//! `Idle -> Loading -> Playing -> Ended` on success,
//! `Idle -> Loading -> Error` when the play request is rejected or the
//! primitive reports an error. Exactly one attempt per call.

use std::sync::Arc;

use readaloud_core::{
    AudioHost, MediaEvent, MediaEvents, PlaybackError, PlaybackSession, PlaybackStage,
    PlaybackState, PrimitiveKind, TransportAudioUri,
};
use tracing::{debug, info, warn};

pub struct PlaybackEngine {
    host: Arc<dyn AudioHost>,
}

impl PlaybackEngine {
    pub fn new(host: Arc<dyn AudioHost>) -> Self {
        Self { host }
    }

    /// Play `uri` to completion. Resolves once, on the end-of-clip signal or
    /// the first failure.
    pub async fn play(&self, uri: &TransportAudioUri) -> Result<(), PlaybackError> {
        let mut session = PlaybackSession::new(PlaybackStage::Primary, uri.clone());
        let result = self.drive(&mut session).await;
        match &result {
            Ok(()) => info!(session_id = %session.id, "Primary playback finished"),
            Err(e) => warn!(session_id = %session.id, error = %e, "Primary playback failed"),
        }
        session.resolve(result)
    }

    async fn drive(&self, session: &mut PlaybackSession) -> Result<(), PlaybackError> {
        let mut element = self.host.open(PrimitiveKind::MediaElement)?;
        let mut events = element.load(session.source())?;
        session.transition(PlaybackState::Loading);

        // Autoplay: ask for output straight away.
        if let Err(rejected) = element.play().await {
            return Err(queued_error(&mut events).unwrap_or(rejected));
        }

        while let Some(event) = events.recv().await {
            match event {
                MediaEvent::LoadedData => debug!(session_id = %session.id, "Audio data loaded"),
                MediaEvent::CanPlayThrough => {}
                MediaEvent::Playing => {
                    session.transition(PlaybackState::Playing);
                    debug!(session_id = %session.id, "Playback started");
                }
                MediaEvent::Ended => return Ok(()),
                MediaEvent::Error(detail) => return Err(PlaybackError::Decode(detail)),
            }
        }
        Err(PlaybackError::StreamClosed)
    }
}

/// A primitive that fails to decode reports why and then stops answering,
/// so its reason may already be waiting behind a rejected play request.
fn queued_error(events: &mut MediaEvents) -> Option<PlaybackError> {
    while let Ok(event) = events.try_recv() {
        if let MediaEvent::Error(detail) = event {
            return Some(PlaybackError::Decode(detail));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{NullHost, Script, ScriptedHost};
    use crate::transport::encode_with_media_type;

    fn clip() -> TransportAudioUri {
        encode_with_media_type(b"RIFF\0\0\0\0WAVE", "audio/wav")
    }

    #[tokio::test]
    async fn plays_to_end() {
        let host = ScriptedHost::succeeding();
        let engine = PlaybackEngine::new(Arc::new(host.clone()));
        assert!(engine.play(&clip()).await.is_ok());
        assert_eq!(host.opened(PrimitiveKind::MediaElement), 1);
        assert_eq!(host.plays(PrimitiveKind::MediaElement), 1);
    }

    #[tokio::test]
    async fn rejected_play_is_an_error() {
        let host = ScriptedHost::new(Script::autoplay_blocked(), Script::completes());
        let engine = PlaybackEngine::new(Arc::new(host));
        assert!(matches!(
            engine.play(&clip()).await,
            Err(PlaybackError::PlayRejected(_))
        ));
    }

    #[tokio::test]
    async fn decode_error_is_reported() {
        let host = ScriptedHost::new(Script::decode_error("bad RIFF chunk"), Script::completes());
        let engine = PlaybackEngine::new(Arc::new(host.clone()));
        assert_eq!(
            engine.play(&clip()).await,
            Err(PlaybackError::Decode("bad RIFF chunk".into()))
        );
        // The primary engine never opens a fallback context itself.
        assert_eq!(host.opened(PrimitiveKind::FreshContext), 0);
    }

    #[tokio::test]
    async fn decoder_exit_reports_decode_reason_over_rejection() {
        let host = ScriptedHost::new(
            Script::decode_error_then_exit("unsupported sample format"),
            Script::completes(),
        );
        let engine = PlaybackEngine::new(Arc::new(host));
        assert_eq!(
            engine.play(&clip()).await,
            Err(PlaybackError::Decode("unsupported sample format".into()))
        );
    }

    #[tokio::test]
    async fn stream_closing_early_fails() {
        let script = Script {
            on_load: vec![MediaEvent::LoadedData],
            play: crate::host::PlayReply::Accept,
            on_play: vec![MediaEvent::Playing],
            hold_open: false,
        };
        let engine = PlaybackEngine::new(Arc::new(ScriptedHost::new(script, Script::completes())));
        assert_eq!(engine.play(&clip()).await, Err(PlaybackError::StreamClosed));
    }

    #[tokio::test]
    async fn missing_host_is_unavailable() {
        let engine = PlaybackEngine::new(Arc::new(NullHost));
        assert!(matches!(
            engine.play(&clip()).await,
            Err(PlaybackError::Unavailable(_))
        ));
    }
}
