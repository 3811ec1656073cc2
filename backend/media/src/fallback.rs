//! Fallback playback: a fresh audio context with a stronger readiness
//! precondition and a bounded wait.
//!
//! Three signals race: a decode error, the play request being accepted, and
//! the timeout. The first to settle wins; the primitive is dropped with
//! whatever else is still pending.

use std::sync::Arc;
use std::time::Duration;

use readaloud_core::{
    AudioHost, MediaEvent, MediaEvents, PlaybackError, PlaybackSession, PlaybackStage,
    PlaybackState, PrimitiveKind, TransportAudioUri,
};
use tracing::{debug, info, warn};

/// Default bound on waiting for the fallback to start.
pub const DEFAULT_FALLBACK_TIMEOUT: Duration = Duration::from_secs(5);

pub struct FallbackEngine {
    host: Arc<dyn AudioHost>,
    timeout: Duration,
}

impl FallbackEngine {
    pub fn new(host: Arc<dyn AudioHost>) -> Self {
        Self {
            host,
            timeout: DEFAULT_FALLBACK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Succeeds as soon as output starts; does not wait for the clip to end.
    pub async fn play(&self, uri: &TransportAudioUri) -> Result<(), PlaybackError> {
        let mut session = PlaybackSession::new(PlaybackStage::Fallback, uri.clone());
        let result = match tokio::time::timeout(self.timeout, self.drive(&mut session)).await {
            Ok(result) => result,
            Err(_) => Err(PlaybackError::FallbackTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };
        match &result {
            Ok(()) => info!(session_id = %session.id, "Fallback playback started"),
            Err(e) => warn!(session_id = %session.id, error = %e, "Fallback playback failed"),
        }
        session.resolve(result)
    }

    async fn drive(&self, session: &mut PlaybackSession) -> Result<(), PlaybackError> {
        let mut context = self.host.open(PrimitiveKind::FreshContext)?;
        let mut events = context.load(session.source())?;
        session.transition(PlaybackState::Loading);

        wait_until_buffered(&mut events).await?;
        debug!(session_id = %session.id, "Fallback clip fully buffered");

        tokio::select! {
            started = context.play() => {
                started?;
                session.transition(PlaybackState::Playing);
                Ok(())
            }
            failure = next_error(&mut events) => Err(failure),
        }
    }
}

async fn wait_until_buffered(events: &mut MediaEvents) -> Result<(), PlaybackError> {
    loop {
        match events.recv().await {
            Some(MediaEvent::CanPlayThrough) => return Ok(()),
            Some(MediaEvent::Error(detail)) => return Err(PlaybackError::Decode(detail)),
            Some(_) => continue,
            None => return Err(PlaybackError::StreamClosed),
        }
    }
}

/// Resolves on the first error signal; pends forever if none comes.
async fn next_error(events: &mut MediaEvents) -> PlaybackError {
    loop {
        match events.recv().await {
            Some(MediaEvent::Error(detail)) => return PlaybackError::Decode(detail),
            Some(_) => continue,
            None => std::future::pending::<()>().await,
        }
    }
}
