use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::PlaybackError;
use crate::event::PlaybackState;

/// Media type of every clip the synthesis collaborator returns.
pub const WAV_MEDIA_TYPE: &str = "audio/wav";

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Encoded audio clip exactly as the synthesis collaborator returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAudioPayload(Bytes);

impl RawAudioPayload {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the payload starts with a RIFF/WAVE header.
    pub fn looks_like_wav(&self) -> bool {
        self.0.len() >= 12 && &self.0[0..4] == b"RIFF" && &self.0[8..12] == b"WAVE"
    }
}

impl From<Vec<u8>> for RawAudioPayload {
    fn from(v: Vec<u8>) -> Self {
        Self(Bytes::from(v))
    }
}

impl From<Bytes> for RawAudioPayload {
    fn from(b: Bytes) -> Self {
        Self(b)
    }
}

/// Self-contained `data:` URI carrying a whole audio clip.
///
/// Clones share the underlying string. The empty value means "nothing to
/// play" and must never reach a playback engine.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TransportAudioUri(Arc<str>);

impl TransportAudioUri {
    pub fn empty() -> Self {
        Self(Arc::from(""))
    }

    /// Assemble `data:<media_type>;base64,<encoded>`.
    pub fn from_base64(media_type: &str, encoded: &str) -> Self {
        let mut s = String::with_capacity(media_type.len() + encoded.len() + 13);
        s.push_str("data:");
        s.push_str(media_type);
        s.push_str(";base64,");
        s.push_str(encoded);
        Self(Arc::from(s))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The media type between `data:` and `;base64,`, if well formed.
    pub fn media_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let end = rest.find(";base64,")?;
        Some(&rest[..end])
    }
}

impl fmt::Debug for TransportAudioUri {
    // Clips run to hundreds of kilobytes; keep logs readable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(40).collect();
        f.debug_struct("TransportAudioUri")
            .field("head", &head)
            .field("len", &self.0.len())
            .finish()
    }
}

impl fmt::Display for TransportAudioUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Playback outcome
// ---------------------------------------------------------------------------

/// Which strategy produced a playback result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStage {
    Primary,
    Fallback,
}

impl fmt::Display for PlaybackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// The single caller-visible result of one logical playback request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Succeeded { stage: PlaybackStage },
    Failed {
        primary: PlaybackError,
        fallback: PlaybackError,
    },
}

impl PlaybackOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Transient handle for one playback attempt.
#[derive(Debug)]
pub struct PlaybackSession {
    pub id: Uuid,
    pub stage: PlaybackStage,
    source: TransportAudioUri,
    state: PlaybackState,
    outcome: Option<Result<(), PlaybackError>>,
}

impl PlaybackSession {
    pub fn new(stage: PlaybackStage, source: TransportAudioUri) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage,
            source,
            state: PlaybackState::Idle,
            outcome: None,
        }
    }

    pub fn source(&self) -> &TransportAudioUri {
        &self.source
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn outcome(&self) -> Option<&Result<(), PlaybackError>> {
        self.outcome.as_ref()
    }

    /// Move to `next`. Illegal edges are logged and ignored.
    pub fn transition(&mut self, next: PlaybackState) -> bool {
        if self.state == next {
            return true;
        }
        if !self.state.can_transition_to(next) {
            warn!(
                session_id = %self.id,
                from = ?self.state,
                to = ?next,
                "Ignoring illegal playback transition"
            );
            return false;
        }
        self.state = next;
        true
    }

    /// Record the single outcome. Later calls are ignored.
    pub fn resolve(&mut self, result: Result<(), PlaybackError>) -> Result<(), PlaybackError> {
        if let Some(existing) = &self.outcome {
            return existing.clone();
        }
        self.state = if result.is_ok() {
            PlaybackState::Ended
        } else {
            PlaybackState::Error
        };
        self.outcome = Some(result.clone());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> TransportAudioUri {
        TransportAudioUri::from_base64(WAV_MEDIA_TYPE, "UklGRg==")
    }

    #[test]
    fn uri_layout() {
        let u = uri();
        assert_eq!(u.as_str(), "data:audio/wav;base64,UklGRg==");
        assert_eq!(u.media_type(), Some("audio/wav"));
        assert!(!u.is_empty());
        assert!(TransportAudioUri::empty().is_empty());
    }

    #[test]
    fn debug_output_is_truncated() {
        let long = TransportAudioUri::from_base64(WAV_MEDIA_TYPE, &"A".repeat(10_000));
        assert!(format!("{long:?}").len() < 200);
    }

    #[test]
    fn payload_wav_sniffing() {
        let mut wav = b"RIFF\0\0\0\0WAVEfmt ".to_vec();
        assert!(RawAudioPayload::from(wav.clone()).looks_like_wav());
        wav[8] = b'X';
        assert!(!RawAudioPayload::from(wav).looks_like_wav());
        assert!(!RawAudioPayload::from(b"{\"error\":1}".to_vec()).looks_like_wav());
    }

    #[test]
    fn session_resolves_once() {
        let mut session = PlaybackSession::new(PlaybackStage::Primary, uri());
        assert!(session.transition(PlaybackState::Loading));
        assert!(session.transition(PlaybackState::Playing));
        assert!(session.resolve(Ok(())).is_ok());
        assert_eq!(session.state(), PlaybackState::Ended);

        let again = session.resolve(Err(PlaybackError::StreamClosed));
        assert!(again.is_ok());
        assert_eq!(session.outcome(), Some(&Ok(())));
    }

    #[test]
    fn session_rejects_illegal_edges() {
        let mut session = PlaybackSession::new(PlaybackStage::Fallback, uri());
        assert!(!session.transition(PlaybackState::Playing));
        assert_eq!(session.state(), PlaybackState::Idle);
    }
}
