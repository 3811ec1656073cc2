use thiserror::Error;

/// Top-level error type for the readaloud runtime.
#[derive(Debug, Error)]
pub enum ReadAloudError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{collaborator} collaborator error: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },

    #[error("audio encoding is not available on this host")]
    EncodingUnavailable,

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReadAloudError {
    pub fn collaborator(collaborator: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Collaborator {
            collaborator,
            message: err.to_string(),
        }
    }
}

/// Failure of a single playback attempt (primary or fallback).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The host refused the play request (autoplay blocked, no output device).
    #[error("play request rejected: {0}")]
    PlayRejected(String),

    /// The primitive could not decode or render the source.
    #[error("decode error: {0}")]
    Decode(String),

    /// The primitive stopped reporting events before a terminal signal.
    #[error("primitive event stream closed before playback finished")]
    StreamClosed,

    /// The fallback primitive never became ready.
    #[error("fallback playback timed out after {timeout_ms}ms")]
    FallbackTimeout { timeout_ms: u64 },

    /// The host cannot provide the requested primitive at all.
    #[error("playback primitive unavailable: {0}")]
    Unavailable(String),
}

/// Failure to read a transport URI back into bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport URI is empty")]
    Empty,

    #[error("transport URI does not start with `data:`")]
    MissingScheme,

    #[error("transport URI has no `;base64,` marker")]
    MissingBase64Marker,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_error_names_the_service() {
        let err = ReadAloudError::collaborator("tts", "503 Service Unavailable");
        assert_eq!(
            err.to_string(),
            "tts collaborator error: 503 Service Unavailable"
        );
    }

    #[test]
    fn playback_error_converts() {
        let err: ReadAloudError = PlaybackError::FallbackTimeout { timeout_ms: 5000 }.into();
        assert!(err.to_string().contains("5000ms"));
    }
}
