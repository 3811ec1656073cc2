use serde::{Deserialize, Serialize};

/// Lifecycle signal emitted by a playback primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum MediaEvent {
    /// Enough data is decoded to render the first frame.
    LoadedData,
    /// The whole clip is buffered and decodable without stalling.
    CanPlayThrough,
    /// Audio output has begun.
    Playing,
    /// The clip played to its end.
    Ended,
    /// Decode or render failure.
    Error(String),
}

/// Lifecycle state of a single playback attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Loading,
    Playing,
    Ended,
    Error,
}

impl PlaybackState {
    /// Whether `self -> next` is an edge of the playback state machine.
    pub fn can_transition_to(self, next: PlaybackState) -> bool {
        use PlaybackState::*;
        matches!(
            (self, next),
            (Idle, Loading)
                | (Idle, Error)
                | (Loading, Playing)
                | (Loading, Ended)
                | (Loading, Error)
                | (Playing, Ended)
                | (Playing, Error)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_exits() {
        for next in [
            PlaybackState::Idle,
            PlaybackState::Loading,
            PlaybackState::Playing,
            PlaybackState::Ended,
            PlaybackState::Error,
        ] {
            assert!(!PlaybackState::Ended.can_transition_to(next));
            assert!(!PlaybackState::Error.can_transition_to(next));
        }
    }

    #[test]
    fn error_event_serializes_with_detail() {
        let json = serde_json::to_value(MediaEvent::Error("bad header".into())).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["detail"], "bad header");
    }
}
