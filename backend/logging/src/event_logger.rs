//! Playback Event Logger
//!
//! Structured playback lifecycle records emitted under the
//! `playback_events` target so they can be filtered into their own stream.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum PlaybackEvent {
    SessionStarted {
        stage: String,
        source_len: usize,
    },
    StageFailed {
        stage: String,
        reason: String,
    },
    SessionFinished {
        stage: String,
        succeeded: bool,
        elapsed_ms: u64,
    },
}

#[derive(Debug, Serialize)]
pub struct PlaybackLogEntry {
    pub session_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: PlaybackEvent,
}

pub struct PlaybackEventLogger;

impl PlaybackEventLogger {
    /// Redacts free-text fields and hands the entry to `tracing`.
    pub fn log_event(session_id: Uuid, mut event: PlaybackEvent) -> PlaybackLogEntry {
        if let PlaybackEvent::StageFailed { reason, .. } = &mut event {
            *reason = redact_sensitive_data(reason);
        }

        let entry = PlaybackLogEntry {
            session_id,
            timestamp: Utc::now(),
            event,
        };

        info!(target: "playback_events", event = ?entry, "Playback event");
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_reason_is_redacted() {
        let entry = PlaybackEventLogger::log_event(
            Uuid::new_v4(),
            PlaybackEvent::StageFailed {
                stage: "primary".into(),
                reason: "rejected Bearer abc.def.ghi".into(),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "StageFailed");
        assert!(!json["event"]["reason"].as_str().unwrap().contains("abc.def.ghi"));
    }
}
