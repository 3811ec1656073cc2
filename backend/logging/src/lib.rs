//! Telemetry and structured logging components for readaloud.
//!
//! Handles log redaction, console/NDJSON output, file rotation, and playback
//! lifecycle event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{PlaybackEvent, PlaybackEventLogger, PlaybackLogEntry};
pub use logger::{init_logger, LOG_FILE_PREFIX};
pub use redact::redact_sensitive_data;
