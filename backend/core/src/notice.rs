//! User-facing notices: the alert-style messages a reader sees.

use std::fmt;
use std::sync::Mutex;

/// Severity used by front ends to style a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Every message the reader surfaces to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    EmptyWord,
    SynthesisFailed,
    PlaybackFailed,
    DownloadFailed,
    Saved { location: String },
    NotAnImage { name: String },
    RecognitionFailed,
    NoTextRecognized,
    NothingToPlay,
    NothingToFavorite,
    Favorited { count: usize },
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::Saved { .. } | Self::Favorited { .. } => NoticeLevel::Info,
            Self::EmptyWord
            | Self::NotAnImage { .. }
            | Self::NoTextRecognized
            | Self::NothingToPlay
            | Self::NothingToFavorite => NoticeLevel::Warning,
            Self::SynthesisFailed
            | Self::PlaybackFailed
            | Self::DownloadFailed
            | Self::RecognitionFailed => NoticeLevel::Error,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWord => f.write_str("Please enter a word"),
            Self::SynthesisFailed => f.write_str("Failed to generate audio, please retry"),
            Self::PlaybackFailed => f.write_str("Audio could not be played on this device"),
            Self::DownloadFailed => f.write_str("Failed to download audio"),
            Self::Saved { location } => write!(f, "Saved audio to {location}"),
            Self::NotAnImage { name } => write!(f, "Please choose an image file (got {name})"),
            Self::RecognitionFailed => f.write_str("Text recognition failed, please retry"),
            Self::NoTextRecognized => f.write_str("No text was recognized"),
            Self::NothingToPlay => f.write_str("There is no text to play"),
            Self::NothingToFavorite => f.write_str("There are no words to favorite"),
            Self::Favorited { count } => write!(f, "Added {count} words to favorites"),
        }
    }
}

/// Sink for user-facing notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Keeps every notice in memory; handy in tests and for batch front ends.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
