pub mod error;
pub mod event;
pub mod notice;
pub mod traits;
pub mod types;

pub use error::{PlaybackError, ReadAloudError, TransportError};
pub use event::{MediaEvent, PlaybackState};
pub use notice::{Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use traits::{AudioHost, FileSaver, MediaEvents, PlaybackPrimitive, PrimitiveKind};
pub use types::{
    PlaybackOutcome, PlaybackSession, PlaybackStage, RawAudioPayload, TransportAudioUri,
    WAV_MEDIA_TYPE,
};
