use readaloud_core::{AudioHost, PlaybackError, PlaybackPrimitive, PrimitiveKind};

/// Host with no audio capabilities at all. Every audio operation degrades to
/// a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl AudioHost for NullHost {
    fn name(&self) -> &str {
        "null"
    }

    fn supports_encoding(&self) -> bool {
        false
    }

    fn supports_playback(&self) -> bool {
        false
    }

    fn open(&self, kind: PrimitiveKind) -> Result<Box<dyn PlaybackPrimitive>, PlaybackError> {
        Err(PlaybackError::Unavailable(format!("{kind:?} is not available without an audio host")))
    }
}
