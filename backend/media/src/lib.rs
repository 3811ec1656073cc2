//! Audio delivery: transport encoding, primary and fallback playback, the
//! two-stage pipeline, audio hosts, and the file-save side channel.

pub mod fallback;
pub mod host;
pub mod mime_detect;
pub mod pipeline;
pub mod playback;
pub mod save;
pub mod transport;

pub use fallback::{FallbackEngine, DEFAULT_FALLBACK_TIMEOUT};
pub use host::{NullHost, PlayReply, Script, ScriptedHost};
#[cfg(feature = "speaker")]
pub use host::SpeakerHost;
pub use mime_detect::{detect_mime_type, is_audio, is_image};
pub use pipeline::PlaybackPipeline;
pub use playback::PlaybackEngine;
pub use save::{sanitize_filename, DiskSaver};
pub use transport::{data_uri, decode, decode_str, encode, encode_with_media_type, encoded_len, WAV_DATA_URI_PREFIX};
