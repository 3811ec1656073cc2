//! Binary-to-transport encoding: audio bytes ⇄ self-contained `data:` URIs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use readaloud_core::{
    AudioHost, RawAudioPayload, TransportAudioUri, TransportError, WAV_MEDIA_TYPE,
};
use tracing::debug;

/// Fixed marker every WAV transport URI starts with.
pub const WAV_DATA_URI_PREFIX: &str = "data:audio/wav;base64,";

/// Encode a WAV payload for playback on `host`.
///
/// Returns the empty URI when the host cannot encode; callers treat that as
/// "nothing to do".
pub fn encode(payload: &RawAudioPayload, host: &dyn AudioHost) -> TransportAudioUri {
    if !host.supports_encoding() {
        debug!(host = host.name(), "Host cannot encode audio; skipping");
        return TransportAudioUri::empty();
    }
    encode_with_media_type(payload.as_bytes(), WAV_MEDIA_TYPE)
}

/// Encode arbitrary bytes as `data:<media_type>;base64,…`.
pub fn encode_with_media_type(bytes: &[u8], media_type: &str) -> TransportAudioUri {
    TransportAudioUri::from_base64(media_type, &STANDARD.encode(bytes))
}

/// Plain `data:` URI string for non-audio content such as uploaded images.
pub fn data_uri(bytes: &[u8], media_type: &str) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// Exact length of the transport URI for a `len`-byte WAV payload.
pub fn encoded_len(len: usize) -> usize {
    WAV_DATA_URI_PREFIX.len() + len.div_ceil(3) * 4
}

/// Recover the original bytes from a transport URI.
pub fn decode(uri: &TransportAudioUri) -> Result<Vec<u8>, TransportError> {
    decode_str(uri.as_str())
}

/// Same as [`decode`] for any `data:` string (images included).
pub fn decode_str(uri: &str) -> Result<Vec<u8>, TransportError> {
    if uri.is_empty() {
        return Err(TransportError::Empty);
    }
    let rest = uri.strip_prefix("data:").ok_or(TransportError::MissingScheme)?;
    let (_, encoded) = rest
        .split_once(";base64,")
        .ok_or(TransportError::MissingBase64Marker)?;
    STANDARD
        .decode(encoded)
        .map_err(|e| TransportError::InvalidBase64(e.to_string()))
}
