//! MIME type detection for user-supplied files.
//!
//! Used to refuse non-image uploads before anything is read or sent.

use std::path::Path;

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "avif"         => "image/avif",
        "bmp"          => "image/bmp",
        "heic"         => "image/heic",
        "tiff" | "tif" => "image/tiff",

        // Audio
        "wav"          => "audio/wav",
        "mp3"          => "audio/mpeg",
        "ogg"          => "audio/ogg",
        "flac"         => "audio/flac",

        _              => "application/octet-stream",
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Whether a MIME type is for audio.
pub fn is_audio(mime: &str) -> bool {
    mime.starts_with("audio/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg() {
        assert_eq!(detect_mime_type(&PathBuf::from("page.JPG")), "image/jpeg");
    }

    #[test]
    fn detects_wav() {
        let mime = detect_mime_type(&PathBuf::from("hello.wav"));
        assert!(is_audio(mime));
        assert!(!is_image(mime));
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_mime_type(&PathBuf::from("notes.txt")), "application/octet-stream");
    }
}
