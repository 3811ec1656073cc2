//! File-save side channel: writes a transport URI's bytes to disk.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use readaloud_core::{FileSaver, TransportAudioUri};
use tokio::fs;
use tracing::{info, warn};

use crate::mime_detect::is_audio;
use crate::transport;

/// Saves clips into a fixed directory.
#[derive(Debug, Clone)]
pub struct DiskSaver {
    dir: PathBuf,
}

impl DiskSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Make a suggested filename safe to join onto a directory.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "audio.wav".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl FileSaver for DiskSaver {
    async fn save(&self, source: &TransportAudioUri, filename: &str) -> Result<PathBuf> {
        match source.media_type() {
            Some(mime) if is_audio(mime) => {}
            Some(mime) => warn!(mime, "Saving a non-audio transport URI"),
            None => bail!("not a base64 data URI"),
        }
        let bytes = transport::decode(source)?;

        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create download directory: {}", self.dir.display()))?;

        let path = self.dir.join(sanitize_filename(filename));
        fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write audio file: {}", path.display()))?;

        info!(path = %path.display(), bytes = bytes.len(), "Saved audio");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::encode_with_media_type;

    #[test]
    fn sanitizes_traversal() {
        assert_eq!(sanitize_filename("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_filename("hello.wav"), "hello.wav");
        assert_eq!(sanitize_filename("   "), "audio.wav");
    }

    #[tokio::test]
    async fn writes_decoded_bytes() {
        let dir = std::env::temp_dir().join(format!("readaloud-save-{}", uuid::Uuid::new_v4()));
        let saver = DiskSaver::new(&dir);
        let uri = encode_with_media_type(b"RIFFdataWAVE", "audio/wav");

        let path = saver.save(&uri, "hello.wav").await.unwrap();
        assert_eq!(path, dir.join("hello.wav"));
        assert_eq!(std::fs::read(&path).unwrap(), b"RIFFdataWAVE");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn refuses_non_data_uri() {
        let saver = DiskSaver::new(std::env::temp_dir());
        assert!(saver.save(&TransportAudioUri::empty(), "x.wav").await.is_err());
    }
}
