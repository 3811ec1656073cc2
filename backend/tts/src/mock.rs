use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use readaloud_core::RawAudioPayload;

use crate::engine::SpeechSynthesizer;

/// A synthesizer that returns a canned clip (or fails) and records requests.
pub struct MockSynthesizer {
    payload: Option<RawAudioPayload>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl MockSynthesizer {
    /// Returns a tiny valid WAV clip for every request.
    pub fn new() -> Self {
        Self {
            payload: Some(RawAudioPayload::from(silent_wav(8))),
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request.
    pub fn failing() -> Self {
        Self {
            payload: None,
            ..Self::new()
        }
    }

    pub fn with_payload(mut self, payload: impl Into<RawAudioPayload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(&self, text: &str) -> Result<RawAudioPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(text.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.payload {
            Some(payload) => Ok(payload.clone()),
            None => bail!("mock synthesis failure"),
        }
    }
}

/// Build a mono 16-bit 8 kHz WAV clip of `samples` zero samples.
pub fn silent_wav(samples: u32) -> Vec<u8> {
    let data_len = samples * 2;
    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&8_000u32.to_le_bytes());
    wav.extend_from_slice(&16_000u32.to_le_bytes()); // byte rate
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_each_request() {
        let tts = MockSynthesizer::new();
        tts.synthesize("cat").await.unwrap();
        tts.synthesize("cat").await.unwrap();
        assert_eq!(tts.calls(), 2);
        assert_eq!(tts.requests(), vec!["cat", "cat"]);
    }

    #[tokio::test]
    async fn failing_mock_still_counts() {
        let tts = MockSynthesizer::failing();
        assert!(tts.synthesize("cat").await.is_err());
        assert_eq!(tts.calls(), 1);
    }

    #[test]
    fn silent_wav_has_header() {
        let wav = silent_wav(4);
        assert_eq!(wav.len(), 52);
        assert!(RawAudioPayload::from(wav).looks_like_wav());
    }
}
