use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::ocr::TextRecognizer;

enum Reply {
    Text(Option<String>),
    Fail,
}

/// A recognizer with a fixed answer, for tests and offline runs.
pub struct MockRecognizer {
    reply: Reply,
    calls: AtomicUsize,
}

impl MockRecognizer {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(Some(text.into())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            reply: Reply::Text(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Reply::Fail,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for MockRecognizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recognize(&self, _image_data_uri: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => bail!("mock recognition failure"),
        }
    }
}
