//! Optical Character Recognition (OCR)
//!
//! Sends an image (as a `data:` URI) to a vision chat-completions endpoint and
//! asks for the printed text back, one line per line.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

pub const DEFAULT_OCR_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_OCR_MODEL: &str = "Qwen/Qwen2.5-VL-7B-Instruct";
pub const DEFAULT_OCR_PROMPT: &str = "Extract every printed word in this image. \
Reply with the text only, keeping one line of output per line of text.";

/// Reads printed text out of an image.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the recognized text, or `None` when the service found nothing.
    async fn recognize(&self, image_data_uri: &str) -> Result<Option<String>>;
}

/// OpenAI-compatible vision endpoint used as an OCR engine.
pub struct VisionOcr {
    api_key: Option<String>,
    model: String,
    base_url: String,
    prompt: String,
    client: reqwest::Client,
}

impl VisionOcr {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            model: DEFAULT_OCR_MODEL.to_string(),
            base_url: DEFAULT_OCR_BASE_URL.to_string(),
            prompt: DEFAULT_OCR_PROMPT.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    fn request_body(&self, image_data_uri: &str) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": self.prompt },
                    { "type": "image_url", "image_url": { "url": image_data_uri } }
                ]
            }],
            "max_tokens": 1024
        })
    }
}

/// Pull `choices[0].message.content` out of a chat-completions response.
pub fn extract_content(json: &Value) -> Option<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[async_trait]
impl TextRecognizer for VisionOcr {
    fn name(&self) -> &str {
        "vision"
    }

    async fn recognize(&self, image_data_uri: &str) -> Result<Option<String>> {
        info!("[OCR] Recognizing image ({} bytes inline) via {}", image_data_uri.len(), self.model);
        let mut req = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&self.request_body(image_data_uri));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await.context("OCR request failed")?;
        if !resp.status().is_success() {
            let status = resp.status();
            bail!("OCR service error {status}: {}", resp.text().await.unwrap_or_default());
        }
        let json: Value = resp.json().await.context("OCR response is not JSON")?;
        Ok(extract_content(&json))
    }
}
