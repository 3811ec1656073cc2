/// Speech synthesis collaborator trait and HTTP implementations
/// (Hugging Face Inference + OpenAI-compatible speech endpoint).
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use readaloud_core::RawAudioPayload;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_HF_MODEL: &str = "facebook/mms-tts-eng";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Turns text into a WAV clip.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    async fn synthesize(&self, text: &str) -> Result<RawAudioPayload>;
}

/// Reject bodies that cannot be audio: empty, or an error document served
/// with a 200.
pub fn validate_audio_response(content_type: Option<&str>, body: Bytes) -> Result<RawAudioPayload> {
    if body.is_empty() {
        bail!("synthesis service returned an empty body");
    }
    if let Some(ct) = content_type {
        if ct.starts_with("application/json") || ct.starts_with("text/") {
            let preview = String::from_utf8_lossy(&body[..body.len().min(200)]).into_owned();
            bail!("synthesis service returned {ct} instead of audio: {preview}");
        }
    }
    let payload = RawAudioPayload::new(body);
    if !payload.looks_like_wav() {
        warn!(
            content_type = content_type.unwrap_or("<none>"),
            bytes = payload.len(),
            "Synthesis payload has no RIFF/WAVE header; passing it through"
        );
    }
    Ok(payload)
}

async fn read_audio(resp: reqwest::Response) -> Result<RawAudioPayload> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("synthesis service error {status}: {body}");
    }
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = resp.bytes().await.context("Failed to read synthesis response body")?;
    validate_audio_response(content_type.as_deref(), body)
}

// ---------------------------------------------------------------------------
// Hugging Face Inference
// ---------------------------------------------------------------------------

pub struct HuggingFaceTts {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: Client,
}

impl HuggingFaceTts {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            model: DEFAULT_HF_MODEL.to_string(),
            base_url: DEFAULT_HF_BASE_URL.to_string(),
            client: Client::new(),
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

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.model)
    }
}

#[derive(Serialize)]
struct HuggingFaceBody<'a> {
    inputs: &'a str,
}

#[async_trait]
impl SpeechSynthesizer for HuggingFaceTts {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn synthesize(&self, text: &str) -> Result<RawAudioPayload> {
        info!("[TTS/HuggingFace] Synthesizing {} chars with model={}", text.len(), self.model);
        let mut req = self
            .client
            .post(self.endpoint())
            .header(reqwest::header::ACCEPT, "audio/wav")
            .json(&HuggingFaceBody { inputs: text });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await.context("Hugging Face TTS request failed")?;
        read_audio(resp).await
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible speech
// ---------------------------------------------------------------------------

pub struct OpenAiTts {
    api_key: String,
    model: String,
    default_voice: String,
    base_url: String,
    client: Client,
}

impl OpenAiTts {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "tts-1".to_string(),
            default_voice: "nova".to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = voice.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct OpenAiTtsBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'static str,
}

#[async_trait]
impl SpeechSynthesizer for OpenAiTts {
    fn name(&self) -> &str {
        "openai"
    }

    async fn synthesize(&self, text: &str) -> Result<RawAudioPayload> {
        let body = OpenAiTtsBody {
            model: &self.model,
            input: text,
            voice: &self.default_voice,
            response_format: "wav",
        };
        info!("[TTS/OpenAI] Synthesizing with model={}", body.model);
        let resp = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("OpenAI TTS request failed")?;
        read_audio(resp).await
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

pub enum SynthesizerKind {
    HuggingFace {
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
    },
    OpenAi {
        api_key: String,
        model: Option<String>,
        voice: Option<String>,
        base_url: Option<String>,
    },
}

pub fn create_synthesizer(kind: SynthesizerKind) -> Box<dyn SpeechSynthesizer> {
    match kind {
        SynthesizerKind::HuggingFace { api_key, model, base_url } => {
            let mut tts = HuggingFaceTts::new(api_key);
            if let Some(model) = model {
                tts = tts.with_model(model);
            }
            if let Some(url) = base_url {
                tts = tts.with_base_url(url);
            }
            Box::new(tts)
        }
        SynthesizerKind::OpenAi { api_key, model, voice, base_url } => {
            let mut tts = OpenAiTts::new(api_key);
            if let Some(model) = model {
                tts = tts.with_model(model);
            }
            if let Some(voice) = voice {
                tts = tts.with_voice(voice);
            }
            if let Some(url) = base_url {
                tts = tts.with_base_url(url);
            }
            Box::new(tts)
        }
    }
}
