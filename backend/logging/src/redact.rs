//! Log Redaction Layer
//!
//! Scrubs API keys and access tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{20,})|(hf_[a-zA-Z0-9]{20,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)")
        .unwrap()
});

/// Inline base64 payloads: keep the media type, drop the body.
static DATA_URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"data:([a-z]+/[a-z0-9.+\-]+);base64,[A-Za-z0-9+/=]{64,}").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    DATA_URI_RE
        .replace_all(&redacted, "data:$1;base64,[ELIDED]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "calling with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9 and hf_abcdefghijklmnopqrstuvwxyz";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(!clean.contains("hf_abcdefghijklmnopqrstuvwxyz"));
    }

    #[test]
    fn test_data_uri_elided() {
        let raw = format!("src=data:audio/wav;base64,{}", "QUJD".repeat(40));
        assert_eq!(redact_sensitive_data(&raw), "src=data:audio/wav;base64,[ELIDED]");
    }
}
