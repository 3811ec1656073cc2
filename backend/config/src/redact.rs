//! Config redaction: produce safe-to-share config snapshots by masking sensitive fields.

use serde_json::Value;

/// Keys whose string values are secrets.
static SECRET_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "apikey",
    "accessToken",
    "access_token",
    "token",
    "secret",
    "password",
];

/// Redact a config JSON value, masking every secret as its first four
/// characters followed by `***`.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    // Unresolved `${VAR}` references carry no secret.
    if !is_sensitive_key(key) || s.is_empty() || s.starts_with("${") {
        return Value::String(s.to_string());
    }
    let hint: String = if s.chars().count() > 8 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    };
    Value::String(hint)
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => {
            Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect())
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

/// Collect all field paths that were redacted (for diagnostics).
pub fn collect_redacted_paths(value: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths_recursive(value, "", &mut paths);
    paths
}

fn collect_paths_recursive(value: &Value, path: &str, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() && !s.starts_with("${") => {
            let key = path.rsplit('.').next().unwrap_or("");
            if is_sensitive_key(key) {
                out.push(path.to_string());
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                collect_paths_recursive(v, &child_path, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_api_key() {
        let v = json!({ "tts": { "provider": "openai", "apiKey": "sk-abcdef123456" } });
        let redacted = redact(&v);
        assert_eq!(redacted["tts"]["apiKey"], "sk-a***");
        assert_eq!(redacted["tts"]["provider"], "openai");
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let v = json!({ "ocr": { "apiKey": "hf_x" } });
        assert_eq!(redact(&v)["ocr"]["apiKey"], "***");
    }

    #[test]
    fn env_references_pass_through() {
        let v = json!({ "tts": { "apiKey": "${HF_TOKEN}" } });
        assert_eq!(redact(&v)["tts"]["apiKey"], "${HF_TOKEN}");
        assert!(collect_redacted_paths(&v).is_empty());
    }

    #[test]
    fn collects_secret_paths() {
        let v = json!({
            "tts": { "apiKey": "hf_abcdefghijkl" },
            "ocr": { "apiKey": "sk-abcdefghijkl", "model": "m" },
            "logging": { "level": "debug" }
        });
        let mut paths = collect_redacted_paths(&v);
        paths.sort();
        assert_eq!(paths, vec!["ocr.apiKey", "tts.apiKey"]);
    }
}
