use config::UpstreamConfig;
use serde_json::{Map, Value};

use crate::{coerce, error::ProxyError};

const MODEL_KEY: &str = "model";
const STREAM_KEY: &str = "stream";
const USER_KEY: &str = "user";
const MAX_TOKENS_KEY: &str = "max_tokens";

/// Key probed before the max-tokens default is applied.
///
/// This is NOT [`MAX_TOKENS_KEY`]: the deployment this proxy replaces keyed
/// the absence check on `max_token`, so a caller-supplied `max_tokens` is
/// overwritten by the default unless `max_token` is also present.
// TODO: confirm with the backend owners whether the `max_token` probe is
// intentional before aligning the two keys.
const MAX_TOKENS_PROBE_KEY: &str = "max_token";

/// Model reported when the caller does not name one.
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// A normalized inbound chat-completion document.
///
/// The document is open: unrecognized keys pass through to the backend
/// untouched, so it is kept as a raw JSON object. The fields the proxy
/// itself routes on are extracted once, by the coercion rules of
/// [`crate::coerce`], and left in the document unchanged.
#[derive(Debug, Clone)]
pub(crate) struct ChatRequest {
    document: Map<String, Value>,
    model: String,
    stream: bool,
}

impl ChatRequest {
    /// Parse an inbound body and fill in the configured defaults.
    pub(crate) fn normalize(raw: &[u8], upstream: &UpstreamConfig) -> crate::Result<Self> {
        let mut document: Map<String, Value> = sonic_rs::from_slice(raw)
            .map_err(|e| ProxyError::InvalidRequest(format!("failed to parse request body: {e}")))?;

        if !document.contains_key(USER_KEY) {
            document.insert(USER_KEY.to_string(), Value::from(upstream.default_user.clone()));
        }

        if !document.contains_key(MAX_TOKENS_PROBE_KEY) {
            document.insert(MAX_TOKENS_KEY.to_string(), Value::from(upstream.default_max_tokens));
        }

        let model = match document.get(MODEL_KEY) {
            Some(value) => coerce::text_value(Some(value)),
            None => DEFAULT_MODEL.to_string(),
        };

        let stream = coerce::bool_value(document.get(STREAM_KEY));

        Ok(Self {
            document,
            model,
            stream,
        })
    }

    /// The document forwarded to the backend.
    pub(crate) fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// The model name reported back in translated responses.
    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    /// Whether the caller asked for a streamed reply.
    pub(crate) fn stream(&self) -> bool {
        self.stream
    }
}

#[cfg(test)]
mod tests {
    use config::UpstreamConfig;
    use serde_json::json;

    use super::ChatRequest;

    fn normalize(body: &str) -> ChatRequest {
        ChatRequest::normalize(body.as_bytes(), &UpstreamConfig::default()).unwrap()
    }

    #[test]
    fn invalid_json_is_rejected() {
        let result = ChatRequest::normalize(b"{not json", &UpstreamConfig::default());

        let error = result.unwrap_err();
        assert_eq!(error.error_type(), "invalid_request_error");
    }

    #[test]
    fn defaults_are_filled_when_absent() {
        let request = normalize(r#"{"messages": []}"#);

        assert_eq!(request.document()["user"], json!("ai_model_user"));
        assert_eq!(request.document()["max_tokens"], json!(2000));
    }

    #[test]
    fn caller_user_is_kept() {
        let request = normalize(r#"{"user": "alice"}"#);

        assert_eq!(request.document()["user"], json!("alice"));
    }

    #[test]
    fn caller_max_tokens_is_overwritten_without_probe_key() {
        // The probe key is `max_token`, so a bare `max_tokens` does not
        // suppress the default.
        let request = normalize(r#"{"max_tokens": 5}"#);

        assert_eq!(request.document()["max_tokens"], json!(2000));
    }

    #[test]
    fn probe_key_suppresses_the_default() {
        let request = normalize(r#"{"max_token": 7, "max_tokens": 5}"#);

        assert_eq!(request.document()["max_tokens"], json!(5));
        assert_eq!(request.document()["max_token"], json!(7));
    }

    #[test]
    fn model_and_stream_are_extracted_but_left_in_place() {
        let request = normalize(r#"{"model": "m1", "stream": true}"#);

        assert_eq!(request.model(), "m1");
        assert!(request.stream());
        assert_eq!(request.document()["model"], json!("m1"));
        assert_eq!(request.document()["stream"], json!(true));
    }

    #[test]
    fn model_falls_back_to_the_default() {
        let request = normalize("{}");

        assert_eq!(request.model(), "gpt-3.5-turbo");
        assert!(!request.stream());
    }

    #[test]
    fn unrecognized_keys_pass_through() {
        let request = normalize(r#"{"messages": [{"role": "user"}], "temperature": 0.5}"#);

        assert_eq!(request.document()["temperature"], json!(0.5));
        assert_eq!(request.document()["messages"], json!([{"role": "user"}]));
    }
}
