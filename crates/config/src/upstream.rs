use serde::Deserialize;
use url::Url;

use crate::{HeaderName, HttpMethod};

/// Backend service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Endpoint receiving the normalized chat document.
    pub url: Url,
    /// HTTP method used for the backend call.
    pub method: HttpMethod,
    /// Value filled into the `user` field when the caller omits it.
    pub default_user: String,
    /// Value filled into the `max_tokens` field. See the request
    /// normalization rules for when this applies.
    pub default_max_tokens: u32,
    /// Names of the headers attached to every backend call.
    pub headers: HeaderNames,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:8001/api/ai-call").expect("default upstream URL is valid"),
            method: HttpMethod::Post,
            default_user: "ai_model_user".to_string(),
            default_max_tokens: 2000,
            headers: HeaderNames::default(),
        }
    }
}

/// Names of the headers attached to every backend call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderNames {
    /// Header carrying the acquired bearer credential.
    pub trust_token: HeaderName,
    /// Header carrying the per-call correlation identifier.
    pub correlation_id: HeaderName,
    /// Header carrying the per-call user session identifier.
    pub user_session_id: HeaderName,
    /// Header carrying the token type marker.
    pub token_type: HeaderName,
}

impl Default for HeaderNames {
    fn default() -> Self {
        Self {
            trust_token: HeaderName::from_static("x-trust-token"),
            correlation_id: HeaderName::from_static("x-correlation-id"),
            user_session_id: HeaderName::from_static("x-usersession-id"),
            token_type: HeaderName::from_static("token_type"),
        }
    }
}
