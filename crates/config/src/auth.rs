use std::time::Duration;

use duration_str::deserialize_duration;
use serde::Deserialize;
use url::Url;

use crate::HttpMethod;

/// Token service configuration.
///
/// A fresh bearer credential is fetched from this endpoint for every inbound
/// request; nothing is cached between requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Endpoint issuing the short-lived bearer credential.
    pub url: Url,
    /// HTTP method used for the token request.
    pub method: HttpMethod,
    /// Deadline for a single token request.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Token type marker, sent both as the `token_type` field of the token
    /// request payload and as the token-type header of backend calls. An
    /// empty value omits the payload and the header.
    pub token_type: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:8000/api/get-jwt").expect("default auth URL is valid"),
            method: HttpMethod::Post,
            timeout: Duration::from_secs(5),
            token_type: "SESSION_TOKEN".to_string(),
        }
    }
}
