use config::Config;
use reqwest::{
    Client, Response,
    header::{CONTENT_TYPE, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::{error::ProxyError, request::ChatRequest};

/// Forward a normalized chat document to the backend.
///
/// The response body is returned unconsumed so the caller can pick buffered
/// or streaming handling.
pub(crate) async fn send(
    client: &Client,
    config: &Config,
    request: &ChatRequest,
    credential: &SecretString,
) -> crate::Result<Response> {
    let payload = serde_json::to_vec(request.document())
        .map_err(|e| ProxyError::Internal(format!("failed to serialize request body: {e}")))?;

    let headers = &config.upstream.headers;

    let mut outbound = client
        .request(config.upstream.method.into(), config.upstream.url.clone())
        .timeout(config.server.timeout)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .header(headers.trust_token.as_ref(), credential.expose_secret())
        .header(headers.correlation_id.as_ref(), Uuid::new_v4().to_string())
        .header(headers.user_session_id.as_ref(), Uuid::new_v4().to_string())
        .body(payload);

    if !config.auth.token_type.is_empty() {
        outbound = outbound.header(headers.token_type.as_ref(), config.auth.token_type.as_str());
    }

    let outbound = outbound
        .build()
        .map_err(|e| ProxyError::Internal(format!("failed to build backend request: {e}")))?;

    client
        .execute(outbound)
        .await
        .map_err(|e| ProxyError::Downstream(format!("failed to forward request: {e}")))
}
