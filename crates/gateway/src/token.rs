use config::AuthConfig;
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};

use crate::error::ProxyError;

/// Admissible credential fields in the token reply, in precedence order.
const CREDENTIAL_FIELDS: [&str; 3] = ["token", "access_token", "jwt"];

/// Fetch a fresh bearer credential.
///
/// Called once per inbound request; credentials are never cached or reused.
pub(crate) async fn acquire(client: &Client, auth: &AuthConfig) -> crate::Result<SecretString> {
    let mut request = client
        .request(auth.method.into(), auth.url.clone())
        .timeout(auth.timeout);

    if !auth.token_type.is_empty() {
        request = request.json(&json!({ "token_type": auth.token_type }));
    }

    let request = request
        .build()
        .map_err(|e| ProxyError::Token(format!("failed to build token request: {e}")))?;

    let response = client
        .execute(request)
        .await
        .map_err(|e| ProxyError::Token(format!("token request failed: {e}")))?;

    let body = response
        .text()
        .await
        .map_err(|e| ProxyError::Token(format!("failed to read token response: {e}")))?;

    let reply: Value = sonic_rs::from_str(&body).map_err(|e| {
        log::error!("Token response is not valid JSON: {e}");
        ProxyError::Token(format!("failed to parse token response: {e}"))
    })?;

    let credential = extract_credential(&reply)
        .ok_or_else(|| ProxyError::Token("token response carries no credential field".to_string()))?;

    if credential.is_empty() {
        return Err(ProxyError::Token("token response carries an empty credential".to_string()));
    }

    Ok(SecretString::from(credential.to_string()))
}

/// The first admissible credential field present in the reply.
fn extract_credential(reply: &Value) -> Option<&str> {
    CREDENTIAL_FIELDS
        .iter()
        .find_map(|field| reply.get(field))
        .and_then(Value::as_str)
}
