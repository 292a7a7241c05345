//! OpenAI-compatible proxy gateway.
//!
//! Exposes `POST /chat/completions` in the public chat-completion wire
//! format and forwards to a backend speaking a trust-token protocol with a
//! different reply shape. Every request runs the same pipeline: acquire a
//! fresh credential, normalize the inbound document, dispatch to the
//! backend, translate the reply — buffered or as a re-framed event stream.

mod coerce;
mod dispatch;
mod error;
mod messages;
mod request;
mod sse;
mod token;
mod translate;

pub use error::ProxyError;

use std::{convert::Infallible, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response, Sse, sse::Event},
    routing::post,
};
use bytes::Bytes;
use config::Config;
use futures::StreamExt;
use reqwest::Client;

pub(crate) type Result<T> = std::result::Result<T, ProxyError>;

/// Shared state of the proxy handlers.
///
/// The outbound client is constructed once at startup and reused for both
/// credential and backend calls; it carries no per-request data.
#[derive(Clone)]
pub struct ProxyState {
    config: Arc<Config>,
    client: Client,
}

impl ProxyState {
    /// Bundle the resolved configuration with the shared outbound client.
    pub fn new(config: Config, client: Client) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }
}

/// Creates an axum router for the chat-completion endpoint.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/chat/completions", post(chat_completions))
        .with_state(state)
}

/// Handle chat completion requests.
///
/// Supports both buffered and streaming responses. When `stream: true` is
/// set in the request, the backend's event stream is re-framed into
/// Server-Sent Events of completion chunks; otherwise the backend reply is
/// translated into a single JSON completion.
async fn chat_completions(State(state): State<ProxyState>, body: Bytes) -> Result<Response> {
    let credential = token::acquire(&state.client, &state.config.auth).await?;
    let request = request::ChatRequest::normalize(&body, &state.config.upstream)?;

    log::debug!(
        "Forwarding chat completion for model {} (stream: {})",
        request.model(),
        request.stream()
    );

    let response = dispatch::send(&state.client, &state.config, &request, &credential).await?;

    if request.stream() {
        relay_stream(response, request.model()).await
    } else {
        relay_buffered(response, request.model()).await
    }
}

/// Translate a buffered backend reply.
///
/// A reply that fails to parse is relayed verbatim — original status code,
/// content type and body — instead of surfacing an error.
async fn relay_buffered(response: reqwest::Response, model: &str) -> Result<Response> {
    let status = response.status();

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let body = response
        .text()
        .await
        .map_err(|e| ProxyError::Internal(format!("failed to read backend response: {e}")))?;

    match translate::completion(&body, model) {
        Ok(completion) => Ok((status, Json(completion)).into_response()),
        Err(e) => {
            log::warn!("Relaying backend response verbatim: {e}");

            Ok((status, [(header::CONTENT_TYPE, content_type)], body).into_response())
        }
    }
}

/// Re-frame a streaming backend reply into an SSE response.
async fn relay_stream(response: reqwest::Response, model: &str) -> Result<Response> {
    let context = sse::StreamContext::new(model);
    let mut chunks = sse::chunks(Box::pin(response.bytes_stream()), context);

    // The status and SSE headers are committed with the first frame; a
    // failure before that still gets the JSON error envelope. Afterwards the
    // relay is best effort.
    let first = match chunks.next().await {
        Some(Err(e)) => return Err(e),
        Some(Ok(chunk)) => Some(chunk),
        None => None,
    };

    let events = futures::stream::iter(first.map(Ok))
        .chain(chunks)
        .take_while(|result| {
            if let Err(e) = result {
                log::error!("Stream relay failed mid-flight: {e}");
            }

            futures::future::ready(result.is_ok())
        })
        .filter_map(|result| async move { result.ok() })
        .map(|chunk| {
            let data = serde_json::to_string(&chunk).unwrap_or_else(|e| {
                log::error!("Failed to serialize streaming chunk: {e}");
                r#"{"error":"serialization failed"}"#.to_string()
            });

            Ok::<_, Infallible>(Event::default().data(data))
        });

    let response = (
        [(header::CACHE_CONTROL, "no-cache"), (header::CONNECTION, "keep-alive")],
        Sse::new(events),
    )
        .into_response();

    Ok(response)
}
