//! Hand-rolled doubles of the token service and the backend.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderMap, StatusCode, header},
    response::Response,
    routing::post,
};
use bytes::Bytes;
use futures::{StreamExt, stream};

/// Serve a router on an ephemeral port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("Mock server failed: {e}");
        }
    });

    address
}

/// Token service double answering `POST /token` with a fixed JSON body.
pub async fn auth_service(body: serde_json::Value) -> SocketAddr {
    let router = Router::new().route(
        "/token",
        post(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );

    serve(router).await
}

/// Backend double answering `POST /ai-call` with one buffered reply.
pub async fn backend_service(status: StatusCode, content_type: &'static str, body: &str) -> SocketAddr {
    let body = body.to_string();

    let router = Router::new().route(
        "/ai-call",
        post(move || {
            let body = body.clone();
            async move { (status, [(header::CONTENT_TYPE, content_type)], body) }
        }),
    );

    serve(router).await
}

/// Backend double answering `POST /ai-call` with a raw event-stream script.
pub async fn streaming_backend(script: &str) -> SocketAddr {
    let script = script.to_string();

    let router = Router::new().route(
        "/ai-call",
        post(move || {
            let script = script.clone();

            async move {
                Response::builder()
                    .status(StatusCode::OK)
                    .header(header::CONTENT_TYPE, "text/event-stream")
                    .body(Body::from(script))
                    .unwrap()
            }
        }),
    );

    serve(router).await
}

/// Backend double whose streamed body fails after the given prefix.
pub async fn broken_streaming_backend(prefix: &'static str) -> SocketAddr {
    let router = Router::new().route(
        "/ai-call",
        post(move || async move {
            // Emit the prefix, then fail the body. The error is delayed one
            // tick so hyper flushes the 200 status line and the prefix before
            // the stream aborts; otherwise the connection resets before any
            // response head reaches the client and the failure surfaces as a
            // send error rather than the mid-stream read error under test.
            let frames = stream::once(async move { Ok(Bytes::from_static(prefix.as_bytes())) }).chain(
                stream::once(async {
                    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                    Err(std::io::Error::other("backend gave up"))
                }),
            );

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/event-stream")
                .body(Body::from_stream(frames))
                .unwrap()
        }),
    );

    serve(router).await
}

/// One request as the backend double saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Headers of the forwarded request.
    pub headers: HeaderMap,
    /// JSON body of the forwarded request.
    pub body: serde_json::Value,
}

/// Backend double recording the request it receives before replying.
pub async fn recording_backend(reply: serde_json::Value) -> (SocketAddr, Arc<Mutex<Option<RecordedCall>>>) {
    let recorded = Arc::new(Mutex::new(None));
    let sink = recorded.clone();

    let router = Router::new().route(
        "/ai-call",
        post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
            let reply = reply.clone();
            let sink = sink.clone();

            async move {
                *sink.lock().unwrap() = Some(RecordedCall { headers, body });
                Json(reply)
            }
        }),
    );

    (serve(router).await, recorded)
}
