//! openai-proxy server library.
//!
//! Provides a reusable server function to serve the proxy either for the
//! binary, or for the integration tests.

#![deny(missing_docs)]

mod health;

use std::net::SocketAddr;

use anyhow::anyhow;
use axum::routing::get;
use config::Config;
use gateway::ProxyState;
use tokio::net::TcpListener;

/// Configuration for serving the proxy.
pub struct ServeConfig {
    /// The socket address (IP and port) the server will bind to.
    pub listen_address: SocketAddr,
    /// The deserialized proxy TOML configuration.
    pub config: Config,
}

/// Starts and runs the proxy server with the provided configuration.
pub async fn serve(ServeConfig { listen_address, config }: ServeConfig) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| anyhow!("Failed to build the outbound HTTP client: {e}"))?;

    let mut app = gateway::router(ProxyState::new(config.clone(), client));

    if config.server.health.enabled {
        app = app.route(config.server.health.path.as_ref(), get(health::health));
    }

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {listen_address}: {e}"))?;

    log::info!("Chat endpoint available at: http://{listen_address}/chat/completions");
    log::info!("Acquiring credentials from: {}", config.auth.url);
    log::info!("Forwarding chat completions to: {}", config.upstream.url);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("Failed to start HTTP server: {e}"))?;

    Ok(())
}
