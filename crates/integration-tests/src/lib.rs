//! Integration test harness for openai-proxy.
//!
//! Boots the real server on an ephemeral port and exposes a small HTTP
//! client plus hand-rolled doubles of the token service and the backend.

pub mod mocks;

use std::net::SocketAddr;
use std::time::Duration;

use config::Config;
use server::ServeConfig;
use tokio::net::TcpListener;

/// Test client for making HTTP requests to the test server
pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    /// Create a new test client for the given base URL
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Send a chat-completion request with a JSON body
    pub async fn completions(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/chat/completions", self.base_url))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// Send a chat-completion request with a raw, not necessarily JSON, body
    pub async fn completions_raw(&self, body: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/chat/completions", self.base_url))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .unwrap()
    }

    /// Send a GET request to the given path
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }
}

/// A proxy instance listening on an ephemeral port.
pub struct TestServer {
    /// Client pointed at the running proxy.
    pub client: TestClient,
    /// Address the proxy listens on.
    pub address: SocketAddr,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with the given TOML configuration
    pub async fn start(config_toml: &str) -> Self {
        let config: Config = toml::from_str(config_toml).unwrap();

        // Find an available port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let serve_config = ServeConfig {
            listen_address: address,
            config,
        };

        let handle = tokio::spawn(async move {
            // Drop the listener so the server can bind to the address
            drop(listener);

            if let Err(e) = server::serve(serve_config).await {
                eprintln!("Server failed to start: {e}");
            }
        });

        // Wait for the listener to come up
        let mut retries = 50;
        while retries > 0 {
            if tokio::net::TcpStream::connect(address).await.is_ok() {
                break;
            }

            retries -= 1;
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestServer {
            client: TestClient::new(format!("http://{address}")),
            address,
            _handle: handle,
        }
    }
}
