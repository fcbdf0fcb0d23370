use std::net::SocketAddr;
use std::time::Duration;

use wordrivers_core::catalog::Catalog;
use wordrivers_server::build_router;
use wordrivers_server::config::{LimitsConfig, ServerConfig};
use wordrivers_server::state::AppState;

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with the built-in catalog and default limits.
    pub async fn new() -> Self {
        Self::from_config(ServerConfig::default()).await
    }

    /// Start a test server whose submit endpoints allow `burst` requests
    /// per client and never refill.
    pub async fn with_submit_burst(burst: usize) -> Self {
        let config = ServerConfig {
            limits: LimitsConfig {
                submit_rate_limit_burst: burst,
                submit_rate_limit_per_sec: 0.0,
                ..LimitsConfig::default()
            },
            ..ServerConfig::default()
        };
        Self::from_config(config).await
    }

    /// Start a test server serving a custom catalog.
    pub async fn with_catalog(catalog: Catalog) -> Self {
        Self::start(AppState::with_catalog(ServerConfig::default(), catalog)).await
    }

    pub async fn from_config(config: ServerConfig) -> Self {
        Self::start(AppState::new(config)).await
    }

    async fn start(state: AppState) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = build_router(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            state,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api(&self, path: &str) -> String {
        format!("http://{}/api/v1{path}", self.addr)
    }
}

/// GET a JSON endpoint, returning status and body.
pub async fn get_json(url: &str) -> (u16, serde_json::Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap_or(serde_json::Value::Null);
    (status, body)
}

/// POST a JSON body, returning status and body.
pub async fn post_json(url: &str, body: &serde_json::Value) -> (u16, serde_json::Value) {
    let resp = reqwest::Client::new()
        .post(url)
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap_or(serde_json::Value::Null);
    (status, body)
}

/// Ids of the `games` array in a list response.
pub fn game_ids(body: &serde_json::Value) -> Vec<String> {
    body["games"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_str().unwrap().to_string())
        .collect()
}
