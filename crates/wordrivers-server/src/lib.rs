pub mod api;
pub mod beacon;
pub mod config;
pub mod contact;
pub mod error;
pub mod health;
pub mod rate_limit;
pub mod state;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::Router;
use axum::extract::{ConnectInfo, DefaultBodyLimit, Request, State};
use axum::http::{HeaderValue, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use config::ServerConfig;
use error::AppError;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let state = AppState::new(config);
    (build_router(state.clone()), state)
}

/// Router over an existing state (lets tests inject a custom catalog).
pub fn build_router(state: AppState) -> Router<()> {
    let config = std::sync::Arc::clone(&state.config);

    // Public POST endpoints, rate limited per client IP
    let submit_routes = Router::new()
        .route("/analytics", post(beacon::post_analytics))
        .route("/contact", post(contact::post_contact))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_layer,
        ));

    let api_routes = Router::new()
        .route("/games", get(api::list_games))
        .route("/games/{game_id}", get(api::get_game))
        .route("/categories", get(api::list_categories))
        .route("/analytics/recent", get(beacon::recent_analytics))
        .merge(submit_routes);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", api_routes)
        .fallback_service(ServeDir::new(&config.web_root))
        .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.limits.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            content_security_policy(&config.site.trusted_origin),
        ))
        .with_state(state)
}

/// CSP allowing frames only from this site and the trusted game host.
pub fn content_security_policy(trusted_origin: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("frame-src 'self' {trusted_origin}")).unwrap_or_else(|_| {
        tracing::warn!(origin = %trusted_origin, "trusted origin is not a valid header value");
        HeaderValue::from_static("frame-src 'self'")
    })
}

/// Background task that forgets idle rate-limit buckets.
pub fn spawn_limiter_pruner(state: AppState, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let pruned = state.limiter.prune(every).await;
            if pruned > 0 {
                tracing::debug!(pruned, "pruned idle rate-limit buckets");
            }
        }
    })
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

async fn rate_limit_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    if !state.limiter.allow(ip).await {
        tracing::warn!(%ip, path = %request.uri().path(), "rate limit exceeded");
        return AppError::TooManyRequests("rate limit exceeded".to_string()).into_response();
    }
    next.run(request).await
}
