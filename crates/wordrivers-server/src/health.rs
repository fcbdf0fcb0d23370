use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub games: usize,
    pub categories: usize,
    pub analytics_recorded: u64,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        games: state.catalog.len(),
        categories: state.categories.categories().len(),
        analytics_recorded: state.analytics.total_recorded(),
    })
}

/// GET /ready: the site is only useful with at least one game.
pub async fn readiness_check(State(state): State<AppState>) -> &'static str {
    if state.catalog.is_empty() {
        return "not ready: catalog is empty";
    }
    "ready"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "healthy",
            version: "0.1.0",
            games: 8,
            categories: 4,
            analytics_recorded: 2,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"healthy\""));
        assert!(json.contains("\"games\":8"));
        assert!(json.contains("\"analytics_recorded\":2"));
    }
}
