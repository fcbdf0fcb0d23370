use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use wordrivers_core::page::not_found_metadata;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// Unknown game id. The body carries the not-found page metadata.
    GameNotFound(String),
    TooManyRequests(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(m) | Self::TooManyRequests(m) => {
                write!(f, "{m}")
            },
            Self::GameNotFound(id) => write!(f, "game not found: {id}"),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::GameNotFound(_) => StatusCode::NOT_FOUND,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::GameNotFound(_) => serde_json::json!({
                "error": self.to_string(),
                "metadata": not_found_metadata(),
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
