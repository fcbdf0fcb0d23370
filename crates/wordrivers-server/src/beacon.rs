use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use wordrivers_core::analytics::{AnalyticsRecord, AnalyticsSink};
use wordrivers_core::events::Attributes;

use crate::error::AppError;
use crate::state::AppState;

const MAX_EVENT_NAME: usize = 64;
const MAX_ATTRIBUTES: usize = 32;
const MAX_ATTRIBUTE_KEY: usize = 64;
const MAX_ATTRIBUTE_VALUE: usize = 1024;

/// Body of `POST /api/v1/analytics`, sent by the browser sink.
#[derive(Debug, Deserialize)]
pub struct AnalyticsBeacon {
    pub event: String,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Serialize)]
pub struct BeaconResponse {
    pub accepted: bool,
}

/// Validate beacon sizes before anything is logged.
fn validate_beacon(beacon: &AnalyticsBeacon) -> Result<(), AppError> {
    if beacon.event.is_empty() {
        return Err(AppError::BadRequest("event name is empty".to_string()));
    }
    if beacon.event.chars().count() > MAX_EVENT_NAME {
        return Err(AppError::BadRequest(format!(
            "event name exceeds {MAX_EVENT_NAME} chars"
        )));
    }
    if beacon.attributes.len() > MAX_ATTRIBUTES {
        return Err(AppError::BadRequest(format!(
            "attributes exceed {MAX_ATTRIBUTES} keys"
        )));
    }
    for (key, val) in &beacon.attributes {
        if key.chars().count() > MAX_ATTRIBUTE_KEY {
            return Err(AppError::BadRequest(format!(
                "attribute key exceeds {MAX_ATTRIBUTE_KEY} chars"
            )));
        }
        if val.to_string().len() > MAX_ATTRIBUTE_VALUE {
            return Err(AppError::BadRequest(format!(
                "attribute {key} exceeds {MAX_ATTRIBUTE_VALUE} bytes"
            )));
        }
    }
    Ok(())
}

/// POST /api/v1/analytics: record a browser analytics event.
pub async fn post_analytics(
    State(state): State<AppState>,
    Json(beacon): Json<AnalyticsBeacon>,
) -> Result<(StatusCode, Json<BeaconResponse>), AppError> {
    validate_beacon(&beacon)?;
    state.analytics.record(&beacon.event, beacon.attributes);
    Ok((StatusCode::ACCEPTED, Json(BeaconResponse { accepted: true })))
}

#[derive(Debug, Serialize)]
pub struct RecentAnalytics {
    pub total_recorded: u64,
    pub records: Vec<AnalyticsRecord>,
}

/// GET /api/v1/analytics/recent: the sink's diagnostic log.
pub async fn recent_analytics(State(state): State<AppState>) -> Json<RecentAnalytics> {
    Json(RecentAnalytics {
        total_recorded: state.analytics.total_recorded(),
        records: state.analytics.records(),
    })
}
