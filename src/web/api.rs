//! REST API handlers for seat listing and status

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use seat_meter_core::api::{ApiError, SeatMeter};
use seat_meter_core::seats::SeatMeta;
use seat_meter_core::usage::{SeatStatusError, SeatStatusResult};

/// Helper to create JSON error responses
fn json_error(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({"error": message})))
}

/// HTTP status for a facade error, falling back to 502 for anything unmappable
fn error_status(err: &ApiError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Shared application state for API handlers
pub struct ApiState {
    pub meter: SeatMeter,
}

/// List all seats (no tokens)
pub async fn get_seats(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<SeatMeta>>, (StatusCode, Json<serde_json::Value>)> {
    match state.meter.list_seats().await {
        Ok(seats) => Ok(Json(seats)),
        Err(e) => {
            tracing::warn!("API: list seats failed: {}", e);
            Err(json_error(error_status(&e), &e.to_string()))
        }
    }
}

/// Fetch one seat's usage and return the mapped balance cards
pub async fn get_seat_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<SeatStatusResult>) {
    match state.meter.seat_status(&id).await {
        Ok(status) => (StatusCode::OK, Json(status.into())),
        Err(e) => {
            tracing::info!("API: status failed seat_id={} status={}: {}", id, e.status_code(), e);
            (
                error_status(&e),
                Json(SeatStatusError::new(e.to_string()).into()),
            )
        }
    }
}
