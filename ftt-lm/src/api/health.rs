//! Health endpoint

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: i64,
    pub capture_cycles: u64,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = ftt_common::time::now() - state.startup_time;
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "ftt-lm".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds(),
        capture_cycles: state.session.cycles_started(),
    })
}
