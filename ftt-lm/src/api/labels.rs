//! Label list and triage endpoints

use crate::error::{ApiError, ApiResult};
use crate::models::DedupKey;
use crate::render::RenderRow;
use crate::services::TriageOutcome;
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TriageRequest {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct TriageResponse {
    pub key: String,
    pub action: &'static str,
}

/// GET /labels
pub async fn list_labels(State(state): State<AppState>) -> Json<Vec<RenderRow>> {
    Json(state.session.render(ftt_common::time::now_local()).await)
}

/// POST /labels/commit
pub async fn commit_label(
    State(state): State<AppState>,
    Json(request): Json<TriageRequest>,
) -> ApiResult<Json<TriageResponse>> {
    let key = parse_key(request)?;
    let outcome = state.session.triage().commit(&key).await;
    respond(key, outcome)
}

/// POST /labels/discard
pub async fn discard_label(
    State(state): State<AppState>,
    Json(request): Json<TriageRequest>,
) -> ApiResult<Json<TriageResponse>> {
    let key = parse_key(request)?;
    let outcome = state.session.triage().discard(&key).await;
    respond(key, outcome)
}

fn parse_key(request: TriageRequest) -> ApiResult<DedupKey> {
    if request.key.trim().is_empty() {
        return Err(ApiError::BadRequest("key must not be empty".to_string()));
    }
    Ok(DedupKey::new(request.key))
}

fn respond(key: DedupKey, outcome: TriageOutcome) -> ApiResult<Json<TriageResponse>> {
    let action = match outcome {
        TriageOutcome::Committed(_) => "committed",
        TriageOutcome::Discarded(_) => "discarded",
        TriageOutcome::NotPending => {
            return Err(ApiError::NotFound(format!("No pending label with key {}", key)));
        }
    };

    Ok(Json(TriageResponse {
        key: key.into_inner(),
        action,
    }))
}
