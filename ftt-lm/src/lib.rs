//! ftt-lm library interface
//!
//! Label Lifecycle Manager: ingests label recognition results, deduplicates
//! them against pending and committed labels, classifies them by freshness and
//! serves them to the UI for triage.

pub mod api;
pub mod camera;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod render;
pub mod services;
pub mod session;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use session::LabelSession;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<LabelSession>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(session: Arc<LabelSession>) -> Self {
        Self {
            session,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/health", get(api::health))
        .route("/labels", get(api::list_labels))
        .route("/labels/commit", post(api::commit_label))
        .route("/labels/discard", post(api::discard_label))
        .route("/events", get(api::event_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
