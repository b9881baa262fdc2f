//! HTTP surface for the UI collaborator
//!
//! - `GET  /health`
//! - `GET  /labels`          classified pending labels in render order
//! - `POST /labels/commit`   `{"key": "..."}`
//! - `POST /labels/discard`  `{"key": "..."}`
//! - `GET  /events`          SSE stream of label events

mod health;
mod labels;
mod sse;

pub use health::health;
pub use labels::{commit_label, discard_label, list_labels, TriageRequest, TriageResponse};
pub use sse::event_stream;
