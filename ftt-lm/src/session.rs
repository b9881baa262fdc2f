//! Label session orchestration
//!
//! Owns one run of the lifecycle manager: the store, the triage controller and
//! the capture scheduler.
//!
//! Startup is a fan-out of independent tasks joined at a barrier before the
//! scheduler starts and the session is handed to the UI:
//! - camera readiness
//! - recognition service warm-up (best effort)
//! - reload of keys committed in earlier sessions (optional, best effort)
//!
//! Shutdown cancels the session token, which stops the scheduler and abandons
//! any recognition call still in flight.

use crate::camera::Camera;
use crate::db::LabelSink;
use crate::models::LabelEntry;
use crate::render::{render_rows, RenderRow};
use crate::services::capture_scheduler::{CaptureScheduler, DEFAULT_CAPTURE_INTERVAL};
use crate::services::ingest::LabelIngestor;
use crate::services::label_store::LabelStore;
use crate::services::product_catalog::ProductCatalog;
use crate::services::recognition_client::Recognizer;
use crate::services::triage::TriageController;
use chrono::NaiveDateTime;
use ftt_common::events::{EventBus, LabelEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Session tuning
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub capture_interval: Duration,
    /// Reload committed keys from the sink at startup
    pub reload_committed: bool,
    /// Enables product filtering when `Some`
    pub catalog: Option<ProductCatalog>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capture_interval: DEFAULT_CAPTURE_INTERVAL,
            reload_committed: true,
            catalog: None,
        }
    }
}

/// Collaborators a session is built from
pub struct SessionComponents {
    pub camera: Arc<dyn Camera>,
    pub recognizer: Arc<dyn Recognizer>,
    pub sink: Arc<dyn LabelSink>,
    pub event_bus: EventBus,
}

pub struct LabelSession {
    store: Arc<LabelStore>,
    triage: TriageController,
    scheduler: Arc<CaptureScheduler>,
    event_bus: EventBus,
    cancel: CancellationToken,
    scheduler_handle: Mutex<Option<JoinHandle<()>>>,
}

impl LabelSession {
    /// Run the startup fan-out, then start capturing
    ///
    /// Returns `None` if `cancel` fires before the barrier is reached.
    pub async fn start(
        components: SessionComponents,
        config: SessionConfig,
        cancel: CancellationToken,
    ) -> Option<Arc<Self>> {
        let SessionComponents {
            camera,
            recognizer,
            sink,
            event_bus,
        } = components;

        let store = Arc::new(LabelStore::new(event_bus.clone()));

        let fan_out = async {
            tokio::join!(
                camera.wait_ready(),
                warm_up(recognizer.as_ref()),
                reload_committed(&store, sink.as_ref(), config.reload_committed),
            )
        };

        let committed_keys = tokio::select! {
            _ = cancel.cancelled() => {
                info!("Session cancelled during startup");
                return None;
            }
            (_, _, reloaded) = fan_out => reloaded,
        };

        let ingestor = Arc::new(LabelIngestor::new(Arc::clone(&store), config.catalog));
        let scheduler = Arc::new(CaptureScheduler::new(
            camera,
            recognizer,
            ingestor,
            config.capture_interval,
        ));
        let handle = Arc::clone(&scheduler).spawn(cancel.clone());

        event_bus.emit_lossy(LabelEvent::SessionReady {
            committed_keys,
            timestamp: ftt_common::time::now(),
        });
        info!(committed_keys, "Label session ready");

        Some(Arc::new(Self {
            triage: TriageController::new(Arc::clone(&store), sink),
            store,
            scheduler,
            event_bus,
            cancel,
            scheduler_handle: Mutex::new(Some(handle)),
        }))
    }

    pub fn store(&self) -> &Arc<LabelStore> {
        &self.store
    }

    pub fn triage(&self) -> &TriageController {
        &self.triage
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LabelEvent> {
        self.event_bus.subscribe()
    }

    pub fn cycles_started(&self) -> u64 {
        self.scheduler.cycles_started()
    }

    pub async fn snapshot(&self) -> Vec<LabelEntry> {
        self.store.snapshot().await
    }

    /// Classified rows for the UI at `now`
    pub async fn render(&self, now: NaiveDateTime) -> Vec<RenderRow> {
        render_rows(&self.store, now).await
    }

    /// Stop capturing and abandon in-flight recognition calls
    pub async fn shutdown(&self) {
        self.cancel.cancel();

        if let Some(handle) = self.scheduler_handle.lock().await.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Capture scheduler task failed");
            }
        }

        info!(
            pending = self.store.len().await,
            committed = self.store.committed_len().await,
            "Label session stopped"
        );
    }
}

async fn warm_up(recognizer: &dyn Recognizer) {
    if let Err(e) = recognizer.warm_up().await {
        warn!(error = %e, "Recognition service warm-up failed");
    }
}

/// Seed the store with keys committed earlier; returns how many were loaded
async fn reload_committed(store: &LabelStore, sink: &dyn LabelSink, enabled: bool) -> usize {
    if !enabled {
        return 0;
    }

    match sink.load_committed_keys().await {
        Ok(keys) => store.seed_committed(keys).await,
        Err(e) => {
            warn!(error = %e, "Failed to reload committed keys; starting with an empty set");
            0
        }
    }
}
