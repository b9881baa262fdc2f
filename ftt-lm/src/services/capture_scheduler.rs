//! Capture scheduler
//!
//! Fires a capture trigger every `interval` once the camera is ready. Each
//! trigger spawns an independent cycle (capture → recognize → ingest) and the
//! scheduler sleeps again without waiting for it, so several recognition calls
//! may be in flight at once. Drift from per-trigger latency is not corrected.
//!
//! Cancelling the session token stops the timer and, through child tokens,
//! abandons every cycle still waiting on the camera or the recognizer.

use crate::camera::Camera;
use crate::services::ingest::LabelIngestor;
use crate::services::recognition_client::Recognizer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Capture cadence
pub const DEFAULT_CAPTURE_INTERVAL: Duration = Duration::from_secs(5);

pub struct CaptureScheduler {
    camera: Arc<dyn Camera>,
    recognizer: Arc<dyn Recognizer>,
    ingestor: Arc<LabelIngestor>,
    interval: Duration,
    cycles_started: AtomicU64,
}

impl CaptureScheduler {
    pub fn new(
        camera: Arc<dyn Camera>,
        recognizer: Arc<dyn Recognizer>,
        ingestor: Arc<LabelIngestor>,
        interval: Duration,
    ) -> Self {
        Self {
            camera,
            recognizer,
            ingestor,
            interval,
            cycles_started: AtomicU64::new(0),
        }
    }

    /// Number of capture cycles triggered so far
    pub fn cycles_started(&self) -> u64 {
        self.cycles_started.load(Ordering::Relaxed)
    }

    /// Run the scheduler on a background task until `cancel` fires
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }

    /// Scheduler loop; returns when `cancel` fires
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Capture scheduler cancelled before camera became ready");
                return;
            }
            _ = self.camera.wait_ready() => {}
        }

        info!(interval_ms = self.interval.as_millis() as u64, "Capture scheduler started");

        loop {
            self.trigger(&cancel);

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(cycles = self.cycles_started(), "Capture scheduler stopped");
    }

    fn trigger(&self, cancel: &CancellationToken) {
        let cycle = self.cycles_started.fetch_add(1, Ordering::Relaxed) + 1;
        let camera = Arc::clone(&self.camera);
        let recognizer = Arc::clone(&self.recognizer);
        let ingestor = Arc::clone(&self.ingestor);
        let cancel = cancel.child_token();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(cycle, "Capture cycle abandoned at shutdown");
                }
                _ = run_cycle(cycle, camera, recognizer, ingestor) => {}
            }
        });
    }
}

/// One capture → recognize → ingest pass
///
/// Every failure ends only this cycle.
async fn run_cycle(
    cycle: u64,
    camera: Arc<dyn Camera>,
    recognizer: Arc<dyn Recognizer>,
    ingestor: Arc<LabelIngestor>,
) {
    let image = match camera.capture().await {
        Ok(image) => image,
        Err(e) => {
            warn!(cycle, error = %e, "Capture failed");
            return;
        }
    };

    let labels = match recognizer.submit(image).await {
        Ok(labels) => labels,
        Err(e) => {
            warn!(cycle, error = %e, "Recognition failed");
            return;
        }
    };

    if labels.is_empty() {
        debug!(cycle, "No labels recognized");
        return;
    }

    let report = ingestor.ingest(labels).await;
    debug!(cycle, inserted = report.inserted, "Capture cycle complete");
}
