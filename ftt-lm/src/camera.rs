//! Camera collaborator
//!
//! The capture scheduler only needs two things from a camera: a readiness
//! signal and one encoded frame per trigger. [`DirectoryCamera`] provides both
//! from a folder of image files, which is how the service runs on machines
//! without a capture device and how frames are replayed in testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Capture failures; logged by the scheduler, never retried before the next tick
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No frames available in {0}")]
    NoFrames(PathBuf),

    #[error("Capture I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Camera unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Camera: Send + Sync {
    /// Resolves once the camera can deliver frames
    async fn wait_ready(&self);

    /// Capture one encoded frame
    async fn capture(&self) -> Result<Vec<u8>, CaptureError>;
}

/// Replays image files from a folder in file-name order, wrapping around
pub struct DirectoryCamera {
    folder: PathBuf,
    cursor: AtomicUsize,
}

impl DirectoryCamera {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Create the capture folder if it does not exist yet
    ///
    /// A camera over an empty folder is ready; each capture then fails with
    /// [`CaptureError::NoFrames`] until frames are dropped in.
    pub async fn ensure_folder(&self) -> Result<(), CaptureError> {
        if !tokio::fs::try_exists(&self.folder).await? {
            tokio::fs::create_dir_all(&self.folder).await?;
            info!(folder = %self.folder.display(), "Created capture folder");
        }
        Ok(())
    }

    async fn frame_paths(&self) -> Result<Vec<PathBuf>, CaptureError> {
        let mut dir = tokio::fs::read_dir(&self.folder).await?;
        let mut frames = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if is_image(&path) {
                frames.push(path);
            }
        }

        frames.sort();
        Ok(frames)
    }
}

#[async_trait]
impl Camera for DirectoryCamera {
    async fn wait_ready(&self) {
        let mut logged = false;
        while !tokio::fs::try_exists(&self.folder).await.unwrap_or(false) {
            if !logged {
                info!(folder = %self.folder.display(), "Waiting for capture folder");
                logged = true;
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
        info!(folder = %self.folder.display(), "Camera ready");
    }

    async fn capture(&self) -> Result<Vec<u8>, CaptureError> {
        let frames = self.frame_paths().await?;
        if frames.is_empty() {
            return Err(CaptureError::NoFrames(self.folder.clone()));
        }

        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % frames.len();
        let path = &frames[index];
        let bytes = tokio::fs::read(path).await?;

        debug!(frame = %path.display(), bytes = bytes.len(), "Captured frame");
        Ok(bytes)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
