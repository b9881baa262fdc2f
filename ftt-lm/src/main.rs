//! ftt-lm - Label Lifecycle Manager service
//!
//! Captures frames on a timer, sends them to the label recognition service,
//! and serves the deduplicated, classified pending labels over HTTP + SSE.

use anyhow::{Context, Result};
use clap::Parser;
use ftt_common::config::{RootFolderInitializer, RootFolderResolver};
use ftt_common::events::EventBus;
use ftt_lm::camera::DirectoryCamera;
use ftt_lm::config::{ConfigSource, LmConfig};
use ftt_lm::db::SqliteLabelSink;
use ftt_lm::services::RecognitionClient;
use ftt_lm::session::{LabelSession, SessionComponents};
use ftt_lm::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MODULE_NAME: &str = "ftt-lm";

/// Command-line arguments for ftt-lm
#[derive(Parser, Debug)]
#[command(name = "ftt-lm")]
#[command(about = "Label lifecycle manager for FTT")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config)
    #[arg(short, long, env = "FTT_LM_PORT")]
    port: Option<u16>,

    /// Root folder for the database and default capture folder
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder of frames replayed as the camera (overrides config)
    #[arg(long, env = "FTT_CAPTURE_FOLDER")]
    capture_folder: Option<PathBuf>,

    /// Recognition service base URL (overrides config)
    #[arg(long, env = "FTT_RECOGNITION_URL")]
    recognition_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = RootFolderResolver::new(MODULE_NAME);
    let config_path = args.config.clone().or_else(|| resolver.default_config_path());
    let (mut config, config_source) =
        LmConfig::load(config_path.as_deref()).context("Failed to load config")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(url) = args.recognition_url {
        config.recognition_url = url;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("ftt_lm={0},ftt_common={0},tower_http=info", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ftt-lm (Label Lifecycle Manager)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    match &config_source {
        ConfigSource::File(path) => info!("Config: {}", path.display()),
        ConfigSource::Defaults(Some(path)) => {
            warn!("Config file {} not found, using built-in defaults", path.display())
        }
        ConfigSource::Defaults(None) => warn!("No config path available, using built-in defaults"),
    }

    let root_folder = resolver.resolve(args.root_folder.as_deref(), config.root_folder.as_deref());
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = config
        .database_path
        .clone()
        .unwrap_or_else(|| initializer.database_path());
    info!("Database: {}", db_path.display());
    let db_pool = ftt_lm::db::init_database_pool(&db_path).await?;

    let capture_folder = args
        .capture_folder
        .or_else(|| config.capture_folder.clone())
        .unwrap_or_else(|| initializer.root_folder().join("captures"));
    info!("Capture folder: {}", capture_folder.display());
    let camera = DirectoryCamera::new(capture_folder);
    camera
        .ensure_folder()
        .await
        .context("Failed to create capture folder")?;

    let recognizer = RecognitionClient::new(&config.recognition_url, config.recognition_timeout())
        .context("Failed to build recognition client")?;
    info!("Recognition endpoint: {}", recognizer.endpoint());

    let cancel = CancellationToken::new();
    let components = SessionComponents {
        camera: Arc::new(camera),
        recognizer: Arc::new(recognizer),
        sink: Arc::new(SqliteLabelSink::new(db_pool)),
        event_bus: EventBus::new(256),
    };

    let startup = LabelSession::start(components, config.session_config(), cancel.clone());
    let session = tokio::select! {
        session = startup => session,
        _ = shutdown_signal() => None,
    };
    let Some(session) = session else {
        info!("Shutdown requested before session became ready");
        return Ok(());
    };

    let app = ftt_lm::build_router(AppState::new(Arc::clone(&session)));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    session.shutdown().await;
    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
