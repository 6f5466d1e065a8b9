//! vokab-pr - Pronunciation Recordings microservice
//!
//! **Module Identity:**
//! - Name: vokab-pr (Pronunciation Recordings)
//! - Port: 5731 (default)
//!
//! Serves US pronunciation MP3s for vocabulary words, caching recordings
//! fetched from the dictionary website in the shared root folder.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vokab_common::config::{
    default_config_path, load_toml_config, RootFolderInitializer, RootFolderResolver,
};
use vokab_common::word::UnclassifiedClassifier;

use vokab_pr::config::TomlConfig;
use vokab_pr::db::SqliteRecordingIndex;
use vokab_pr::services::{DictionaryClient, HeadwordResolver, RecordingOrchestrator};
use vokab_pr::storage::{FsBlobStore, RECORDINGS_DIR};
use vokab_pr::AppState;

/// Command-line arguments for vokab-pr
#[derive(Parser, Debug)]
#[command(name = "vokab-pr")]
#[command(about = "Pronunciation recordings microservice for Vokab")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides TOML)
    #[arg(short, long, env = "VOKAB_PR_PORT")]
    port: Option<u16>,

    /// Root folder for the database and cached recordings
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file (default: <config dir>/vokab/vokab-pr.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dictionary website origin (overrides TOML)
    #[arg(long, env = "VOKAB_DICTIONARY_URL")]
    dictionary_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(|| default_config_path("vokab-pr"));
    let mut config: TomlConfig = match &config_path {
        Some(path) => load_toml_config(path)?,
        None => TomlConfig::default(),
    };

    // Initialize tracing (RUST_LOG wins over the configured level)
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.logging.level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting vokab-pr (Pronunciation Recordings) v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) if path.exists() => info!("Config file: {}", path.display()),
        Some(path) => warn!("Config file {} not found, using defaults", path.display()),
        None => warn!("No config directory on this platform, using defaults"),
    }

    if let Some(url) = args.dictionary_url {
        config.dictionary.base_url = url;
    }
    let port = args.port.unwrap_or(config.port);

    // Resolve and initialize root folder
    let root_folder = RootFolderResolver::new("vokab-pr")
        .with_cli_arg(args.root_folder)
        .with_toml_value(config.root_folder.clone())
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());
    let db_pool = vokab_pr::db::init_database_pool(&db_path)
        .await
        .context("Failed to open database")?;

    let blob_dir = initializer.data_dir(RECORDINGS_DIR);
    let blobs = FsBlobStore::open(&blob_dir).context("Failed to open recording store")?;
    info!("Recording store: {}", blob_dir.display());

    let dictionary = DictionaryClient::new(&config.dictionary)
        .context("Failed to create dictionary client")?;
    let resolver = HeadwordResolver::new(&config.dictionary.markup)
        .context("Invalid dictionary markup selectors")?;
    info!("Dictionary: {}", config.dictionary.base_url);

    let orchestrator = Arc::new(RecordingOrchestrator::new(
        Arc::new(SqliteRecordingIndex::new(db_pool)),
        Arc::new(blobs),
        Arc::new(dictionary),
        Arc::new(resolver),
    ));

    let shutdown = CancellationToken::new();
    let state = AppState::new(
        orchestrator,
        Arc::new(UnclassifiedClassifier),
        shutdown.clone(),
        config.dictionary.base_url.clone(),
    );
    let app = vokab_pr::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("vokab-pr stopped");
    Ok(())
}

/// Wait for Ctrl-C, then cancel in-flight requests
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
    shutdown.cancel();
}
