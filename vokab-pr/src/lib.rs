//! vokab-pr library interface
//!
//! Pronunciation recordings: serves the US pronunciation of a (word, word type)
//! from the local cache, filling the cache from the dictionary website on a miss.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod storage;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use vokab_common::WordClassifier;

use crate::services::RecordingOrchestrator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<RecordingOrchestrator>,
    /// Consulted when a request names no word type
    pub classifier: Arc<dyn WordClassifier>,
    /// Cancelled on shutdown; each request runs under a child token
    pub shutdown: CancellationToken,
    /// Dictionary site origin, reported by the health check
    pub dictionary_origin: String,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<RecordingOrchestrator>,
        classifier: Arc<dyn WordClassifier>,
        shutdown: CancellationToken,
        dictionary_origin: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            classifier,
            shutdown,
            dictionary_origin: dictionary_origin.into(),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::recording_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
