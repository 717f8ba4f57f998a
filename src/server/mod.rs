//! HTTP boundary over the loaded artifacts
//!
//! - `GET /health`
//! - `GET /articles/search?q=`
//! - `POST /recommend`
//!
//! Artifacts are loaded once at startup. A failed load is logged and the
//! service answers 503 until restarted after a build.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::Artifacts;

/// Shared, read-only handler state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    artifacts: Option<Arc<Artifacts>>,
}

impl AppState {
    pub fn new(artifacts: Option<Artifacts>) -> Self {
        Self {
            artifacts: artifacts.map(Arc::new),
        }
    }

    /// Load from the configured directory, falling back to not-ready
    pub fn load(config: &Config) -> Self {
        match Artifacts::load(&config.artifacts_dir) {
            Ok(artifacts) => {
                info!(articles = artifacts.len(), dir = %config.artifacts_dir.display(), "model ready");
                Self::new(Some(artifacts))
            }
            Err(e) => {
                warn!(error = %e, "starting without a model");
                Self::new(None)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.artifacts.is_some()
    }

    pub fn artifacts(&self) -> Option<Arc<Artifacts>> {
        self.artifacts.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/articles/search", get(handlers::search_articles))
        .route("/recommend", post(handlers::recommend_articles))
        .with_state(state)
}

/// Serve until Ctrl+C
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::load(config);
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
