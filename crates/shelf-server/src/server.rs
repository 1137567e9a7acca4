use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::AppState;
use crate::router::build_router;

/// Promptshelf HTTP server.
pub struct PromptServer {
    config: ServerConfig,
}

impl PromptServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the store and build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        let state = AppState::open(&self.config)?;
        Ok(build_router(state, &self.config))
    }

    /// Serve until Ctrl-C or `POST /api/shutdown`.
    pub async fn serve(self) -> ServerResult<()> {
        let state = AppState::open(&self.config)?;
        let shutdown = Arc::clone(&state.shutdown);
        let app = build_router(state, &self.config);

        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("promptshelf listening on http://{}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;
        info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal(requested: Arc<Notify>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    tokio::select! {
        _ = requested.notified() => info!("shutting down on request"),
        _ = ctrl_c => info!("shutting down on Ctrl-C"),
    }
}
