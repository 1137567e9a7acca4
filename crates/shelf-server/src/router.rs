use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler::{self, AppState};

/// Build the axum router with all promptshelf endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/api/health", get(handler::health_handler))
        .route("/api/info", get(handler::info_handler))
        .route("/api/shutdown", post(handler::shutdown_handler))
        .route(
            "/api/prompts",
            get(handler::list_prompts).post(handler::create_prompt),
        )
        .route(
            "/api/prompts/:id",
            get(handler::get_prompt)
                .put(handler::update_prompt)
                .post(handler::autosave_prompt)
                .delete(handler::delete_prompt),
        )
        .route(
            "/api/prompts/:id/history/:version",
            delete(handler::delete_version),
        )
        .route("/api/prompts/:id/compare", get(handler::compare_versions))
        .route(
            "/api/recycle-bin",
            get(handler::list_recycle_bin).delete(handler::empty_recycle_bin),
        )
        .route("/api/recycle-bin/restore/:id", post(handler::restore_item))
        .route("/api/recycle-bin/:id", delete(handler::purge_item))
        .route("/api/diff", post(handler::diff_handler))
        .route("/api/diff/inline", post(handler::inline_handler))
        .route("/api/diff/html", post(handler::html_handler))
        .with_state(state);

    let app = match &config.static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
