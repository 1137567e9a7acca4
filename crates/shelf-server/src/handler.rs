//! Request handlers.
//!
//! Library calls touch the filesystem and diffs are `O(m * n)`, so both run
//! on the blocking pool.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shelf_diff::{
    diff_chars, diff_lines, escape_html, render_inline, similarity, summarize, to_html, CharDiff,
    DiffScript,
};
use shelf_store::{
    FsPromptStore, Library, NewPrompt, Prompt, PromptPatch, RecycleItem, StoreResult,
    VersionComparison, VersionRef,
};
use tokio::sync::Notify;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};

/// Shared state of all handlers.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<Library<FsPromptStore>>,
    /// Notified by `POST /api/shutdown`.
    pub shutdown: Arc<Notify>,
}

impl AppState {
    /// Open the prompt store under the configured data directory.
    pub fn open(config: &ServerConfig) -> ServerResult<Self> {
        let store = FsPromptStore::open(&config.data_dir)?;
        Ok(Self {
            library: Arc::new(Library::with_limits(store, config.limits)),
            shutdown: Arc::new(Notify::new()),
        })
    }
}

/// Run a library call on the blocking pool.
async fn blocking<T, F>(state: &AppState, f: F) -> ServerResult<T>
where
    F: FnOnce(&Library<FsPromptStore>) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let library = Arc::clone(&state.library);
    tokio::task::spawn_blocking(move || f(&library))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

// ---- Service ----

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<Value> {
    Json(json!({
        "name": "promptshelf",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn shutdown_handler(State(state): State<AppState>) -> Json<Value> {
    tracing::info!("shutdown requested");
    state.shutdown.notify_one();
    Json(json!({ "success": true, "message": "server is shutting down" }))
}

// ---- Prompts ----

pub async fn list_prompts(State(state): State<AppState>) -> ServerResult<Json<Vec<Prompt>>> {
    blocking(&state, |lib| lib.list()).await.map(Json)
}

pub async fn create_prompt(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewPrompt>,
) -> ServerResult<(StatusCode, Json<Prompt>)> {
    let prompt = blocking(&state, move |lib| lib.create(new)).await?;
    Ok((StatusCode::CREATED, Json(prompt)))
}

pub async fn get_prompt(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ServerResult<Json<Prompt>> {
    blocking(&state, move |lib| lib.get(&id)).await.map(Json)
}

pub async fn update_prompt(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(patch): ApiJson<PromptPatch>,
) -> ServerResult<Json<Prompt>> {
    blocking(&state, move |lib| lib.update(&id, patch))
        .await
        .map(Json)
}

/// Full-record save used by the editor's page-unload beacon.
pub async fn autosave_prompt(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(prompt): ApiJson<Prompt>,
) -> ServerResult<Json<Value>> {
    blocking(&state, move |lib| lib.autosave(&id, prompt)).await?;
    Ok(success())
}

pub async fn delete_prompt(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ServerResult<Json<Value>> {
    blocking(&state, move |lib| lib.delete(&id)).await?;
    Ok(success())
}

// ---- History ----

pub async fn delete_version(
    State(state): State<AppState>,
    ApiPath((id, version)): ApiPath<(String, usize)>,
) -> ServerResult<Json<Prompt>> {
    blocking(&state, move |lib| lib.delete_version(&id, version))
        .await
        .map(Json)
}

/// Version references stay strings here so a bad one is reported as an
/// invalid reference rather than a query string error.
#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

fn version_or(raw: Option<&str>, default: VersionRef) -> ServerResult<VersionRef> {
    match raw {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(default),
    }
}

/// Diff two versions; defaults to the newest history entry against the
/// current content.
pub async fn compare_versions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiQuery(query): ApiQuery<CompareQuery>,
) -> ServerResult<Json<VersionComparison>> {
    let from = version_or(query.from.as_deref(), VersionRef::Previous)?;
    let to = version_or(query.to.as_deref(), VersionRef::Current)?;
    blocking(&state, move |lib| lib.compare(&id, from, to))
        .await
        .map(Json)
}

// ---- Recycle bin ----

pub async fn list_recycle_bin(
    State(state): State<AppState>,
) -> ServerResult<Json<Vec<RecycleItem>>> {
    blocking(&state, |lib| lib.recycle_bin()).await.map(Json)
}

pub async fn empty_recycle_bin(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    let removed = blocking(&state, |lib| lib.empty_recycle_bin()).await?;
    Ok(Json(json!({ "success": true, "removed": removed })))
}

pub async fn restore_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ServerResult<Json<Prompt>> {
    blocking(&state, move |lib| lib.restore(&id)).await.map(Json)
}

pub async fn purge_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ServerResult<Json<Value>> {
    blocking(&state, move |lib| lib.purge(&id)).await?;
    Ok(success())
}

// ---- Diff ----

/// Body of the diff endpoints.
#[derive(Debug, Deserialize)]
pub struct DiffRequest {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub items: DiffScript,
    pub summary: String,
    pub similarity: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineResponse {
    pub old_markup: String,
    pub new_markup: String,
    pub segments: Vec<CharDiff>,
}

pub async fn diff_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DiffRequest>,
) -> ServerResult<Json<DiffResponse>> {
    blocking(&state, move |lib| {
        lib.limits().check_lines(&req.old, &req.new)?;
        let items = diff_lines(&req.old, &req.new);
        Ok(DiffResponse {
            summary: summarize(&items),
            similarity: similarity(&req.old, &req.new),
            items,
        })
    })
    .await
    .map(Json)
}

pub async fn inline_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DiffRequest>,
) -> ServerResult<Json<InlineResponse>> {
    blocking(&state, move |lib| {
        lib.limits().check_chars(&req.old, &req.new)?;
        let segments = diff_chars(&req.old, &req.new);
        let markup = render_inline(&segments, escape_html);
        Ok(InlineResponse {
            old_markup: markup.old_markup,
            new_markup: markup.new_markup,
            segments,
        })
    })
    .await
    .map(Json)
}

pub async fn html_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DiffRequest>,
) -> ServerResult<Json<Value>> {
    let html = blocking(&state, move |lib| {
        lib.limits().check_lines(&req.old, &req.new)?;
        Ok(to_html(&diff_lines(&req.old, &req.new), escape_html))
    })
    .await?;
    Ok(Json(json!({ "html": html })))
}
