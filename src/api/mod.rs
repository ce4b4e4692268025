//! JSON API
//!
//! Routes:
//! - `GET /api/crawl?url=<seed>` starts a crawl job
//! - `GET /api/search?q=<query>` runs a search
//! - `GET /api/queues` lists every crawl job
//! - `GET /api/queue/:name` shows one crawl job

use crate::crawler::{Crawler, Queue, QueueRegistry};
use crate::search::search;
use crate::storage::SqliteStorage;
use crate::KensakuError;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state of every handler
#[derive(Clone)]
pub struct ApiState {
    pub crawler: Crawler<SqliteStorage>,
    pub queues: Arc<QueueRegistry>,
}

impl ApiState {
    pub fn new(crawler: Crawler<SqliteStorage>, queues: Arc<QueueRegistry>) -> Self {
        Self { crawler, queues }
    }
}

/// Status message returned by every endpoint that has no richer payload
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub message: String,
}

impl ApiResponse {
    fn reply(status: StatusCode, message: &str) -> Response {
        (
            status,
            Json(ApiResponse {
                status: status.as_u16(),
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct CrawlParams {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Builds the API router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/crawl", get(crawl_handler))
        .route("/api/search", get(search_handler))
        .route("/api/queues", get(queues_handler))
        .route("/api/queues/", get(queues_handler))
        .route("/api/queue/:name", get(queue_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `address` and serves the API until the process exits
pub async fn serve(address: &str, state: ApiState) -> Result<(), KensakuError> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Registers a job named after the seed URL and runs its seed cycle
///
/// The rest of the site keeps being crawled after the response is sent.
pub async fn crawl_handler(
    State(state): State<ApiState>,
    Query(params): Query<CrawlParams>,
) -> Response {
    if params.url.is_empty() {
        return ApiResponse::reply(StatusCode::BAD_REQUEST, "URL parameter 'url' was empty.");
    }

    let queue = Arc::new(Queue::new(params.url.clone()));
    state.queues.add(Arc::clone(&queue));

    match state.crawler.crawl(&params.url, queue).await {
        Ok(_handle) => ApiResponse::reply(StatusCode::OK, "Crawling successful"),
        Err(e) => {
            tracing::warn!("Crawl of {} failed: {}", params.url, e);
            ApiResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, "Crawling failed.")
        }
    }
}

pub async fn search_handler(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Response {
    if params.q.is_empty() {
        return ApiResponse::reply(StatusCode::BAD_REQUEST, "Query parameter 'q' was empty.");
    }

    // SQLite blocks, and the lock may be held by a crawl writing its batch.
    let storage = Arc::clone(state.crawler.storage());
    let query = params.q.clone();
    let result = tokio::task::spawn_blocking(move || {
        let storage = storage.lock().unwrap_or_else(PoisonError::into_inner);
        search(&*storage, &query)
    })
    .await
    .map_err(KensakuError::from)
    .and_then(|result| result);

    match result {
        Ok(results) => Json(results).into_response(),
        Err(e) => {
            tracing::warn!("Search for {:?} failed: {}", params.q, e);
            ApiResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, "Search failed.")
        }
    }
}

pub async fn queues_handler(State(state): State<ApiState>) -> Response {
    Json(state.queues.list()).into_response()
}

pub async fn queue_handler(State(state): State<ApiState>, Path(name): Path<String>) -> Response {
    match state.queues.get(&name) {
        Some(queue) => Json(queue.snapshot()).into_response(),
        None => ApiResponse::reply(
            StatusCode::BAD_REQUEST,
            "Name provided is not a valid queue.",
        ),
    }
}
