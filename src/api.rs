use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::crawler::{self, BatchResult, UrlResult};
use crate::error::BatchError;
use crate::storage::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScrapeRequest {
    /// URLs to process, strictly in order.
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScrapeResponse {
    pub message: String,
    pub results: Vec<UrlResult>,
    pub total_processed: usize,
    pub success_count: usize,
    pub error_count: usize,
}

impl ScrapeResponse {
    fn from_batch(batch: BatchResult) -> Self {
        Self {
            message: "Successfully processed URLs".to_string(),
            results: batch.results,
            total_processed: batch.total_processed,
            success_count: batch.success_count,
            error_count: batch.error_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Runs a scrape batch. Completes with 200 even when individual URLs fail;
/// those failures are reported per entry in `results`.
#[utoipa::path(
    post,
    path = "/scrape",
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Batch processed, possibly with per-URL errors", body = ScrapeResponse),
        (status = 400, description = "No URLs provided", body = ErrorBody),
        (status = 500, description = "Browser session could not be started", body = ErrorBody)
    ),
    tag = "scraper"
)]
pub async fn scrape(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScrapeRequest>,
) -> Response {
    match crawler::run_batch(&payload.urls, state.store.clone()).await {
        Ok(batch) => (StatusCode::OK, Json(ScrapeResponse::from_batch(batch))).into_response(),
        Err(e @ BatchError::NoUrls) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}
