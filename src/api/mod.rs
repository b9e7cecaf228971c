//! HTTP API
//!
//! REST endpoints:
//! - GET /health - Health check
//! - GET /v1/stats - Record count and embedding info
//! - GET /v1/records - All records
//! - DELETE /v1/records - Remove all records
//! - PUT /v1/records/{id} - Upsert with an explicit vector
//! - GET /v1/records/{id} - Fetch one record
//! - DELETE /v1/records/{id} - Remove one record
//! - PUT /v1/documents/{id} - Upsert text, embedded server side
//! - POST /v1/documents/batch - Upsert many texts
//! - POST /v1/query - Nearest neighbours by vector or text

use crate::config::ApiConfig;
use crate::error::VecstashError;
use crate::store::VectorStore;
use crate::types::{BatchItem, BatchResult, Metadata, VectorMatch, VectorRecord};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// API state
pub struct ApiState {
    pub store: Arc<VectorStore>,
    pub config: ApiConfig,
}

/// Build the router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/stats", get(stats))
        .route("/v1/records", get(list_records).delete(clear_records))
        .route(
            "/v1/records/:id",
            put(put_record).get(get_record).delete(delete_record),
        )
        .route("/v1/documents/:id", put(put_document))
        .route("/v1/documents/batch", post(batch_documents))
        .route("/v1/query", post(query))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API
pub async fn serve(store: Arc<VectorStore>, config: ApiConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = router(Arc::new(ApiState { store, config }));

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Health check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
    })
}

async fn stats(State(state): State<Arc<ApiState>>) -> Json<StatsResponse> {
    let embedder = state.store.embedder();

    Json(StatsResponse {
        count: state.store.count().await,
        dimensionality: embedder.dimensionality(),
        vocabulary_size: embedder.vocabulary_size(),
    })
}

async fn list_records(State(state): State<Arc<ApiState>>) -> Json<RecordsResponse> {
    let records = state.store.query_all().await;
    Json(RecordsResponse {
        count: records.len(),
        records,
    })
}

async fn clear_records(State(state): State<Arc<ApiState>>) -> Result<StatusCode, ApiError> {
    state.store.remove_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upsert with a caller-supplied vector
#[axum::debug_handler]
async fn put_record(
    Path(id): Path<String>,
    State(state): State<Arc<ApiState>>,
    Json(request): Json<PutRecordRequest>,
) -> Result<Json<UpsertResponse>, ApiError> {
    let start = Instant::now();

    if request.vector.is_empty() {
        return Err(ApiError::BadRequest("No vector provided".into()));
    }

    state
        .store
        .upsert(id.clone(), request.vector, request.text, request.metadata)
        .await?;

    Ok(Json(UpsertResponse {
        id,
        latency_ms: start.elapsed().as_secs_f64() * 1000.0,
    }))
}

async fn get_record(
    Path(id): Path<String>,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<VectorRecord>, ApiError> {
    state
        .store
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Record not found: {}", id)))
}

async fn delete_record(
    Path(id): Path<String>,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<RemoveResponse>, ApiError> {
    if state.store.remove_at(&id).await? {
        Ok(Json(RemoveResponse { removed: true }))
    } else {
        Err(ApiError::NotFound(format!("Record not found: {}", id)))
    }
}

/// Upsert text, embedded by the store
#[axum::debug_handler]
async fn put_document(
    Path(id): Path<String>,
    State(state): State<Arc<ApiState>>,
    Json(request): Json<PutDocumentRequest>,
) -> Result<Json<UpsertResponse>, ApiError> {
    let start = Instant::now();

    state
        .store
        .upsert_text(id.clone(), request.text, request.metadata)
        .await?;

    Ok(Json(UpsertResponse {
        id,
        latency_ms: start.elapsed().as_secs_f64() * 1000.0,
    }))
}

async fn batch_documents(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResult>, ApiError> {
    if request.items.is_empty() {
        return Err(ApiError::BadRequest("No items provided".into()));
    }

    let result = state.store.batch_upsert_texts(request.items).await?;
    Ok(Json(result))
}

/// Nearest neighbours for a vector or a text
async fn query(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let start = Instant::now();

    let top_k = request.top_k.unwrap_or(state.config.default_top_k);
    if top_k == 0 || top_k > state.config.max_top_k {
        return Err(ApiError::BadRequest(format!(
            "top_k must be between 1 and {}",
            state.config.max_top_k
        )));
    }

    let results = match (request.vector, request.text) {
        (Some(vector), None) => {
            if vector.is_empty() {
                return Err(ApiError::BadRequest("No query vector provided".into()));
            }
            state.store.query(&vector, top_k).await
        }
        (None, Some(text)) => state.store.query_text(&text, top_k).await,
        _ => {
            return Err(ApiError::BadRequest(
                "Provide exactly one of `vector` or `text`".into(),
            ))
        }
    };

    Ok(Json(QueryResponse {
        results,
        latency_ms: start.elapsed().as_secs_f64() * 1000.0,
    }))
}

// ============================================================================
// REQUEST/RESPONSE TYPES
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
struct StatsResponse {
    count: usize,
    dimensionality: usize,
    vocabulary_size: usize,
}

#[derive(Serialize)]
struct RecordsResponse {
    count: usize,
    records: Vec<VectorRecord>,
}

#[derive(Deserialize)]
struct PutRecordRequest {
    vector: Vec<f64>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Deserialize)]
struct PutDocumentRequest {
    text: String,
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Deserialize)]
struct BatchRequest {
    items: Vec<BatchItem>,
}

#[derive(Serialize)]
struct UpsertResponse {
    id: String,
    latency_ms: f64,
}

#[derive(Serialize)]
struct RemoveResponse {
    removed: bool,
}

#[derive(Deserialize)]
struct QueryRequest {
    vector: Option<Vec<f64>>,
    text: Option<String>,
    top_k: Option<usize>,
}

#[derive(Serialize)]
struct QueryResponse {
    results: Vec<VectorMatch>,
    latency_ms: f64,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<VecstashError> for ApiError {
    fn from(e: VecstashError) -> Self {
        match e {
            VecstashError::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => {
                tracing::error!(error = %other, "Store operation failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
