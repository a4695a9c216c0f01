//! JSON HTTP server for recipe generation and corpus search.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/recipe` | Run the full pipeline and return the recipe |
//! | `POST` | `/search` | Query the corpus (vector, keyword, or hybrid) |
//! | `GET`  | `/health` | Health check (version + corpus size) |
//!
//! # Error Contract
//!
//! All error responses share one schema:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Codes: `bad_request` (400), `embedding_unavailable` (400),
//! `generation_failed` (502), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser
//! clients.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use cutwise_core::error::EngineError;
use cutwise_core::models::{RecipeRequest, ScoredResult, SearchMethod};
use cutwise_core::search::tokenize_query;
use cutwise_core::store::memory::MemoryStore;
use cutwise_core::store::ChunkStore;

use crate::config::Config;
use crate::embedding;
use crate::pipeline::{self, RequestContext};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<MemoryStore>,
}

/// Start the HTTP server on the configured bind address.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config, store: MemoryStore) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::new(store),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/recipe", post(handle_recipe))
        .route("/search", post(handle_search))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    tracing::info!(%bind_addr, "server listening");
    println!("Server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

/// Map pipeline errors onto the HTTP error contract.
impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Configuration(message) => AppError {
                status: StatusCode::BAD_REQUEST,
                code: "bad_request",
                message,
            },
            EngineError::EmbeddingUnavailable(message) => AppError {
                status: StatusCode::BAD_REQUEST,
                code: "embedding_unavailable",
                message,
            },
            EngineError::Generation(message) => AppError {
                status: StatusCode::BAD_GATEWAY,
                code: "generation_failed",
                message,
            },
            EngineError::Retrieval(inner) => AppError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "internal",
                message: inner.to_string(),
            },
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    chunks: usize,
    timestamp: String,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let chunks = state.store.chunk_count().await.unwrap_or(0);
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        chunks,
        timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    })
}

// ============ POST /recipe ============

#[derive(Serialize)]
struct RecipeHttpResponse {
    recipe_text: String,
    sources_used: usize,
    used_fallback: bool,
    generated_at: String,
}

async fn handle_recipe(
    State(state): State<AppState>,
    Json(request): Json<RecipeRequest>,
) -> Result<Json<RecipeHttpResponse>, AppError> {
    if request.query_text.is_none() && request.style_parameters.is_none() {
        return Err(bad_request(
            "request must carry query_text or style_parameters",
        ));
    }

    let ctx = RequestContext::new(&state.config, state.store.as_ref());
    let response = pipeline::generate_recipe(&ctx, &request).await?;

    Ok(Json(RecipeHttpResponse {
        recipe_text: response.recipe_text,
        sources_used: response.sources_used,
        used_fallback: response.used_fallback,
        generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    }))
}

// ============ POST /search ============

#[derive(Deserialize)]
struct SearchHttpRequest {
    query: String,
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default)]
    limit: Option<usize>,
}

fn default_mode() -> String {
    "hybrid".to_string()
}

#[derive(Serialize)]
struct SearchHttpResponse {
    results: Vec<SearchResultItem>,
    count: usize,
    used_fallback: bool,
}

#[derive(Serialize)]
struct SearchResultItem {
    id: String,
    title: Option<String>,
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword_matches: Option<u32>,
    method: SearchMethod,
    snippet: String,
}

fn to_item(result: &ScoredResult) -> SearchResultItem {
    SearchResultItem {
        id: result.chunk.id.clone(),
        title: result.chunk.title.clone(),
        category: result.chunk.category.clone(),
        similarity: result.similarity,
        keyword_matches: result.keyword_matches,
        method: result.method,
        snippet: result.chunk.text.chars().take(240).collect(),
    }
}

async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchHttpRequest>,
) -> Result<Json<SearchHttpResponse>, AppError> {
    if request.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let retrieval = &state.config.retrieval;
    let limit = request.limit.unwrap_or(retrieval.final_count).max(1);

    let (results, used_fallback) = match request.mode.as_str() {
        "keyword" => {
            let tokens = tokenize_query(&request.query);
            let results = state
                .store
                .keyword_query(&tokens, limit)
                .await
                .map_err(EngineError::from)?;
            (results, false)
        }
        "vector" => {
            if !state.config.embedding.is_enabled() {
                return Err(bad_request(
                    "vector mode requires an embedding provider; set [embedding] in config",
                ));
            }
            let query_vec = embedding::embed_query(&state.config.embedding, &request.query).await?;
            let results = state
                .store
                .vector_query(&query_vec, retrieval.vector_threshold, limit)
                .await
                .map_err(EngineError::from)?;
            (results, false)
        }
        "hybrid" => {
            let ctx = RequestContext::new(&state.config, state.store.as_ref());
            pipeline::retrieve(&ctx, &request.query, limit).await?
        }
        other => {
            return Err(bad_request(format!(
                "Unknown search mode: {other}. Use vector, keyword, or hybrid."
            )));
        }
    };

    let items: Vec<SearchResultItem> = results.iter().map(to_item).collect();
    Ok(Json(SearchHttpResponse {
        count: items.len(),
        results: items,
        used_fallback,
    }))
}
