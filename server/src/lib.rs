use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use search_core::tokenizer::{query_words, tokenize};
use search_core::{InvertedIndex, SearchMode, SearchResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub mode: SearchMode,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Serialize)]
pub struct WordResponse {
    pub word: String,
    pub count: usize,
    pub documents: Vec<String>,
}

/// Shared, read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
}

fn cors_layer() -> CorsLayer {
    // CORS_ALLOW_ORIGIN is comma-separated; any origin when unset or unparsable
    let origins: Vec<_> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn build_app(index: Arc<InvertedIndex>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/word/:word", get(word_handler))
        .with_state(AppState { index })
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(index: Arc<InvertedIndex>, addr: SocketAddr) -> Result<()> {
    let app = build_app(index);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let words = query_words(&params.q);
    let mut results = if words.is_empty() { Vec::new() } else { state.index.search(&words, params.mode) };

    let total_hits = results.len();
    results.truncate(params.k.clamp(1, 100));
    let took_s = start.elapsed().as_secs_f64();
    tracing::debug!(query = %params.q, total_hits, took_s, "search");
    Json(SearchResponse { query: params.q, mode: params.mode, took_s, total_hits, results })
}

pub async fn word_handler(State(state): State<AppState>, Path(word): Path<String>) -> Result<Json<WordResponse>, (StatusCode, String)> {
    // look the word up the way it was indexed
    let stem = tokenize(&word)
        .into_iter()
        .next()
        .map(|(stem, _)| stem)
        .ok_or((StatusCode::BAD_REQUEST, format!("not a word: {word}")))?;
    if !state.index.contains(&stem) {
        return Err((StatusCode::NOT_FOUND, format!("{stem} is not indexed")));
    }
    let documents = state.index.get(&stem).into_iter().map(str::to_string).collect();
    Ok(Json(WordResponse { count: state.index.word_count(&stem), word: stem, documents }))
}
