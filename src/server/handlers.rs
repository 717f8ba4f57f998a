use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::articles::search::{SearchHit, DEFAULT_SEARCH_LIMIT};
use crate::pipeline::{recommend, Recommendation};
use crate::server::error::ApiError;
use crate::server::AppState;

/// Accepted length of a search query, in characters
pub const QUERY_CHARS: std::ops::RangeInclusive<usize> = 1..=50;
/// Accepted neighbor count
pub const K_RANGE: std::ops::RangeInclusive<i64> = 1..=10;
pub const DEFAULT_K: i64 = 3;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_ready: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// Body of `POST /recommend`; signed so negative indices reach validation
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub article_idx: i64,
    #[serde(default = "default_k")]
    pub k: i64,
}

fn default_k() -> i64 {
    DEFAULT_K
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub input_idx: usize,
    pub recommendations: Vec<Recommendation>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_ready: state.is_ready(),
    })
}

pub async fn search_articles(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;
    let query = params.q.unwrap_or_default();
    if !QUERY_CHARS.contains(&query.chars().count()) {
        return Err(ApiError::Validation(format!(
            "q must be between {} and {} characters",
            QUERY_CHARS.start(),
            QUERY_CHARS.end()
        )));
    }
    let artifacts = state.artifacts().ok_or_else(not_ready)?;
    debug!(query = %query, "search");
    let results = artifacts.search(&query, DEFAULT_SEARCH_LIMIT);
    Ok(Json(SearchResponse { query, results }))
}

pub async fn recommend_articles(
    State(state): State<AppState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let idx = usize::try_from(req.article_idx)
        .map_err(|_| ApiError::Validation("article_idx must be greater than or equal to 0".into()))?;
    if !K_RANGE.contains(&req.k) {
        return Err(ApiError::Validation(format!(
            "k must be between {} and {}",
            K_RANGE.start(),
            K_RANGE.end()
        )));
    }
    let k = req.k as usize;
    let artifacts = state.artifacts().ok_or_else(not_ready)?;
    debug!(idx, k, "recommend");

    // 全件走査なのでブロッキングスレッドで
    let recommendations = tokio::task::spawn_blocking(move || recommend(Some(artifacts.as_ref()), idx, k))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(RecommendResponse {
        input_idx: idx,
        recommendations,
    }))
}

fn not_ready() -> ApiError {
    ApiError::from(crate::error::Error::ModelNotReady("artifacts are not loaded".into()))
}

