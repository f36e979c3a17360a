use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::aggregator::format_for_ai;
use crate::services::CacheStats;
use crate::types::AggregatedMarketData;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

/// Formatted multi-source summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub coin: String,
    pub summary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCacheResponse {
    pub cleared: bool,
}

/// Create the market data router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cache", delete(clear_cache))
        .route("/cache/stats", get(cache_stats))
        .route("/:coin", get(get_market_data))
        .route("/:coin/summary", get(get_summary))
}

/// Coin ids are CoinGecko slugs: lowercase letters, digits and dashes.
fn validate_coin_id(coin: &str) -> Result<String> {
    let coin = coin.trim().to_lowercase();
    let valid = !coin.is_empty()
        && coin.len() <= 64
        && coin.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(coin)
    } else {
        Err(AppError::BadRequest(format!("Invalid coin id: {}", coin)))
    }
}

/// GET /api/market/:coin
async fn get_market_data(
    State(state): State<AppState>,
    Path(coin): Path<String>,
) -> Result<Json<ApiResponse<AggregatedMarketData>>> {
    let coin = validate_coin_id(&coin)?;
    let data = state.aggregator.aggregate(&coin).await;
    Ok(Json(ApiResponse::new(data)))
}

/// GET /api/market/:coin/summary
async fn get_summary(
    State(state): State<AppState>,
    Path(coin): Path<String>,
) -> Result<Json<ApiResponse<SummaryResponse>>> {
    let coin = validate_coin_id(&coin)?;
    let data = state.aggregator.aggregate(&coin).await;
    Ok(Json(ApiResponse::new(SummaryResponse {
        summary: format_for_ai(&data),
        coin,
    })))
}

/// DELETE /api/market/cache
async fn clear_cache(State(state): State<AppState>) -> Json<ApiResponse<ClearCacheResponse>> {
    state.aggregator.clear_cache();
    Json(ApiResponse::new(ClearCacheResponse { cleared: true }))
}

/// GET /api/market/cache/stats
async fn cache_stats(State(state): State<AppState>) -> Json<ApiResponse<CacheStats>> {
    Json(ApiResponse::new(state.aggregator.cache_stats()))
}
