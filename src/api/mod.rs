pub mod analysis;
pub mod health;
pub mod market;
pub mod prompt;

use crate::error::{AppError, Result};
use crate::types::{PricePoint, RawPricePoint};
use crate::AppState;
use axum::Router;
use serde::Serialize;

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Debug, Serialize)]
pub struct ApiMeta {
    /// Unix timestamp (milliseconds) when the response was built.
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: ApiMeta {
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        }
    }
}

/// Normalize a wire price series, rejecting the first unusable point.
pub(crate) fn normalize_prices(raw: &[RawPricePoint]) -> Result<Vec<PricePoint>> {
    PricePoint::normalize_series(raw)
        .map_err(|index| AppError::BadRequest(format!("Invalid price point at index {}", index)))
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/market", market::router())
        .nest("/api/analysis", analysis::router())
        .nest("/api/prompt", prompt::router())
}
