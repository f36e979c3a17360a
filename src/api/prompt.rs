use super::{normalize_prices, ApiResponse};
use crate::error::{AppError, Result};
use crate::services::AssembledPrompt;
use crate::types::{PricePoint, RawPricePoint};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub message: String,
    /// Price histories keyed by coin id.
    #[serde(default)]
    pub histories: HashMap<String, Vec<RawPricePoint>>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(build_prompt))
}

/// POST /api/prompt
async fn build_prompt(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<ApiResponse<AssembledPrompt>>> {
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message must not be empty".to_string()));
    }

    let histories = request
        .histories
        .iter()
        .map(|(coin, raw)| Ok((coin.to_lowercase(), normalize_prices(raw)?)))
        .collect::<Result<HashMap<String, Vec<PricePoint>>>>()?;

    let prompt = state.prompt.build_prompt(&request.message, &histories).await;
    Ok(Json(ApiResponse::new(prompt)))
}
