//! Analysis API endpoints: technical analysis, profitability and sizing.

use super::{normalize_prices, ApiResponse};
use crate::error::{AppError, Result};
use crate::services::signals::scoring::prediction_confidence;
use crate::types::{
    Holding, MarketSnapshot, Opportunity, PortfolioPlan, PositionSize, ProfitTargets,
    ProfitabilityScore, RawPricePoint, StrategyType, TechnicalAnalysis, TradeSetup,
    TrendDirection,
};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct TechnicalRequest {
    pub prices: Vec<RawPricePoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityRequest {
    pub market: MarketSnapshot,
    /// Optional history; enables a full technical analysis.
    #[serde(default)]
    pub prices: Option<Vec<RawPricePoint>>,
    /// Explicit setup, overriding the derived one.
    #[serde(default)]
    pub setup: Option<TradeSetup>,
    #[serde(default)]
    pub strategy: StrategyType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<TechnicalAnalysis>,
    pub setup: TradeSetup,
    pub profitability: ProfitabilityScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<ProfitTargets>,
    /// 0-100.
    pub prediction_confidence: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSizeRequest {
    #[serde(default)]
    pub account_balance: Option<f64>,
    /// Percent of the account to risk; defaults to the configured value.
    #[serde(default)]
    pub risk_percentage: Option<f64>,
    pub entry: f64,
    pub stop_loss: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetsRequest {
    pub entry: f64,
    pub stop_loss: f64,
    #[serde(default)]
    pub trend: TrendDirection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunitiesRequest {
    pub markets: HashMap<String, MarketSnapshot>,
    /// Coins to scan; defaults to every coin in `markets`.
    #[serde(default)]
    pub coins: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRequest {
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub available_capital: f64,
    pub markets: HashMap<String, MarketSnapshot>,
}

/// Create the analysis router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/technical", post(technical))
        .route("/profitability", post(profitability))
        .route("/position-size", post(position_size))
        .route("/targets", post(targets))
        .route("/opportunities", post(opportunities))
        .route("/portfolio", post(portfolio))
}

/// POST /api/analysis/technical
async fn technical(
    State(state): State<AppState>,
    Json(request): Json<TechnicalRequest>,
) -> Result<Json<ApiResponse<TechnicalAnalysis>>> {
    let series = normalize_prices(&request.prices)?;
    Ok(Json(ApiResponse::new(state.analyzer.analyze(&series))))
}

/// POST /api/analysis/profitability
async fn profitability(
    State(state): State<AppState>,
    Json(request): Json<ProfitabilityRequest>,
) -> Result<Json<ApiResponse<ProfitabilityReport>>> {
    if !request.market.price.is_finite() || request.market.price <= 0.0 {
        return Err(AppError::BadRequest("Market price must be positive".to_string()));
    }

    let analysis = match &request.prices {
        Some(raw) => Some(state.analyzer.analyze(&normalize_prices(raw)?)),
        None => None,
    };

    let setup = match (request.setup, &analysis) {
        (Some(setup), _) => setup,
        (None, Some(analysis)) if !analysis.insufficient_data => {
            state.scorer.setup_from_analysis(analysis, &request.market)
        }
        _ => state.scorer.quick_setup(&request.market),
    };

    let profitability =
        state
            .scorer
            .calculate_profitability_score(&setup, &request.market, request.strategy);
    let targets = match (setup.entry, setup.stop_loss) {
        (Some(entry), Some(stop_loss)) if entry != stop_loss => Some(
            state
                .scorer
                .suggest_profit_targets(entry, stop_loss, setup.trend_direction),
        ),
        _ => None,
    };
    let confidence = prediction_confidence(analysis.as_ref(), Some(&request.market));

    debug!(
        "Profitability {} ({}) for price {}",
        profitability.score,
        profitability.rating.label(),
        request.market.price
    );

    Ok(Json(ApiResponse::new(ProfitabilityReport {
        analysis,
        setup,
        profitability,
        targets,
        prediction_confidence: confidence,
    })))
}

/// POST /api/analysis/position-size
async fn position_size(
    State(state): State<AppState>,
    Json(request): Json<PositionSizeRequest>,
) -> Result<Json<ApiResponse<PositionSize>>> {
    let balance = request
        .account_balance
        .unwrap_or(state.config.account_balance);
    let risk = request
        .risk_percentage
        .unwrap_or(state.config.risk_percentage);
    if balance <= 0.0 || !(risk > 0.0 && risk <= 100.0) {
        return Err(AppError::BadRequest(
            "Account balance must be positive and risk between 0 and 100%".to_string(),
        ));
    }

    let size = state
        .scorer
        .calculate_position_size(balance, risk, request.entry, request.stop_loss)?;
    Ok(Json(ApiResponse::new(size)))
}

/// POST /api/analysis/targets
async fn targets(
    State(state): State<AppState>,
    Json(request): Json<TargetsRequest>,
) -> Result<Json<ApiResponse<ProfitTargets>>> {
    if request.entry <= 0.0 || request.entry == request.stop_loss {
        return Err(AppError::BadRequest(
            "Entry must be positive and differ from the stop-loss".to_string(),
        ));
    }

    Ok(Json(ApiResponse::new(state.scorer.suggest_profit_targets(
        request.entry,
        request.stop_loss,
        request.trend,
    ))))
}

/// POST /api/analysis/opportunities
async fn opportunities(
    State(state): State<AppState>,
    Json(request): Json<OpportunitiesRequest>,
) -> Json<ApiResponse<Vec<Opportunity>>> {
    let coins = request.coins.unwrap_or_else(|| {
        let mut coins: Vec<String> = request.markets.keys().cloned().collect();
        coins.sort();
        coins
    });

    Json(ApiResponse::new(
        state.scorer.scan_opportunities(&coins, &request.markets),
    ))
}

/// POST /api/analysis/portfolio
async fn portfolio(
    State(state): State<AppState>,
    Json(request): Json<PortfolioRequest>,
) -> Json<ApiResponse<PortfolioPlan>> {
    Json(ApiResponse::new(state.scorer.optimize_portfolio(
        &request.holdings,
        request.available_capital,
        &request.markets,
    )))
}
