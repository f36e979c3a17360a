use serde::{Deserialize, Serialize};

use super::{MarketSnapshot, TrendDirection};

/// Short-term strategy families with historical performance figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    RsiScalping,
    QuickBreakout,
    MomentumScalp,
    SupportBounce,
    VolumeSpike,
    FibonacciBounce,
    QuickReversal,
    PatternTrade,
    /// No specific strategy; uses the generic profit baseline.
    #[default]
    Mixed,
}

/// Historical figures for a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyStats {
    pub win_rate: f64,
    pub avg_profit: f64,
    pub max_drawdown: f64,
}

impl StrategyType {
    /// Performance figures, `None` for the generic mix.
    pub fn stats(&self) -> Option<StrategyStats> {
        let (win_rate, avg_profit, max_drawdown) = match self {
            Self::RsiScalping => (0.78, 0.025, 0.01),
            Self::QuickBreakout => (0.72, 0.035, 0.015),
            Self::MomentumScalp => (0.75, 0.03, 0.01),
            Self::SupportBounce => (0.80, 0.02, 0.01),
            Self::VolumeSpike => (0.85, 0.045, 0.015),
            Self::FibonacciBounce => (0.73, 0.02, 0.01),
            Self::QuickReversal => (0.82, 0.035, 0.015),
            Self::PatternTrade => (0.76, 0.03, 0.015),
            Self::Mixed => return None,
        };
        Some(StrategyStats {
            win_rate,
            avg_profit,
            max_drawdown,
        })
    }

    /// Average profit per trade as a fraction (10% when unknown).
    pub fn base_avg_profit(&self) -> f64 {
        self.stats().map(|s| s.avg_profit).unwrap_or(0.10)
    }

    /// Expected holding period.
    pub fn expected_time_frame(&self) -> &'static str {
        match self {
            Self::RsiScalping => "1-3 hours",
            Self::QuickBreakout => "1-4 hours",
            Self::MomentumScalp => "30min-2 hours",
            Self::SupportBounce => "1-2 hours",
            Self::VolumeSpike => "1-2 hours",
            Self::FibonacciBounce => "1-3 hours",
            Self::QuickReversal => "1-3 hours",
            Self::PatternTrade => "2-4 hours",
            Self::Mixed => "2-4 hours",
        }
    }
}

/// Inputs describing a candidate trade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSetup {
    pub price: f64,
    pub trend_direction: TrendDirection,
    pub trend_strength: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum_direction: Option<TrendDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub targets: Vec<f64>,
    /// Technical score 0-100; without it the technical factor is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReward {
    /// Reward / risk, rounded to 2 decimals. 0 when undefined.
    pub ratio: f64,
    pub entry: Option<f64>,
    pub stop_loss: Option<f64>,
    pub target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_percent: Option<f64>,
}

impl RiskReward {
    pub fn undefined(entry: Option<f64>, stop_loss: Option<f64>, target: Option<f64>) -> Self {
        Self {
            ratio: 0.0,
            entry,
            stop_loss,
            target,
            risk_percent: None,
            reward_percent: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl TimingQuality {
    pub fn label(&self) -> &'static str {
        match self {
            TimingQuality::Excellent => "excellent",
            TimingQuality::Good => "good",
            TimingQuality::Fair => "fair",
            TimingQuality::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryQuality {
    /// 0-100.
    pub score: f64,
    pub quality: TimingQuality,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfitabilityRating {
    Poor,
    Fair,
    Good,
    Excellent,
    Exceptional,
}

impl ProfitabilityRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::Exceptional
        } else if score >= 75.0 {
            Self::Excellent
        } else if score >= 65.0 {
            Self::Good
        } else if score >= 55.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
            Self::Exceptional => "Exceptional",
        }
    }
}

/// Per-factor values feeding the profitability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityFactors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_strength: Option<f64>,
    pub risk_reward: f64,
    pub entry_timing: f64,
    pub market_conditions: f64,
    pub volume_confirmation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedProfit {
    /// Expected profit in percent.
    pub percentage: f64,
    /// Conservative estimate (x0.7), in percent.
    pub risk_adjusted: f64,
    pub time_frame: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityScore {
    /// 0-100, rounded.
    pub score: u8,
    pub rating: ProfitabilityRating,
    pub factors: ProfitabilityFactors,
    pub risk_reward: RiskReward,
    pub entry_quality: EntryQuality,
    pub expected_profit: ExpectedProfit,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSize {
    /// Units of the asset, 8 decimals.
    pub size: f64,
    pub usd_value: f64,
    pub risk_amount: f64,
    pub risk_percent: f64,
    /// Entry-to-stop distance as a percentage of entry.
    pub stop_loss_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitTarget {
    pub price: f64,
    pub reward_percent: f64,
    pub risk_reward: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitTargets {
    pub conservative: ProfitTarget,
    pub moderate: ProfitTarget,
    pub aggressive: ProfitTarget,
}

/// A scanned trading opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub coin: String,
    pub profitability: ProfitabilityScore,
    pub setup: TradeSetup,
    pub market: MarketSnapshot,
    /// score x risk/reward ratio.
    pub priority: f64,
}

/// A currently held position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub coin_id: String,
    #[serde(default)]
    pub current_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortfolioAction {
    #[serde(rename = "REDUCE")]
    Reduce,
    #[serde(rename = "HOLD/ADD")]
    HoldOrAdd,
    #[serde(rename = "BUY")]
    Buy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceSuggestion {
    pub coin: String,
    pub action: PortfolioAction,
    pub reason: String,
    pub current_value: f64,
    pub suggested_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOpportunity {
    pub coin: String,
    pub action: PortfolioAction,
    pub profitability: ProfitabilityScore,
    pub suggested_allocation: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPlan {
    pub rebalance_suggestions: Vec<RebalanceSuggestion>,
    pub new_opportunities: Vec<NewOpportunity>,
    pub total_capital: f64,
}
