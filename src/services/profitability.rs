//! Profitability scoring, position sizing and opportunity scanning.
//!
//! Combines a technical score with risk/reward, entry timing, market
//! conditions and volume into a single 0-100 profitability score.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::types::{
    EntryQuality, ExpectedProfit, Holding, MarketSnapshot, NewOpportunity, Opportunity,
    PortfolioAction, PortfolioPlan, PositionSize, ProfitTarget, ProfitTargets,
    ProfitabilityFactors, ProfitabilityRating, ProfitabilityScore, RebalanceSuggestion,
    RiskReward, StrategyType, TechnicalAnalysis, TimingQuality, TradeSetup, TrendDirection,
};

/// Factor weights, in percentage points of the final score.
const TECHNICAL_WEIGHT: f64 = 0.30;
const ENTRY_TIMING_WEIGHT: f64 = 0.20;
const MARKET_CONDITIONS_WEIGHT: f64 = 0.15;
const VOLUME_WEIGHT: f64 = 0.10;

/// Coins considered for new positions during portfolio optimisation.
const PORTFOLIO_CANDIDATES: [&str; 5] = ["bitcoin", "ethereum", "solana", "cardano", "binancecoin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProfitabilityError {
    #[error("Invalid stop-loss: entry and stop-loss must be distinct finite prices")]
    InvalidStopLoss,
}

/// Thresholds for surfacing opportunities.
#[derive(Debug, Clone, Copy)]
pub struct ProfitabilityConfig {
    pub min_profit_score: f64,
    pub min_risk_reward: f64,
}

impl Default for ProfitabilityConfig {
    fn default() -> Self {
        Self {
            min_profit_score: 70.0,
            min_risk_reward: 2.0,
        }
    }
}

/// Scores trade setups for profitability.
#[derive(Debug, Default)]
pub struct ProfitabilityScorer {
    config: ProfitabilityConfig,
}

impl ProfitabilityScorer {
    pub fn new(config: ProfitabilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfitabilityConfig {
        &self.config
    }

    /// Score a setup against current market data.
    pub fn calculate_profitability_score(
        &self,
        setup: &TradeSetup,
        market: &MarketSnapshot,
        strategy: StrategyType,
    ) -> ProfitabilityScore {
        let mut score = 0.0;

        let technical_strength = setup.technical_score.map(|s| s.clamp(0.0, 100.0));
        if let Some(technical) = technical_strength {
            score += technical / 100.0 * TECHNICAL_WEIGHT * 100.0;
        }

        let risk_reward = self.calculate_risk_reward_ratio(setup);
        score += risk_reward_points(risk_reward.ratio);

        let entry_quality = self.assess_entry_timing(setup, market);
        score += entry_quality.score / 100.0 * ENTRY_TIMING_WEIGHT * 100.0;

        let market_conditions = self.assess_market_conditions(market);
        score += market_conditions / 100.0 * MARKET_CONDITIONS_WEIGHT * 100.0;

        let volume_confirmation = self.assess_volume_confirmation(market);
        score += volume_confirmation / 100.0 * VOLUME_WEIGHT * 100.0;

        if let Some(stats) = strategy.stats() {
            score += stats.win_rate * 10.0;
        }

        let score = score.clamp(0.0, 100.0);

        ProfitabilityScore {
            score: score.round() as u8,
            rating: ProfitabilityRating::from_score(score),
            factors: ProfitabilityFactors {
                technical_strength,
                risk_reward: risk_reward.ratio,
                entry_timing: entry_quality.score,
                market_conditions,
                volume_confirmation,
            },
            risk_reward,
            entry_quality,
            expected_profit: self.calculate_expected_profit(score, strategy),
            recommendation: self.recommendation(score).to_string(),
        }
    }

    /// Reward-to-risk of the first target. Degenerate setups yield ratio 0.
    pub fn calculate_risk_reward_ratio(&self, setup: &TradeSetup) -> RiskReward {
        let target = setup.targets.first().copied();
        let (Some(entry), Some(stop_loss), Some(target)) = (setup.entry, setup.stop_loss, target)
        else {
            return RiskReward::undefined(None, None, None);
        };

        let risk = (entry - stop_loss).abs();
        let reward = (target - entry).abs();

        if risk == 0.0 || entry == 0.0 || !risk.is_finite() || !reward.is_finite() {
            return RiskReward::undefined(Some(entry), Some(stop_loss), Some(target));
        }

        RiskReward {
            ratio: round_to(reward / risk, 2),
            entry: Some(entry),
            stop_loss: Some(stop_loss),
            target: Some(target),
            risk_percent: Some(round_to(risk / entry * 100.0, 2)),
            reward_percent: Some(round_to(reward / entry * 100.0, 2)),
        }
    }

    /// Entry timing: proximity to support/resistance, RSI zone and
    /// momentum/trend agreement, from a base of 50.
    pub fn assess_entry_timing(&self, setup: &TradeSetup, market: &MarketSnapshot) -> EntryQuality {
        let mut score: f64 = 50.0;

        if let (Some(support), Some(resistance)) = (setup.support_level, setup.resistance_level) {
            let price = market.price;
            if price > 0.0 {
                let to_support = (price - support).abs() / price;
                let to_resistance = (price - resistance).abs() / price;

                if to_support < 0.02 {
                    score += 20.0;
                } else if to_support < 0.05 {
                    score += 10.0;
                }
                if to_resistance < 0.02 {
                    score -= 15.0;
                }
            }
        }

        if let Some(rsi) = setup.rsi {
            if rsi > 30.0 && rsi < 40.0 {
                score += 15.0;
            }
            if rsi > 60.0 && rsi < 70.0 {
                score -= 10.0;
            }
        }

        if setup.momentum_direction == Some(setup.trend_direction) {
            score += 10.0;
        }

        let score = score.clamp(0.0, 100.0);
        let (quality, notes) = if score >= 70.0 {
            (
                TimingQuality::Excellent,
                "Excellent entry timing - near support with momentum aligned to the trend",
            )
        } else if score >= 60.0 {
            (TimingQuality::Good, "Good entry timing - favorable conditions for entry")
        } else if score >= 50.0 {
            (TimingQuality::Fair, "Fair timing - acceptable but not optimal")
        } else {
            (TimingQuality::Poor, "Poor timing - wait for better entry conditions")
        };

        EntryQuality {
            score,
            quality,
            notes: notes.to_string(),
        }
    }

    /// Liquidity, intraday range and 24h move, from a base of 50.
    pub fn assess_market_conditions(&self, market: &MarketSnapshot) -> f64 {
        let mut score: f64 = 50.0;

        if let Some(volume) = market.volume_24h.filter(|v| *v > 0.0) {
            if volume > 1e9 {
                score += 15.0;
            } else if volume > 1e8 {
                score += 10.0;
            } else if volume < 1e7 {
                score -= 10.0;
            }
        }

        if let (Some(high), Some(low)) = (market.high_24h, market.low_24h) {
            if market.price > 0.0 {
                let range = (high - low) / market.price;
                if range > 0.15 {
                    score -= 15.0;
                } else if range > 0.10 {
                    score -= 5.0;
                } else if range < 0.03 {
                    score += 10.0;
                }
            }
        }

        if let Some(change) = market.price_change_24h {
            let change = change.abs();
            if change > 15.0 {
                score -= 10.0;
            } else if change > 5.0 && change < 15.0 {
                score += 5.0;
            }
        }

        score.clamp(0.0, 100.0)
    }

    /// Volume tier score; 50 when volume is unknown.
    pub fn assess_volume_confirmation(&self, market: &MarketSnapshot) -> f64 {
        match market.volume_24h.filter(|v| *v > 0.0) {
            None => 50.0,
            Some(v) if v > 5e9 => 90.0,
            Some(v) if v > 1e9 => 80.0,
            Some(v) if v > 1e8 => 70.0,
            Some(v) if v > 1e7 => 60.0,
            Some(_) => 40.0,
        }
    }

    pub fn calculate_expected_profit(&self, score: f64, strategy: StrategyType) -> ExpectedProfit {
        let expected = strategy.base_avg_profit() * (score / 100.0);
        ExpectedProfit {
            percentage: round_to(expected * 100.0, 2),
            risk_adjusted: round_to(expected * 0.7 * 100.0, 2),
            time_frame: strategy.expected_time_frame().to_string(),
        }
    }

    pub fn recommendation(&self, score: f64) -> &'static str {
        if score >= 80.0 {
            "Strong buy opportunity with high profit potential. Consider larger position size."
        } else if score >= 65.0 {
            "Good trading opportunity. Use standard position sizing."
        } else if score >= 50.0 {
            "Moderate opportunity. Use smaller position size and tight stop-loss."
        } else {
            "Weak opportunity. Wait for better setup or avoid this trade."
        }
    }

    /// Size a position so that hitting the stop loses `risk_pct` of the account.
    pub fn calculate_position_size(
        &self,
        account_balance: f64,
        risk_pct: f64,
        entry: f64,
        stop_loss: f64,
    ) -> Result<PositionSize, ProfitabilityError> {
        let price_risk = (entry - stop_loss).abs();
        if price_risk == 0.0 || !price_risk.is_finite() || entry <= 0.0 {
            return Err(ProfitabilityError::InvalidStopLoss);
        }

        let risk_amount = account_balance * (risk_pct / 100.0);
        let size = risk_amount / price_risk;

        Ok(PositionSize {
            size: round_to(size, 8),
            usd_value: round_to(size * entry, 2),
            risk_amount: round_to(risk_amount, 2),
            risk_percent: risk_pct,
            stop_loss_distance: round_to(price_risk / entry * 100.0, 2),
        })
    }

    /// Targets at 2x, 3x and 5x the entry-to-stop distance.
    ///
    /// Projected upwards for a bullish trend, downwards otherwise.
    pub fn suggest_profit_targets(
        &self,
        entry: f64,
        stop_loss: f64,
        trend: TrendDirection,
    ) -> ProfitTargets {
        let risk = (entry - stop_loss).abs();
        let sign = if trend == TrendDirection::Bullish { 1.0 } else { -1.0 };

        let target = |multiple: f64, action: &str| {
            let price = entry + risk * multiple * sign;
            let reward_percent = if entry != 0.0 {
                round_to((price - entry).abs() / entry * 100.0, 2)
            } else {
                0.0
            };
            ProfitTarget {
                price: round_to(price, 2),
                reward_percent,
                risk_reward: format!("{}:1", multiple),
                action: action.to_string(),
            }
        };

        ProfitTargets {
            conservative: target(
                2.0,
                "Take 50% profit here, move stop to breakeven immediately",
            ),
            moderate: target(3.0, "Take 30% profit here, trail the stop for the remainder"),
            aggressive: target(5.0, "Take the remaining 20% profit and close the trade"),
        }
    }

    /// Heuristic setup from 24h market data alone.
    pub fn quick_setup(&self, market: &MarketSnapshot) -> TradeSetup {
        let change = market.price_change_24h.unwrap_or(0.0);
        let volume = market.volume_24h.unwrap_or(0.0);
        let rsi = (50.0 + change * 2.0).clamp(0.0, 100.0);

        let trend = if change > 3.0 {
            TrendDirection::Bullish
        } else if change < -3.0 {
            TrendDirection::Bearish
        } else {
            TrendDirection::Neutral
        };
        let trend_strength = change.abs();

        TradeSetup {
            trend_direction: trend,
            trend_strength,
            momentum_direction: Some(trend),
            rsi: Some(rsi),
            technical_score: Some(self.quick_technical_score(change, rsi, volume)),
            ..levels(market)
        }
    }

    /// Setup built from a full technical analysis plus current market data.
    pub fn setup_from_analysis(
        &self,
        analysis: &TechnicalAnalysis,
        market: &MarketSnapshot,
    ) -> TradeSetup {
        TradeSetup {
            trend_direction: analysis.trend.direction,
            trend_strength: analysis.trend.strength,
            momentum_direction: Some(analysis.momentum.direction()),
            rsi: analysis.momentum.rsi.map(|r| r.value),
            technical_score: Some(analysis.score),
            ..levels(market)
        }
    }

    /// Rough technical score from 24h change, estimated RSI and volume.
    pub fn quick_technical_score(&self, change_24h: f64, rsi: f64, volume: f64) -> f64 {
        let mut score: f64 = 50.0;

        if change_24h > 5.0 {
            score += 20.0;
        } else if change_24h > 0.0 {
            score += 10.0;
        } else if change_24h < -5.0 {
            score -= 20.0;
        } else if change_24h < 0.0 {
            score -= 10.0;
        }

        if rsi > 30.0 && rsi < 70.0 {
            score += 10.0;
        } else if rsi < 30.0 {
            score += 15.0;
        } else if rsi > 70.0 {
            score -= 15.0;
        }

        if volume > 1e9 {
            score += 10.0;
        } else if volume < 1e7 {
            score -= 10.0;
        }

        score.clamp(0.0, 100.0)
    }

    /// Best setups among `coins`, ranked by score x risk/reward.
    pub fn scan_opportunities(
        &self,
        coins: &[String],
        markets: &HashMap<String, MarketSnapshot>,
    ) -> Vec<Opportunity> {
        let mut opportunities: Vec<Opportunity> = coins
            .iter()
            .filter_map(|coin| {
                let market = markets.get(coin)?;
                let setup = self.quick_setup(market);
                let profitability =
                    self.calculate_profitability_score(&setup, market, StrategyType::Mixed);

                if (profitability.score as f64) < self.config.min_profit_score
                    || profitability.risk_reward.ratio < self.config.min_risk_reward
                {
                    return None;
                }

                let priority = profitability.score as f64 * profitability.risk_reward.ratio;
                Some(Opportunity {
                    coin: coin.to_uppercase(),
                    profitability,
                    setup,
                    market: market.clone(),
                    priority,
                })
            })
            .collect();

        opportunities.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        opportunities.truncate(5);

        debug!(
            "Opportunity scan: {} of {} coins qualified",
            opportunities.len(),
            coins.len()
        );
        opportunities
    }

    /// Rebalancing advice for current holdings plus up to three new positions.
    pub fn optimize_portfolio(
        &self,
        holdings: &[Holding],
        available_capital: f64,
        markets: &HashMap<String, MarketSnapshot>,
    ) -> PortfolioPlan {
        let mut rebalance_suggestions = Vec::new();

        for holding in holdings {
            let Some(market) = markets.get(&holding.coin_id) else {
                continue;
            };
            let setup = self.quick_setup(market);
            let profitability =
                self.calculate_profitability_score(&setup, market, StrategyType::Mixed);
            let coin = holding.coin_id.to_uppercase();

            if profitability.score < 50 {
                rebalance_suggestions.push(RebalanceSuggestion {
                    coin,
                    action: PortfolioAction::Reduce,
                    reason: format!(
                        "Low profitability score ({}). Consider taking profits or reducing exposure.",
                        profitability.score
                    ),
                    current_value: holding.current_value,
                    suggested_action:
                        "Reduce by 25-50% if in profit, or set a tight stop-loss if at a loss."
                            .to_string(),
                });
            } else if profitability.score >= 75 {
                rebalance_suggestions.push(RebalanceSuggestion {
                    coin,
                    action: PortfolioAction::HoldOrAdd,
                    reason: format!(
                        "High profitability score ({}). Strong opportunity.",
                        profitability.score
                    ),
                    current_value: holding.current_value,
                    suggested_action:
                        "Consider adding if the trend continues, or take partial profits at targets."
                            .to_string(),
                });
            }
        }

        let mut new_opportunities = Vec::new();
        for coin_id in PORTFOLIO_CANDIDATES {
            if holdings.iter().any(|h| h.coin_id == coin_id) {
                continue;
            }
            let Some(market) = markets.get(coin_id) else {
                continue;
            };
            let setup = self.quick_setup(market);
            let profitability =
                self.calculate_profitability_score(&setup, market, StrategyType::Mixed);

            if profitability.score >= 70 {
                let suggested_allocation = (available_capital * 0.15)
                    .min(available_capital * (profitability.score as f64 / 100.0) * 0.20);
                let reason = format!(
                    "High profitability score ({}) with good risk/reward.",
                    profitability.score
                );
                new_opportunities.push(NewOpportunity {
                    coin: coin_id.to_uppercase(),
                    action: PortfolioAction::Buy,
                    profitability,
                    suggested_allocation: round_to(suggested_allocation, 2),
                    reason,
                });
            }
        }
        new_opportunities.truncate(3);

        let held: f64 = holdings.iter().map(|h| h.current_value).sum();

        PortfolioPlan {
            rebalance_suggestions,
            new_opportunities,
            total_capital: available_capital + held,
        }
    }
}

/// Tiered award for the risk/reward factor (25% weight).
fn risk_reward_points(ratio: f64) -> f64 {
    let factor = if ratio >= 3.0 {
        100.0
    } else if ratio >= 2.0 {
        80.0
    } else if ratio >= 1.5 {
        60.0
    } else {
        40.0
    };
    factor * 0.25
}

/// Price levels shared by every setup: support/resistance around the 24h
/// range, entry at market, stop below support, targets near resistance.
fn levels(market: &MarketSnapshot) -> TradeSetup {
    let price = market.price;
    let high = market.high_24h.unwrap_or(price * 1.05);
    let low = market.low_24h.unwrap_or(price * 0.95);

    let support = low * 0.98;
    let resistance = high * 1.02;

    TradeSetup {
        price,
        support_level: Some(support),
        resistance_level: Some(resistance),
        entry: Some(price),
        stop_loss: Some(support * 0.97),
        targets: vec![resistance * 0.98, resistance * 1.05],
        ..Default::default()
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
