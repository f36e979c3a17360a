//! Prompt assembly for the hosted LLM.
//!
//! Combines aggregated market data, technical analysis and profitability
//! scoring into one natural-language context block per coin.

use crate::services::aggregator::{format_for_ai, format_number, DataAggregator};
use crate::services::profitability::ProfitabilityScorer;
use crate::services::signals::scoring::prediction_confidence;
use crate::services::signals::TechnicalAnalyzer;
use crate::types::{MacdCrossover, MarketSnapshot, PricePoint, StrategyType, TechnicalAnalysis};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// What the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    TradingDecision,
    TechnicalAnalysis,
    PriceInquiry,
    Prediction,
    Comparison,
    GeneralInquiry,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::TradingDecision => "trading_decision",
            Intent::TechnicalAnalysis => "technical_analysis",
            Intent::PriceInquiry => "price_inquiry",
            Intent::Prediction => "prediction",
            Intent::Comparison => "comparison",
            Intent::GeneralInquiry => "general_inquiry",
        }
    }
}

/// Keyword -> coin id. Checked in order, first match per coin wins.
const COIN_KEYWORDS: &[(&str, &str)] = &[
    ("bitcoin", "bitcoin"),
    ("btc", "bitcoin"),
    ("ethereum", "ethereum"),
    ("eth", "ethereum"),
    ("solana", "solana"),
    ("sol", "solana"),
    ("cardano", "cardano"),
    ("ada", "cardano"),
    ("ripple", "ripple"),
    ("xrp", "ripple"),
    ("dogecoin", "dogecoin"),
    ("doge", "dogecoin"),
];

/// Classify a user message by keyword. Earlier rules take precedence.
pub fn classify_intent(message: &str) -> Intent {
    let msg = message.to_lowercase();
    let has = |needle: &str| msg.contains(needle);

    if has("buy") || has("invest") {
        Intent::TradingDecision
    } else if has("analyze") || has("analysis") {
        Intent::TechnicalAnalysis
    } else if has("price") {
        Intent::PriceInquiry
    } else if has("predict") || has("future") {
        Intent::Prediction
    } else if has("compare") {
        Intent::Comparison
    } else {
        Intent::GeneralInquiry
    }
}

/// Coin ids mentioned in a message, in keyword table order.
///
/// Tickers match whole words only, so "sol" does not fire on "solution".
pub fn extract_coins(message: &str) -> Vec<&'static str> {
    let msg = message.to_lowercase();
    let words: Vec<&str> = msg
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut coins = Vec::new();
    for (keyword, coin_id) in COIN_KEYWORDS {
        if words.contains(keyword) && !coins.contains(coin_id) {
            coins.push(*coin_id);
        }
    }
    coins
}

/// A fully assembled prompt plus the facts it was built from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledPrompt {
    pub intent: Intent,
    pub coins: Vec<String>,
    pub prompt: String,
}

/// Builds LLM prompts from live services.
pub struct PromptAssembler {
    aggregator: Arc<DataAggregator>,
    analyzer: Arc<TechnicalAnalyzer>,
    scorer: Arc<ProfitabilityScorer>,
    account_balance: f64,
    risk_percentage: f64,
}

impl PromptAssembler {
    pub fn new(
        aggregator: Arc<DataAggregator>,
        analyzer: Arc<TechnicalAnalyzer>,
        scorer: Arc<ProfitabilityScorer>,
        account_balance: f64,
        risk_percentage: f64,
    ) -> Self {
        Self {
            aggregator,
            analyzer,
            scorer,
            account_balance,
            risk_percentage,
        }
    }

    /// Assemble the full prompt for a user message.
    ///
    /// `histories` maps coin ids to price histories; coins without one are
    /// scored from their 24h market data alone.
    pub async fn build_prompt(
        &self,
        message: &str,
        histories: &HashMap<String, Vec<PricePoint>>,
    ) -> AssembledPrompt {
        let intent = classify_intent(message);
        let coins = extract_coins(message);
        debug!(
            "Building prompt: intent={}, coins={:?}",
            intent.label(),
            coins
        );

        let sections = join_all(
            coins
                .iter()
                .map(|coin| self.coin_context(coin, histories.get(*coin).map(Vec::as_slice))),
        )
        .await;

        let mut prompt = String::from("# CRYPTO ANALYSIS\n\n");
        prompt.push_str(&format!("**Question:** \"{}\"\n", message.trim()));
        let coin_list = if coins.is_empty() {
            "not specified".to_string()
        } else {
            coins.join(", ")
        };
        prompt.push_str(&format!(
            "**Intent:** {} | **Coins:** {}\n",
            intent.label(),
            coin_list
        ));

        if sections.is_empty() {
            prompt.push_str("\nMarket data not available: no supported coin mentioned.\n");
        }
        for section in &sections {
            prompt.push_str(section);
        }

        prompt.push_str(&response_instructions(intent));

        AssembledPrompt {
            intent,
            coins: coins.iter().map(|c| c.to_string()).collect(),
            prompt,
        }
    }

    /// Market, technical and profitability sections for one coin.
    async fn coin_context(&self, coin_id: &str, history: Option<&[PricePoint]>) -> String {
        let aggregated = self.aggregator.aggregate(coin_id).await;
        let analysis = history.map(|series| self.analyzer.analyze(series));
        let snapshot = aggregated.snapshot();

        let mut out = format_for_ai(&aggregated);
        if let Some(analysis) = &analysis {
            out.push_str(&self.technical_section(coin_id, analysis));
        }

        let confidence = prediction_confidence(analysis.as_ref(), snapshot.as_ref());
        out.push_str(&format!("\n**Prediction Confidence:** {:.0}%\n", confidence));

        match &snapshot {
            Some(market) => out.push_str(&self.profitability_section(
                coin_id,
                market,
                analysis.as_ref(),
            )),
            None => out.push_str(
                "\n## PROFITABILITY ANALYSIS:\nNo market data available for profitability analysis.\n",
            ),
        }
        out
    }

    /// Render a technical analysis as a prompt section.
    pub fn technical_section(&self, coin_id: &str, analysis: &TechnicalAnalysis) -> String {
        let mut out = format!("\n## TECHNICAL ANALYSIS ({}):\n", coin_id.to_uppercase());

        if analysis.insufficient_data {
            out.push_str("- Insufficient price history; neutral baseline (score 50/100)\n");
            return out;
        }

        out.push_str(&format!("- Technical Score: {:.1}/100\n", analysis.score));
        let trend = &analysis.trend;
        out.push_str(&format!(
            "- Trend: {} (strength {:.0}/100)\n",
            trend.direction.label(),
            trend.strength
        ));
        if let (Some(ema9), Some(ema21), Some(ema50)) = (trend.ema9, trend.ema21, trend.ema50) {
            out.push_str(&format!(
                "- EMA 9/21/50: ${:.2} / ${:.2} / ${:.2}\n",
                ema9, ema21, ema50
            ));
        }
        if trend.golden_cross {
            out.push_str("- Golden cross (EMA50 above EMA200)\n");
        } else if trend.death_cross {
            out.push_str("- Death cross (EMA50 below EMA200)\n");
        }

        let momentum = &analysis.momentum;
        if let Some(rsi) = &momentum.rsi {
            out.push_str(&format!("- RSI(14): {:.1} ({})\n", rsi.value, rsi.signal.label()));
        }
        if let Some(macd) = &momentum.macd {
            out.push_str(&format!(
                "- MACD: {:.4} / signal {:.4} / histogram {:.4}",
                macd.macd, macd.signal, macd.histogram
            ));
            if let Some(crossover) = macd.crossover {
                let label = match crossover {
                    MacdCrossover::BullishCrossover => "bullish crossover",
                    MacdCrossover::BearishCrossover => "bearish crossover",
                };
                out.push_str(&format!(" ({})", label));
            }
            out.push('\n');
        }
        if let Some(stochastic) = &momentum.stochastic {
            out.push_str(&format!(
                "- Stochastic %K: {:.1} ({})\n",
                stochastic.k,
                stochastic.signal.label()
            ));
        }

        let volatility = &analysis.volatility;
        out.push_str(&format!(
            "- Volatility: {:.1}% annualized (score {:.0}/100)\n",
            volatility.annualized_volatility, volatility.volatility_score
        ));
        if let Some(bands) = &volatility.bollinger {
            out.push_str(&format!(
                "- Bollinger Bands: ${:.2} / ${:.2} / ${:.2}\n",
                bands.upper, bands.middle, bands.lower
            ));
        }

        if !analysis.patterns.is_empty() {
            let names: Vec<String> = analysis
                .patterns
                .iter()
                .map(|p| format!("{} ({}%)", p.name, p.confidence))
                .collect();
            out.push_str(&format!("- Patterns: {}\n", names.join(", ")));
        }
        for signal in &analysis.signals {
            out.push_str(&format!(
                "- Signal: {} - {} (weight {:.2})\n",
                signal.signal_type.label(),
                signal.reason,
                signal.weight
            ));
        }

        out
    }

    /// Score, sizing and targets for one coin.
    pub fn profitability_section(
        &self,
        coin_id: &str,
        market: &MarketSnapshot,
        analysis: Option<&TechnicalAnalysis>,
    ) -> String {
        let setup = match analysis {
            Some(analysis) if !analysis.insufficient_data => {
                self.scorer.setup_from_analysis(analysis, market)
            }
            _ => self.scorer.quick_setup(market),
        };
        let profitability =
            self.scorer
                .calculate_profitability_score(&setup, market, StrategyType::Mixed);
        let symbol = coin_id.to_uppercase();

        let mut out = String::from("\n## PROFITABILITY ANALYSIS:\n\n");
        out.push_str(&format!("### {} Profitability Analysis:\n\n", symbol));
        out.push_str(&format!(
            "**Profitability Score: {}/100** ({})\n",
            profitability.score,
            profitability.rating.label()
        ));
        out.push_str(&format!(
            "- Risk/Reward Ratio: 1:{}\n",
            profitability.risk_reward.ratio
        ));
        out.push_str(&format!(
            "- Expected Profit: {}% (Conservative: {}%)\n",
            profitability.expected_profit.percentage, profitability.expected_profit.risk_adjusted
        ));
        out.push_str(&format!(
            "- Entry Timing: {} ({:.0}/100)\n",
            profitability.entry_quality.quality.label().to_uppercase(),
            profitability.entry_quality.score
        ));
        out.push_str(&format!(
            "- Time Frame: {}\n",
            profitability.expected_profit.time_frame
        ));
        if let Some(volume) = market.volume_24h {
            out.push_str(&format!("- 24h Volume: ${}\n", format_number(volume)));
        }
        out.push('\n');

        if let (Some(entry), Some(stop_loss)) = (setup.entry, setup.stop_loss) {
            let position = self
                .scorer
                .calculate_position_size(self.account_balance, self.risk_percentage, entry, stop_loss)
                .ok()
                .filter(|p| p.size > 0.0);
            if let Some(position) = position {
                out.push_str(&format!(
                    "**Position Size ({}% risk on ${} capital):**\n",
                    self.risk_percentage,
                    format_number(self.account_balance)
                ));
                out.push_str(&format!("- Position Size: {} {}\n", position.size, symbol));
                out.push_str(&format!("- USD Value: ${:.2}\n", position.usd_value));
                out.push_str(&format!("- Risk Amount: ${:.2}\n", position.risk_amount));
                out.push_str(&format!(
                    "- Stop-Loss Distance: {:.2}%\n\n",
                    position.stop_loss_distance
                ));
            }

            let targets = self
                .scorer
                .suggest_profit_targets(entry, stop_loss, setup.trend_direction);
            out.push_str("**Profit Targets:**\n");
            for (name, target) in [
                ("Target 1", &targets.conservative),
                ("Target 2", &targets.moderate),
                ("Target 3", &targets.aggressive),
            ] {
                out.push_str(&format!(
                    "- {} ({} R/R): ${} ({}%) - {}\n",
                    name, target.risk_reward, target.price, target.reward_percent, target.action
                ));
            }
            out.push('\n');
        }

        out.push_str(&format!("**Recommendation:** {}\n\n", profitability.recommendation));
        out.push_str("---\n");
        out
    }
}

fn response_instructions(intent: Intent) -> String {
    let mut out = String::from("\n## YOUR TASK:\n");
    let focus = match intent {
        Intent::TradingDecision => {
            "Give a clear recommendation with entry, stop-loss, targets and position size."
        }
        Intent::TechnicalAnalysis => "Walk through trend, momentum and volatility readings.",
        Intent::PriceInquiry => "Report the current price and 24h movement first.",
        Intent::Prediction => "Give a directional outlook with a confidence percentage.",
        Intent::Comparison => "Compare the coins side by side on score and risk.",
        Intent::GeneralInquiry => "Answer the question using the data above where relevant.",
    };
    out.push_str(focus);
    out.push('\n');
    out.push_str(
        "Always include the profitability score, risk/reward ratio and entry timing.\n\
         Only recommend trades with risk/reward of at least 1:2.\n\
         Keep the answer under 250 words and use real numbers from the data.\n",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_intent() {
        assert_eq!(classify_intent("Should I buy BTC?"), Intent::TradingDecision);
        assert_eq!(classify_intent("Invest in ETH now"), Intent::TradingDecision);
        assert_eq!(classify_intent("Analyze solana"), Intent::TechnicalAnalysis);
        assert_eq!(classify_intent("what's the PRICE of doge"), Intent::PriceInquiry);
        assert_eq!(classify_intent("predict ada"), Intent::Prediction);
        assert_eq!(classify_intent("future of xrp"), Intent::Prediction);
        assert_eq!(classify_intent("compare btc and eth"), Intent::Comparison);
        assert_eq!(classify_intent("hello"), Intent::GeneralInquiry);
    }

    #[test]
    fn test_intent_precedence() {
        // "buy" outranks "price"
        assert_eq!(
            classify_intent("buy at this price?"),
            Intent::TradingDecision
        );
        assert_eq!(
            classify_intent("price analysis please"),
            Intent::TechnicalAnalysis
        );
    }

    #[test]
    fn test_extract_coins() {
        assert_eq!(extract_coins("Compare BTC and Ethereum"), vec!["bitcoin", "ethereum"]);
        assert_eq!(extract_coins("bitcoin or btc?"), vec!["bitcoin"]);
        assert_eq!(extract_coins("DOGE, xrp & sol"), vec!["solana", "ripple", "dogecoin"]);
        assert!(extract_coins("no coins here").is_empty());
    }

    #[test]
    fn test_extract_coins_whole_words() {
        assert!(extract_coins("a solution for the adapter").is_empty());
        assert_eq!(extract_coins("what about $ETH?"), vec!["ethereum"]);
    }

    #[test]
    fn test_response_instructions_by_intent() {
        assert!(response_instructions(Intent::PriceInquiry).contains("current price"));
        assert!(response_instructions(Intent::Comparison).contains("side by side"));
        assert!(response_instructions(Intent::GeneralInquiry).contains("1:2"));
    }
}
