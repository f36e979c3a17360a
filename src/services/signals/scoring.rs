//! Signal generation and the composite technical score.

use crate::types::{
    MarketSnapshot, MomentumIndicators, Pattern, PatternType, TechnicalAnalysis, TradeSignal,
    TrendAnalysis, TrendDirection,
};

/// Trend strength above which a trend becomes a signal on its own.
const STRONG_TREND: f64 = 60.0;

/// Emit directional signals from trend, momentum and pattern readings.
///
/// Every rule is evaluated independently, so signals may disagree.
pub fn generate_signals(
    trend: &TrendAnalysis,
    momentum: &MomentumIndicators,
    patterns: &[Pattern],
) -> Vec<TradeSignal> {
    let mut signals = Vec::new();

    if trend.strength > STRONG_TREND {
        match trend.direction {
            TrendDirection::Bullish => signals.push(TradeSignal::buy("Strong bullish trend", 0.8)),
            TrendDirection::Bearish => signals.push(TradeSignal::sell("Strong bearish trend", 0.8)),
            TrendDirection::Neutral => {}
        }
    }

    if let Some(rsi) = &momentum.rsi {
        if rsi.value < 30.0 {
            signals.push(TradeSignal::buy("RSI oversold", 0.7));
        } else if rsi.value > 70.0 {
            signals.push(TradeSignal::sell("RSI overbought", 0.7));
        }
    }

    if let Some(macd) = &momentum.macd {
        if macd.histogram > 0.0 {
            signals.push(TradeSignal::buy("MACD bullish crossover", 0.75));
        } else if macd.histogram < 0.0 {
            signals.push(TradeSignal::sell("MACD bearish crossover", 0.75));
        }
    }

    for pattern in patterns {
        let weight = pattern.confidence as f64 / 100.0;
        let reason = format!("{} pattern detected", pattern.name);
        match pattern.pattern_type {
            PatternType::Bullish => signals.push(TradeSignal::buy(reason, weight)),
            PatternType::Bearish => signals.push(TradeSignal::sell(reason, weight)),
            PatternType::Continuation => {}
        }
    }

    signals
}

/// Composite 0-100 score, 50 neutral.
///
/// - Trend: +/- strength * 0.2
/// - RSI: +15 below 30, -15 above 70, +7 below 40, -7 above 60 (first match)
/// - MACD: +10 for a positive histogram, -10 otherwise
/// - Patterns: +5 per bullish, -5 per bearish
pub fn calculate_technical_score(
    trend: &TrendAnalysis,
    momentum: &MomentumIndicators,
    patterns: &[Pattern],
) -> f64 {
    let mut score = 50.0;

    match trend.direction {
        TrendDirection::Bullish => score += trend.strength * 0.2,
        TrendDirection::Bearish => score -= trend.strength * 0.2,
        TrendDirection::Neutral => {}
    }

    if let Some(rsi) = &momentum.rsi {
        if rsi.value < 30.0 {
            score += 15.0;
        } else if rsi.value > 70.0 {
            score -= 15.0;
        } else if rsi.value < 40.0 {
            score += 7.0;
        } else if rsi.value > 60.0 {
            score -= 7.0;
        }
    }

    if let Some(macd) = &momentum.macd {
        score += if macd.histogram > 0.0 { 10.0 } else { -10.0 };
    }

    let bullish = patterns
        .iter()
        .filter(|p| p.pattern_type == PatternType::Bullish)
        .count() as f64;
    let bearish = patterns
        .iter()
        .filter(|p| p.pattern_type == PatternType::Bearish)
        .count() as f64;
    score += bullish * 5.0 - bearish * 5.0;

    score.clamp(0.0, 100.0)
}

/// Confidence in a directional call, 0-100.
///
/// Weighs how far the technical score sits from neutral (25), traded volume
/// against $1B (20), market cap against $100B (15) and whether the 24h move
/// stayed under 10% (20).
pub fn prediction_confidence(
    analysis: Option<&TechnicalAnalysis>,
    market: Option<&MarketSnapshot>,
) -> f64 {
    let mut confidence = 0.0;

    if let Some(analysis) = analysis {
        confidence += (analysis.score - 50.0).abs() / 50.0 * 25.0;
    }

    if let Some(market) = market {
        if let Some(volume) = market.volume_24h {
            confidence += (volume / 1e9).min(1.0) * 20.0;
        }
        if let Some(market_cap) = market.market_cap {
            confidence += (market_cap / 1e11).min(1.0) * 15.0;
        }
        if let Some(change) = market.price_change_24h {
            let consistency = if change.abs() < 10.0 { 1.0 } else { 0.5 };
            confidence += consistency * 20.0;
        }
    }

    confidence.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MacdDirection, MacdReading, RsiReading, SignalType};

    fn trend(direction: TrendDirection, strength: f64) -> TrendAnalysis {
        TrendAnalysis {
            direction,
            strength,
            ..Default::default()
        }
    }

    fn momentum(rsi: f64, histogram: f64) -> MomentumIndicators {
        MomentumIndicators {
            rsi: Some(RsiReading::from_value(rsi)),
            macd: Some(MacdReading {
                macd: histogram,
                signal: 0.0,
                histogram,
                direction: if histogram > 0.0 {
                    MacdDirection::Bullish
                } else {
                    MacdDirection::Bearish
                },
                crossover: None,
            }),
            stochastic: None,
            momentum: None,
        }
    }

    #[test]
    fn test_strong_bullish_trend_signal() {
        let signals = generate_signals(
            &trend(TrendDirection::Bullish, 80.0),
            &MomentumIndicators::default(),
            &[],
        );
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].signal_type, SignalType::Buy);
        assert_eq!(signals[0].weight, 0.8);
    }

    #[test]
    fn test_weak_trend_no_signal() {
        let signals = generate_signals(
            &trend(TrendDirection::Bearish, 60.0),
            &MomentumIndicators::default(),
            &[],
        );
        assert!(signals.is_empty());
    }

    #[test]
    fn test_oscillator_and_macd_signals() {
        let signals = generate_signals(&TrendAnalysis::default(), &momentum(25.0, -1.0), &[]);
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].reason, "RSI oversold");
        assert_eq!(signals[0].signal_type, SignalType::Buy);
        assert_eq!(signals[1].signal_type, SignalType::Sell);
        assert_eq!(signals[1].weight, 0.75);
    }

    #[test]
    fn test_pattern_signals_use_confidence() {
        let patterns = vec![
            Pattern::new("Double Top", PatternType::Bearish, 75),
            Pattern::new("Flag", PatternType::Continuation, 60),
        ];
        let signals =
            generate_signals(&TrendAnalysis::default(), &MomentumIndicators::default(), &patterns);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].reason, "Double Top pattern detected");
        assert_eq!(signals[0].weight, 0.75);
    }

    #[test]
    fn test_score_neutral_baseline() {
        let score = calculate_technical_score(
            &TrendAnalysis::default(),
            &MomentumIndicators::default(),
            &[],
        );
        assert_eq!(score, 50.0);
    }

    #[test]
    fn test_score_components() {
        // 50 + 100 * 0.2 + 7 (RSI 35) + 10 (MACD) + 5 (one bullish pattern)
        let patterns = vec![Pattern::new("Double Bottom", PatternType::Bullish, 75)];
        let score = calculate_technical_score(
            &trend(TrendDirection::Bullish, 100.0),
            &momentum(35.0, 0.5),
            &patterns,
        );
        assert!((score - 92.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_histogram_counts_bearish() {
        let score =
            calculate_technical_score(&TrendAnalysis::default(), &momentum(50.0, 0.0), &[]);
        assert_eq!(score, 40.0);
    }

    #[test]
    fn test_score_clamped() {
        let patterns: Vec<Pattern> = (0..10)
            .map(|_| Pattern::new("Bullish Engulfing", PatternType::Bullish, 70))
            .collect();
        let high = calculate_technical_score(
            &trend(TrendDirection::Bullish, 100.0),
            &momentum(10.0, 5.0),
            &patterns,
        );
        assert_eq!(high, 100.0);

        let patterns: Vec<Pattern> = (0..10)
            .map(|_| Pattern::new("Double Top", PatternType::Bearish, 75))
            .collect();
        let low = calculate_technical_score(
            &trend(TrendDirection::Bearish, 100.0),
            &momentum(90.0, -5.0),
            &patterns,
        );
        assert_eq!(low, 0.0);
    }

    #[test]
    fn test_prediction_confidence() {
        let mut analysis = TechnicalAnalysis::baseline();
        analysis.score = 100.0;
        let market = MarketSnapshot {
            price: 50_000.0,
            volume_24h: Some(2e9),
            market_cap: Some(5e10),
            price_change_24h: Some(12.0),
            ..Default::default()
        };
        // 25 + 20 + 7.5 + 10
        let confidence = prediction_confidence(Some(&analysis), Some(&market));
        assert!((confidence - 62.5).abs() < 1e-9);
        assert_eq!(prediction_confidence(None, None), 0.0);
    }
}
