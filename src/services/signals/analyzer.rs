//! Technical analyzer combining indicators, patterns and scoring.

use crate::services::signals::indicators::{Macd, Momentum, Rsi, Stochastic, Trend, Volatility};
use crate::services::signals::patterns::detect_patterns;
use crate::services::signals::scoring::{calculate_technical_score, generate_signals};
use crate::services::signals::Indicator;
use crate::types::{MomentumIndicators, PricePoint, TechnicalAnalysis, VolatilityReading};
use tracing::debug;

/// Minimum history for a full analysis.
pub const MIN_HISTORY: usize = 50;

/// Runs the full technical analysis pipeline over a price series.
///
/// Stateless apart from indicator parameters, so one instance is shared
/// across requests.
pub struct TechnicalAnalyzer {
    trend: Trend,
    rsi: Rsi,
    macd: Macd,
    stochastic: Stochastic,
    volatility: Volatility,
    momentum: Momentum,
}

impl Default for TechnicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TechnicalAnalyzer {
    pub fn new() -> Self {
        Self {
            trend: Trend,
            rsi: Rsi::default(),
            macd: Macd::default(),
            stochastic: Stochastic::default(),
            volatility: Volatility::default(),
            momentum: Momentum::default(),
        }
    }

    /// Analyze a chronological price series.
    ///
    /// Histories shorter than [`MIN_HISTORY`] get the neutral baseline with
    /// `insufficient_data` set.
    pub fn analyze(&self, series: &[PricePoint]) -> TechnicalAnalysis {
        if series.len() < MIN_HISTORY {
            debug!(
                "Only {} price points (need {}) - returning neutral baseline",
                series.len(),
                MIN_HISTORY
            );
            return TechnicalAnalysis::baseline();
        }

        debug!("Running technical analysis over {} points", series.len());

        let trend = self.trend.calculate(series).unwrap_or_default();
        let momentum = MomentumIndicators {
            rsi: self.rsi.calculate(series),
            macd: self.macd.calculate(series),
            stochastic: self.stochastic.calculate(series),
            momentum: self.momentum.calculate(series),
        };
        let volatility = self
            .volatility
            .calculate(series)
            .unwrap_or_else(VolatilityReading::neutral);
        let patterns = detect_patterns(series);

        let signals = generate_signals(&trend, &momentum, &patterns);
        let score = calculate_technical_score(&trend, &momentum, &patterns);

        debug!(
            "Technical score {:.1} ({} trend, {} patterns, {} signals)",
            score,
            trend.direction.label(),
            patterns.len(),
            signals.len()
        );

        TechnicalAnalysis {
            trend,
            momentum,
            volatility,
            patterns,
            signals,
            score,
            insufficient_data: false,
        }
    }
}
