use serde::{Deserialize, Serialize};

use super::{Pattern, TradeSignal};

/// Overall direction of a trend or momentum reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl TrendDirection {
    /// Direction implied by the sign of a value.
    pub fn from_sign(value: f64) -> Self {
        if value > 0.0 {
            TrendDirection::Bullish
        } else if value < 0.0 {
            TrendDirection::Bearish
        } else {
            TrendDirection::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Bullish => "Bullish",
            TrendDirection::Bearish => "Bearish",
            TrendDirection::Neutral => "Neutral",
        }
    }
}

/// Classification of a bounded oscillator (RSI, Stochastic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorSignal {
    Overbought,
    Oversold,
    Neutral,
}

impl OscillatorSignal {
    pub fn label(&self) -> &'static str {
        match self {
            OscillatorSignal::Overbought => "overbought",
            OscillatorSignal::Oversold => "oversold",
            OscillatorSignal::Neutral => "neutral",
        }
    }
}

/// Qualitative strength of an indicator reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStrength {
    Weak,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsiReading {
    pub value: f64,
    pub signal: OscillatorSignal,
    pub strength: SignalStrength,
}

impl RsiReading {
    /// Classify a raw RSI value.
    pub fn from_value(value: f64) -> Self {
        let signal = if value > 70.0 {
            OscillatorSignal::Overbought
        } else if value < 30.0 {
            OscillatorSignal::Oversold
        } else {
            OscillatorSignal::Neutral
        };

        let strength = if value > 70.0 || value < 30.0 {
            SignalStrength::Strong
        } else if value > 60.0 || value < 40.0 {
            SignalStrength::Moderate
        } else {
            SignalStrength::Weak
        };

        Self {
            value,
            signal,
            strength,
        }
    }
}

/// Bias of the MACD histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdDirection {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdCrossover {
    BullishCrossover,
    BearishCrossover,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub direction: MacdDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossover: Option<MacdCrossover>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StochasticReading {
    /// %K value, 0-100.
    pub k: f64,
    pub signal: OscillatorSignal,
}

/// Where the latest close sits relative to the Bollinger bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPosition {
    AboveUpper,
    BelowLower,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub position: BandPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilityReading {
    /// Population standard deviation of simple returns.
    pub standard_deviation: f64,
    pub annualized_volatility: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger: Option<BollingerBands>,
    /// 0-100.
    pub volatility_score: f64,
}

impl VolatilityReading {
    /// Placeholder used when there is not enough history.
    pub fn neutral() -> Self {
        Self {
            standard_deviation: 0.0,
            annualized_volatility: 0.0,
            bollinger: None,
            volatility_score: 50.0,
        }
    }
}

/// Multi-EMA trend reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    /// 0-100.
    pub strength: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema9: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema21: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema200: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    pub golden_cross: bool,
    pub death_cross: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MomentumIndicators {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<RsiReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stochastic: Option<StochasticReading>,
    /// Rate of change over the momentum period, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
}

impl MomentumIndicators {
    /// Direction implied by the rate-of-change reading.
    pub fn direction(&self) -> TrendDirection {
        self.momentum
            .map(TrendDirection::from_sign)
            .unwrap_or_default()
    }
}

/// Full technical analysis of a price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAnalysis {
    pub trend: TrendAnalysis,
    pub momentum: MomentumIndicators,
    pub volatility: VolatilityReading,
    pub patterns: Vec<Pattern>,
    pub signals: Vec<TradeSignal>,
    /// Overall technical score, 0-100 with 50 neutral.
    pub score: f64,
    /// True when the history was too short and a neutral baseline was returned.
    pub insufficient_data: bool,
}

impl TechnicalAnalysis {
    /// Neutral baseline returned for short histories.
    pub fn baseline() -> Self {
        Self {
            trend: TrendAnalysis {
                direction: TrendDirection::Neutral,
                strength: 50.0,
                ..Default::default()
            },
            momentum: MomentumIndicators {
                rsi: Some(RsiReading {
                    value: 50.0,
                    signal: OscillatorSignal::Neutral,
                    strength: SignalStrength::Weak,
                }),
                ..Default::default()
            },
            volatility: VolatilityReading::neutral(),
            patterns: Vec::new(),
            signals: Vec::new(),
            score: 50.0,
            insufficient_data: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_classification_bands() {
        assert_eq!(RsiReading::from_value(75.0).signal, OscillatorSignal::Overbought);
        assert_eq!(RsiReading::from_value(75.0).strength, SignalStrength::Strong);
        assert_eq!(RsiReading::from_value(25.0).signal, OscillatorSignal::Oversold);
        assert_eq!(RsiReading::from_value(65.0).strength, SignalStrength::Moderate);
        assert_eq!(RsiReading::from_value(35.0).strength, SignalStrength::Moderate);
        assert_eq!(RsiReading::from_value(50.0).strength, SignalStrength::Weak);
        assert_eq!(RsiReading::from_value(70.0).signal, OscillatorSignal::Neutral);
    }

    #[test]
    fn test_baseline_is_neutral() {
        let baseline = TechnicalAnalysis::baseline();
        assert_eq!(baseline.score, 50.0);
        assert_eq!(baseline.trend.direction, TrendDirection::Neutral);
        assert!(baseline.patterns.is_empty());
        assert!(baseline.signals.is_empty());
        assert!(baseline.insufficient_data);
    }

    #[test]
    fn test_direction_serialization() {
        let json = serde_json::to_string(&TrendDirection::Bullish).unwrap();
        assert_eq!(json, "\"bullish\"");
        let json = serde_json::to_string(&MacdCrossover::BearishCrossover).unwrap();
        assert_eq!(json, "\"bearish_crossover\"");
    }
}
