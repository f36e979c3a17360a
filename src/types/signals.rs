use serde::{Deserialize, Serialize};

/// Direction of a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
}

impl SignalType {
    /// Get display label for this direction.
    pub fn label(&self) -> &'static str {
        match self {
            SignalType::Buy => "BUY",
            SignalType::Sell => "SELL",
        }
    }
}

/// A directional signal emitted by the signal generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSignal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    /// Human-readable reason (e.g. "RSI oversold").
    pub reason: String,
    /// Weight in `[0, 1]`.
    pub weight: f64,
}

impl TradeSignal {
    pub fn buy(reason: impl Into<String>, weight: f64) -> Self {
        Self {
            signal_type: SignalType::Buy,
            reason: reason.into(),
            weight: weight.clamp(0.0, 1.0),
        }
    }

    pub fn sell(reason: impl Into<String>, weight: f64) -> Self {
        Self {
            signal_type: SignalType::Sell,
            reason: reason.into(),
            weight: weight.clamp(0.0, 1.0),
        }
    }
}

/// Bias of a detected chart pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Bullish,
    Bearish,
    Continuation,
}

/// A chart pattern found in the recent price window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub name: String,
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    /// Fixed per-pattern confidence, 0-100.
    pub confidence: u8,
}

impl Pattern {
    pub fn new(name: &str, pattern_type: PatternType, confidence: u8) -> Self {
        Self {
            name: name.to_string(),
            pattern_type,
            confidence: confidence.min(100),
        }
    }
}
