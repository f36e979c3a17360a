use serde::{Deserialize, Serialize};

/// Canonical price point used by every indicator and pattern detector.
///
/// `high` and `low` always hold a value (falling back to `close` when the
/// source only supplied a price). `open` stays optional because the candle
/// pattern detectors approximate it differently per pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl PricePoint {
    /// A point carrying only a closing price.
    pub fn from_close(close: f64) -> Self {
        Self {
            open: None,
            high: close,
            low: close,
            close,
            timestamp: None,
        }
    }

    /// A full OHLC candle.
    pub fn candle(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open: Some(open),
            high,
            low,
            close,
            timestamp: None,
        }
    }

    /// Normalize any accepted input shape into a canonical point.
    ///
    /// Returns `None` when no finite closing price can be found.
    pub fn normalize(raw: &RawPricePoint) -> Option<Self> {
        match raw {
            RawPricePoint::Bare(price) => finite(*price).map(Self::from_close),
            RawPricePoint::Object(obj) => {
                let close = obj.close.or(obj.price).and_then(finite)?;
                Some(Self {
                    open: obj.open.and_then(finite),
                    high: obj.high.and_then(finite).unwrap_or(close),
                    low: obj.low.and_then(finite).unwrap_or(close),
                    close,
                    timestamp: obj.timestamp.or(obj.time),
                })
            }
        }
    }

    /// Normalize a whole series, failing on the first unusable point.
    ///
    /// On failure the index of the offending point is returned.
    pub fn normalize_series(raw: &[RawPricePoint]) -> Result<Vec<Self>, usize> {
        raw.iter()
            .enumerate()
            .map(|(i, p)| Self::normalize(p).ok_or(i))
            .collect()
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Extract closing prices from a series.
pub fn closes(series: &[PricePoint]) -> Vec<f64> {
    series.iter().map(|p| p.close).collect()
}

/// Price point as accepted on the wire: a bare number or a (partial) candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPricePoint {
    Bare(f64),
    Object(RawCandle),
}

/// Loosely-shaped candle; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandle {
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub time: Option<i64>,
}
