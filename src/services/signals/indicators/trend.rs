//! Multi-EMA trend analysis.

use super::ema::ema;
use crate::services::signals::Indicator;
use crate::types::{closes, PricePoint, TrendAnalysis, TrendDirection};

/// Trend reading from stacked EMAs (9/21/50, plus 200 when available).
///
/// - Bullish: EMA9 > EMA21 > EMA50
/// - Bearish: EMA9 < EMA21 < EMA50
/// - Golden cross: EMA50 above EMA200 while the previous close was at or below it
/// - Death cross: EMA50 below EMA200 while the previous close was at or above it
#[derive(Default)]
pub struct Trend;

/// Spread between the short and long EMA, scaled to 0-100.
pub fn trend_strength(ema9: f64, _ema21: f64, ema50: f64) -> f64 {
    if ema50 == 0.0 {
        return 0.0;
    }
    ((ema9 - ema50).abs() / ema50 * 100.0 * 10.0).min(100.0)
}

/// Analyze the trend of a closing-price history.
pub fn analyze_trend(values: &[f64]) -> Option<TrendAnalysis> {
    let ema9 = ema(values, 9)?;
    let ema21 = ema(values, 21)?;
    let ema50 = ema(values, 50)?;
    let ema200 = ema(values, 200);
    let current_price = values.last().copied();

    let (direction, strength) = if ema9 > ema21 && ema21 > ema50 {
        (TrendDirection::Bullish, trend_strength(ema9, ema21, ema50))
    } else if ema9 < ema21 && ema21 < ema50 {
        (TrendDirection::Bearish, trend_strength(ema9, ema21, ema50))
    } else {
        (TrendDirection::Neutral, 0.0)
    };

    let (golden_cross, death_cross) = match ema200 {
        Some(ema200) if values.len() >= 2 => {
            let prev_close = values[values.len() - 2];
            (
                ema50 > ema200 && prev_close <= ema200,
                ema50 < ema200 && prev_close >= ema200,
            )
        }
        _ => (false, false),
    };

    Some(TrendAnalysis {
        direction,
        strength,
        ema9: Some(ema9),
        ema21: Some(ema21),
        ema50: Some(ema50),
        ema200,
        current_price,
        golden_cross,
        death_cross,
    })
}

impl Indicator for Trend {
    type Output = TrendAnalysis;

    fn name(&self) -> &str {
        "Trend"
    }

    fn min_periods(&self) -> usize {
        50
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<TrendAnalysis> {
        analyze_trend(&closes(series))
    }
}
