//! Stochastic Oscillator indicator.

use crate::services::signals::Indicator;
use crate::types::{OscillatorSignal, PricePoint, StochasticReading};

/// Stochastic Oscillator.
///
/// Compares closing price to price range over a period:
/// %K = (Current Close - Lowest Low) / (Highest High - Lowest Low) * 100
///
/// Signals:
/// - Below 20: Oversold (bullish)
/// - Above 80: Overbought (bearish)
pub struct Stochastic {
    k_period: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self { k_period: 14 }
    }
}

impl Stochastic {
    pub fn new(k_period: usize) -> Self {
        Self { k_period }
    }
}

/// %K over the trailing `period` points. A flat window reads 50.
pub fn stochastic(series: &[PricePoint], period: usize) -> Option<f64> {
    if period == 0 || series.len() < period {
        return None;
    }

    let window = &series[series.len() - period..];
    let close = window.last()?.close;

    let lowest_low = window.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
    let highest_high = window
        .iter()
        .map(|p| p.high)
        .fold(f64::NEG_INFINITY, f64::max);

    let range = highest_high - lowest_low;
    if range == 0.0 {
        return Some(50.0);
    }

    Some((close - lowest_low) / range * 100.0)
}

impl Indicator for Stochastic {
    type Output = StochasticReading;

    fn name(&self) -> &str {
        "Stochastic"
    }

    fn min_periods(&self) -> usize {
        self.k_period
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<StochasticReading> {
        let k = stochastic(series, self.k_period)?;

        let signal = if k > 80.0 {
            OscillatorSignal::Overbought
        } else if k < 20.0 {
            OscillatorSignal::Oversold
        } else {
            OscillatorSignal::Neutral
        };

        Some(StochasticReading { k, signal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stochastic_insufficient_data() {
        let series: Vec<PricePoint> = (0..13).map(|i| PricePoint::from_close(i as f64)).collect();
        assert!(Stochastic::default().calculate(&series).is_none());
    }

    #[test]
    fn test_stochastic_flat_window() {
        let series = vec![PricePoint::from_close(42.0); 14];
        let reading = Stochastic::default().calculate(&series).unwrap();
        assert_eq!(reading.k, 50.0);
        assert_eq!(reading.signal, OscillatorSignal::Neutral);
    }

    #[test]
    fn test_stochastic_close_at_high() {
        let series: Vec<PricePoint> = (0..20).map(|i| PricePoint::from_close(i as f64)).collect();
        let reading = Stochastic::default().calculate(&series).unwrap();
        assert_eq!(reading.k, 100.0);
        assert_eq!(reading.signal, OscillatorSignal::Overbought);
    }

    #[test]
    fn test_stochastic_close_at_low() {
        let series: Vec<PricePoint> = (0..20)
            .map(|i| PricePoint::from_close(100.0 - i as f64))
            .collect();
        let reading = Stochastic::default().calculate(&series).unwrap();
        assert_eq!(reading.k, 0.0);
        assert_eq!(reading.signal, OscillatorSignal::Oversold);
    }

    #[test]
    fn test_stochastic_uses_high_low() {
        let mut series = vec![PricePoint::candle(10.0, 12.0, 8.0, 10.0); 13];
        series.push(PricePoint::candle(10.0, 11.0, 9.0, 10.0));
        // (10 - 8) / (12 - 8) * 100
        assert_eq!(stochastic(&series, 14), Some(50.0));
        series.push(PricePoint::candle(10.0, 11.0, 9.0, 11.0));
        assert_eq!(stochastic(&series, 14), Some(75.0));
    }
}
