//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema_series;
use crate::services::signals::Indicator;
use crate::types::{closes, MacdCrossover, MacdDirection, MacdReading, PricePoint};

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// Crossover: MACD line crossing above/below the signal line on the latest bar.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// MACD line history, one value per bar from the slow seed onwards.
    fn macd_line(&self, values: &[f64]) -> Vec<f64> {
        let fast_ema = ema_series(values, self.fast_period);
        let slow_ema = ema_series(values, self.slow_period);

        if fast_ema.is_empty() || slow_ema.is_empty() {
            return Vec::new();
        }

        // Align the EMAs (fast starts earlier)
        let offset = self.slow_period - self.fast_period;
        fast_ema
            .iter()
            .skip(offset)
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect()
    }

    /// Calculate MACD from raw closing prices.
    pub fn calculate_values(&self, values: &[f64]) -> Option<MacdReading> {
        if self.fast_period == 0
            || self.signal_period == 0
            || self.fast_period >= self.slow_period
            || values.len() < self.min_periods()
        {
            return None;
        }

        let macd_line = self.macd_line(values);
        let signal_line = ema_series(&macd_line, self.signal_period);

        let macd = *macd_line.last()?;
        let signal = *signal_line.last()?;
        let histogram = macd - signal;

        let direction = if histogram > 0.0 {
            MacdDirection::Bullish
        } else {
            MacdDirection::Bearish
        };

        // Signal line starts at macd_line[signal_period - 1]; compare the last two bars
        let crossover = if signal_line.len() >= 2 {
            let prev_diff = macd_line[macd_line.len() - 2] - signal_line[signal_line.len() - 2];
            if prev_diff <= 0.0 && histogram > 0.0 {
                Some(MacdCrossover::BullishCrossover)
            } else if prev_diff >= 0.0 && histogram < 0.0 {
                Some(MacdCrossover::BearishCrossover)
            } else {
                None
            }
        } else {
            None
        };

        Some(MacdReading {
            macd,
            signal,
            histogram,
            direction,
            crossover,
        })
    }
}

impl Indicator for Macd {
    type Output = MacdReading;

    fn name(&self) -> &str {
        "MACD"
    }

    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<MacdReading> {
        self.calculate_values(&closes(series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_min_periods() {
        assert_eq!(Macd::default().min_periods(), 34);
    }

    #[test]
    fn test_macd_insufficient_data() {
        let values: Vec<f64> = (0..33).map(|i| 100.0 + i as f64).collect();
        assert!(Macd::default().calculate_values(&values).is_none());
    }

    #[test]
    fn test_macd_uptrend_bullish() {
        // Accelerating uptrend keeps the MACD line above its signal line
        let values: Vec<f64> = (0..60).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let reading = Macd::default().calculate_values(&values).unwrap();
        assert!(reading.macd > 0.0);
        assert!(reading.histogram > 0.0);
        assert_eq!(reading.direction, MacdDirection::Bullish);
    }

    #[test]
    fn test_macd_downtrend_bearish() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 * 0.99f64.powi(i)).collect();
        let reading = Macd::default().calculate_values(&values).unwrap();
        assert!(reading.macd < 0.0);
        assert_eq!(reading.direction, MacdDirection::Bearish);
    }

    #[test]
    fn test_macd_flat_has_no_crossover() {
        let values = vec![50.0; 60];
        let reading = Macd::default().calculate_values(&values).unwrap();
        assert_eq!(reading.histogram, 0.0);
        assert_eq!(reading.direction, MacdDirection::Bearish);
        assert!(reading.crossover.is_none());
    }

    #[test]
    fn test_macd_bullish_crossover_on_reversal() {
        // Accelerating decline, then a sharp jump on the last bar
        let mut values: Vec<f64> = (0..50).map(|i| 200.0 - 0.05 * (i * i) as f64).collect();
        values.push(300.0);
        let reading = Macd::default().calculate_values(&values).unwrap();
        assert_eq!(reading.crossover, Some(MacdCrossover::BullishCrossover));
    }

    #[test]
    fn test_macd_histogram_identity() {
        let values: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let reading = Macd::default().calculate_values(&values).unwrap();
        assert!((reading.histogram - (reading.macd - reading.signal)).abs() < 1e-12);
    }
}
