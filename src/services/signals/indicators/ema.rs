//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::Indicator;
use crate::types::{closes, PricePoint};

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. Seeded with the
/// arithmetic mean of the first `period` values.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

/// Calculate every EMA value from the seed onwards.
///
/// The first element corresponds to index `period - 1` of `values`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut series = Vec::with_capacity(values.len() - period + 1);

    // First EMA is SMA
    let mut ema = values.iter().take(period).sum::<f64>() / period as f64;
    series.push(ema);

    for value in &values[period..] {
        ema = (value - ema) * multiplier + ema;
        series.push(ema);
    }

    series
}

/// Latest EMA value.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period).last().copied()
}

impl Indicator for Ema {
    type Output = f64;

    fn name(&self) -> &str {
        "EMA"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<f64> {
        ema(&closes(series), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_ema_insufficient_data() {
        assert!(ema(&[1.0, 2.0], 3).is_none());
        assert!(ema(&[1.0, 2.0], 0).is_none());
    }

    #[test]
    fn test_ema_seed_is_sma() {
        assert_eq!(ema(&[2.0, 4.0, 6.0], 3), Some(4.0));
    }

    #[test]
    fn test_ema_smoothing_step() {
        // seed 4.0, multiplier 0.5: (8 - 4) * 0.5 + 4 = 6
        assert_eq!(ema(&[2.0, 4.0, 6.0, 8.0], 3), Some(6.0));
    }

    #[test]
    fn test_ema_series_length() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        assert_eq!(ema_series(&values, 4).len(), 7);
    }

    #[test]
    fn test_ema_constant_series() {
        let values = vec![5.0; 30];
        assert!((ema(&values, 9).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_ema_stays_within_series_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut walk = vec![100.0];
        for _ in 1..200 {
            let last = walk[walk.len() - 1];
            walk.push(last + rng.gen_range(-3.0..3.0));
        }

        let shapes: Vec<Vec<f64>> = vec![
            (0..200).map(|i| 50.0 + (i as f64 * 0.2).sin() * 20.0).collect(),
            (0..200).map(|i| if i % 2 == 0 { 90.0 } else { 110.0 }).collect(),
            walk,
        ];

        for values in &shapes {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for period in [2, 5, 9, 21, 50] {
                for value in ema_series(values, period) {
                    assert!(
                        value >= min - 1e-9 && value <= max + 1e-9,
                        "EMA({}) {} outside [{}, {}]",
                        period,
                        value,
                        min,
                        max
                    );
                }
            }
        }
    }

    #[test]
    fn test_ema_indicator_uses_closes() {
        let series: Vec<PricePoint> = [2.0, 4.0, 6.0].iter().map(|c| PricePoint::from_close(*c)).collect();
        let indicator = Ema::new(3);
        assert_eq!(indicator.min_periods(), 3);
        assert_eq!(indicator.calculate(&series), Some(4.0));
    }
}
