//! Volatility and Bollinger Bands.

use super::sma::sma;
use crate::services::signals::{mean, std_dev, Indicator};
use crate::types::{closes, BandPosition, BollingerBands, PricePoint, VolatilityReading};

/// Volatility indicator.
///
/// Measures dispersion of simple returns and derives Bollinger Bands:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// StdDev here is the deviation of returns, not of prices, so the bands
/// hug the moving average closely.
pub struct Volatility {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for Volatility {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl Volatility {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    /// Volatility reading from raw closing prices.
    pub fn calculate_values(&self, values: &[f64]) -> Option<VolatilityReading> {
        if values.len() < 2 {
            return None;
        }

        let returns = simple_returns(values);
        let avg = mean(&returns)?;
        let standard_deviation = std_dev(&returns, avg);

        let bollinger = if values.len() >= self.period {
            let middle = sma(values, self.period)?;
            let offset = self.std_dev_multiplier * standard_deviation;
            let upper = middle + offset;
            let lower = middle - offset;
            let current = *values.last()?;

            let position = if current > upper {
                BandPosition::AboveUpper
            } else if current < lower {
                BandPosition::BelowLower
            } else {
                BandPosition::Inside
            };

            Some(BollingerBands {
                upper,
                middle,
                lower,
                position,
            })
        } else {
            None
        };

        Some(VolatilityReading {
            standard_deviation,
            annualized_volatility: standard_deviation * 365f64.sqrt() * 100.0,
            bollinger,
            volatility_score: (standard_deviation * 1000.0).min(100.0),
        })
    }
}

/// Period-over-period simple returns. Zero previous closes are skipped.
pub fn simple_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

impl Indicator for Volatility {
    type Output = VolatilityReading;

    fn name(&self) -> &str {
        "Volatility"
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<VolatilityReading> {
        self.calculate_values(&closes(series))
    }
}
