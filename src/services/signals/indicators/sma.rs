//! Simple Moving Average (SMA) indicator.

use crate::services::signals::Indicator;
use crate::types::{closes, PricePoint};

/// SMA (Simple Moving Average) indicator over the trailing window.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

/// Mean of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

impl Indicator for Sma {
    type Output = f64;

    fn name(&self) -> &str {
        "SMA"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<f64> {
        sma(&closes(series), self.period)
    }
}
