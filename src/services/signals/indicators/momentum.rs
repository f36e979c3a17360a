//! Momentum (rate of change) indicator.

use crate::services::signals::Indicator;
use crate::types::{closes, PricePoint};

/// Percentage change between the latest close and the close `period` bars
/// before it.
pub struct Momentum {
    period: usize,
}

impl Default for Momentum {
    fn default() -> Self {
        Self { period: 10 }
    }
}

impl Momentum {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

pub fn momentum(values: &[f64], period: usize) -> Option<f64> {
    if values.len() < period + 1 {
        return None;
    }

    let current = *values.last()?;
    let past = values[values.len() - period - 1];
    if past == 0.0 {
        return None;
    }

    Some((current - past) / past * 100.0)
}

impl Indicator for Momentum {
    type Output = f64;

    fn name(&self) -> &str {
        "Momentum"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, series: &[PricePoint]) -> Option<f64> {
        momentum(&closes(series), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_momentum_rate_of_change() {
        let values: Vec<f64> = (0..11).map(|i| 100.0 + i as f64).collect();
        assert_eq!(momentum(&values, 10), Some(10.0));
    }

    #[test]
    fn test_momentum_insufficient_data() {
        let values = vec![100.0; 10];
        assert!(momentum(&values, 10).is_none());
    }

    #[test]
    fn test_momentum_zero_base() {
        let mut values = vec![0.0];
        values.extend(std::iter::repeat(5.0).take(10));
        assert!(momentum(&values, 10).is_none());
    }

    #[test]
    fn test_momentum_negative() {
        let values: Vec<f64> = (0..11).map(|i| 200.0 - i as f64 * 2.0).collect();
        assert_eq!(momentum(&values, 10), Some(-10.0));
    }
}
