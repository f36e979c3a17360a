//! Technical analysis service module.
//!
//! Provides indicator calculations, chart pattern detection, signal
//! generation and the composite technical score.

pub mod analyzer;
pub mod indicators;
pub mod patterns;
pub mod scoring;

pub use analyzer::TechnicalAnalyzer;

use crate::types::PricePoint;

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Reading produced by this indicator.
    type Output;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Minimum number of price points required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator from a price series.
    /// Returns None if there is insufficient data.
    fn calculate(&self, series: &[PricePoint]) -> Option<Self::Output>;
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation around `mean`.
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance: f64 =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
