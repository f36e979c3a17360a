//! Chart pattern detection.
//!
//! Each detector is a threshold predicate over a fixed trailing window.
//! Detections carry a fixed confidence per pattern type.

use crate::types::{Pattern, PatternType, PricePoint};

const DOUBLE_WINDOW: usize = 20;
const HEAD_AND_SHOULDERS_WINDOW: usize = 30;
/// Maximum relative gap between the two extremes of a double top/bottom.
const DOUBLE_TOLERANCE: f64 = 0.02;
/// Minimum index distance between the two extremes.
const DOUBLE_SEPARATION: usize = 5;
/// Head must exceed the average shoulder by this factor.
const HEAD_PROMINENCE: f64 = 1.05;

/// A local maximum inside a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub price: f64,
    pub index: usize,
}

/// Run every detector over the series.
pub fn detect_patterns(series: &[PricePoint]) -> Vec<Pattern> {
    let mut patterns = Vec::new();

    if is_double_bottom(series) {
        patterns.push(Pattern::new("Double Bottom", PatternType::Bullish, 75));
    }
    if is_double_top(series) {
        patterns.push(Pattern::new("Double Top", PatternType::Bearish, 75));
    }
    if is_head_and_shoulders(series) {
        patterns.push(Pattern::new("Head and Shoulders", PatternType::Bearish, 80));
    }
    if is_bullish_engulfing(series) {
        patterns.push(Pattern::new("Bullish Engulfing", PatternType::Bullish, 70));
    }
    if is_bearish_engulfing(series) {
        patterns.push(Pattern::new("Bearish Engulfing", PatternType::Bearish, 70));
    }

    patterns
}

/// True when the two most extreme `(index, price)` points are close in
/// price and far apart in time.
fn twin_extremes(mut points: Vec<(usize, f64)>, descending: bool) -> bool {
    if points.len() < 2 {
        return false;
    }

    // Stable sort keeps the earlier index first on ties
    points.sort_by(|a, b| {
        let ord = a.1.total_cmp(&b.1);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });

    let (first_idx, first) = points[0];
    let (second_idx, second) = points[1];
    if first == 0.0 {
        return false;
    }

    let diff = (first - second).abs() / first;
    let separation = first_idx.abs_diff(second_idx);
    diff < DOUBLE_TOLERANCE && separation > DOUBLE_SEPARATION
}

pub fn is_double_bottom(series: &[PricePoint]) -> bool {
    if series.len() < DOUBLE_WINDOW {
        return false;
    }
    let recent = &series[series.len() - DOUBLE_WINDOW..];
    twin_extremes(recent.iter().map(|p| p.low).enumerate().collect(), false)
}

pub fn is_double_top(series: &[PricePoint]) -> bool {
    if series.len() < DOUBLE_WINDOW {
        return false;
    }
    let recent = &series[series.len() - DOUBLE_WINDOW..];
    twin_extremes(recent.iter().map(|p| p.high).enumerate().collect(), true)
}

/// Three or more peaks where the tallest stands clearly above the rest.
pub fn is_head_and_shoulders(series: &[PricePoint]) -> bool {
    if series.len() < HEAD_AND_SHOULDERS_WINDOW {
        return false;
    }
    let recent = &series[series.len() - HEAD_AND_SHOULDERS_WINDOW..];
    let peaks = find_peaks(recent);
    if peaks.len() < 3 {
        return false;
    }

    // Tallest peak, earliest on ties
    let head = peaks
        .iter()
        .fold(peaks[0], |best, p| if p.price > best.price { *p } else { best });

    let shoulders: Vec<f64> = peaks
        .iter()
        .filter(|p| p.index != head.index)
        .map(|p| p.price)
        .collect();

    let avg_shoulder = shoulders.iter().sum::<f64>() / shoulders.len() as f64;
    head.price > avg_shoulder * HEAD_PROMINENCE
}

/// Points strictly higher than both neighbours, using highs.
pub fn find_peaks(series: &[PricePoint]) -> Vec<Peak> {
    series
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1].high > w[0].high && w[1].high > w[2].high)
        .map(|(i, w)| Peak {
            price: w[1].high,
            index: i + 1,
        })
        .collect()
}

/// Previous candle bearish, current bullish and its body swallows the previous one.
///
/// Missing opens are approximated from the close: previous at 99%, current at 101%.
pub fn is_bullish_engulfing(series: &[PricePoint]) -> bool {
    let Some([prev, curr]) = last_two(series) else {
        return false;
    };

    let prev_close = prev.close;
    let prev_open = prev.open.unwrap_or(prev_close * 0.99);
    let curr_close = curr.close;
    let curr_open = curr.open.unwrap_or(curr_close * 1.01);

    prev_close < prev_open
        && curr_close > curr_open
        && curr_open < prev_close
        && curr_close > prev_open
}

/// Mirror of [`is_bullish_engulfing`].
pub fn is_bearish_engulfing(series: &[PricePoint]) -> bool {
    let Some([prev, curr]) = last_two(series) else {
        return false;
    };

    let prev_close = prev.close;
    let prev_open = prev.open.unwrap_or(prev_close * 1.01);
    let curr_close = curr.close;
    let curr_open = curr.open.unwrap_or(curr_close * 0.99);

    prev_close > prev_open
        && curr_close < curr_open
        && curr_open > prev_close
        && curr_close < prev_open
}

fn last_two(series: &[PricePoint]) -> Option<[&PricePoint; 2]> {
    match series {
        [.., prev, curr] => Some([prev, curr]),
        _ => None,
    }
}
