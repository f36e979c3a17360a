//! Technical analysis pipeline tests: ingestion through scoring.

mod common;

use samcrypto::services::signals::indicators::{ema, rsi, sma};
use samcrypto::services::signals::patterns::{detect_patterns, is_double_bottom, is_double_top};
use samcrypto::services::TechnicalAnalyzer;
use samcrypto::types::{PricePoint, RawPricePoint, SignalType, TrendDirection};

#[test]
fn test_mixed_wire_shapes_normalize() {
    let raw: Vec<RawPricePoint> = serde_json::from_str(
        r#"[
            101.5,
            {"close": 102.0},
            {"price": 103.0, "timestamp": 1700000000000},
            {"open": 103.0, "high": 105.0, "low": 102.5, "close": 104.0}
        ]"#,
    )
    .unwrap();

    let series = PricePoint::normalize_series(&raw).unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(series[0].close, 101.5);
    assert_eq!(series[0].high, 101.5);
    assert_eq!(series[1].low, 102.0);
    assert_eq!(series[2].close, 103.0);
    assert_eq!(series[2].timestamp, Some(1_700_000_000_000));
    assert_eq!(series[3].open, Some(103.0));
    assert_eq!(series[3].high, 105.0);
}

#[test]
fn test_point_without_close_is_rejected() {
    let raw: Vec<RawPricePoint> =
        serde_json::from_str(r#"[100.0, {"high": 5.0}, 102.0]"#).unwrap();
    assert_eq!(PricePoint::normalize_series(&raw), Err(1));
}

#[test]
fn test_basic_indicator_values() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(sma(&values, 5), Some(3.0));
    assert_eq!(sma(&values, 6), None);

    let flat = [42.0; 30];
    assert!((ema(&flat, 9).unwrap() - 42.0).abs() < 1e-9);

    let rising: Vec<f64> = (0..20).map(|i| i as f64).collect();
    assert_eq!(rsi(&rising, 14), Some(100.0));
}

#[test]
fn test_score_always_bounded() {
    let analyzer = TechnicalAnalyzer::new();
    let shapes: Vec<Vec<PricePoint>> = vec![
        common::uptrend(200),
        (0..200)
            .map(|i| PricePoint::from_close(500.0 - 2.0 * i as f64))
            .collect(),
        (0..200)
            .map(|i| PricePoint::from_close(100.0 + (i as f64 * 0.3).sin() * 25.0))
            .collect(),
        (0..200)
            .map(|i| PricePoint::from_close(if i % 2 == 0 { 90.0 } else { 110.0 }))
            .collect(),
    ];

    for series in &shapes {
        let analysis = analyzer.analyze(series);
        assert!(
            (0.0..=100.0).contains(&analysis.score),
            "score {} out of range",
            analysis.score
        );
        assert!((0.0..=100.0).contains(&analysis.trend.strength));
        for signal in &analysis.signals {
            assert!((0.0..=1.0).contains(&signal.weight));
        }
    }
}

#[test]
fn test_short_history_gets_baseline() {
    let analysis = TechnicalAnalyzer::new().analyze(&common::uptrend(10));
    assert!(analysis.insufficient_data);
    assert_eq!(analysis.score, 50.0);
    assert_eq!(analysis.trend.direction, TrendDirection::Neutral);
}

#[test]
fn test_uptrend_reads_bullish() {
    let analysis = TechnicalAnalyzer::new().analyze(&common::uptrend(120));

    assert_eq!(analysis.trend.direction, TrendDirection::Bullish);
    assert_eq!(analysis.trend.strength, 100.0);
    assert!(analysis
        .signals
        .iter()
        .any(|s| s.signal_type == SignalType::Buy));
}

#[test]
fn test_noisy_uptrend_reads_bullish() {
    // ~2% per bar on average, with a pullback every fourth bar
    let mut closes = vec![10.0, 10.5, 11.0, 10.8, 11.2];
    let steps = [1.03, 1.025, 0.985, 1.02];
    while closes.len() < 50 {
        let last = closes[closes.len() - 1];
        closes.push(last * steps[(closes.len() - 5) % steps.len()]);
    }
    let series: Vec<PricePoint> = closes.iter().map(|c| PricePoint::from_close(*c)).collect();

    let analysis = TechnicalAnalyzer::new().analyze(&series);

    assert!(!analysis.insufficient_data);
    assert_eq!(analysis.trend.direction, TrendDirection::Bullish);
    assert!(analysis
        .signals
        .iter()
        .any(|s| s.signal_type == SignalType::Buy && s.weight >= 0.7));
}

#[test]
fn test_double_patterns_need_twenty_points() {
    let series: Vec<PricePoint> = (0..19)
        .map(|i| PricePoint::from_close(if i % 2 == 0 { 90.0 } else { 110.0 }))
        .collect();
    assert!(!is_double_bottom(&series));
    assert!(!is_double_top(&series));
    assert!(detect_patterns(&series)
        .iter()
        .all(|p| !p.name.starts_with("Double")));
}

#[test]
fn test_analysis_serializes_camel_case() {
    let analysis = TechnicalAnalyzer::new().analyze(&common::uptrend(60));
    let json = serde_json::to_value(&analysis).unwrap();

    assert!(json.get("insufficientData").is_some());
    assert!(json["trend"].get("direction").is_some());
    assert!(json["volatility"].get("volatilityScore").is_some());
    assert!(json["signals"].is_array());
}
