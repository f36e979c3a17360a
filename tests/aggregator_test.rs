//! Data aggregator tests against a counting mock source.

mod common;

use common::MockSource;
use samcrypto::config::CacheTtls;
use samcrypto::services::aggregator::format_for_ai;
use samcrypto::services::DataAggregator;
use samcrypto::types::{FearGreedClass, QualityRating, SentimentClass};
use std::sync::Arc;
use std::time::Duration;

fn aggregator(source: Arc<MockSource>) -> DataAggregator {
    DataAggregator::new(source, CacheTtls::default())
}

#[tokio::test]
async fn test_all_sources_available() {
    let source = Arc::new(MockSource::healthy());
    let data = aggregator(source).aggregate("bitcoin").await;

    assert_eq!(data.coin, "bitcoin");
    assert!(data.price.is_some());
    assert!(data.sentiment.is_some());
    assert!(data.order_book.is_some());
    assert!(data.onchain.is_some());

    let quality = &data.data_quality;
    assert_eq!(quality.score, 4);
    assert_eq!(quality.max_score, 4);
    assert_eq!(quality.percentage, 100.0);
    assert_eq!(quality.rating, QualityRating::Excellent);

    // 1200 bid vs 500 ask
    let book = data.order_book.unwrap();
    assert_eq!(book.pressure, SentimentClass::Bullish);
    assert!((book.ratio - 2.4).abs() < 1e-9);
}

#[tokio::test]
async fn test_partial_failure_still_aggregates() {
    let source = Arc::new(MockSource::failing());
    let data = aggregator(source.clone()).aggregate("bitcoin").await;

    assert!(data.price.is_none());
    assert!(data.order_book.is_none());
    assert!(data.onchain.is_none());

    // Fear & Greed falls back to neutral, so sentiment survives
    let sentiment = data.sentiment.expect("sentiment should degrade, not fail");
    assert_eq!(sentiment.fear_greed.value, 50);
    assert_eq!(sentiment.fear_greed.classification, FearGreedClass::Neutral);

    assert_eq!(data.data_quality.score, 1);
    assert_eq!(data.data_quality.percentage, 25.0);
    assert_eq!(data.data_quality.rating, QualityRating::Fair);
    assert!(data.data_quality.sources.sentiment);
    assert!(!data.data_quality.sources.price);
}

#[tokio::test]
async fn test_timestamp_is_rfc3339() {
    let data = aggregator(Arc::new(MockSource::healthy()))
        .aggregate("ethereum")
        .await;
    assert!(chrono::DateTime::parse_from_rfc3339(&data.timestamp).is_ok());
}

#[tokio::test]
async fn test_second_aggregate_served_from_cache() {
    let source = Arc::new(MockSource::healthy());
    let aggregator = aggregator(source.clone());

    let first = aggregator.aggregate("bitcoin").await;
    let second = aggregator.aggregate("bitcoin").await;

    assert_eq!(MockSource::calls(&source.price_calls), 1);
    assert_eq!(MockSource::calls(&source.fear_greed_calls), 1);
    assert_eq!(MockSource::calls(&source.order_book_calls), 1);
    assert_eq!(MockSource::calls(&source.onchain_calls), 1);
    assert_eq!(first.price, second.price);
    assert_eq!(first.sentiment, second.sentiment);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let source = Arc::new(MockSource::failing());
    let aggregator = aggregator(source.clone());

    aggregator.aggregate("bitcoin").await;
    aggregator.aggregate("bitcoin").await;

    assert_eq!(MockSource::calls(&source.price_calls), 2);
    assert_eq!(MockSource::calls(&source.order_book_calls), 2);
    assert_eq!(MockSource::calls(&source.onchain_calls), 2);
}

#[tokio::test]
async fn test_cache_expires_after_ttl() {
    let source = Arc::new(MockSource::healthy());
    let ttls = CacheTtls {
        price: Duration::from_millis(20),
        ..CacheTtls::default()
    };
    let aggregator = DataAggregator::new(source.clone(), ttls);

    aggregator.get_price_data("bitcoin").await;
    aggregator.get_price_data("bitcoin").await;
    assert_eq!(MockSource::calls(&source.price_calls), 1);

    tokio::time::sleep(Duration::from_millis(40)).await;
    aggregator.get_price_data("bitcoin").await;
    assert_eq!(MockSource::calls(&source.price_calls), 2);
}

#[tokio::test]
async fn test_caches_are_per_coin() {
    let source = Arc::new(MockSource::healthy());
    let aggregator = aggregator(source.clone());

    aggregator.get_price_data("bitcoin").await;
    aggregator.get_price_data("ethereum").await;
    assert_eq!(MockSource::calls(&source.price_calls), 2);
}

#[tokio::test]
async fn test_unlisted_coin_skips_order_book() {
    let source = Arc::new(MockSource::healthy());
    let data = aggregator(source.clone()).aggregate("pepe").await;

    assert!(data.order_book.is_none());
    assert_eq!(MockSource::calls(&source.order_book_calls), 0);
    assert_eq!(data.data_quality.score, 3);
    assert_eq!(data.data_quality.rating, QualityRating::Excellent);
}

#[tokio::test]
async fn test_cache_stats_and_clear() {
    let source = Arc::new(MockSource::healthy());
    let aggregator = aggregator(source.clone());

    assert_eq!(aggregator.cache_stats().total, 0);

    aggregator.aggregate("bitcoin").await;
    let stats = aggregator.cache_stats();
    assert_eq!(stats.price, 1);
    assert_eq!(stats.sentiment, 1);
    assert_eq!(stats.order_book, 1);
    assert_eq!(stats.onchain, 1);
    assert_eq!(stats.total, 4);

    aggregator.clear_cache();
    assert_eq!(aggregator.cache_stats().total, 0);

    aggregator.aggregate("bitcoin").await;
    assert_eq!(MockSource::calls(&source.price_calls), 2);
}

#[tokio::test]
async fn test_ai_summary_lists_one_fact_per_line() {
    let data = aggregator(Arc::new(MockSource::healthy()))
        .aggregate("bitcoin")
        .await;
    let text = format_for_ai(&data);

    assert!(text.contains("**Price Data:**\n- Source: mock\n- Price: $50000.00\n- 24h Change: 6.00%\n- Volume: $6.00B\n\n"));
    assert!(text.contains("**Market Sentiment:**\n- Fear & Greed Index: 62 (greed)\n- Social Sentiment: "));
    assert!(text.contains("**Order Book Analysis:**\n- Bid/Ask Ratio: 2.40\n- Market Pressure: bullish\n- Liquidity: "));
    assert!(text.contains("**On-Chain Metrics:**\n- Whale Activity: normal\n- Large Transactions (24h): 25\n- Staking Ratio: 65.0%\n"));
    assert!(text.ends_with("**Data Quality:**\n- Rating: excellent (100%)\n- Sources Available: 4/4\n"));
}
