//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use samcrypto::error::{AppError, Result};
use samcrypto::sources::MarketDataSource;
use samcrypto::types::{
    ActivityLevel, FearGreedData, NetFlow, OnChainMetrics, PriceData, PricePoint, RawOrderBook,
    WhaleActivity,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Market data source with canned responses that counts every call.
#[derive(Default)]
pub struct MockSource {
    pub price: Option<PriceData>,
    pub fear_greed: Option<FearGreedData>,
    pub order_book: Option<RawOrderBook>,
    pub onchain: bool,
    pub price_calls: AtomicUsize,
    pub fear_greed_calls: AtomicUsize,
    pub order_book_calls: AtomicUsize,
    pub onchain_calls: AtomicUsize,
}

impl MockSource {
    /// Every source healthy.
    pub fn healthy() -> Self {
        Self {
            price: Some(price_data(50_000.0)),
            fear_greed: Some(FearGreedData::from_value(62, "1718064000".to_string())),
            order_book: Some(RawOrderBook {
                bids: vec![(49_990.0, 800.0), (49_980.0, 400.0)],
                asks: vec![(50_010.0, 300.0), (50_020.0, 200.0)],
            }),
            onchain: true,
            ..Default::default()
        }
    }

    /// Every upstream failing.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for MockSource {
    async fn fetch_price(&self, coin_id: &str) -> Result<PriceData> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.price
            .clone()
            .ok_or_else(|| AppError::ExternalApi(format!("price down for {}", coin_id)))
    }

    async fn fetch_fear_greed(&self) -> Result<FearGreedData> {
        self.fear_greed_calls.fetch_add(1, Ordering::SeqCst);
        self.fear_greed
            .clone()
            .ok_or_else(|| AppError::ExternalApi("fear & greed down".to_string()))
    }

    async fn fetch_order_book(&self, symbol: &str) -> Result<RawOrderBook> {
        self.order_book_calls.fetch_add(1, Ordering::SeqCst);
        self.order_book
            .clone()
            .ok_or_else(|| AppError::ExternalApi(format!("depth down for {}", symbol)))
    }

    async fn fetch_onchain(&self, _coin_id: &str) -> Result<OnChainMetrics> {
        self.onchain_calls.fetch_add(1, Ordering::SeqCst);
        if !self.onchain {
            return Err(AppError::ExternalApi("on-chain down".to_string()));
        }
        Ok(OnChainMetrics {
            active_addresses: None,
            transaction_volume: None,
            network_growth: None,
            whale_activity: WhaleActivity {
                large_transactions_24h: 25,
                net_flow: NetFlow::Positive,
                activity: ActivityLevel::Normal,
            },
            hash_rate: None,
            staking_ratio: Some(0.65),
            simulated: true,
            timestamp: 0,
        })
    }
}

pub fn price_data(price: f64) -> PriceData {
    PriceData {
        source: "mock".to_string(),
        price,
        change_24h: Some(6.0),
        volume_24h: Some(6e9),
        market_cap: Some(9.8e11),
        timestamp: 0,
    }
}

/// Steady uptrend of `len` closes starting at 100.
pub fn uptrend(len: usize) -> Vec<PricePoint> {
    (0..len)
        .map(|i| PricePoint::from_close(100.0 + i as f64))
        .collect()
}
