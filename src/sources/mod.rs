pub mod alternative;
pub mod binance;
pub mod coingecko;
pub mod simulated;

pub use alternative::FearGreedClient;
pub use binance::{coin_id_to_symbol, BinanceClient};
pub use coingecko::CoinGeckoClient;

use crate::config::Config;
use crate::error::Result;
use crate::types::{FearGreedData, OnChainMetrics, PriceData, RawOrderBook};
use async_trait::async_trait;
use reqwest::Client;

const USER_AGENT: &str = "samcrypto/0.1 (Crypto Trading Assistant)";

/// Upstream market data the aggregator draws from.
///
/// Implementations do no caching; that is the aggregator's job.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Spot price for a CoinGecko coin id.
    async fn fetch_price(&self, coin_id: &str) -> Result<PriceData>;

    async fn fetch_fear_greed(&self) -> Result<FearGreedData>;

    /// Order book for an exchange trading pair, e.g. `BTCUSDT`.
    async fn fetch_order_book(&self, symbol: &str) -> Result<RawOrderBook>;

    async fn fetch_onchain(&self, coin_id: &str) -> Result<OnChainMetrics>;
}

/// Production source: CoinGecko prices, Binance depth, alternative.me
/// Fear & Greed and simulated on-chain metrics.
#[derive(Clone)]
pub struct HttpMarketSource {
    coingecko: CoinGeckoClient,
    binance: BinanceClient,
    fear_greed: FearGreedClient,
}

impl HttpMarketSource {
    pub fn new(coingecko_url: &str, binance_url: &str, fear_greed_url: &str) -> Self {
        // One client shared by all upstreams
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            coingecko: CoinGeckoClient::new(client.clone(), coingecko_url),
            binance: BinanceClient::new(client.clone(), binance_url),
            fear_greed: FearGreedClient::new(client, fear_greed_url),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.coingecko_api_url,
            &config.binance_api_url,
            &config.fear_greed_api_url,
        )
    }
}

#[async_trait]
impl MarketDataSource for HttpMarketSource {
    async fn fetch_price(&self, coin_id: &str) -> Result<PriceData> {
        self.coingecko.fetch_price(coin_id).await
    }

    async fn fetch_fear_greed(&self) -> Result<FearGreedData> {
        self.fear_greed.fetch().await
    }

    async fn fetch_order_book(&self, symbol: &str) -> Result<RawOrderBook> {
        self.binance.fetch_order_book(symbol).await
    }

    async fn fetch_onchain(&self, coin_id: &str) -> Result<OnChainMetrics> {
        Ok(simulated::onchain_metrics(&mut rand::thread_rng(), coin_id))
    }
}
