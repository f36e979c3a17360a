use crate::error::{AppError, Result};
use crate::types::RawOrderBook;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

pub const BINANCE_API_URL: &str = "https://api.binance.com/api/v3";

/// Order book depth requested from Binance.
const DEPTH_LIMIT: u32 = 100;

/// CoinGecko coin id -> Binance trading pair.
pub const COIN_PAIRS: &[(&str, &str)] = &[
    ("bitcoin", "BTCUSDT"),
    ("ethereum", "ETHUSDT"),
    ("solana", "SOLUSDT"),
    ("cardano", "ADAUSDT"),
    ("ripple", "XRPUSDT"),
    ("dogecoin", "DOGEUSDT"),
    ("polkadot", "DOTUSDT"),
    ("binancecoin", "BNBUSDT"),
    ("avalanche-2", "AVAXUSDT"),
    ("chainlink", "LINKUSDT"),
    ("polygon", "MATICUSDT"),
    ("litecoin", "LTCUSDT"),
];

/// Binance trading pair for a coin id, if listed.
pub fn coin_id_to_symbol(coin_id: &str) -> Option<&'static str> {
    COIN_PAIRS
        .iter()
        .find(|(id, _)| *id == coin_id)
        .map(|(_, pair)| *pair)
}

/// Binance depth response. Prices and quantities arrive as strings.
#[derive(Debug, Deserialize)]
struct BinanceDepth {
    bids: Vec<[String; 2]>,
    asks: Vec<[String; 2]>,
}

impl BinanceDepth {
    fn into_order_book(self) -> Result<RawOrderBook> {
        Ok(RawOrderBook {
            bids: parse_levels(&self.bids)?,
            asks: parse_levels(&self.asks)?,
        })
    }
}

fn parse_levels(levels: &[[String; 2]]) -> Result<Vec<(f64, f64)>> {
    levels
        .iter()
        .map(|[price, qty]| {
            let price = price
                .parse::<f64>()
                .map_err(|_| AppError::ExternalApi(format!("Invalid order book price: {}", price)))?;
            let qty = qty
                .parse::<f64>()
                .map_err(|_| AppError::ExternalApi(format!("Invalid order book quantity: {}", qty)))?;
            Ok((price, qty))
        })
        .collect()
}

/// Binance REST client.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch the order book for a trading pair.
    pub async fn fetch_order_book(&self, symbol: &str) -> Result<RawOrderBook> {
        let url = format!(
            "{}/depth?symbol={}&limit={}",
            self.base_url.trim_end_matches('/'),
            symbol,
            DEPTH_LIMIT
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Binance depth for {} returned {}", symbol, status);
            return Err(AppError::ExternalApi(format!("Binance order book error: {}", status)));
        }

        let depth: BinanceDepth = response.json().await?;
        debug!(
            "Binance depth for {}: {} bids, {} asks",
            symbol,
            depth.bids.len(),
            depth.asks.len()
        );
        depth.into_order_book()
    }
}
