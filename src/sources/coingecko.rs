use crate::error::{AppError, Result};
use crate::types::PriceData;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Characters of an error body kept in logs.
const ERROR_SNIPPET_CHARS: usize = 200;

/// `simple/price` entry for one coin.
#[derive(Debug, Deserialize)]
struct CoinGeckoPrice {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
    usd_24h_vol: Option<f64>,
    usd_market_cap: Option<f64>,
}

/// CoinGecko REST client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn price_url(&self, coin_id: &str) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true&include_24hr_vol=true&include_market_cap=true",
            self.base_url.trim_end_matches('/'),
            coin_id
        )
    }

    /// Fetch spot price, 24h change, volume and market cap for a coin.
    pub async fn fetch_price(&self, coin_id: &str) -> Result<PriceData> {
        let response = self
            .client
            .get(self.price_url(coin_id))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("CoinGecko API returned {}: {}", status, error_snippet(&text));
            return Err(AppError::ExternalApi(format!("CoinGecko API error: {}", status)));
        }

        let mut body: HashMap<String, CoinGeckoPrice> = response.json().await?;
        let entry = body
            .remove(coin_id)
            .ok_or_else(|| AppError::NotFound(format!("Coin not found: {}", coin_id)))?;

        parse_price(coin_id, entry)
    }
}

/// Leading characters of an upstream error body, cut on a char boundary.
fn error_snippet(text: &str) -> String {
    text.chars().take(ERROR_SNIPPET_CHARS).collect()
}

fn parse_price(coin_id: &str, entry: CoinGeckoPrice) -> Result<PriceData> {
    let price = entry
        .usd
        .ok_or_else(|| AppError::ExternalApi(format!("CoinGecko returned no USD price for {}", coin_id)))?;

    debug!("CoinGecko price for {}: ${}", coin_id, price);

    Ok(PriceData {
        source: "coingecko".to_string(),
        price,
        change_24h: entry.usd_24h_change,
        volume_24h: entry.usd_24h_vol,
        market_cap: entry.usd_market_cap,
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}
