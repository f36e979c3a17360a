use crate::error::{AppError, Result};
use crate::types::FearGreedData;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

pub const FEAR_GREED_API_URL: &str = "https://api.alternative.me";

#[derive(Debug, Deserialize)]
struct FearGreedResponse {
    data: Vec<FearGreedEntry>,
}

/// Index entry. alternative.me sends every field as a string.
#[derive(Debug, Deserialize)]
struct FearGreedEntry {
    value: String,
    #[serde(default)]
    timestamp: String,
}

impl FearGreedResponse {
    fn latest(self) -> Result<FearGreedData> {
        let entry = self
            .data
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ExternalApi("Fear & Greed index returned no data".to_string()))?;

        let value = entry
            .value
            .trim()
            .parse::<u8>()
            .map_err(|_| AppError::ExternalApi(format!("Invalid Fear & Greed value: {}", entry.value)))?;

        Ok(FearGreedData::from_value(value, entry.timestamp))
    }
}

/// Client for the alternative.me Fear & Greed Index.
#[derive(Clone)]
pub struct FearGreedClient {
    client: Client,
    base_url: String,
}

impl FearGreedClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch the latest index reading.
    pub async fn fetch(&self) -> Result<FearGreedData> {
        let url = format!("{}/fng/", self.base_url.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Fear & Greed API returned {}", status);
            return Err(AppError::ExternalApi(format!("Fear & Greed API error: {}", status)));
        }

        let body: FearGreedResponse = response.json().await?;
        let data = body.latest()?;
        debug!("Fear & Greed index: {} ({})", data.value, data.classification.label());
        Ok(data)
    }
}
