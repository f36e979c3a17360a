use serde::{Deserialize, Serialize};

/// Spot price data for one coin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceData {
    pub source: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    /// Unix timestamp (milliseconds) when fetched.
    pub timestamp: i64,
}

/// Fear & Greed Index classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FearGreedClass {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl FearGreedClass {
    pub fn from_value(value: u8) -> Self {
        match value {
            v if v >= 75 => FearGreedClass::ExtremeGreed,
            v if v >= 60 => FearGreedClass::Greed,
            v if v >= 40 => FearGreedClass::Neutral,
            v if v >= 25 => FearGreedClass::Fear,
            _ => FearGreedClass::ExtremeFear,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FearGreedClass::ExtremeFear => "extreme_fear",
            FearGreedClass::Fear => "fear",
            FearGreedClass::Neutral => "neutral",
            FearGreedClass::Greed => "greed",
            FearGreedClass::ExtremeGreed => "extreme_greed",
        }
    }
}

/// Fear & Greed Index data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FearGreedData {
    pub value: u8,
    pub classification: FearGreedClass,
    pub timestamp: String,
}

impl FearGreedData {
    pub fn from_value(value: u8, timestamp: String) -> Self {
        let value = value.min(100);
        Self {
            value,
            classification: FearGreedClass::from_value(value),
            timestamp,
        }
    }

    /// Neutral reading used when the index cannot be fetched.
    pub fn neutral() -> Self {
        Self::from_value(50, chrono::Utc::now().timestamp_millis().to_string())
    }
}

/// Three-way sentiment bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentClass {
    Bullish,
    Bearish,
    Neutral,
    NeutralBullish,
}

impl SentimentClass {
    /// Classify a 0-100 sentiment score (>60 bullish, <40 bearish).
    pub fn from_score(score: f64) -> Self {
        if score > 60.0 {
            SentimentClass::Bullish
        } else if score < 40.0 {
            SentimentClass::Bearish
        } else {
            SentimentClass::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentClass::Bullish => "bullish",
            SentimentClass::Bearish => "bearish",
            SentimentClass::Neutral => "neutral",
            SentimentClass::NeutralBullish => "neutral_bullish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// Social sentiment. Simulated: there is no real social feed behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialSentiment {
    pub score: u8,
    pub classification: SentimentClass,
    pub sources: Vec<String>,
    pub confidence: Confidence,
    pub simulated: bool,
}

/// News sentiment. Static estimate until a news feed is wired in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSentiment {
    pub score: u8,
    pub classification: SentimentClass,
    pub articles_analyzed: u32,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSentiment {
    pub score: u8,
    pub classification: SentimentClass,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentData {
    pub fear_greed: FearGreedData,
    pub social: SocialSentiment,
    pub news: NewsSentiment,
    pub overall: OverallSentiment,
    pub timestamp: i64,
}

/// Raw order book as returned by the exchange: `[price, quantity]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOrderBook {
    pub bids: Vec<(f64, f64)>,
    pub asks: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liquidity {
    High,
    Medium,
}

/// Summary of the top of an order book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookAnalysis {
    pub bid_volume: f64,
    pub ask_volume: f64,
    /// Bid volume / ask volume.
    pub ratio: f64,
    /// Spread as a percentage of the best bid.
    pub spread: f64,
    pub pressure: SentimentClass,
    pub liquidity: Liquidity,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetFlow {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    High,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhaleActivity {
    pub large_transactions_24h: u32,
    pub net_flow: NetFlow,
    pub activity: ActivityLevel,
}

/// On-chain metrics. Simulated placeholders, flagged as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnChainMetrics {
    pub active_addresses: Option<u64>,
    pub transaction_volume: Option<f64>,
    pub network_growth: Option<f64>,
    pub whale_activity: WhaleActivity,
    pub hash_rate: Option<String>,
    pub staking_ratio: Option<f64>,
    pub simulated: bool,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityRating {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 75.0 {
            QualityRating::Excellent
        } else if pct >= 50.0 {
            QualityRating::Good
        } else if pct >= 25.0 {
            QualityRating::Fair
        } else {
            QualityRating::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityRating::Excellent => "excellent",
            QualityRating::Good => "good",
            QualityRating::Fair => "fair",
            QualityRating::Poor => "poor",
        }
    }
}

/// Which sources delivered data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAvailability {
    pub price: bool,
    pub sentiment: bool,
    pub order_book: bool,
    pub onchain: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    pub score: u8,
    pub max_score: u8,
    pub percentage: f64,
    pub rating: QualityRating,
    pub sources: SourceAvailability,
}

impl DataQuality {
    pub fn from_sources(sources: SourceAvailability) -> Self {
        let score = [
            sources.price,
            sources.sentiment,
            sources.order_book,
            sources.onchain,
        ]
        .iter()
        .filter(|ok| **ok)
        .count() as u8;
        let max_score = 4;
        let percentage = score as f64 / max_score as f64 * 100.0;

        Self {
            score,
            max_score,
            percentage,
            rating: QualityRating::from_percentage(percentage),
            sources,
        }
    }
}

/// Result of a multi-source aggregation. Always produced, even when every
/// source failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMarketData {
    pub coin: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub price: Option<PriceData>,
    pub sentiment: Option<SentimentData>,
    pub order_book: Option<OrderBookAnalysis>,
    pub onchain: Option<OnChainMetrics>,
    pub data_quality: DataQuality,
}

impl AggregatedMarketData {
    /// Market snapshot usable by the profitability scorer, if a price exists.
    pub fn snapshot(&self) -> Option<MarketSnapshot> {
        let price = self.price.as_ref()?;
        Some(MarketSnapshot {
            price: price.price,
            volume_24h: price.volume_24h,
            high_24h: None,
            low_24h: None,
            price_change_24h: price.change_24h,
            market_cap: price.market_cap,
        })
    }
}

/// Raw market data consumed by the profitability scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change_24h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}
