//! Multi-source market data aggregation.
//!
//! Price, sentiment, order book and on-chain data are fetched concurrently,
//! each behind its own TTL cache. A failing source never fails the whole
//! aggregate; it just lowers the data-quality score.

use crate::config::CacheTtls;
use crate::services::cache::{CacheCategory, TtlCache};
use crate::services::signals::{mean, std_dev};
use crate::sources::{coin_id_to_symbol, simulated, MarketDataSource};
use crate::types::{
    ActivityLevel, AggregatedMarketData, Confidence, DataQuality, FearGreedData, Liquidity, NewsSentiment,
    OnChainMetrics, OrderBookAnalysis, OverallSentiment, PriceData, RawOrderBook, SentimentClass,
    SentimentData, SocialSentiment, SourceAvailability,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Levels per side considered when analyzing an order book.
const ORDER_BOOK_DEPTH: usize = 20;

const FEAR_GREED_WEIGHT: f64 = 0.4;
const SOCIAL_WEIGHT: f64 = 0.35;
const NEWS_WEIGHT: f64 = 0.25;

/// Entry counts per cache category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub price: usize,
    pub sentiment: usize,
    pub order_book: usize,
    pub onchain: usize,
    pub total: usize,
}

/// Aggregates market data from a [`MarketDataSource`] with per-category caching.
pub struct DataAggregator {
    source: Arc<dyn MarketDataSource>,
    prices: TtlCache<PriceData>,
    sentiment: TtlCache<SentimentData>,
    order_books: TtlCache<OrderBookAnalysis>,
    onchain: TtlCache<OnChainMetrics>,
}

impl DataAggregator {
    pub fn new(source: Arc<dyn MarketDataSource>, ttls: CacheTtls) -> Self {
        Self {
            source,
            prices: TtlCache::new(ttls.price),
            sentiment: TtlCache::new(ttls.sentiment),
            order_books: TtlCache::new(ttls.order_book),
            onchain: TtlCache::new(ttls.onchain),
        }
    }

    /// Fetch all four categories concurrently and combine them.
    ///
    /// Always returns an aggregate; unavailable categories are `None`.
    pub async fn aggregate(&self, coin_id: &str) -> AggregatedMarketData {
        debug!("Aggregating market data for {}", coin_id);

        let (price, sentiment, order_book, onchain) = tokio::join!(
            self.get_price_data(coin_id),
            self.get_sentiment_data(coin_id),
            self.get_order_book_data(coin_id),
            self.get_onchain_data(coin_id),
        );

        let data_quality = DataQuality::from_sources(SourceAvailability {
            price: price.is_some(),
            sentiment: sentiment.is_some(),
            order_book: order_book.is_some(),
            onchain: onchain.is_some(),
        });

        info!(
            "Aggregated {}: {}/{} sources ({})",
            coin_id,
            data_quality.score,
            data_quality.max_score,
            data_quality.rating.label()
        );

        AggregatedMarketData {
            coin: coin_id.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            price,
            sentiment,
            order_book,
            onchain,
            data_quality,
        }
    }

    pub async fn get_price_data(&self, coin_id: &str) -> Option<PriceData> {
        let key = CacheCategory::Price.key(coin_id);
        if let Some(cached) = self.prices.get(&key) {
            debug!("Price cache hit for {}", coin_id);
            return Some(cached);
        }

        match self.source.fetch_price(coin_id).await {
            Ok(data) => {
                self.prices.insert(key, data.clone());
                Some(data)
            }
            Err(e) => {
                warn!("Price data unavailable for {}: {}", coin_id, e);
                None
            }
        }
    }

    /// Fear & Greed plus estimated social and news sentiment.
    ///
    /// A failed Fear & Greed fetch degrades to a neutral reading rather than
    /// dropping the category.
    pub async fn get_sentiment_data(&self, coin_id: &str) -> Option<SentimentData> {
        let key = CacheCategory::Sentiment.key(coin_id);
        if let Some(cached) = self.sentiment.get(&key) {
            debug!("Sentiment cache hit for {}", coin_id);
            return Some(cached);
        }

        let fear_greed = match self.source.fetch_fear_greed().await {
            Ok(data) => data,
            Err(e) => {
                warn!("Fear & Greed index unavailable, using neutral: {}", e);
                FearGreedData::neutral()
            }
        };
        let social = simulated::social_sentiment(&mut rand::thread_rng(), coin_id);
        let news = simulated::news_sentiment(coin_id);
        let overall = overall_sentiment(&fear_greed, &social, &news);

        let data = SentimentData {
            fear_greed,
            social,
            news,
            overall,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        self.sentiment.insert(key, data.clone());
        Some(data)
    }

    pub async fn get_order_book_data(&self, coin_id: &str) -> Option<OrderBookAnalysis> {
        let key = CacheCategory::OrderBook.key(coin_id);
        if let Some(cached) = self.order_books.get(&key) {
            debug!("Order book cache hit for {}", coin_id);
            return Some(cached);
        }

        let Some(symbol) = coin_id_to_symbol(coin_id) else {
            debug!("No exchange pair for {}, skipping order book", coin_id);
            return None;
        };

        let book = match self.source.fetch_order_book(symbol).await {
            Ok(book) => book,
            Err(e) => {
                warn!("Order book unavailable for {}: {}", symbol, e);
                return None;
            }
        };

        let Some(analysis) = analyze_order_book(&book) else {
            warn!("Order book for {} has an empty side", symbol);
            return None;
        };
        self.order_books.insert(key, analysis.clone());
        Some(analysis)
    }

    pub async fn get_onchain_data(&self, coin_id: &str) -> Option<OnChainMetrics> {
        let key = CacheCategory::OnChain.key(coin_id);
        if let Some(cached) = self.onchain.get(&key) {
            debug!("On-chain cache hit for {}", coin_id);
            return Some(cached);
        }

        match self.source.fetch_onchain(coin_id).await {
            Ok(data) => {
                self.onchain.insert(key, data.clone());
                Some(data)
            }
            Err(e) => {
                warn!("On-chain data unavailable for {}: {}", coin_id, e);
                None
            }
        }
    }

    pub fn clear_cache(&self) {
        self.prices.clear();
        self.sentiment.clear();
        self.order_books.clear();
        self.onchain.clear();
        info!("Market data cache cleared");
    }

    /// Drop expired entries from every category.
    pub fn cleanup_expired(&self) -> usize {
        self.prices.cleanup()
            + self.sentiment.cleanup()
            + self.order_books.cleanup()
            + self.onchain.cleanup()
    }

    pub fn cache_stats(&self) -> CacheStats {
        let price = self.prices.len();
        let sentiment = self.sentiment.len();
        let order_book = self.order_books.len();
        let onchain = self.onchain.len();

        CacheStats {
            price,
            sentiment,
            order_book,
            onchain,
            total: price + sentiment + order_book + onchain,
        }
    }
}

/// Summarize the top [`ORDER_BOOK_DEPTH`] levels of each side.
///
/// Returns `None` when either side is empty or carries no volume.
pub fn analyze_order_book(book: &RawOrderBook) -> Option<OrderBookAnalysis> {
    let bids = &book.bids[..book.bids.len().min(ORDER_BOOK_DEPTH)];
    let asks = &book.asks[..book.asks.len().min(ORDER_BOOK_DEPTH)];

    let (best_bid, _) = *bids.first()?;
    let (best_ask, _) = *asks.first()?;
    if best_bid <= 0.0 {
        return None;
    }

    let bid_volume: f64 = bids.iter().map(|(_, qty)| qty).sum();
    let ask_volume: f64 = asks.iter().map(|(_, qty)| qty).sum();
    if ask_volume <= 0.0 {
        return None;
    }

    let ratio = bid_volume / ask_volume;
    let spread = (best_ask - best_bid) / best_bid * 100.0;

    let pressure = if ratio > 1.1 {
        SentimentClass::Bullish
    } else if ratio < 0.9 {
        SentimentClass::Bearish
    } else {
        SentimentClass::Neutral
    };

    Some(OrderBookAnalysis {
        bid_volume,
        ask_volume,
        ratio,
        spread,
        pressure,
        liquidity: if bid_volume + ask_volume > 1000.0 {
            Liquidity::High
        } else {
            Liquidity::Medium
        },
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}

/// Weighted blend of Fear & Greed, social and news sentiment.
pub fn overall_sentiment(
    fear_greed: &FearGreedData,
    social: &SocialSentiment,
    news: &NewsSentiment,
) -> OverallSentiment {
    let scores = [
        fear_greed.value as f64,
        social.score as f64,
        news.score as f64,
    ];
    let score = scores[0] * FEAR_GREED_WEIGHT + scores[1] * SOCIAL_WEIGHT + scores[2] * NEWS_WEIGHT;

    // Agreement between the three readings
    let spread = std_dev(&scores, mean(&scores).unwrap_or(0.0));
    let confidence = if spread < 10.0 {
        Confidence::High
    } else if spread < 20.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    OverallSentiment {
        score: score.round().clamp(0.0, 100.0) as u8,
        classification: SentimentClass::from_score(score),
        confidence,
    }
}

/// Render aggregated data as a prompt section.
pub fn format_for_ai(data: &AggregatedMarketData) -> String {
    let mut out = String::from("\n## MULTI-SOURCE DATA INTELLIGENCE:\n\n");

    if let Some(price) = &data.price {
        let change = price
            .change_24h
            .map(|c| format!("{:.2}%", c))
            .unwrap_or_else(|| "n/a".to_string());
        out.push_str(&format!(
            "**Price Data:**\n- Source: {}\n- Price: ${:.2}\n- 24h Change: {}\n- Volume: ${}\n\n",
            price.source,
            price.price,
            change,
            format_number(price.volume_24h.unwrap_or(0.0))
        ));
    }

    if let Some(sentiment) = &data.sentiment {
        out.push_str(&format!(
            "**Market Sentiment:**\n\
             - Fear & Greed Index: {} ({})\n\
             - Social Sentiment: {}/100 ({})\n\
             - Overall Sentiment: {}/100 ({})\n\
             - Confidence: {}\n\n",
            sentiment.fear_greed.value,
            sentiment.fear_greed.classification.label(),
            sentiment.social.score,
            sentiment.social.classification.label(),
            sentiment.overall.score,
            sentiment.overall.classification.label(),
            sentiment.overall.confidence.label()
        ));
    }

    if let Some(book) = &data.order_book {
        let liquidity = match book.liquidity {
            Liquidity::High => "high",
            Liquidity::Medium => "medium",
        };
        out.push_str(&format!(
            "**Order Book Analysis:**\n\
             - Bid/Ask Ratio: {:.2}\n\
             - Market Pressure: {}\n\
             - Liquidity: {}\n\
             - Spread: {:.3}%\n\n",
            book.ratio,
            book.pressure.label(),
            liquidity,
            book.spread
        ));
    }

    if let Some(onchain) = &data.onchain {
        let whales = &onchain.whale_activity;
        let activity = match whales.activity {
            ActivityLevel::High => "high",
            ActivityLevel::Normal => "normal",
        };
        out.push_str(&format!(
            "**On-Chain Metrics:**\n- Whale Activity: {}\n- Large Transactions (24h): {}\n",
            activity, whales.large_transactions_24h
        ));
        if let Some(ratio) = onchain.staking_ratio {
            out.push_str(&format!("- Staking Ratio: {:.1}%\n", ratio * 100.0));
        }
        out.push('\n');
    }

    let quality = &data.data_quality;
    out.push_str(&format!(
        "**Data Quality:**\n- Rating: {} ({:.0}%)\n- Sources Available: {}/{}\n",
        quality.rating.label(),
        quality.percentage,
        quality.score,
        quality.max_score
    ));

    out
}

/// Format a number with K/M/B/T suffixes and two decimals.
pub fn format_number(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }

    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}
