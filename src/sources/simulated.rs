//! Estimated sentiment and on-chain metrics.
//!
//! No social, news or chain-explorer feed is wired in yet, so these readings
//! are generated locally and flagged `simulated` where the type allows it.

use crate::types::{
    ActivityLevel, Confidence, NetFlow, NewsSentiment, OnChainMetrics, SentimentClass,
    SocialSentiment, WhaleActivity,
};
use rand::Rng;

/// Coins with enough social volume to get a higher baseline.
const SOCIAL_TOP_COINS: &[&str] = &["bitcoin", "ethereum", "solana", "cardano"];
/// Coins with regular large-holder movement.
const WHALE_TOP_COINS: &[&str] = &["bitcoin", "ethereum"];
/// Proof-of-stake coins with a known staking ratio.
const STAKING_COINS: &[&str] = &["ethereum", "cardano", "solana"];

const STAKING_RATIO: f64 = 0.65;

/// Social sentiment around a per-coin baseline with ±10 jitter.
pub fn social_sentiment<R: Rng + ?Sized>(rng: &mut R, coin_id: &str) -> SocialSentiment {
    let top = SOCIAL_TOP_COINS.contains(&coin_id);
    let base = if top { 65.0 } else { 50.0 };
    let variation = (rng.gen::<f64>() - 0.5) * 20.0;
    let score = (base + variation).clamp(0.0, 100.0);

    SocialSentiment {
        score: score.round() as u8,
        classification: SentimentClass::from_score(score),
        sources: vec![
            "twitter".to_string(),
            "reddit".to_string(),
            "telegram".to_string(),
        ],
        confidence: if top { Confidence::High } else { Confidence::Medium },
        simulated: true,
    }
}

/// Static neutral-bullish news estimate.
pub fn news_sentiment(_coin_id: &str) -> NewsSentiment {
    NewsSentiment {
        score: 55,
        classification: SentimentClass::NeutralBullish,
        articles_analyzed: 0,
        confidence: Confidence::Medium,
    }
}

pub fn whale_activity<R: Rng + ?Sized>(rng: &mut R, coin_id: &str) -> WhaleActivity {
    let large_transactions_24h = if WHALE_TOP_COINS.contains(&coin_id) {
        rng.gen_range(10..60)
    } else {
        rng.gen_range(0..20)
    };

    WhaleActivity {
        large_transactions_24h,
        net_flow: if rng.gen::<f64>() > 0.5 {
            NetFlow::Positive
        } else {
            NetFlow::Negative
        },
        activity: if rng.gen::<f64>() > 0.6 {
            ActivityLevel::High
        } else {
            ActivityLevel::Normal
        },
    }
}

pub fn onchain_metrics<R: Rng + ?Sized>(rng: &mut R, coin_id: &str) -> OnChainMetrics {
    OnChainMetrics {
        active_addresses: None,
        transaction_volume: None,
        network_growth: None,
        whale_activity: whale_activity(rng, coin_id),
        hash_rate: (coin_id == "bitcoin").then(|| "increasing".to_string()),
        staking_ratio: STAKING_COINS.contains(&coin_id).then_some(STAKING_RATIO),
        simulated: true,
        timestamp: chrono::Utc::now().timestamp_millis(),
    }
}
