//! samcrypto - crypto trading assistant service
//!
//! Technical analysis, profitability scoring and multi-source market data,
//! assembled into prompts for a hosted LLM.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::{DataAggregator, ProfitabilityScorer, PromptAssembler, TechnicalAnalyzer};
use sources::MarketDataSource;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub aggregator: Arc<DataAggregator>,
    pub analyzer: Arc<TechnicalAnalyzer>,
    pub scorer: Arc<ProfitabilityScorer>,
    pub prompt: Arc<PromptAssembler>,
}

impl AppState {
    /// Wire every service from a config and a market data source.
    pub fn new(config: Config, source: Arc<dyn MarketDataSource>) -> Self {
        let aggregator = Arc::new(DataAggregator::new(source, config.cache_ttls));
        let analyzer = Arc::new(TechnicalAnalyzer::new());
        let scorer = Arc::new(ProfitabilityScorer::new(config.profitability));
        let prompt = Arc::new(PromptAssembler::new(
            aggregator.clone(),
            analyzer.clone(),
            scorer.clone(),
            config.account_balance,
            config.risk_percentage,
        ));

        Self {
            config: Arc::new(config),
            aggregator,
            analyzer,
            scorer,
            prompt,
        }
    }
}

// Re-export commonly used types
pub use types::*;
