pub mod aggregator;
pub mod cache;
pub mod profitability;
pub mod prompt;
pub mod signals;

pub use aggregator::{CacheStats, DataAggregator};
pub use cache::{CacheCategory, TtlCache};
pub use profitability::{ProfitabilityConfig, ProfitabilityError, ProfitabilityScorer};
pub use prompt::{AssembledPrompt, Intent, PromptAssembler};
pub use signals::TechnicalAnalyzer;
