use crate::services::profitability::ProfitabilityConfig;
use crate::sources::alternative::FEAR_GREED_API_URL;
use crate::sources::binance::BINANCE_API_URL;
use crate::sources::coingecko::COINGECKO_API_URL;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Per-category cache lifetimes for the data aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub price: Duration,
    pub sentiment: Duration,
    pub order_book: Duration,
    pub onchain: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            price: Duration::from_secs(30),
            sentiment: Duration::from_secs(300),
            order_book: Duration::from_secs(10),
            onchain: Duration::from_secs(600),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    pub coingecko_api_url: String,
    pub binance_api_url: String,
    pub fear_greed_api_url: String,
    pub cache_ttls: CacheTtls,
    /// Thresholds for the profitability scorer and opportunity scan.
    pub profitability: ProfitabilityConfig,
    /// Account balance (USD) used for position sizing in prompts.
    pub account_balance: f64,
    /// Percent of the account risked per trade.
    pub risk_percentage: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            coingecko_api_url: COINGECKO_API_URL.to_string(),
            binance_api_url: BINANCE_API_URL.to_string(),
            fear_greed_api_url: FEAR_GREED_API_URL.to_string(),
            cache_ttls: CacheTtls::default(),
            profitability: ProfitabilityConfig::default(),
            account_balance: 10_000.0,
            risk_percentage: 2.0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to [`Config::default`].
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            coingecko_api_url: env::var("COINGECKO_API_URL").unwrap_or(defaults.coingecko_api_url),
            binance_api_url: env::var("BINANCE_API_URL").unwrap_or(defaults.binance_api_url),
            fear_greed_api_url: env::var("FEAR_GREED_API_URL")
                .unwrap_or(defaults.fear_greed_api_url),
            cache_ttls: CacheTtls {
                price: secs_var("PRICE_CACHE_TTL_SECS").unwrap_or(defaults.cache_ttls.price),
                sentiment: secs_var("SENTIMENT_CACHE_TTL_SECS")
                    .unwrap_or(defaults.cache_ttls.sentiment),
                order_book: secs_var("ORDERBOOK_CACHE_TTL_SECS")
                    .unwrap_or(defaults.cache_ttls.order_book),
                onchain: secs_var("ONCHAIN_CACHE_TTL_SECS").unwrap_or(defaults.cache_ttls.onchain),
            },
            profitability: ProfitabilityConfig {
                min_profit_score: parse_var("MIN_PROFIT_SCORE")
                    .unwrap_or(defaults.profitability.min_profit_score),
                min_risk_reward: parse_var("MIN_RISK_REWARD")
                    .unwrap_or(defaults.profitability.min_risk_reward),
            },
            account_balance: parse_var("ACCOUNT_BALANCE")
                .filter(|v: &f64| *v > 0.0)
                .unwrap_or(defaults.account_balance),
            risk_percentage: parse_var("RISK_PERCENTAGE")
                .filter(|v: &f64| *v > 0.0 && *v <= 100.0)
                .unwrap_or(defaults.risk_percentage),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn secs_var(name: &str) -> Option<Duration> {
    parse_var::<u64>(name).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_ttls() {
        let ttls = CacheTtls::default();
        assert_eq!(ttls.price, Duration::from_secs(30));
        assert_eq!(ttls.sentiment, Duration::from_secs(300));
        assert_eq!(ttls.order_book, Duration::from_secs(10));
        assert_eq!(ttls.onchain, Duration::from_secs(600));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.coingecko_api_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.account_balance, 10_000.0);
        assert_eq!(config.risk_percentage, 2.0);
        assert_eq!(config.profitability.min_profit_score, 70.0);
        assert_eq!(config.profitability.min_risk_reward, 2.0);
    }

    #[test]
    fn test_unparsable_var_is_ignored() {
        env::set_var("SAMCRYPTO_TEST_BAD_NUMBER", "not-a-number");
        assert_eq!(parse_var::<u16>("SAMCRYPTO_TEST_BAD_NUMBER"), None);
        env::set_var("SAMCRYPTO_TEST_TTL", " 45 ");
        assert_eq!(secs_var("SAMCRYPTO_TEST_TTL"), Some(Duration::from_secs(45)));
        assert_eq!(parse_var::<u16>("SAMCRYPTO_TEST_UNSET_VAR"), None);
    }
}
