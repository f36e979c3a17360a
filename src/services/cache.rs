use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Market data categories, each cached under its own TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheCategory {
    Price,
    Sentiment,
    OrderBook,
    OnChain,
}

impl CacheCategory {
    pub fn prefix(&self) -> &'static str {
        match self {
            CacheCategory::Price => "price",
            CacheCategory::Sentiment => "sentiment",
            CacheCategory::OrderBook => "orderbook",
            CacheCategory::OnChain => "onchain",
        }
    }

    /// Cache key for a coin, `"{category}_{coin_id}"`.
    pub fn key(&self, coin_id: &str) -> String {
        format!("{}_{}", self.prefix(), coin_id)
    }
}

/// A thread-safe cache where every entry lives for a fixed TTL.
///
/// An entry is valid while `now < inserted_at + ttl`. Expired entries are
/// dropped lazily on read or in bulk via [`TtlCache::cleanup`].
pub struct TtlCache<V> {
    data: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Get a live value, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        match self.data.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(entry) => {
                drop(entry);
                self.data.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value for the cache's TTL, replacing any previous entry.
    pub fn insert(&self, key: String, value: V) {
        self.data.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub fn clear(&self) {
        self.data.clear();
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.data.len();
        self.data.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.data.len())
    }

    /// Number of stored entries (including expired ones not yet evicted).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keys() {
        assert_eq!(CacheCategory::Price.key("bitcoin"), "price_bitcoin");
        assert_eq!(CacheCategory::OrderBook.key("solana"), "orderbook_solana");
        assert_eq!(CacheCategory::OnChain.key("ethereum"), "onchain_ethereum");
    }

    #[test]
    fn test_cache_basic() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("price_bitcoin".to_string(), 50_000.0);
        assert_eq!(cache.get("price_bitcoin"), Some(50_000.0));
        assert_eq!(cache.get("price_ethereum"), None);
    }

    #[test]
    fn test_cache_expiration() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.insert("price_bitcoin".to_string(), 1.0);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("price_bitcoin"), None);
        // Expired entry evicted on read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_overwrite_refreshes() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k".to_string(), 1);
        cache.insert("k".to_string(), 2);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_clear() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), "x".to_string());
        cache.insert("b".to_string(), "y".to_string());
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_cleanup_counts() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.cleanup(), 2);
        assert_eq!(cache.len(), 0);
    }
}
